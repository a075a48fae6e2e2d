//! Split calculator.
//!
//! Turns a total and an ordered participant list into one [`Split`] per
//! participant, either evenly or from free-form per-person inputs.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, Split, UserId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SplitMode {
    /// Same share for everyone; the rounding remainder goes to the last
    /// participant.
    Equal,
    /// Caller-entered shares keyed by participant. Missing or unparsable
    /// entries count as zero.
    Manual { amounts: HashMap<UserId, String> },
}

/// Computes the splits of `total` among `participants`, in participant order.
///
/// Manual splits are not adjusted: use [`ensure_split_total`] before
/// submitting them.
///
/// ```rust
/// use engine::{MoneyCents, SplitMode, compute_splits};
///
/// let people = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let splits = compute_splits(MoneyCents::new(100_00), &people, &SplitMode::Equal).unwrap();
/// let amounts: Vec<i64> = splits.iter().map(|s| s.amount.cents()).collect();
/// assert_eq!(amounts, vec![33_33, 33_33, 33_34]);
/// ```
pub fn compute_splits(
    total: MoneyCents,
    participants: &[UserId],
    mode: &SplitMode,
) -> ResultEngine<Vec<Split>> {
    if !total.is_positive() {
        return Err(EngineError::Validation("amount must be > 0".to_string()));
    }
    if participants.is_empty() {
        return Err(EngineError::Validation(
            "participants must not be empty".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(participants.len());
    if let Some(duplicate) = participants.iter().find(|p| !seen.insert(p.as_str())) {
        return Err(EngineError::Validation(format!(
            "duplicate participant: {duplicate}"
        )));
    }

    match mode {
        SplitMode::Equal => Ok(equal_splits(total, participants)),
        SplitMode::Manual { amounts } => Ok(participants
            .iter()
            .map(|participant| {
                let amount = amounts
                    .get(participant)
                    .map_or(MoneyCents::ZERO, |raw| MoneyCents::parse_or_zero(raw));
                Split::new(participant.clone(), amount)
            })
            .collect()),
    }
}

fn equal_splits(total: MoneyCents, participants: &[UserId]) -> Vec<Split> {
    let per_person = total
        .div_round(participants.len())
        .unwrap_or(MoneyCents::ZERO);
    let mut splits: Vec<Split> = participants
        .iter()
        .map(|participant| Split::new(participant.clone(), per_person))
        .collect();

    let assigned: MoneyCents = splits.iter().map(|s| s.amount).sum();
    if let Some(last) = splits.last_mut() {
        last.amount += total - assigned;
    }
    splits
}

/// Fails unless the splits add up exactly to `total`.
pub fn ensure_split_total(total: MoneyCents, splits: &[Split]) -> ResultEngine<()> {
    let sum = splits
        .iter()
        .try_fold(MoneyCents::ZERO, |acc, s| acc.checked_add(s.amount));
    if sum != Some(total) {
        return Err(EngineError::Validation(
            "split totals do not match amount".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(ids: &[&str]) -> Vec<UserId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn cents(splits: &[Split]) -> Vec<i64> {
        splits.iter().map(|s| s.amount.cents()).collect()
    }

    #[test]
    fn equal_split_puts_remainder_on_last() {
        let splits =
            compute_splits(MoneyCents::new(100_00), &people(&["a", "b", "c"]), &SplitMode::Equal)
                .unwrap();
        assert_eq!(cents(&splits), vec![33_33, 33_33, 33_34]);
        assert_eq!(splits[2].participant_id, "c");
    }

    #[test]
    fn equal_split_can_round_down_the_last_share() {
        // 2.00 / 3 rounds to 0.67, so the last share absorbs -0.01.
        let splits =
            compute_splits(MoneyCents::new(2_00), &people(&["a", "b", "c"]), &SplitMode::Equal)
                .unwrap();
        assert_eq!(cents(&splits), vec![67, 67, 66]);
    }

    #[test]
    fn equal_split_single_participant_gets_everything() {
        let splits =
            compute_splits(MoneyCents::new(12_34), &people(&["a"]), &SplitMode::Equal).unwrap();
        assert_eq!(cents(&splits), vec![12_34]);
    }

    #[test]
    fn manual_split_defaults_bad_entries_to_zero() {
        let amounts = HashMap::from([
            ("a".to_string(), "60.5".to_string()),
            ("b".to_string(), "abc".to_string()),
            ("c".to_string(), "1.999".to_string()),
        ]);
        let splits = compute_splits(
            MoneyCents::new(100_00),
            &people(&["a", "b", "c", "d"]),
            &SplitMode::Manual { amounts },
        )
        .unwrap();
        assert_eq!(cents(&splits), vec![60_50, 0, 0, 0]);
        assert_eq!(
            ensure_split_total(MoneyCents::new(100_00), &splits),
            Err(EngineError::Validation(
                "split totals do not match amount".to_string()
            ))
        );
    }

    #[test]
    fn manual_split_matching_total_passes() {
        let amounts = HashMap::from([
            ("a".to_string(), "70".to_string()),
            ("b".to_string(), "30.00".to_string()),
        ]);
        let splits = compute_splits(
            MoneyCents::new(100_00),
            &people(&["a", "b"]),
            &SplitMode::Manual { amounts },
        )
        .unwrap();
        assert_eq!(ensure_split_total(MoneyCents::new(100_00), &splits), Ok(()));
    }

    #[test]
    fn overflowing_split_sum_is_a_mismatch() {
        let splits = vec![
            Split::new("a", MoneyCents::new(i64::MAX - 1)),
            Split::new("b", MoneyCents::new(i64::MAX - 1)),
        ];
        assert_eq!(
            ensure_split_total(MoneyCents::new(100), &splits),
            Err(EngineError::Validation(
                "split totals do not match amount".to_string()
            ))
        );

        let amounts = HashMap::from([
            ("a".to_string(), "90000000000000000".to_string()),
            ("b".to_string(), "90000000000000000".to_string()),
        ]);
        let splits = compute_splits(
            MoneyCents::new(100),
            &people(&["a", "b"]),
            &SplitMode::Manual { amounts },
        )
        .unwrap();
        assert!(ensure_split_total(MoneyCents::new(100), &splits).is_err());
    }

    #[test]
    fn tiny_equal_split_leaves_a_negative_last_share() {
        // 0.05 / 9 rounds up to 0.01 each, so the last share is 0.05 - 0.08.
        let participants = people(&["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
        let splits =
            compute_splits(MoneyCents::new(5), &participants, &SplitMode::Equal).unwrap();
        assert_eq!(cents(&splits), vec![1, 1, 1, 1, 1, 1, 1, 1, -3]);
        assert_eq!(ensure_split_total(MoneyCents::new(5), &splits), Ok(()));
    }

    #[test]
    fn rejects_non_positive_total_and_empty_participants() {
        assert!(compute_splits(MoneyCents::ZERO, &people(&["a"]), &SplitMode::Equal).is_err());
        assert!(compute_splits(MoneyCents::new(100), &[], &SplitMode::Equal).is_err());
        assert!(
            compute_splits(MoneyCents::new(100), &people(&["a", "a"]), &SplitMode::Equal).is_err()
        );
    }
}
