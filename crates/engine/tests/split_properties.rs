use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use engine::{
    Expense, MoneyCents, NameDirectory, SplitMode, UserId, build_settlement, compute_balances,
    compute_splits,
};

const USERS: [&str; 4] = ["ann", "ben", "cat", "dan"];

fn members(mask: usize) -> Vec<UserId> {
    USERS
        .iter()
        .enumerate()
        .filter(|(idx, _)| mask & (1 << idx) != 0)
        .map(|(_, id)| id.to_string())
        .collect()
}

fn history(specs: &[(i64, usize, usize)]) -> Vec<Expense> {
    specs
        .iter()
        .filter_map(|&(cents, mask, payer_idx)| {
            let participants = members(mask);
            if participants.is_empty() {
                return None;
            }
            let paid_by = participants[payer_idx % participants.len()].clone();
            let amount = MoneyCents::new(cents);
            let splits = compute_splits(amount, &participants, &SplitMode::Equal).ok()?;
            Some(Expense::from_new(
                Uuid::new_v4(),
                engine::NewExpense {
                    amount,
                    reason: "generated".to_string(),
                    category: "Misc".to_string(),
                    date: Utc::now(),
                    paid_by,
                    participants,
                    splits,
                },
            ))
        })
        .collect()
}

proptest! {
    #[test]
    fn equal_split_sums_to_total(
        cents in 1i64..=10_000_000,
        count in 1usize..=12,
    ) {
        let participants: Vec<UserId> = (0..count).map(|i| format!("user{i}")).collect();
        let splits = compute_splits(MoneyCents::new(cents), &participants, &SplitMode::Equal).unwrap();

        prop_assert_eq!(splits.len(), count);
        let total: MoneyCents = splits.iter().map(|s| s.amount).sum();
        prop_assert_eq!(total, MoneyCents::new(cents));

        let first = splits[0].amount;
        prop_assert!(splits[..count - 1].iter().all(|s| s.amount == first));
        for (split, id) in splits.iter().zip(&participants) {
            prop_assert_eq!(&split.participant_id, id);
        }
    }
}

proptest! {
    #[test]
    fn pairwise_balances_are_symmetric(
        specs in prop::collection::vec((1i64..=50_000, 1usize..=15, 0usize..=3), 0..=25),
    ) {
        let expenses = history(&specs);
        let names = NameDirectory::default();

        for a in USERS {
            let view_a = compute_balances(&expenses, a, &names);
            for b in USERS.iter().filter(|b| **b != a) {
                let view_b = compute_balances(&expenses, b, &names);
                let ab = view_a.get(b).map_or(MoneyCents::ZERO, |f| f.balance);
                let ba = view_b.get(a).map_or(MoneyCents::ZERO, |f| f.balance);
                prop_assert_eq!(ab, -ba);
            }
        }
    }
}

proptest! {
    #[test]
    fn full_settlements_clear_every_balance(
        specs in prop::collection::vec((1i64..=50_000, 1usize..=15, 0usize..=3), 0..=25),
    ) {
        let mut expenses = history(&specs);
        let names = NameDirectory::default();

        let summary = compute_balances(&expenses, "ann", &names);
        for friend in &summary.balances {
            let settlement =
                build_settlement("ann", friend, friend.balance.abs(), Utc::now()).unwrap();
            prop_assert!(settlement.validate().is_ok());
            expenses.push(Expense::from_new(Uuid::new_v4(), settlement));
        }

        let after = compute_balances(&expenses, "ann", &names);
        prop_assert!(after.balances.is_empty());
        prop_assert_eq!(after.total_owed_to_user, MoneyCents::ZERO);
        prop_assert_eq!(after.total_user_owes, MoneyCents::ZERO);
    }
}
