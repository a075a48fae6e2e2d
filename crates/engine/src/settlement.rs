//! Settlement protocol.
//!
//! A settlement is recorded as an ordinary expense in the
//! [`SETTLEMENT_CATEGORY`], with the whole amount attributed to the debtor's
//! creditor side. The balance aggregator then nets it like any other expense.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, FriendBalance, MoneyCents, NewExpense, ResultEngine, SETTLEMENT_CATEGORY, Split,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMode {
    /// The reference user pays back the counterparty.
    Pay,
    /// The counterparty pays back the reference user.
    Receive,
}

impl SettlementMode {
    /// Mode implied by a balance, `None` when there is nothing to settle.
    #[must_use]
    pub fn for_balance(balance: MoneyCents) -> Option<Self> {
        if balance.is_negative() {
            Some(Self::Pay)
        } else if balance.is_positive() {
            Some(Self::Receive)
        } else {
            None
        }
    }
}

/// Builds the settlement expense for `amount` against `friend`.
///
/// `amount` must be positive and must not exceed the outstanding balance.
pub fn build_settlement(
    reference_user: &str,
    friend: &FriendBalance,
    amount: MoneyCents,
    date: DateTime<Utc>,
) -> ResultEngine<NewExpense> {
    let mode = SettlementMode::for_balance(friend.balance).ok_or_else(|| {
        EngineError::Validation(format!("nothing to settle with {}", friend.name))
    })?;
    if !amount.is_positive() {
        return Err(EngineError::Validation(
            "settlement amount must be > 0".to_string(),
        ));
    }
    let outstanding = friend.balance.abs();
    if amount > outstanding {
        return Err(EngineError::Validation(format!(
            "settlement amount cannot exceed {outstanding}"
        )));
    }

    let me = reference_user.to_string();
    let other = friend.counterparty_id.clone();
    let (reason, paid_by, splits) = match mode {
        SettlementMode::Pay => (
            format!("Settlement to {}", friend.name),
            me.clone(),
            vec![
                Split::new(other.clone(), amount),
                Split::new(me.clone(), MoneyCents::ZERO),
            ],
        ),
        SettlementMode::Receive => (
            format!("Settlement from {}", friend.name),
            other.clone(),
            vec![
                Split::new(me.clone(), amount),
                Split::new(other.clone(), MoneyCents::ZERO),
            ],
        ),
    };

    Ok(NewExpense {
        amount,
        reason,
        category: SETTLEMENT_CATEGORY.to_string(),
        date,
        paid_by,
        participants: vec![me, other],
        splits,
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::{Expense, NameDirectory, compute_balances};

    fn friend(id: &str, balance: i64) -> FriendBalance {
        FriendBalance {
            counterparty_id: id.to_string(),
            name: id.to_uppercase(),
            balance: MoneyCents::new(balance),
        }
    }

    fn bob_paid_lunch() -> Expense {
        Expense::from_new(
            Uuid::new_v4(),
            NewExpense {
                amount: MoneyCents::new(100_00),
                reason: "Lunch".to_string(),
                category: "Food".to_string(),
                date: Utc::now(),
                paid_by: "bob".to_string(),
                participants: vec!["bob".to_string(), "alice".to_string()],
                splits: vec![
                    Split::new("bob", MoneyCents::new(50_00)),
                    Split::new("alice", MoneyCents::new(50_00)),
                ],
            },
        )
    }

    #[test]
    fn pay_mode_shape() {
        let settlement =
            build_settlement("alice", &friend("bob", -50_00), MoneyCents::new(20_00), Utc::now())
                .unwrap();
        assert_eq!(settlement.category, SETTLEMENT_CATEGORY);
        assert_eq!(settlement.paid_by, "alice");
        assert_eq!(settlement.participants, vec!["alice", "bob"]);
        assert_eq!(
            settlement.splits,
            vec![
                Split::new("bob", MoneyCents::new(20_00)),
                Split::new("alice", MoneyCents::ZERO)
            ]
        );
        assert_eq!(settlement.reason, "Settlement to BOB");
        assert_eq!(settlement.validate(), Ok(()));
    }

    #[test]
    fn receive_mode_shape() {
        let settlement =
            build_settlement("alice", &friend("bob", 30_00), MoneyCents::new(30_00), Utc::now())
                .unwrap();
        assert_eq!(settlement.paid_by, "bob");
        assert_eq!(
            settlement.splits,
            vec![
                Split::new("alice", MoneyCents::new(30_00)),
                Split::new("bob", MoneyCents::ZERO)
            ]
        );
        assert_eq!(settlement.reason, "Settlement from BOB");
        assert_eq!(settlement.validate(), Ok(()));
    }

    #[test]
    fn amount_bounds() {
        let bob = friend("bob", -50_00);
        assert!(build_settlement("alice", &bob, MoneyCents::new(50_00), Utc::now()).is_ok());
        assert!(matches!(
            build_settlement("alice", &bob, MoneyCents::new(60_00), Utc::now()),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            build_settlement("alice", &bob, MoneyCents::new(50_01), Utc::now()),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            build_settlement("alice", &bob, MoneyCents::ZERO, Utc::now()),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            build_settlement("alice", &friend("bob", 0), MoneyCents::new(1), Utc::now()),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn full_payment_nets_balance_to_zero() {
        let lunch = bob_paid_lunch();
        let names = NameDirectory::default();
        let before = compute_balances(std::slice::from_ref(&lunch), "alice", &names);
        let bob = before.get("bob").unwrap().clone();
        assert_eq!(bob.balance, MoneyCents::new(-50_00));
        assert_eq!(SettlementMode::for_balance(bob.balance), Some(SettlementMode::Pay));

        let settlement = build_settlement("alice", &bob, bob.balance.abs(), Utc::now()).unwrap();
        let history = vec![lunch, Expense::from_new(Uuid::new_v4(), settlement)];

        assert!(compute_balances(&history, "alice", &names).get("bob").is_none());
        assert!(compute_balances(&history, "bob", &names).get("alice").is_none());
    }

    #[test]
    fn partial_receipt_reduces_credit() {
        let lunch = bob_paid_lunch();
        let names = NameDirectory::default();
        let alice = compute_balances(std::slice::from_ref(&lunch), "bob", &names)
            .get("alice")
            .unwrap()
            .clone();
        assert_eq!(alice.balance, MoneyCents::new(50_00));

        let settlement = build_settlement("bob", &alice, MoneyCents::new(20_00), Utc::now()).unwrap();
        let history = vec![lunch, Expense::from_new(Uuid::new_v4(), settlement)];
        let after = compute_balances(&history, "bob", &names);
        assert_eq!(after.get("alice").unwrap().balance, MoneyCents::new(30_00));
    }
}
