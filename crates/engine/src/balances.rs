//! Pairwise balance aggregation.
//!
//! Folds the expense history into one signed balance per counterparty of the
//! reference user. Nothing is cached or persisted: the same history always
//! yields the same balances, whatever the order of the expenses.

use std::collections::HashMap;

use serde::Serialize;

use crate::{Expense, MoneyCents, NameDirectory, UserId};

/// Net position of the reference user against one counterparty.
///
/// `balance > 0`: the counterparty owes the reference user.
/// `balance < 0`: the reference user owes the counterparty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FriendBalance {
    pub counterparty_id: UserId,
    pub name: String,
    pub balance: MoneyCents,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    /// Non-zero balances, largest credit first.
    pub balances: Vec<FriendBalance>,
    pub total_owed_to_user: MoneyCents,
    pub total_user_owes: MoneyCents,
}

impl BalanceSummary {
    /// People the reference user owes, biggest debt first.
    pub fn owes(&self) -> impl Iterator<Item = &FriendBalance> {
        self.balances.iter().rev().filter(|b| b.balance.is_negative())
    }

    /// People who owe the reference user, biggest credit first.
    pub fn owed(&self) -> impl Iterator<Item = &FriendBalance> {
        self.balances.iter().filter(|b| b.balance.is_positive())
    }

    #[must_use]
    pub fn get(&self, counterparty_id: &str) -> Option<&FriendBalance> {
        self.balances
            .iter()
            .find(|b| b.counterparty_id == counterparty_id)
    }
}

/// Computes the reference user's net balance against everyone they share
/// expenses with.
pub fn compute_balances(
    expenses: &[Expense],
    reference_user: &str,
    names: &NameDirectory,
) -> BalanceSummary {
    let mut running: HashMap<&str, MoneyCents> = HashMap::new();

    for expense in expenses {
        if expense.paid_by == reference_user {
            for split in &expense.splits {
                if split.participant_id != reference_user {
                    *running.entry(split.participant_id.as_str()).or_default() += split.amount;
                }
            }
        } else if expense.involves(reference_user) {
            *running.entry(expense.paid_by.as_str()).or_default() -=
                expense.share_of(reference_user);
        }
    }

    let mut balances: Vec<FriendBalance> = running
        .into_iter()
        .filter(|(_, balance)| !balance.is_zero())
        .map(|(id, balance)| FriendBalance {
            counterparty_id: id.to_string(),
            name: names.name_of(id),
            balance,
        })
        .collect();
    balances.sort_by(|a, b| {
        b.balance
            .cmp(&a.balance)
            .then_with(|| a.counterparty_id.cmp(&b.counterparty_id))
    });

    let total_owed_to_user = balances
        .iter()
        .filter(|b| b.balance.is_positive())
        .map(|b| b.balance)
        .sum();
    let total_user_owes = balances
        .iter()
        .filter(|b| b.balance.is_negative())
        .map(|b| b.balance.abs())
        .sum();

    BalanceSummary {
        balances,
        total_owed_to_user,
        total_user_owes,
    }
}

/// Expenses between the reference user and one counterparty, newest first.
///
/// Only expenses fronted by one of the two are listed, so a purchase paid by
/// a third person does not show up in the pair's history.
pub fn history_with<'a>(
    expenses: &'a [Expense],
    reference_user: &str,
    counterparty: &str,
) -> Vec<&'a Expense> {
    let mut history: Vec<&Expense> = expenses
        .iter()
        .filter(|e| e.involves(reference_user) && e.involves(counterparty))
        .filter(|e| e.paid_by == reference_user || e.paid_by == counterparty)
        .collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));
    history
}
