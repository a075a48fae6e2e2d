//! A point-in-time view of one user's expense history.
//!
//! `Ledger` owns the expense list and the names of everyone it mentions.
//! Derived balances are computed on first use and kept until the ledger is
//! replaced.

use std::sync::OnceLock;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::{
    BalanceSummary, Expense, MoneyCents, NameDirectory, TransactionQuery, UserId,
    compute_balances, history_with, monthly_spend,
};

#[derive(Clone, Debug)]
pub struct Ledger {
    user_id: UserId,
    expenses: Vec<Expense>,
    names: NameDirectory,
    balances: OnceLock<BalanceSummary>,
}

impl Ledger {
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, expenses: Vec<Expense>, names: NameDirectory) -> Self {
        Self {
            user_id: user_id.into(),
            expenses,
            names,
            balances: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    #[must_use]
    pub fn names(&self) -> &NameDirectory {
        &self.names
    }

    /// Balances against every counterparty, computed once per ledger.
    pub fn balances(&self) -> &BalanceSummary {
        self.balances
            .get_or_init(|| compute_balances(&self.expenses, &self.user_id, &self.names))
    }

    #[must_use]
    pub fn monthly_spend(&self, now: DateTime<Tz>) -> MoneyCents {
        monthly_spend(&self.expenses, &self.user_id, now)
    }

    #[must_use]
    pub fn query(&self, query: &TransactionQuery, now: DateTime<Tz>) -> Vec<&Expense> {
        query.apply(&self.expenses, now)
    }

    #[must_use]
    pub fn history_with(&self, counterparty: &str) -> Vec<&Expense> {
        history_with(&self.expenses, &self.user_id, counterparty)
    }
}
