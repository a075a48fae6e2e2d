//! Calendar filtering of the expense history.
//!
//! Dates are compared by local calendar day/month/year, never by timestamp.
//! Filtering keeps the input order (the store returns newest first).

use chrono::{DateTime, Datelike, Days, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::Expense;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum TransactionFilter {
    All,
    Today,
    Yesterday,
    #[default]
    ThisMonth,
    CustomDate(NaiveDate),
}

impl TransactionFilter {
    /// Whether an expense dated `date` passes the filter at `now`.
    #[must_use]
    pub fn matches(&self, date: DateTime<chrono::Utc>, now: DateTime<Tz>) -> bool {
        let local = date.with_timezone(&now.timezone()).date_naive();
        let today = now.date_naive();
        match self {
            Self::All => true,
            Self::Today => local == today,
            Self::Yesterday => today
                .checked_sub_days(Days::new(1))
                .is_some_and(|yesterday| local == yesterday),
            Self::ThisMonth => local.year() == today.year() && local.month() == today.month(),
            Self::CustomDate(day) => local == *day,
        }
    }
}

/// A period filter plus an optional category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub filter: TransactionFilter,
    /// Case-insensitive exact category match.
    pub category: Option<String>,
}

impl TransactionQuery {
    #[must_use]
    pub fn new(filter: TransactionFilter) -> Self {
        Self {
            filter,
            category: None,
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns the matching expenses, in input order.
    pub fn apply<'a>(&self, expenses: &'a [Expense], now: DateTime<Tz>) -> Vec<&'a Expense> {
        expenses
            .iter()
            .filter(|e| self.filter.matches(e.date, now))
            .filter(|e| {
                self.category
                    .as_deref()
                    .is_none_or(|category| e.category.eq_ignore_ascii_case(category.trim()))
            })
            .collect()
    }
}

/// Shorthand for a date-only query.
pub fn filter_expenses<'a>(
    expenses: &'a [Expense],
    filter: TransactionFilter,
    now: DateTime<Tz>,
) -> Vec<&'a Expense> {
    TransactionQuery::new(filter).apply(expenses, now)
}
