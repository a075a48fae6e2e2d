//! "Spent this month": the reference user's own share of real purchases.

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;

use crate::{Expense, MoneyCents};

/// Sums the reference user's split over the expenses dated in `now`'s
/// calendar month, in `now`'s time zone.
///
/// Settlements are skipped entirely: paying a debt back is not spending. The
/// share is counted regardless of who fronted the money.
pub fn monthly_spend(expenses: &[Expense], reference_user: &str, now: DateTime<Tz>) -> MoneyCents {
    let tz = now.timezone();
    expenses
        .iter()
        .filter(|e| {
            let local = e.date.with_timezone(&tz);
            local.year() == now.year() && local.month() == now.month()
        })
        .filter(|e| !e.is_settlement())
        .map(|e| e.share_of(reference_user))
        .sum()
}
