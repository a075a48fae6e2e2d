//! Request and response bodies of the HTTP API.
//!
//! Money goes over the wire as integer cents (`*_minor` fields) in responses.
//! Requests carry amounts as the decimal text the user typed, so the server
//! applies the same parsing rules as every other client.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserRegister {
        pub id: String,
        pub email: String,
        pub display_name: Option<String>,
    }

    /// Profile fields the user can change. `null` clears the display name.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfilePatch {
        pub display_name: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserView {
        pub id: String,
        pub email: String,
        pub display_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserSearch {
        pub q: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserList {
        pub users: Vec<UserView>,
    }
}

pub mod expense {
    use std::collections::HashMap;

    use super::*;

    /// How the amount is divided among participants.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "mode", rename_all = "snake_case")]
    pub enum SplitInput {
        Equal,
        /// Per-participant decimal text; missing or invalid entries count
        /// as zero.
        Manual { amounts: HashMap<String, String> },
    }

    /// New expense paid by the caller.
    ///
    /// The caller is always a participant and is added when missing from
    /// `participants`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount: String,
        pub reason: String,
        pub category: String,
        /// Defaults to the time of the request.
        pub date: Option<DateTime<FixedOffset>>,
        pub participants: Vec<String>,
        pub split: SplitInput,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SplitView {
        pub participant_id: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub reason: String,
        pub category: String,
        pub date: DateTime<Utc>,
        pub paid_by: String,
        pub paid_by_name: String,
        pub participants: Vec<String>,
        pub splits: Vec<SplitView>,
        pub is_settlement: bool,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum FilterKind {
        All,
        Today,
        Yesterday,
        #[default]
        ThisMonth,
        CustomDate,
    }

    /// Query string of `GET /expenses`. `date` is required by `custom_date`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseQuery {
        #[serde(default)]
        pub filter: FilterKind,
        pub date: Option<NaiveDate>,
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod balance {
    use super::*;
    use crate::expense::ExpenseView;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BalanceView {
        pub counterparty_id: String,
        pub name: String,
        /// Positive: they owe the caller. Negative: the caller owes them.
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceSummary {
        pub balances: Vec<BalanceView>,
        pub total_owed_to_user_minor: i64,
        pub total_user_owes_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceHistory {
        pub counterparty_id: String,
        pub name: String,
        pub balance_minor: i64,
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod settlement {
    use super::*;
    use crate::expense::ExpenseView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementNew {
        pub counterparty_id: String,
        pub amount: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementCreated {
        pub expense: ExpenseView,
        /// Remaining balance with the counterparty after the settlement.
        pub balance_minor: i64,
    }
}

pub mod spend {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySpend {
        pub year: i32,
        pub month: u32,
        pub spent_minor: i64,
    }
}
