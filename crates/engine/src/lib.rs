//! Shared-expense engine: splits, pairwise balances, settlements and the
//! SQLite store behind them.

pub use balances::{BalanceSummary, FriendBalance, compute_balances, history_with};
pub use error::EngineError;
pub use expenses::{Expense, NewExpense, SETTLEMENT_CATEGORY, Split};
pub use filter::{TransactionFilter, TransactionQuery, filter_expenses};
pub use ledger::Ledger;
pub use money::MoneyCents;
pub use names::{NameDirectory, referenced_user_ids};
pub use ops::{Engine, EngineBuilder};
pub use search::{DEFAULT_QUIET_PERIOD, MIN_QUERY_CHARS, UserSearch};
pub use session::Session;
pub use settlement::{SettlementMode, build_settlement};
pub use spend::monthly_spend;
pub use split::{SplitMode, compute_splits, ensure_split_total};
pub use store::ExpenseStore;
pub use users::{ProfileUpdate, User, UserId};

mod balances;
mod error;
mod expense_participants;
mod expense_splits;
mod expenses;
mod filter;
mod ledger;
mod money;
mod names;
mod ops;
mod search;
mod session;
mod settlement;
mod spend;
mod split;
mod store;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
