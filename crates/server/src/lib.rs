use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod balances;
mod expenses;
mod server;
mod settlements;
mod spend;
mod users;

pub mod types {
    pub mod user {
        pub use api_types::user::{ProfilePatch, UserList, UserRegister, UserSearch, UserView};
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseList, ExpenseNew, ExpenseQuery, ExpenseView, FilterKind, SplitInput, SplitView,
        };
    }

    pub mod balance {
        pub use api_types::balance::{BalanceHistory, BalanceSummary, BalanceView};
    }

    pub mod settlement {
        pub use api_types::settlement::{SettlementCreated, SettlementNew};
    }

    pub mod spend {
        pub use api_types::spend::MonthlySpend;
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Persistence(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
