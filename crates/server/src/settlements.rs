//! Settlement endpoint.

use api_types::settlement::{SettlementCreated, SettlementNew};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::{MoneyCents, User};

use crate::{ServerError, expenses::expense_view, server::ServerState};

/// Settles (part of) the balance with a counterparty. The direction follows
/// the sign of the current balance.
pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<SettlementNew>,
) -> Result<(StatusCode, Json<SettlementCreated>), ServerError> {
    let amount: MoneyCents = payload.amount.parse()?;
    let counterparty = payload.counterparty_id.trim();

    let mut session = state.session(&user.id).await?;
    let expense = session.settle(counterparty, amount, Utc::now()).await?;

    let ledger = session.ledger();
    let balance = ledger
        .balances()
        .get(counterparty)
        .map_or(MoneyCents::ZERO, |b| b.balance);

    Ok((
        StatusCode::CREATED,
        Json(SettlementCreated {
            expense: expense_view(&expense, ledger.names()),
            balance_minor: balance.cents(),
        }),
    ))
}
