//! Balance endpoints. Balances are recomputed from the caller's history on
//! every request.

use api_types::balance::{BalanceHistory, BalanceSummary, BalanceView};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use engine::{FriendBalance, MoneyCents, User};

use crate::{ServerError, expenses::expense_view, server::ServerState};

pub(crate) fn balance_view(balance: &FriendBalance) -> BalanceView {
    BalanceView {
        counterparty_id: balance.counterparty_id.clone(),
        name: balance.name.clone(),
        balance_minor: balance.balance.cents(),
    }
}

pub async fn summary(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceSummary>, ServerError> {
    let session = state.session(&user.id).await?;
    let summary = session.ledger().balances();

    Ok(Json(BalanceSummary {
        balances: summary.balances.iter().map(balance_view).collect(),
        total_owed_to_user_minor: summary.total_owed_to_user.cents(),
        total_user_owes_minor: summary.total_user_owes.cents(),
    }))
}

pub async fn history(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(counterparty): Path<String>,
) -> Result<Json<BalanceHistory>, ServerError> {
    let session = state.session(&user.id).await?;
    let ledger = session.ledger();
    let balance = ledger
        .balances()
        .get(&counterparty)
        .map_or(MoneyCents::ZERO, |b| b.balance);

    Ok(Json(BalanceHistory {
        name: ledger.names().name_of(&counterparty),
        balance_minor: balance.cents(),
        expenses: ledger
            .history_with(&counterparty)
            .into_iter()
            .map(|expense| expense_view(expense, ledger.names()))
            .collect(),
        counterparty_id: counterparty,
    }))
}
