use api_types::spend::MonthlySpend;
use axum::{Extension, Json, extract::State};
use chrono::Datelike;
use engine::User;

use crate::{ServerError, server::ServerState};

/// The caller's own share of this month's purchases, settlements excluded.
pub async fn monthly(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<MonthlySpend>, ServerError> {
    let session = state.session(&user.id).await?;
    let now = state.now();

    Ok(Json(MonthlySpend {
        year: now.year(),
        month: now.month(),
        spent_minor: session.ledger().monthly_spend(now).cents(),
    }))
}
