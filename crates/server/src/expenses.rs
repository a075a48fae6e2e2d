//! Expense history and expense creation/deletion endpoints.

use api_types::expense::{
    ExpenseList, ExpenseNew, ExpenseQuery, ExpenseView, FilterKind, SplitInput, SplitView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{
    EngineError, Expense, ExpenseStore, MoneyCents, NameDirectory, NewExpense,
    SETTLEMENT_CATEGORY, SplitMode, TransactionFilter, TransactionQuery, User, UserId,
    compute_splits,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn expense_view(expense: &Expense, names: &NameDirectory) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount_minor: expense.amount.cents(),
        reason: expense.reason.clone(),
        category: expense.category.clone(),
        date: expense.date,
        paid_by: expense.paid_by.clone(),
        paid_by_name: names.name_of(&expense.paid_by),
        participants: expense.participants.clone(),
        splits: expense
            .splits
            .iter()
            .map(|split| SplitView {
                participant_id: split.participant_id.clone(),
                amount_minor: split.amount.cents(),
            })
            .collect(),
        is_settlement: expense.is_settlement(),
    }
}

fn map_filter(query: &ExpenseQuery) -> Result<TransactionFilter, ServerError> {
    Ok(match query.filter {
        FilterKind::All => TransactionFilter::All,
        FilterKind::Today => TransactionFilter::Today,
        FilterKind::Yesterday => TransactionFilter::Yesterday,
        FilterKind::ThisMonth => TransactionFilter::ThisMonth,
        FilterKind::CustomDate => {
            let date = query.date.ok_or_else(|| {
                ServerError::Generic("custom_date filter requires a date".to_string())
            })?;
            TransactionFilter::CustomDate(date)
        }
    })
}

fn map_split(split: SplitInput) -> SplitMode {
    match split {
        SplitInput::Equal => SplitMode::Equal,
        SplitInput::Manual { amounts } => SplitMode::Manual { amounts },
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<Json<ExpenseList>, ServerError> {
    let filter = map_filter(&query)?;
    let mut transaction_query = TransactionQuery::new(filter);
    if let Some(category) = query.category.filter(|c| !c.trim().is_empty()) {
        transaction_query = transaction_query.category(category);
    }

    let session = state.session(&user.id).await?;
    let ledger = session.ledger();
    let expenses = ledger
        .query(&transaction_query, state.now())
        .into_iter()
        .map(|expense| expense_view(expense, ledger.names()))
        .collect();

    Ok(Json(ExpenseList { expenses }))
}

/// Records an expense paid by the caller. Splits are computed here from the
/// requested mode.
pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    if payload.category.trim().eq_ignore_ascii_case(SETTLEMENT_CATEGORY) {
        return Err(EngineError::Validation(
            "settlements are recorded through /settlements".to_string(),
        )
        .into());
    }
    let amount: MoneyCents = payload.amount.parse()?;

    let mut participants: Vec<UserId> = payload
        .participants
        .iter()
        .map(|p| p.trim().to_string())
        .collect();
    if !participants.contains(&user.id) {
        participants.insert(0, user.id.clone());
    }

    let known = state.engine.fetch_users_by_ids(&participants).await?;
    if let Some(unknown) = participants
        .iter()
        .find(|id| !known.iter().any(|u| &u.id == *id))
    {
        return Err(EngineError::NotFound(format!("user {unknown}")).into());
    }

    let splits = compute_splits(amount, &participants, &map_split(payload.split))?;
    let new = NewExpense {
        amount,
        reason: payload.reason.trim().to_string(),
        category: payload.category.trim().to_string(),
        date: payload
            .date
            .map_or_else(Utc::now, |date| date.with_timezone(&Utc)),
        paid_by: user.id.clone(),
        participants,
        splits,
    };
    let expense = state.engine.create_expense(new).await?;

    let names = NameDirectory::new(known);
    Ok((StatusCode::CREATED, Json(expense_view(&expense, &names))))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
