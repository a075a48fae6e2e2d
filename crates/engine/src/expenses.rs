//! Expense primitives.
//!
//! An `Expense` is a purchase fronted by `paid_by` and shared among
//! `participants`, each owing the amount of their `Split`. A settlement is an
//! expense with the [`SETTLEMENT_CATEGORY`] that only moves balance between
//! two people.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine, UserId, expense_participants, expense_splits,
    util::parse_uuid,
};

/// Category reserved for balance transfers.
pub const SETTLEMENT_CATEGORY: &str = "Settlement";

/// One participant's owed share of an expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub participant_id: UserId,
    pub amount: MoneyCents,
}

impl Split {
    #[must_use]
    pub fn new(participant_id: impl Into<UserId>, amount: MoneyCents) -> Self {
        Self {
            participant_id: participant_id.into(),
            amount,
        }
    }
}

/// Expense data before the store assigns an id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: MoneyCents,
    pub reason: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub paid_by: UserId,
    pub participants: Vec<UserId>,
    pub splits: Vec<Split>,
}

impl NewExpense {
    /// Checks every record invariant; the store calls this before persisting.
    pub fn validate(&self) -> ResultEngine<()> {
        validate_record(
            self.amount,
            &self.reason,
            &self.category,
            &self.paid_by,
            &self.participants,
            &self.splits,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub amount: MoneyCents,
    pub reason: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub paid_by: UserId,
    pub participants: Vec<UserId>,
    pub splits: Vec<Split>,
}

impl Expense {
    #[must_use]
    pub fn from_new(id: Uuid, new: NewExpense) -> Self {
        Self {
            id,
            amount: new.amount,
            reason: new.reason,
            category: new.category,
            date: new.date,
            paid_by: new.paid_by,
            participants: new.participants,
            splits: new.splits,
        }
    }

    pub fn validate(&self) -> ResultEngine<()> {
        validate_record(
            self.amount,
            &self.reason,
            &self.category,
            &self.paid_by,
            &self.participants,
            &self.splits,
        )
    }

    #[must_use]
    pub fn is_settlement(&self) -> bool {
        self.category == SETTLEMENT_CATEGORY
    }

    #[must_use]
    pub fn involves(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// The amount `user_id` owes toward this expense (0 when they have no split).
    #[must_use]
    pub fn share_of(&self, user_id: &str) -> MoneyCents {
        self.splits
            .iter()
            .find(|split| split.participant_id == user_id)
            .map_or(MoneyCents::ZERO, |split| split.amount)
    }
}

fn validate_record(
    amount: MoneyCents,
    reason: &str,
    category: &str,
    paid_by: &str,
    participants: &[UserId],
    splits: &[Split],
) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::Validation("amount must be > 0".to_string()));
    }
    if amount > MoneyCents::MAX_INPUT {
        return Err(EngineError::Validation("amount too large".to_string()));
    }
    if reason.trim().is_empty() {
        return Err(EngineError::Validation(
            "reason must not be empty".to_string(),
        ));
    }
    if category.trim().is_empty() {
        return Err(EngineError::Validation(
            "category must not be empty".to_string(),
        ));
    }
    if participants.is_empty() {
        return Err(EngineError::Validation(
            "participants must not be empty".to_string(),
        ));
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.as_str()) {
            return Err(EngineError::Validation(format!(
                "duplicate participant: {participant}"
            )));
        }
    }
    if !seen.contains(paid_by) {
        return Err(EngineError::Validation(
            "payer must be a participant".to_string(),
        ));
    }

    let mut owners: HashSet<&str> = HashSet::with_capacity(splits.len());
    for split in splits {
        if !seen.contains(split.participant_id.as_str()) {
            return Err(EngineError::Validation(format!(
                "split owner {} is not a participant",
                split.participant_id
            )));
        }
        if !owners.insert(split.participant_id.as_str()) {
            return Err(EngineError::Validation(format!(
                "duplicate split for {}",
                split.participant_id
            )));
        }
        if split.amount.is_negative() {
            return Err(EngineError::Validation(
                "split amounts must be >= 0".to_string(),
            ));
        }
    }
    crate::split::ensure_split_total(amount, splits)?;

    if category == SETTLEMENT_CATEGORY {
        if participants.len() != 2 {
            return Err(EngineError::Validation(
                "settlement must have exactly two participants".to_string(),
            ));
        }
        let transfers = splits.iter().filter(|s| s.amount == amount).count();
        let zeros = splits.iter().filter(|s| s.amount.is_zero()).count();
        if splits.len() != 2 || transfers != 1 || zeros != 1 {
            return Err(EngineError::Validation(
                "settlement splits must move the whole amount to one side".to_string(),
            ));
        }
    }

    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub amount_minor: i64,
    pub reason: String,
    pub category: String,
    pub occurred_at: DateTimeUtc,
    pub paid_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expense_participants::Entity")]
    Participants,
    #[sea_orm(has_many = "super::expense_splits::Entity")]
    Splits,
}

impl Related<super::expense_participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::expense_splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            reason: ActiveValue::Set(expense.reason.clone()),
            category: ActiveValue::Set(expense.category.clone()),
            occurred_at: ActiveValue::Set(expense.date),
            paid_by: ActiveValue::Set(expense.paid_by.clone()),
        }
    }
}

impl
    TryFrom<(
        Model,
        Vec<expense_participants::Model>,
        Vec<expense_splits::Model>,
    )> for Expense
{
    type Error = EngineError;

    fn try_from(
        (model, mut participants, mut splits): (
            Model,
            Vec<expense_participants::Model>,
            Vec<expense_splits::Model>,
        ),
    ) -> Result<Self, Self::Error> {
        participants.sort_by_key(|p| p.position);
        splits.sort_by_key(|s| s.position);
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            amount: MoneyCents::new(model.amount_minor),
            reason: model.reason,
            category: model.category,
            date: model.occurred_at,
            paid_by: model.paid_by,
            participants: participants.into_iter().map(|p| p.user_id).collect(),
            splits: splits
                .into_iter()
                .map(|s| Split::new(s.user_id, MoneyCents::new(s.amount_minor)))
                .collect(),
        })
    }
}
