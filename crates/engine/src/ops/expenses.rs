use std::collections::HashMap;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, NewExpense, ResultEngine, expense_participants, expense_splits,
    expenses,
};

use super::{Engine, with_tx};

fn group_by_expense<M>(rows: Vec<M>, key: impl Fn(&M) -> &str) -> HashMap<String, Vec<M>> {
    let mut grouped: HashMap<String, Vec<M>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row).to_string()).or_default().push(row);
    }
    grouped
}

impl Engine {
    /// Lists the expenses `user_id` takes part in, newest first (ties broken
    /// by id so the order is stable).
    pub async fn expenses_for(&self, user_id: &str) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .inner_join(expense_participants::Entity)
            .filter(expense_participants::Column::UserId.eq(user_id))
            .order_by_desc(expenses::Column::OccurredAt)
            .order_by_desc(expenses::Column::Id)
            .all(&self.database)
            .await?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let participants = expense_participants::Entity::find()
            .filter(expense_participants::Column::ExpenseId.is_in(ids.clone()))
            .all(&self.database)
            .await?;
        let splits = expense_splits::Entity::find()
            .filter(expense_splits::Column::ExpenseId.is_in(ids))
            .all(&self.database)
            .await?;

        let mut participants = group_by_expense(participants, |p| p.expense_id.as_str());
        let mut splits = group_by_expense(splits, |s| s.expense_id.as_str());

        models
            .into_iter()
            .map(|model| {
                let p = participants.remove(&model.id).unwrap_or_default();
                let s = splits.remove(&model.id).unwrap_or_default();
                Expense::try_from((model, p, s))
            })
            .collect()
    }

    /// Persists a new expense with its participants and splits atomically.
    pub async fn add_expense(&self, new: NewExpense) -> ResultEngine<Expense> {
        new.validate()?;
        let expense = Expense::from_new(Uuid::new_v4(), new);
        let expense_id = expense.id.to_string();

        with_tx!(self, |db_tx| {
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            for (position, participant) in (0i32..).zip(expense.participants.iter()) {
                expense_participants::active_model(&expense_id, participant, position)
                    .insert(&db_tx)
                    .await?;
            }
            for (position, split) in (0i32..).zip(expense.splits.iter()) {
                expense_splits::active_model(&expense_id, split, position)
                    .insert(&db_tx)
                    .await?;
            }
            Ok::<_, EngineError>(())
        })?;

        tracing::debug!(
            expense_id = %expense.id,
            paid_by = %expense.paid_by,
            amount = %expense.amount,
            category = %expense.category,
            "expense stored"
        );
        Ok(expense)
    }

    /// Deletes an expense on behalf of `requester`, who must be its payer.
    pub async fn remove_expense(&self, id: Uuid, requester: &str) -> ResultEngine<()> {
        let expense_id = id.to_string();
        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(expense_id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("expense {id}")))?;
            if model.paid_by != requester {
                return Err(EngineError::Forbidden(
                    "only the payer can delete an expense".to_string(),
                ));
            }

            expense_splits::Entity::delete_many()
                .filter(expense_splits::Column::ExpenseId.eq(expense_id.clone()))
                .exec(&db_tx)
                .await?;
            expense_participants::Entity::delete_many()
                .filter(expense_participants::Column::ExpenseId.eq(expense_id.clone()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_by_id(expense_id.clone())
                .exec(&db_tx)
                .await?;
            Ok::<_, EngineError>(())
        })?;

        tracing::debug!(expense_id = %id, requester, "expense deleted");
        Ok(())
    }
}
