//! Owed shares of an expense (one row per split).

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::Split;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub expense_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub position: i32,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expense,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn active_model(expense_id: &str, split: &Split, position: i32) -> ActiveModel {
    ActiveModel {
        expense_id: ActiveValue::Set(expense_id.to_string()),
        user_id: ActiveValue::Set(split.participant_id.clone()),
        position: ActiveValue::Set(position),
        amount_minor: ActiveValue::Set(split.amount.cents()),
    }
}
