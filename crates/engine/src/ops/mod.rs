use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    Expense, ExpenseStore, NewExpense, ProfileUpdate, ResultEngine, User, UserId,
};

mod expenses;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// SQLite-backed expense and profile store.
#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl ExpenseStore for Engine {
    async fn fetch_expenses(&self, user_id: &str) -> ResultEngine<Vec<Expense>> {
        self.expenses_for(user_id).await
    }

    async fn fetch_users_by_ids(&self, ids: &[UserId]) -> ResultEngine<Vec<User>> {
        self.users_by_ids(ids).await
    }

    async fn search_users(&self, text: &str, exclude_ids: &[UserId]) -> ResultEngine<Vec<User>> {
        self.search_users_by_name(text, exclude_ids).await
    }

    async fn create_expense(&self, expense: NewExpense) -> ResultEngine<Expense> {
        self.add_expense(expense).await
    }

    async fn delete_expense(&self, id: Uuid, requester: &str) -> ResultEngine<()> {
        self.remove_expense(id, requester).await
    }

    async fn update_user_profile(&self, id: &str, update: ProfileUpdate) -> ResultEngine<User> {
        self.update_profile(id, update).await
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
