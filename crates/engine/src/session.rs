//! Session-scoped state for one signed-in user.
//!
//! The session owns the [`Ledger`] snapshot. Every successful write reloads
//! the snapshot from the store; a failed write leaves it untouched, so the
//! view never shows a record the store did not accept.
//!
//! A write that committed is reported as a success even when the reload after
//! it fails. The snapshot is then kept as it was and the session is marked
//! stale until the next successful [`Session::refresh`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseStore, Ledger, MoneyCents, NameDirectory, NewExpense,
    ResultEngine, UserId, build_settlement, referenced_user_ids,
};

#[derive(Debug)]
pub struct Session<S> {
    store: S,
    user_id: UserId,
    ledger: Ledger,
    stale: bool,
}

impl<S: ExpenseStore> Session<S> {
    /// Loads the user's history and the names of everyone in it.
    pub async fn open(store: S, user_id: impl Into<UserId>) -> ResultEngine<Self> {
        let user_id = user_id.into();
        let ledger = load_ledger(&store, &user_id).await?;
        Ok(Self {
            store,
            user_id,
            ledger,
            stale: false,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// `true` when a committed write could not be followed by a reload.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Replaces the snapshot with fresh store data.
    pub async fn refresh(&mut self) -> ResultEngine<()> {
        let ledger = load_ledger(&self.store, &self.user_id).await?;
        self.ledger = ledger;
        self.stale = false;
        Ok(())
    }

    pub async fn add_expense(&mut self, expense: NewExpense) -> ResultEngine<Expense> {
        let stored = self.store.create_expense(expense).await?;
        self.reload_after_write().await;
        Ok(stored)
    }

    /// Records a settlement of `amount` with `counterparty` against the
    /// current balance.
    pub async fn settle(
        &mut self,
        counterparty: &str,
        amount: MoneyCents,
        date: DateTime<Utc>,
    ) -> ResultEngine<Expense> {
        let friend = self
            .ledger
            .balances()
            .get(counterparty)
            .cloned()
            .ok_or_else(|| {
                EngineError::Validation(format!("nothing to settle with {counterparty}"))
            })?;
        let settlement = build_settlement(&self.user_id, &friend, amount, date)?;

        let stored = self.store.create_expense(settlement).await?;
        tracing::info!(
            user_id = %self.user_id,
            counterparty,
            amount = %amount,
            expense_id = %stored.id,
            "settlement recorded"
        );
        self.reload_after_write().await;
        Ok(stored)
    }

    pub async fn delete_expense(&mut self, id: Uuid) -> ResultEngine<()> {
        self.store.delete_expense(id, &self.user_id).await?;
        self.reload_after_write().await;
        Ok(())
    }

    async fn reload_after_write(&mut self) {
        if let Err(err) = self.refresh().await {
            tracing::warn!(user_id = %self.user_id, "reload after write failed: {err}");
            self.stale = true;
        }
    }
}

async fn load_ledger<S: ExpenseStore>(store: &S, user_id: &str) -> ResultEngine<Ledger> {
    let expenses = store.fetch_expenses(user_id).await?;
    let ids = referenced_user_ids(&expenses);
    let users = store.fetch_users_by_ids(&ids).await?;
    Ok(Ledger::new(user_id, expenses, NameDirectory::new(users)))
}
