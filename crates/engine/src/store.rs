//! The store contract the balance engine consumes.
//!
//! [`Engine`](crate::Engine) implements it over SQLite; tests can swap in
//! their own implementation.

use std::future::Future;

use uuid::Uuid;

use crate::{Expense, NewExpense, ProfileUpdate, ResultEngine, User, UserId};

pub trait ExpenseStore {
    /// Expenses where `user_id` is a participant, newest first.
    fn fetch_expenses(
        &self,
        user_id: &str,
    ) -> impl Future<Output = ResultEngine<Vec<Expense>>> + Send;

    /// Batch profile lookup. Unknown ids are silently omitted.
    fn fetch_users_by_ids(
        &self,
        ids: &[UserId],
    ) -> impl Future<Output = ResultEngine<Vec<User>>> + Send;

    /// Prefix search on display name, skipping `exclude_ids`.
    fn search_users(
        &self,
        text: &str,
        exclude_ids: &[UserId],
    ) -> impl Future<Output = ResultEngine<Vec<User>>> + Send;

    /// Validates and persists `expense`, returning the stored record.
    fn create_expense(
        &self,
        expense: NewExpense,
    ) -> impl Future<Output = ResultEngine<Expense>> + Send;

    /// Deletes an expense. Only its payer may do so.
    fn delete_expense(
        &self,
        id: Uuid,
        requester: &str,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    fn update_user_profile(
        &self,
        id: &str,
        update: ProfileUpdate,
    ) -> impl Future<Output = ResultEngine<User>> + Send;
}
