//! Debounced user search for "add participant" style pickers.
//!
//! Every call to [`UserSearch::query`] supersedes the previous ones. A query
//! only reaches the store after a quiet period with no newer call, and its
//! result is dropped if a newer call arrives while the store is answering.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use crate::{ExpenseStore, ResultEngine, User, UserId};

/// Shorter queries return no suggestions.
pub const MIN_QUERY_CHARS: usize = 2;
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct UserSearch<S> {
    store: S,
    exclude_ids: Vec<UserId>,
    quiet_period: Duration,
    generation: AtomicU64,
}

impl<S: ExpenseStore> UserSearch<S> {
    /// `exclude_ids` are never suggested (usually the searcher and the
    /// participants already picked).
    #[must_use]
    pub fn new(store: S, exclude_ids: Vec<UserId>) -> Self {
        Self {
            store,
            exclude_ids,
            quiet_period: DEFAULT_QUIET_PERIOD,
            generation: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    /// `Ok(None)` means a newer query superseded this one.
    pub async fn query(&self, text: &str) -> ResultEngine<Option<Vec<User>>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let text = text.trim();
        if text.chars().count() < MIN_QUERY_CHARS {
            return Ok(Some(Vec::new()));
        }

        tokio::time::sleep(self.quiet_period).await;
        if self.is_stale(generation) {
            return Ok(None);
        }

        let users = self.store.search_users(text, &self.exclude_ids).await?;
        if self.is_stale(generation) {
            return Ok(None);
        }
        tracing::debug!(query = text, results = users.len(), "user search");
        Ok(Some(users))
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}
