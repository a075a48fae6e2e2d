//! Display-name lookup for participants.
//!
//! Ids the store did not return still get a readable label, so a missing
//! profile never surfaces as an error.

use std::collections::{BTreeSet, HashMap};

use crate::{Expense, User, UserId};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameDirectory {
    users: HashMap<UserId, User>,
}

impl NameDirectory {
    #[must_use]
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }

    /// Resolves a display name: profile name, else the local part of the
    /// email, else a label derived from the id itself.
    #[must_use]
    pub fn name_of(&self, id: &str) -> String {
        match self.users.get(id) {
            Some(User {
                display_name: Some(name),
                ..
            }) if !name.trim().is_empty() => name.clone(),
            Some(user) => local_part(&user.email).to_string(),
            None => local_part(id).to_string(),
        }
    }
}

/// Every user id referenced by `expenses` (payers and participants).
#[must_use]
pub fn referenced_user_ids(expenses: &[Expense]) -> Vec<UserId> {
    let ids: BTreeSet<&str> = expenses
        .iter()
        .flat_map(|e| std::iter::once(&e.paid_by).chain(e.participants.iter()))
        .map(String::as_str)
        .collect();
    ids.into_iter().map(ToString::to_string).collect()
}

fn local_part(value: &str) -> &str {
    match value.split_once('@') {
        Some((local, _)) if !local.is_empty() => local,
        _ => value,
    }
}
