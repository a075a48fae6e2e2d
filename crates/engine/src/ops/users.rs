use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{
    EngineError, ProfileUpdate, ResultEngine, User, UserId, users,
    util::{normalize_display, normalize_name},
};

use super::{Engine, with_tx};

/// Upper bound on search suggestions.
const SEARCH_LIMIT: u64 = 20;

/// Trimmed display name plus its comparison key. Blank names become `None`.
fn display_name_key(input: Option<&str>) -> ResultEngine<Option<(String, String)>> {
    let Some(display) = input.and_then(normalize_display) else {
        return Ok(None);
    };
    let norm = normalize_name(&display);
    if norm.is_empty() {
        return Err(EngineError::Validation(
            "display name must contain letters or digits".to_string(),
        ));
    }
    Ok(Some((display, norm)))
}

impl Engine {
    async fn name_taken(
        &self,
        db: &DatabaseTransaction,
        norm: &str,
        except: Option<&str>,
    ) -> ResultEngine<bool> {
        let mut query = users::Entity::find().filter(users::Column::DisplayNameNorm.eq(norm));
        if let Some(id) = except {
            query = query.filter(users::Column::Id.ne(id));
        }
        Ok(query.one(db).await?.is_some())
    }

    /// Registers a user. Id, email and display name must all be unused.
    pub async fn register_user(
        &self,
        id: &str,
        email: &str,
        display_name: Option<&str>,
    ) -> ResultEngine<User> {
        let id = id.trim();
        let email = email.trim();
        if id.is_empty() {
            return Err(EngineError::Validation("user id must not be empty".to_string()));
        }
        if email.is_empty() {
            return Err(EngineError::Validation("email must not be empty".to_string()));
        }
        let name = display_name_key(display_name)?;

        let user = with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(id.to_string()));
            }
            if users::Entity::find()
                .filter(users::Column::Email.eq(email))
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(email.to_string()));
            }

            let mut user = User::new(id, email);
            if let Some((display, norm)) = name {
                if self.name_taken(&db_tx, &norm, None).await? {
                    return Err(EngineError::ExistingKey(display));
                }
                user = user.display_name(display);
            }
            users::ActiveModel::from(&user).insert(&db_tx).await?;
            Ok::<_, EngineError>(user)
        })?;

        tracing::debug!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn user(&self, id: &str) -> ResultEngine<Option<User>> {
        let model = users::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?;
        Ok(model.map(User::from))
    }

    pub async fn user_exists_by_email(&self, email: &str) -> ResultEngine<bool> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim()))
            .one(&self.database)
            .await?;
        Ok(model.is_some())
    }

    /// Profiles for `ids`, in id order. Unknown ids are skipped.
    pub async fn users_by_ids(&self, ids: &[UserId]) -> ResultEngine<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().cloned()))
            .order_by_asc(users::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    /// Users whose normalized display name starts with the normalized `text`.
    pub async fn search_users_by_name(
        &self,
        text: &str,
        exclude_ids: &[UserId],
    ) -> ResultEngine<Vec<User>> {
        let norm = normalize_name(text);
        if norm.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = users::Entity::find().filter(users::Column::DisplayNameNorm.starts_with(&norm));
        if !exclude_ids.is_empty() {
            query = query.filter(users::Column::Id.is_not_in(exclude_ids.iter().cloned()));
        }
        let models = query
            .order_by_asc(users::Column::DisplayNameNorm)
            .order_by_asc(users::Column::Id)
            .limit(SEARCH_LIMIT)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    /// Sets or clears the display name. A name already used by someone else
    /// (after normalization) is rejected.
    pub async fn update_profile(&self, id: &str, update: ProfileUpdate) -> ResultEngine<User> {
        let name = display_name_key(update.display_name.as_deref())?;

        let user = with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("user {id}")))?;

            if let Some((display, norm)) = &name
                && self.name_taken(&db_tx, norm, Some(id)).await?
            {
                return Err(EngineError::ExistingKey(display.clone()));
            }

            let mut active: users::ActiveModel = model.into();
            match name {
                Some((display, norm)) => {
                    active.display_name = ActiveValue::Set(Some(display));
                    active.display_name_norm = ActiveValue::Set(Some(norm));
                }
                None => {
                    active.display_name = ActiveValue::Set(None);
                    active.display_name_norm = ActiveValue::Set(None);
                }
            }
            let updated = active.update(&db_tx).await?;
            Ok::<_, EngineError>(User::from(updated))
        })?;

        tracing::debug!(user_id = %user.id, "profile updated");
        Ok(user)
    }
}
