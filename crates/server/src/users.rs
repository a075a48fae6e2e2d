//! User registration, profile and search endpoints.

use api_types::user::{ProfilePatch, UserList, UserRegister, UserSearch, UserView};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use engine::{ExpenseStore, ProfileUpdate, User};

use crate::{ServerError, server::ServerState};

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
    }
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserRegister>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .register_user(
            &payload.id,
            &payload.email,
            payload.display_name.as_deref(),
        )
        .await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user_view(user))))
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserView> {
    Json(user_view(user))
}

pub async fn update_me(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfilePatch>,
) -> Result<Json<UserView>, ServerError> {
    let updated = state
        .engine
        .update_user_profile(
            &user.id,
            ProfileUpdate {
                display_name: payload.display_name,
            },
        )
        .await?;

    Ok(Json(user_view(updated)))
}

/// Prefix search on display names, never returning the caller.
pub async fn search(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<UserSearch>,
) -> Result<Json<UserList>, ServerError> {
    let users = state
        .engine
        .search_users(&query.q, std::slice::from_ref(&user.id))
        .await?;

    Ok(Json(UserList {
        users: users.into_iter().map(user_view).collect(),
    }))
}
