use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use std::sync::Arc;

use crate::{balances, expenses, settlements, spend, users};
use engine::{Engine, Session};

static USER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Zone used for every calendar comparison (today, this month).
    pub timezone: Tz,
}

impl ServerState {
    pub fn new(engine: Engine, timezone: Tz) -> Self {
        Self {
            engine: Arc::new(engine),
            timezone,
        }
    }

    pub(crate) fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }

    /// Loads the caller's history for a single request.
    pub(crate) async fn session(&self, user_id: &str) -> Result<Session<Engine>, engine::EngineError> {
        Session::open(self.engine.as_ref().clone(), user_id).await
    }
}

/// `TypedHeader` for the caller identity.
///
/// Authenticated requests must contain the "x-user-id" entry in the header,
/// naming a registered user.
#[derive(Debug)]
struct UserIdHeader(String);

impl Header for UserIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(UserIdHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-user-id header"),
        }
    }
}

async fn auth(
    user_header: Option<TypedHeader<UserIdHeader>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(UserIdHeader(user_id))) = user_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = state.engine.user(&user_id).await.map_err(|err| {
        tracing::error!("failed to load user {user_id}: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let authenticated = Router::new()
        .route("/users/me", get(users::me).patch(users::update_me))
        .route("/users/search", get(users::search))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/{id}", delete(expenses::remove))
        .route("/balances", get(balances::summary))
        .route("/balances/{counterparty}/history", get(balances::history))
        .route("/settlements", post(settlements::create))
        .route("/spend/monthly", get(spend::monthly))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/users", post(users::register))
        .merge(authenticated)
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    timezone: Tz,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState::new(engine, timezone))).await
}
