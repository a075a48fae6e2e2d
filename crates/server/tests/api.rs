use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono_tz::Tz;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    let app = router(ServerState::new(engine, Tz::UTC));

    for (id, name) in [("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")] {
        let (status, _) = send(
            &app,
            "POST",
            "/users",
            None,
            Some(json!({
                "id": id,
                "email": format!("{id}@example.com"),
                "display_name": name,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    app
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header("x-user-id", user);
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn dinner(app: &Router, payer: &str, amount: &str, participants: &[&str]) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/expenses",
        Some(payer),
        Some(json!({
            "amount": amount,
            "reason": "Dinner",
            "category": "Food",
            "participants": participants,
            "split": { "mode": "equal" },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn requests_without_known_user_are_unauthorized() {
    let app = app().await;

    let (status, _) = send(&app, "GET", "/balances", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/balances", Some("mallory"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/users/me", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Alice");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/users",
        None,
        Some(json!({ "id": "dave", "email": "dave@example.com", "display_name": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("bob"));

    let (status, _) = send(
        &app,
        "PATCH",
        "/users/me",
        Some("carol"),
        Some(json!({ "display_name": "ALICE" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn expense_balances_and_settlement_flow() {
    let app = app().await;
    let expense = dinner(&app, "alice", "100", &["bob"]).await;
    assert_eq!(expense["paid_by"], "alice");
    assert_eq!(expense["participants"], json!(["alice", "bob"]));
    assert_eq!(expense["splits"][1]["amount_minor"], 5000);

    let (status, body) = send(&app, "GET", "/balances", Some("bob"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balances"][0]["counterparty_id"], "alice");
    assert_eq!(body["balances"][0]["name"], "Alice");
    assert_eq!(body["balances"][0]["balance_minor"], -5000);
    assert_eq!(body["total_user_owes_minor"], 5000);

    let (status, _) = send(
        &app,
        "POST",
        "/settlements",
        Some("bob"),
        Some(json!({ "counterparty_id": "alice", "amount": "50.01" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        "POST",
        "/settlements",
        Some("bob"),
        Some(json!({ "counterparty_id": "alice", "amount": "50" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["expense"]["category"], "Settlement");
    assert_eq!(body["expense"]["reason"], "Settlement to Alice");
    assert_eq!(body["balance_minor"], 0);

    let (_, body) = send(&app, "GET", "/balances", Some("alice"), None).await;
    assert_eq!(body["balances"], json!([]));

    let (_, body) = send(&app, "GET", "/spend/monthly", Some("alice"), None).await;
    assert_eq!(body["spent_minor"], 5000);

    let (_, body) = send(&app, "GET", "/balances/bob/history", Some("alice"), None).await;
    assert_eq!(body["name"], "Bob");
    assert_eq!(body["expenses"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn manual_split_must_match_total() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/expenses",
        Some("alice"),
        Some(json!({
            "amount": "30",
            "reason": "Taxi",
            "category": "Travel",
            "participants": ["alice", "bob"],
            "split": { "mode": "manual", "amounts": { "alice": "10", "bob": "abc" } },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "split totals do not match amount");

    let (status, _) = send(
        &app,
        "POST",
        "/expenses",
        Some("alice"),
        Some(json!({
            "amount": "30",
            "reason": "Taxi",
            "category": "Travel",
            "participants": ["ghost"],
            "split": { "mode": "equal" },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_reserved_to_payer() {
    let app = app().await;
    let expense = dinner(&app, "alice", "12.50", &["bob", "carol"]).await;
    let uri = format!("/expenses/{}", expense["id"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", "/expenses/not-a-uuid", Some("alice"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expense_list_filters() {
    let app = app().await;
    dinner(&app, "alice", "20", &["bob"]).await;

    let (status, body) = send(&app, "GET", "/expenses?filter=today", Some("bob"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expenses"].as_array().unwrap().len(), 1);
    assert_eq!(body["expenses"][0]["paid_by_name"], "Alice");

    let (_, body) = send(
        &app,
        "GET",
        "/expenses?filter=all&category=travel",
        Some("bob"),
        None,
    )
    .await;
    assert_eq!(body["expenses"], json!([]));

    let (status, _) = send(&app, "GET", "/expenses?filter=custom_date", Some("bob"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/expenses", Some("carol"), None).await;
    assert_eq!(body["expenses"], json!([]));
}

#[tokio::test]
async fn search_skips_the_caller() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/users/search?q=a", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], json!([]));

    let (_, body) = send(&app, "GET", "/users/search?q=b", Some("alice"), None).await;
    assert_eq!(body["users"][0]["id"], "bob");
}

#[tokio::test]
async fn settlement_category_is_reserved_in_any_case() {
    let app = app().await;
    for category in ["Settlement", "settlement", " SETTLEMENT "] {
        let (status, body) = send(
            &app,
            "POST",
            "/expenses",
            Some("alice"),
            Some(json!({
                "amount": "10",
                "reason": "Payback",
                "category": category,
                "participants": ["bob"],
                "split": { "mode": "equal" },
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{category}");
        assert_eq!(body["error"], "settlements are recorded through /settlements");
    }

    let (_, body) = send(&app, "GET", "/expenses", Some("alice"), None).await;
    assert_eq!(body["expenses"], json!([]));
}

#[tokio::test]
async fn unpayable_splits_are_rejected() {
    let app = app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/users",
        None,
        Some(json!({ "id": "dave", "email": "dave@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // 0.02 over four people rounds to 0.01 each and leaves -0.01 for the last.
    let (status, body) = send(
        &app,
        "POST",
        "/expenses",
        Some("alice"),
        Some(json!({
            "amount": "0.02",
            "reason": "Gum",
            "category": "Food",
            "participants": ["bob", "carol", "dave"],
            "split": { "mode": "equal" },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "split amounts must be >= 0");

    let (status, body) = send(
        &app,
        "POST",
        "/expenses",
        Some("alice"),
        Some(json!({
            "amount": "1",
            "reason": "Taxi",
            "category": "Travel",
            "participants": ["alice", "bob"],
            "split": {
                "mode": "manual",
                "amounts": { "alice": "90000000000000000", "bob": "90000000000000000" },
            },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "split totals do not match amount");

    let (status, _) = send(
        &app,
        "POST",
        "/expenses",
        Some("alice"),
        Some(json!({
            "amount": "90000000000000000",
            "reason": "Yacht",
            "category": "Travel",
            "participants": ["bob"],
            "split": { "mode": "equal" },
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&app, "GET", "/expenses", Some("alice"), None).await;
    assert_eq!(body["expenses"], json!([]));
}
