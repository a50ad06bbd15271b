//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use sahayak_core::db::Database;
use sahayak_core::{KnowledgeBase, Lexicon};

fn setup_app(require_auth: bool) -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth,
        ..Default::default()
    };
    let app = create_router(
        db.clone(),
        KnowledgeBase::builtin(),
        Lexicon::builtin(),
        config,
    );
    (app, db)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Register and log in a test user, returning the session token
async fn signup_and_login(app: &Router) -> String {
    let response = send_json(
        app,
        "POST",
        "/api/signup",
        None,
        Some(serde_json::json!({
            "name": "Asha",
            "email": "asha@example.com",
            "phone": "9000000000",
            "password": "secret123"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_json(
        app,
        "POST",
        "/api/login",
        None,
        Some(serde_json::json!({
            "email": "asha@example.com",
            "password": "secret123"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    json["token"].as_str().unwrap().to_string()
}

// ========== Auth Tests ==========

#[tokio::test]
async fn test_signup_login_me_flow() {
    let (app, _db) = setup_app(true);
    let token = signup_and_login(&app).await;

    let response = send_json(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["auth_method"], "session");
    assert_eq!(json["user"]["email"], "asha@example.com");
    assert_eq!(json["user"]["name"], "Asha");
}

#[tokio::test]
async fn test_signup_duplicate_email_conflict() {
    let (app, _db) = setup_app(true);
    signup_and_login(&app).await;

    let response = send_json(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(serde_json::json!({
            "name": "Asha Again",
            "email": "ASHA@example.com",
            "password": "different"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Email already registered");
}

#[tokio::test]
async fn test_signup_missing_fields_rejected() {
    let (app, _db) = setup_app(true);

    let response = send_json(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(serde_json::json!({
            "name": "",
            "email": "x@example.com",
            "password": "pw"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _db) = setup_app(true);
    signup_and_login(&app).await;

    let response = send_json(
        &app,
        "POST",
        "/api/login",
        None,
        Some(serde_json::json!({
            "email": "asha@example.com",
            "password": "wrong"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_requires_auth() {
    let (app, _db) = setup_app(true);

    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        None,
        Some(serde_json::json!({"message": "student schemes"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_key_auth() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: true,
        api_keys: vec!["internal-service-key".to_string()],
        ..Default::default()
    };
    let app = create_router(db, KnowledgeBase::builtin(), Lexicon::builtin(), config);

    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        Some("internal-service-key"),
        Some(serde_json::json!({"message": "student schemes"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        Some("wrong-key"),
        Some(serde_json::json!({"message": "student schemes"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let (app, db) = setup_app(true);
    let token = signup_and_login(&app).await;

    let response = send_json(&app, "POST", "/api/logout", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        Some(&token),
        Some(serde_json::json!({"message": "student schemes"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The login record was closed at logout.
    let user = db.get_user_by_email("asha@example.com").unwrap().unwrap();
    let logins = db.list_logins(user.id, 10).unwrap();
    assert_eq!(logins.len(), 1);
    assert!(logins[0].logout_time.is_some());
}

// ========== Chat API Tests ==========

#[tokio::test]
async fn test_chat_classifies_and_logs() {
    let (app, db) = setup_app(true);
    let token = signup_and_login(&app).await;

    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        Some(&token),
        Some(serde_json::json!({"message": "student scholarship"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["category"], "student");
    let reply = json["reply"].as_str().unwrap();
    assert!(reply.starts_with("Here are schemes for *student*:"));
    assert!(reply.contains("Post-Matric Scholarship"));

    // The exchange landed in the log, attributed to the user.
    let user = db.get_user_by_email("asha@example.com").unwrap().unwrap();
    let history = db.list_exchanges(user.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].question, "student scholarship");
}

#[tokio::test]
async fn test_chat_follow_up_uses_session_context() {
    let (app, _db) = setup_app(true);
    let token = signup_and_login(&app).await;

    send_json(
        &app,
        "POST",
        "/api/chat",
        Some(&token),
        Some(serde_json::json!({"message": "student scholarship"})),
    )
    .await;

    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        Some(&token),
        Some(serde_json::json!({"message": "how much"})),
    )
    .await;

    let json = get_body_json(response).await;
    // The follow-up resolves against the remembered category.
    assert_eq!(json["category"], "student");
    assert_eq!(
        json["reply"],
        "₹10,000 – ₹20,000 yearly depending on the course."
    );
}

#[tokio::test]
async fn test_chat_follow_up_without_context() {
    let (app, _db) = setup_app(true);
    let token = signup_and_login(&app).await;

    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        Some(&token),
        Some(serde_json::json!({"message": "how to apply"})),
    )
    .await;

    let json = get_body_json(response).await;
    assert!(json["category"].is_null());
    assert_eq!(
        json["reply"],
        "Please specify which category you mean (student, farmer, etc.)."
    );
}

#[tokio::test]
async fn test_chat_nonsense_gets_help() {
    let (app, _db) = setup_app(true);
    let token = signup_and_login(&app).await;

    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        Some(&token),
        Some(serde_json::json!({"message": "xyz nonsense"})),
    )
    .await;

    let json = get_body_json(response).await;
    assert!(json["category"].is_null());
    assert!(json["reply"]
        .as_str()
        .unwrap()
        .starts_with("Sorry, I didn't understand that."));
}

#[tokio::test]
async fn test_chat_blank_message_not_logged() {
    let (app, db) = setup_app(true);
    let token = signup_and_login(&app).await;

    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        Some(&token),
        Some(serde_json::json!({"message": "   "})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["reply"], "Please type a question.");
    assert!(json["category"].is_null());

    // Blank turns never reach the exchange log.
    assert_eq!(db.count_exchanges().unwrap(), 0);
}

#[tokio::test]
async fn test_chat_missing_message_field_rejected() {
    let (app, db) = setup_app(true);
    let token = signup_and_login(&app).await;

    // Boundary rejection: no `message` field at all, as opposed to the
    // in-band "Please type a question." reply for a blank one.
    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        Some(&token),
        Some(serde_json::json!({"msg": "student"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(db.count_exchanges().unwrap(), 0);
}

#[tokio::test]
async fn test_chat_anonymous_session_continuity() {
    let (app, db) = setup_app(false);

    // First message creates an anonymous session and returns its id.
    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        None,
        Some(serde_json::json!({"message": "farmer schemes"})),
    )
    .await;
    let json = get_body_json(response).await;
    assert_eq!(json["category"], "farmer");
    let session_id = json["session_id"].as_str().unwrap().to_string();

    // Passing the session id back continues the conversation.
    let response = send_json(
        &app,
        "POST",
        "/api/chat",
        None,
        Some(serde_json::json!({"message": "how much", "session_id": session_id})),
    )
    .await;
    let json = get_body_json(response).await;
    assert_eq!(json["category"], "farmer");
    assert_eq!(
        json["reply"],
        "PM Kisan gives ₹6,000 per year. Other schemes vary."
    );

    // Anonymous exchanges are logged without a user.
    assert_eq!(db.count_exchanges().unwrap(), 2);
}

#[tokio::test]
async fn test_chat_history_ordering() {
    let (app, _db) = setup_app(true);
    let token = signup_and_login(&app).await;

    for message in ["student scholarship", "how much", "housing subsidy"] {
        send_json(
            &app,
            "POST",
            "/api/chat",
            Some(&token),
            Some(serde_json::json!({ "message": message })),
        )
        .await;
    }

    let response = send_json(&app, "GET", "/api/chat/history", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let history = json.as_array().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["question"], "student scholarship");
    assert_eq!(history[1]["question"], "how much");
    assert_eq!(history[2]["question"], "housing subsidy");
    assert_eq!(history[2]["category"], "housing");
}

// ========== Category API Tests ==========

#[tokio::test]
async fn test_list_categories() {
    let (app, _db) = setup_app(false);

    let response = send_json(&app, "GET", "/api/categories", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let categories = json.as_array().unwrap();
    assert_eq!(categories.len(), 14);
    assert_eq!(categories[0], "student");
    assert!(categories.iter().any(|c| c == "ration welfare"));
}

#[tokio::test]
async fn test_get_category_detail() {
    let (app, _db) = setup_app(false);

    let response = send_json(&app, "GET", "/api/categories/senior_citizen", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["category"], "senior citizen");
    assert_eq!(json["schemes"][0], "Old Age Pension");
    assert!(!json["alerts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_category_unknown() {
    let (app, _db) = setup_app(false);

    let response = send_json(&app, "GET", "/api/categories/astronaut", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Preferences API Tests ==========

#[tokio::test]
async fn test_preferences_roundtrip() {
    let (app, _db) = setup_app(true);
    let token = signup_and_login(&app).await;

    let response = send_json(&app, "GET", "/api/preferences", Some(&token), None).await;
    let json = get_body_json(response).await;
    assert_eq!(json["language"], "en");
    assert!(json["state"].is_null());

    let response = send_json(
        &app,
        "POST",
        "/api/preferences",
        Some(&token),
        Some(serde_json::json!({"language": "te", "state": "Andhra Pradesh"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_json(&app, "GET", "/api/preferences", Some(&token), None).await;
    let json = get_body_json(response).await;
    assert_eq!(json["language"], "te");
    assert_eq!(json["state"], "Andhra Pradesh");
}

#[tokio::test]
async fn test_preferences_invalid_language() {
    let (app, _db) = setup_app(true);
    let token = signup_and_login(&app).await;

    let response = send_json(
        &app,
        "POST",
        "/api/preferences",
        Some(&token),
        Some(serde_json::json!({"language": "fr"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
