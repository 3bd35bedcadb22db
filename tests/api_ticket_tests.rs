mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{test_app, TestApp};
use dormhub::model::Role;

async fn open_ticket(app: &TestApp, token: &str, subject: &str) -> String {
    let (status, ticket) = app
        .call(Method::POST, "/api/tickets", Some(token), Some(json!({"subject": subject, "message": "help please"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    ticket["ticket_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn new_ticket_defaults() {
    let app = test_app();
    let res = app.user_with_session("res", Role::Resident);
    let (status, ticket) = app
        .call(Method::POST, "/api/tickets", Some(&res), Some(json!({"subject": "Noise", "message": "Room 203 is loud"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket["user_id"], "res");
    assert_eq!(ticket["status"], "open");
    assert_eq!(ticket["category"], "general");
    assert_eq!(ticket["priority"], "normal");
    assert_eq!(ticket["responses"], json!([]));
    assert!(ticket["ticket_id"].as_str().unwrap().starts_with("ticket_"));
}

#[tokio::test]
async fn tickets_are_private_to_their_owner() {
    let app = test_app();
    let res = app.user_with_session("res", Role::Resident);
    let other = app.user_with_session("other", Role::Resident);
    let admin = app.user_with_session("adm", Role::Admin);
    let id = open_ticket(&app, &res, "Leak").await;

    let (status, _) = app.call(Method::GET, &format!("/api/tickets/{id}"), Some(&res), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call(Method::GET, &format!("/api/tickets/{id}"), Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call(Method::GET, &format!("/api/tickets/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, mine) = app.call(Method::GET, "/api/tickets/me", Some(&other), None).await;
    assert!(mine.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn responses_append_and_bump_updated_at() {
    let app = test_app();
    let res = app.user_with_session("res", Role::Resident);
    let other = app.user_with_session("other", Role::Resident);
    let admin = app.user_with_session("adm", Role::Admin);
    let id = open_ticket(&app, &res, "Wifi").await;
    let uri = format!("/api/tickets/{id}/respond");

    let (status, _) = app.call(Method::POST, &uri, Some(&other), Some(json!({"message": "me too"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, ticket) = app.call(Method::POST, &uri, Some(&admin), Some(json!({"message": "Router restarted"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, ticket2) = app.call(Method::POST, &uri, Some(&res), Some(json!({"message": "Works now"}))).await;
    let responses = ticket2["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["responder_id"], "adm");
    assert_eq!(responses[0]["responder_name"], "User adm");
    assert_eq!(responses[1]["message"], "Works now");
    assert!(ticket2["updated_at"].as_str().unwrap() >= ticket["updated_at"].as_str().unwrap());

    let (status, _) = app.call(Method::POST, "/api/tickets/ticket_nope/respond", Some(&res), Some(json!({"message": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_changes_and_closing_rules() {
    let app = test_app();
    let res = app.user_with_session("res", Role::Resident);
    let other = app.user_with_session("other", Role::Resident);
    let admin = app.user_with_session("adm", Role::Admin);
    let id = open_ticket(&app, &res, "Door").await;
    let uri = format!("/api/tickets/{id}/status");

    let (status, body) = app.call(Method::PUT, &uri, Some(&res), Some(json!({"status": "escalated"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid status");
    let (status, _) = app.call(Method::PUT, &uri, Some(&res), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.call(Method::PUT, "/api/tickets/ticket_nope/status", Some(&res), Some(json!({"status": "resolved"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call(Method::PUT, &uri, Some(&other), Some(json!({"status": "resolved"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.call(Method::PUT, &uri, Some(&res), Some(json!({"status": "closed"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, t) = app.call(Method::PUT, &uri, Some(&res), Some(json!({"status": "in_progress"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(t["status"], "in_progress");

    let (_, dash) = app.call(Method::GET, "/api/dashboard/me", Some(&res), None).await;
    assert_eq!(dash["open_tickets_count"], 1);

    let (status, t) = app.call(Method::PUT, &uri, Some(&admin), Some(json!({"status": "closed"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(t["status"], "closed");

    let (_, dash) = app.call(Method::GET, "/api/dashboard/me", Some(&res), None).await;
    assert_eq!(dash["open_tickets_count"], 0);

    let (_, closed) = app.call(Method::GET, "/api/tickets/me?status=closed", Some(&res), None).await;
    assert_eq!(closed.as_array().unwrap().len(), 1);
}
