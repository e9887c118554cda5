//! API integration tests against a running server
//!
//! Start the server (`RUN_MODE=development` mounts `/seed`), then run with
//! `cargo test --test api_tests -- --ignored`.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080";

/// ISBN nobody else uses
fn fresh_isbn() -> String {
    Uuid::new_v4().simple().to_string()[..13].to_string()
}

async fn create_author(client: &Client) -> String {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({
            "first_name": "Test",
            "last_name": Uuid::new_v4().to_string(),
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"].as_str().expect("No author id").to_string()
}

async fn create_book(client: &Client, isbn: &str, copies: u32) -> Value {
    let author_id = create_author(client).await;
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "isbn": isbn,
            "title": "Dune",
            "description": "Desert planet",
            "author_ids": [author_id],
            "copies": copies,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    response.json().await.expect("Failed to parse response")
}

async fn create_member(client: &Client) -> String {
    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({ "first_name": "Ada", "last_name": "Lovelace" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"].as_str().expect("No member id").to_string()
}

async fn events_of(client: &Client, isbn: &str) -> Vec<Value> {
    let body: Value = client
        .get(format!("{}/events/books/{}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    body["data"].as_array().cloned().unwrap_or_default()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_create_book_records_events_per_copy() {
    let client = Client::new();
    let isbn = fresh_isbn();

    let body = create_book(&client, &isbn, 2).await;
    assert_eq!(body["data"]["isbn"], isbn.as_str());
    assert_eq!(body["data"]["copies"].as_array().map(|c| c.len()), Some(2));
    assert_eq!(body["data"]["authors"].as_array().map(|a| a.len()), Some(1));

    let events = events_of(&client, &isbn).await;
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e["event_type"] == "CREATE"));
}

#[tokio::test]
#[ignore]
async fn test_create_live_isbn_conflicts() {
    let client = Client::new();
    let isbn = fresh_isbn();
    create_book(&client, &isbn, 1).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "isbn": isbn, "title": "Again" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Duplicate");
}

#[tokio::test]
#[ignore]
async fn test_checkout_and_availability() {
    let client = Client::new();
    let isbn = fresh_isbn();
    let book = create_book(&client, &isbn, 2).await;
    let copy_id = book["data"]["copies"][0]["id"].as_i64().expect("No copy id");
    let member_id = create_member(&client).await;

    let response = client
        .post(format!("{}/checkouts", BASE_URL))
        .json(&json!({ "copy_id": copy_id, "member_id": member_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = client
        .get(format!("{}/availability/{}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["data"]["number_of_copies"], 2);
    assert_eq!(body["data"]["number_checked_out"], 1);
    assert_eq!(body["data"]["number_available"], 1);

    // Same copy again
    let response = client
        .post(format!("{}/checkouts", BASE_URL))
        .json(&json!({ "copy_id": copy_id, "member_id": member_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .patch(format!("{}/checkouts", BASE_URL))
        .json(&json!({ "copy_id": copy_id, "member_id": member_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["returned"].is_string());

    let response = client
        .patch(format!("{}/checkouts", BASE_URL))
        .json(&json!({ "copy_id": copy_id, "member_id": member_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore]
async fn test_patch_and_delete_book() {
    let client = Client::new();
    let isbn = fresh_isbn();
    create_book(&client, &isbn, 2).await;

    let response = client
        .patch(format!("{}/books/{}", BASE_URL, isbn))
        .json(&json!({ "title": "Dune Messiah", "description": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["title"], "Dune Messiah");
    assert_eq!(body["data"]["description"], "Desert planet");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body: Value = client
        .get(format!("{}/books/{}", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(body["data"].is_null());

    let types: Vec<String> = events_of(&client, &isbn)
        .await
        .iter()
        .filter_map(|e| e["event_type"].as_str().map(String::from))
        .collect();
    assert_eq!(types, vec!["CREATE", "CREATE", "UPDATE", "UPDATE", "DELETE", "DELETE"]);
}

#[tokio::test]
#[ignore]
async fn test_patch_unknown_book_is_not_found() {
    let client = Client::new();

    let response = client
        .patch(format!("{}/books/{}", BASE_URL, fresh_isbn()))
        .json(&json!({ "title": "Nothing" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NoSuchData");
}

#[tokio::test]
#[ignore]
async fn test_invalid_member_id() {
    let client = Client::new();

    let response = client
        .get(format!("{}/members/not-a-uuid", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore] // Needs the seed endpoint enabled; wipes the database
async fn test_seed_twice_gives_same_counts() {
    let client = Client::new();

    let first: Value = client
        .post(format!("{}/seed", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let second: Value = client
        .post(format!("{}/seed", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(first["data"]["books"].as_i64().unwrap_or(0) > 0);
    assert_eq!(first["data"], second["data"]);
}
