//! End-to-end tests for the REST surface.

#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio_test::assert_ok;

use citypulse::service::summary_service::QUIET_TEXT;
use common::{SUMMARY_TEXT, spawn_app};

const NYC: (f64, f64) = (40.7128, -74.0060);

async fn json_body(response: reqwest::Response) -> Value {
    assert_ok!(response.json::<Value>().await)
}

fn post_body(description: &str) -> Value {
    json!({
        "category": "TRAFFIC",
        "description": description,
        "location": { "lat": NYC.0, "lng": NYC.1 },
    })
}

#[tokio::test]
async fn health_and_categories() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let health = assert_ok!(client.get(app.url("/health")).send().await);
    assert_eq!(health.status(), StatusCode::OK);
    let body = json_body(health).await;
    assert_eq!(body.get("status"), Some(&json!("healthy")));

    let categories = assert_ok!(client.get(app.url("/config/categories")).send().await);
    let body = json_body(categories).await;
    let Some(list) = body.as_array() else {
        panic!("categories should be an array");
    };
    assert_eq!(list.len(), 5);
}

#[tokio::test]
async fn create_list_get_delete_lifecycle() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let created = assert_ok!(
        client
            .post(app.url("/api/v1/updates"))
            .json(&post_body("Accident on Canal St"))
            .send()
            .await
    );
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = json_body(created).await;
    let Some(id) = created.get("id").and_then(Value::as_str).map(str::to_string) else {
        panic!("created update should carry an id");
    };
    assert_eq!(created.get("likes"), Some(&json!(0)));

    let nearby = assert_ok!(
        client
            .get(app.url("/api/v1/updates/nearby?lat=40.7128&lng=-74.006"))
            .send()
            .await
    );
    let nearby = json_body(nearby).await;
    assert_eq!(nearby.get("count"), Some(&json!(1)));
    assert_eq!(nearby.get("boundary"), Some(&json!("inclusive")));

    let fetched = assert_ok!(client.get(app.url(&format!("/api/v1/updates/{id}"))).send().await);
    assert_eq!(fetched.status(), StatusCode::OK);

    let deleted = assert_ok!(
        client
            .delete(app.url(&format!("/api/v1/updates/{id}")))
            .send()
            .await
    );
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = assert_ok!(client.get(app.url(&format!("/api/v1/updates/{id}"))).send().await);
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = json_body(missing).await;
    assert_eq!(body.pointer("/error/code"), Some(&json!(2001)));
}

#[tokio::test]
async fn nearby_excludes_far_updates() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let created = assert_ok!(
        client
            .post(app.url("/api/v1/updates"))
            .json(&post_body("Parade on 5th Ave"))
            .send()
            .await
    );
    assert_eq!(created.status(), StatusCode::CREATED);

    // Boston is roughly 300 km away.
    let nearby = assert_ok!(
        client
            .get(app.url("/api/v1/updates/nearby?lat=42.3601&lng=-71.0589"))
            .send()
            .await
    );
    let nearby = json_body(nearby).await;
    assert_eq!(nearby.get("count"), Some(&json!(0)));

    let all = assert_ok!(client.get(app.url("/api/v1/updates")).send().await);
    let all = json_body(all).await;
    assert_eq!(all.get("count"), Some(&json!(1)));
}

#[tokio::test]
async fn invalid_create_is_rejected() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let blank = assert_ok!(
        client
            .post(app.url("/api/v1/updates"))
            .json(&post_body("   "))
            .send()
            .await
    );
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    let body = json_body(blank).await;
    assert_eq!(body.pointer("/error/code"), Some(&json!(1001)));

    let long = assert_ok!(
        client
            .post(app.url("/api/v1/updates"))
            .json(&post_body(&"x".repeat(141)))
            .send()
            .await
    );
    assert_eq!(long.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_input_uses_the_error_envelope() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let mut weather = post_body("Light rain");
    if let Some(obj) = weather.as_object_mut() {
        obj.insert("category".to_string(), json!("WEATHER"));
    }
    let bad_category = assert_ok!(
        client
            .post(app.url("/api/v1/updates"))
            .json(&weather)
            .send()
            .await
    );
    let missing_lat = assert_ok!(
        client
            .get(app.url("/api/v1/updates/nearby?lng=1"))
            .send()
            .await
    );
    let bad_boundary = assert_ok!(
        client
            .get(app.url("/api/v1/updates/nearby?lat=1&lng=1&boundary=maybe"))
            .send()
            .await
    );

    for response in [bad_category, missing_lat, bad_boundary] {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body.pointer("/error/code"), Some(&json!(1001)));
        assert!(body.pointer("/error/message").is_some_and(Value::is_string));
    }
}

#[tokio::test]
async fn enum_values_ignore_case() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let mut lower = post_body("Road closed");
    if let Some(obj) = lower.as_object_mut() {
        obj.insert("category".to_string(), json!("traffic"));
    }
    let created = assert_ok!(
        client
            .post(app.url("/api/v1/updates"))
            .json(&lower)
            .send()
            .await
    );
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = json_body(created).await;
    assert_eq!(created.get("category"), Some(&json!("TRAFFIC")));

    let nearby = assert_ok!(
        client
            .get(app.url(&format!(
                "/api/v1/updates/nearby?lat={}&lng={}&boundary=Exclusive",
                NYC.0, NYC.1
            )))
            .send()
            .await
    );
    assert_eq!(nearby.status(), StatusCode::OK);
    let nearby = json_body(nearby).await;
    assert_eq!(nearby.get("boundary"), Some(&json!("exclusive")));
}

#[tokio::test]
async fn sweep_removes_expired_updates() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let mut body = post_body("Pop-up market");
    if let Some(obj) = body.as_object_mut() {
        obj.insert("expiresInHours".to_string(), json!(0.000_001));
    }
    let created = assert_ok!(
        client
            .post(app.url("/api/v1/updates"))
            .json(&body)
            .send()
            .await
    );
    assert_eq!(created.status(), StatusCode::CREATED);

    tokio::time::sleep(Duration::from_millis(50)).await;

    let swept = assert_ok!(client.post(app.url("/api/v1/updates/sweep")).send().await);
    let swept = json_body(swept).await;
    assert_eq!(swept.get("removed"), Some(&json!(1)));

    let again = assert_ok!(client.post(app.url("/api/v1/updates/sweep")).send().await);
    let again = json_body(again).await;
    assert_eq!(again.get("removed"), Some(&json!(0)));
}

#[tokio::test]
async fn geocode_hit_and_miss() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let hit = assert_ok!(
        client
            .get(app.url("/api/v1/geocode?q=Brooklyn"))
            .send()
            .await
    );
    assert_eq!(hit.status(), StatusCode::OK);

    let miss = assert_ok!(
        client
            .get(app.url("/api/v1/geocode?q=Atlantis"))
            .send()
            .await
    );
    assert_eq!(miss.status(), StatusCode::NOT_FOUND);
    let body = json_body(miss).await;
    assert_eq!(body.pointer("/error/code"), Some(&json!(2002)));
}

#[tokio::test]
async fn summary_is_quiet_then_model_text() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let quiet = assert_ok!(
        client
            .post(app.url("/api/v1/summary"))
            .json(&json!({}))
            .send()
            .await
    );
    let quiet = json_body(quiet).await;
    assert_eq!(quiet.get("summary"), Some(&json!(QUIET_TEXT)));

    let created = assert_ok!(
        client
            .post(app.url("/api/v1/updates"))
            .json(&post_body("Gridlock on FDR"))
            .send()
            .await
    );
    assert_eq!(created.status(), StatusCode::CREATED);

    let summary = assert_ok!(
        client
            .post(app.url("/api/v1/summary"))
            .json(&json!({ "center": { "lat": NYC.0, "lng": NYC.1 } }))
            .send()
            .await
    );
    let summary = json_body(summary).await;
    assert_eq!(summary.get("summary"), Some(&json!(SUMMARY_TEXT)));
    assert_eq!(summary.get("updateCount"), Some(&json!(1)));
}
