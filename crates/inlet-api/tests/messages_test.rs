//! Integration tests for `GET /messages` and `GET /stats`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, router};
use inlet_testing::TestEnv;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn seeded() -> TestEnv {
    let env = TestEnv::new().await.expect("test env setup");
    env.seed(&[
        ("m3", "+1001", "2025-01-03T00:00:00Z", Some("Gamma ray")),
        ("m1", "+1001", "2025-01-01T00:00:00Z", Some("alpha beta")),
        ("m2", "+1002", "2025-01-02T00:00:00Z", Some("beta")),
        ("m4", "+1003", "2025-01-04T00:00:00Z", None),
    ])
    .await
    .expect("seed messages");
    env
}

async fn list(env: &TestEnv, uri: &str) -> (StatusCode, Value) {
    let response = router(env).oneshot(get(uri)).await.expect("execute request");
    let status = response.status();
    (status, body_json(response).await)
}

fn ids(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|m| m["message_id"].as_str().expect("message_id"))
        .collect()
}

#[tokio::test]
async fn first_page_returns_earliest_message() {
    let env = TestEnv::new().await.expect("test env setup");
    env.seed(&[
        ("late", "A", "2025-01-02T00:00:00Z", Some("second")),
        ("early", "A", "2025-01-01T00:00:00Z", Some("first")),
    ])
    .await
    .unwrap();

    let (status, body) = list(&env, "/messages?limit=1&offset=0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["early"]);
    assert_eq!(body["total"], 2);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["offset"], 0);
}

#[tokio::test]
async fn default_listing_uses_wire_field_names() {
    let env = seeded().await;

    let (status, body) = list(&env, "/messages").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["total"], 4);
    assert_eq!(ids(&body), vec!["m1", "m2", "m3", "m4"]);
    assert_eq!(
        body["data"][0],
        json!({
            "message_id": "m1",
            "from": "+1001",
            "to": "+14155550000",
            "ts": "2025-01-01T00:00:00Z",
            "text": "alpha beta",
        })
    );
    assert_eq!(body["data"][3]["text"], Value::Null);
}

#[tokio::test]
async fn pages_partition_results() {
    let env = seeded().await;

    let (_, first) = list(&env, "/messages?limit=3&offset=0").await;
    let (_, second) = list(&env, "/messages?limit=3&offset=3").await;
    let (_, past_end) = list(&env, "/messages?limit=3&offset=10").await;

    assert_eq!(ids(&first), vec!["m1", "m2", "m3"]);
    assert_eq!(ids(&second), vec!["m4"]);
    assert!(ids(&past_end).is_empty());
    assert_eq!(past_end["total"], 4);
}

#[tokio::test]
async fn filters_compose() {
    let env = seeded().await;

    let (_, by_sender) = list(&env, "/messages?from=%2B1001").await;
    assert_eq!(ids(&by_sender), vec!["m1", "m3"]);
    assert_eq!(by_sender["total"], 2);

    let (_, since) = list(&env, "/messages?since=2025-01-02T00:00:00Z").await;
    assert_eq!(ids(&since), vec!["m2", "m3", "m4"]);

    let (_, text) = list(&env, "/messages?q=beta").await;
    assert_eq!(ids(&text), vec!["m1", "m2"]);

    let (_, combined) = list(&env, "/messages?from=%2B1001&q=beta").await;
    assert_eq!(ids(&combined), vec!["m1"]);
    assert_eq!(combined["total"], 1);
}

#[tokio::test]
async fn text_search_ignores_ascii_case() {
    let env = seeded().await;

    let (_, lower) = list(&env, "/messages?q=gamma").await;
    let (_, upper) = list(&env, "/messages?q=GAMMA%20RAY").await;
    let (_, literal) = list(&env, "/messages?q=%25").await;

    assert_eq!(ids(&lower), vec!["m3"]);
    assert_eq!(ids(&upper), vec!["m3"]);
    assert!(ids(&literal).is_empty());
}

#[tokio::test]
async fn empty_filters_are_ignored() {
    let env = seeded().await;

    let (status, body) = list(&env, "/messages?from=&since=&q=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
}

#[tokio::test]
async fn out_of_range_parameters_are_unprocessable() {
    let env = seeded().await;

    for uri in [
        "/messages?limit=0",
        "/messages?limit=101",
        "/messages?offset=-1",
        "/messages?limit=abc",
    ] {
        let (status, body) = list(&env, uri).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["error"]["code"], "E1004", "{uri}");
    }
}

#[tokio::test]
async fn limit_bounds_are_inclusive() {
    let env = seeded().await;

    let (min_status, _) = list(&env, "/messages?limit=1").await;
    let (max_status, _) = list(&env, "/messages?limit=100").await;

    assert_eq!(min_status, StatusCode::OK);
    assert_eq!(max_status, StatusCode::OK);
}

#[tokio::test]
async fn stats_on_empty_store() {
    let env = TestEnv::new().await.expect("test env setup");

    let (status, body) = list(&env, "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "total_messages": 0,
            "senders_count": 0,
            "messages_per_sender": [],
            "first_message_ts": null,
            "last_message_ts": null,
        })
    );
}

#[tokio::test]
async fn stats_aggregate_stored_messages() {
    let env = seeded().await;

    let (status, body) = list(&env, "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_messages"], 4);
    assert_eq!(body["senders_count"], 3);
    assert_eq!(body["first_message_ts"], "2025-01-01T00:00:00Z");
    assert_eq!(body["last_message_ts"], "2025-01-04T00:00:00Z");
    assert_eq!(
        body["messages_per_sender"],
        json!([
            {"from": "+1001", "count": 2},
            {"from": "+1002", "count": 1},
            {"from": "+1003", "count": 1},
        ])
    );
}

#[tokio::test]
async fn read_endpoints_fail_closed_when_store_is_down() {
    let env = seeded().await;
    let app = router(&env);
    env.storage().close().await;

    for uri in ["/messages", "/stats"] {
        let response = app.clone().oneshot(get(uri)).await.expect("execute request");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "E3001");
    }
}
