// Integration tests for `RestClient` using wiremock.

use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use safeops_api::{Direction, Error, Query, RestClient};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct VenueRow {
    id: String,
    name: String,
    status: String,
}

async fn setup() -> (MockServer, RestClient) {
    let server = MockServer::start().await;
    let client = RestClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn select_with_order_and_filter() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": "v-2", "name": "North Depot", "status": "warning" },
        { "id": "v-1", "name": "Hall A", "status": "safe" },
    ]);

    Mock::given(method("GET"))
        .and(path("/rest/v1/venues"))
        .and(query_param("status", "eq.warning"))
        .and(query_param("order", "updated_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let rows: Vec<VenueRow> = client
        .select(
            &Query::new("venues")
                .eq("status", "warning")
                .order("updated_at", Direction::Desc),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "North Depot");
}

#[tokio::test]
async fn select_one_returns_single_row() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/venues"))
        .and(query_param("id", "eq.v-1"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "v-1", "name": "Hall A", "status": "safe" }
        ])))
        .mount(&server)
        .await;

    let row: VenueRow = client
        .select_one(&Query::new("venues").eq("id", "v-1"))
        .await
        .unwrap();

    assert_eq!(row.id, "v-1");
}

#[tokio::test]
async fn select_one_empty_result_is_row_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/venues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client
        .select_one::<VenueRow>(&Query::new("venues").eq("id", "missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RowNotFound { ref relation } if relation == "venues"));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn insert_one_sends_array_body_and_returns_representation() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/venues"))
        .and(body_json(json!([{ "id": "ignored", "name": "Hall A", "status": "safe" }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            { "id": "v-9", "name": "Hall A", "status": "safe" }
        ])))
        .mount(&server)
        .await;

    let inserted: VenueRow = client
        .insert_one(
            "venues",
            &VenueRow {
                id: "ignored".into(),
                name: "Hall A".into(),
                status: "safe".into(),
            },
        )
        .await
        .unwrap();

    // Server-assigned id wins
    assert_eq!(inserted.id, "v-9");
}

#[tokio::test]
async fn update_patches_only_named_fields() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/venues"))
        .and(query_param("id", "eq.v-1"))
        .and(body_json(json!({ "status": "critical" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "v-1", "name": "Hall A", "status": "critical" }
        ])))
        .mount(&server)
        .await;

    let rows: Vec<VenueRow> = client
        .update(
            &Query::new("venues").eq("id", "v-1"),
            &json!({ "status": "critical" }),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "critical");
}

#[tokio::test]
async fn conditional_update_misses_yield_empty_vec() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/raw_submissions"))
        .and(query_param("id", "eq.r-1"))
        .and(query_param("status", "eq.submitted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let rows: Vec<serde_json::Value> = client
        .update(
            &Query::new("raw_submissions")
                .eq("id", "r-1")
                .eq("status", "submitted"),
            &json!({ "status": "approved" }),
        )
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn delete_succeeds_on_no_content() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/raw_submissions"))
        .and(query_param("id", "eq.r-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client
        .delete(&Query::new("raw_submissions").eq("id", "r-1"))
        .await
        .unwrap();
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn constraint_violation_maps_to_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/raw_submissions"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "update or delete on table \"raw_submissions\" violates foreign key constraint",
            "code": "23503"
        })))
        .mount(&server)
        .await;

    let err = client
        .delete(&Query::new("raw_submissions").eq("id", "r-1"))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.api_error_code(), Some("23503"));
}

#[tokio::test]
async fn unauthorized_maps_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/venues"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "JWT expired" })))
        .mount(&server)
        .await;

    let err = client
        .select::<VenueRow>(&Query::new("venues"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SessionExpired));
}

#[tokio::test]
async fn malformed_body_keeps_raw_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/venues"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client
        .select::<VenueRow>(&Query::new("venues"))
        .await
        .unwrap_err();

    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}
