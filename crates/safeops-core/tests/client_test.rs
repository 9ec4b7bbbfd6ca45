// Facade-level tests: service results must land in the stores.

use secrecy::SecretString;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use safeops_core::model::{NewRaw, NewVenue, RpnTable, VenueUpdate};
use safeops_core::{ClientConfig, SafeOpsClient};

const VENUE_ID: &str = "7a4e9ab9-9c36-4c6a-a6ac-8a8f205c5a8e";
const RAW_ID: &str = "0b9d4c0e-2f4e-47b7-b7e4-5df8f43ec1ad";
const USER_ID: &str = "a7d6e6a3-51f0-4df7-9a04-5a8f3c4708c4";

async fn setup() -> (MockServer, SafeOpsClient) {
    let server = MockServer::start().await;
    let mut config = ClientConfig::new(
        server.uri().parse().unwrap(),
        SecretString::from("sk-test".to_owned()),
        RpnTable::new([1, 3, 7, 10], [1, 2, 4, 8]),
    );
    config.realtime_enabled = false;

    // Service calls work without connect(); connect is only for the
    // reactive machinery.
    let client = SafeOpsClient::new(config).unwrap();
    (server, client)
}

fn venue_json(id: &str, name: &str, address: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "address": address,
        "latitude": 51.5,
        "longitude": -0.12,
        "status": "safe",
        "critical_issues_count": 0,
        "created_at": "2026-01-05T08:00:00Z",
        "updated_at": "2026-01-05T08:00:00Z"
    })
}

fn raw_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": USER_ID,
        "venue_id": VENUE_ID,
        "status": status,
        "risk_level": "medium",
        "created_at": "2026-02-01T10:00:00Z",
        "updated_at": "2026-02-01T10:00:00Z",
        "submitted_at": null
    })
}

#[tokio::test]
async fn created_venue_lands_at_store_front() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/venues"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([venue_json(VENUE_ID, "Hall A", "1 Main St")])),
        )
        .mount(&server)
        .await;

    client
        .create_venue(NewVenue {
            name: "Hall A".into(),
            address: "1 Main St".into(),
            postal_code: None,
            latitude: 51.5,
            longitude: -0.12,
        })
        .await
        .unwrap();

    let items = client.stores().venues.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Hall A");
}

#[tokio::test]
async fn venue_update_patches_the_store_entry() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/venues"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([venue_json(VENUE_ID, "Hall A", "1 Main St")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/venues"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([venue_json(VENUE_ID, "Hall A", "2 Dock Rd")])),
        )
        .mount(&server)
        .await;

    client
        .create_venue(NewVenue {
            name: "Hall A".into(),
            address: "1 Main St".into(),
            postal_code: None,
            latitude: 51.5,
            longitude: -0.12,
        })
        .await
        .unwrap();

    let update = VenueUpdate {
        address: Some("2 Dock Rd".into()),
        ..VenueUpdate::default()
    };
    client
        .update_venue(Uuid::parse_str(VENUE_ID).unwrap(), &update)
        .await
        .unwrap();

    let items = client.stores().venues.items();
    assert_eq!(items.len(), 1, "patch must not duplicate the entry");
    assert_eq!(items[0].address, "2 Dock Rd");
    assert_eq!(items[0].name, "Hall A", "unnamed fields stay untouched");
}

#[tokio::test]
async fn submitted_raw_replaces_its_store_entry() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/raw_submissions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([raw_json(RAW_ID, "draft")])))
        .mount(&server)
        .await;

    let mut submitted = raw_json(RAW_ID, "submitted");
    submitted["submitted_at"] = json!("2026-02-02T09:30:00Z");
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/raw_submissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([submitted])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/notifications"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "down" })))
        .mount(&server)
        .await;

    client
        .create_raw(NewRaw {
            user_id: Uuid::parse_str(USER_ID).unwrap(),
            venue_id: Uuid::parse_str(VENUE_ID).unwrap(),
            status: None,
            risk_level: None,
        })
        .await
        .unwrap();

    client
        .submit_raw(
            Uuid::parse_str(RAW_ID).unwrap(),
            Uuid::parse_str(USER_ID).unwrap(),
        )
        .await
        .unwrap();

    let items = client.stores().raws.items();
    assert_eq!(items.len(), 1);
    assert!(items[0].submitted_at.is_some());
}

#[tokio::test]
async fn deleted_raw_leaves_the_store() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/raw_submissions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([raw_json(RAW_ID, "draft")])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/raw_submissions"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client
        .create_raw(NewRaw {
            user_id: Uuid::parse_str(USER_ID).unwrap(),
            venue_id: Uuid::parse_str(VENUE_ID).unwrap(),
            status: None,
            risk_level: None,
        })
        .await
        .unwrap();
    assert_eq!(client.stores().raws.len(), 1);

    client
        .delete_raw(Uuid::parse_str(RAW_ID).unwrap())
        .await
        .unwrap();
    assert!(client.stores().raws.is_empty());
}

#[tokio::test]
async fn connect_populates_stores_and_disconnect_is_clean() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/venues"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([venue_json(VENUE_ID, "Hall A", "1 Main St")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/raw_submissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([raw_json(RAW_ID, "draft")])))
        .mount(&server)
        .await;

    client.connect().await.unwrap();

    assert_eq!(client.stores().venues.len(), 1);
    assert_eq!(client.stores().raws.len(), 1);
    assert!(!client.stores().venues.is_loading());

    client.disconnect().await;
    assert!(
        matches!(
            *client.connection_state().borrow(),
            safeops_core::ConnectionState::Disconnected
        ),
        "disconnect must reset the connection state"
    );
}
