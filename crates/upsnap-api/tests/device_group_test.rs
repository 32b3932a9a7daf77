#![allow(clippy::unwrap_used)]
// Integration tests for `DeviceGroupAdapter` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use upsnap_api::{
    DeviceGroupAdapter, DeviceGroupFields, Error, ReadOutcome, ResourceAdapter, ResourceKind,
    Session, Transport,
};

const GROUPS: &str = "/api/collections/device_groups/records";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceGroupAdapter, Session) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let transport = Transport::with_client(reqwest::Client::new(), base_url).unwrap();
    let session = Session::new(SecretString::from("T".to_owned()), "U");
    (server, DeviceGroupAdapter::new(transport), session)
}

fn group_path(id: &str) -> String {
    format!("{GROUPS}/{id}")
}

// ── CRUD ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_kind() {
    let (_server, adapter, _session) = setup().await;
    assert_eq!(adapter.kind(), ResourceKind::DeviceGroup);
}

#[tokio::test]
async fn test_create() {
    let (server, adapter, session) = setup().await;

    Mock::given(method("POST"))
        .and(path(GROUPS))
        .and(header("authorization", "Bearer T"))
        .and(body_json(json!({ "name": "rack" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "g1",
            "collectionName": "device_groups",
            "name": "rack"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = adapter
        .create(&session, &DeviceGroupFields::new("rack"))
        .await
        .unwrap();

    assert_eq!(id, "g1");
}

#[tokio::test]
async fn test_create_malformed_body() {
    let (server, adapter, session) = setup().await;

    Mock::given(method("POST"))
        .and(path(GROUPS))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = adapter
        .create(&session, &DeviceGroupFields::new("rack"))
        .await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_id_is_refused_without_request() {
    let (server, adapter, session) = setup().await;

    assert!(matches!(
        adapter.read(&session, "").await,
        Err(Error::NotCreated)
    ));
    assert!(matches!(
        adapter
            .update(&session, "", &DeviceGroupFields::new("lab"))
            .await,
        Err(Error::NotCreated)
    ));
    assert!(matches!(
        adapter.delete(&session, "").await,
        Err(Error::NotCreated)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read() {
    let (server, adapter, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(group_path("g1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "g1",
            "created": "2024-06-15 10:30:00.000Z",
            "name": "rack"
        })))
        .mount(&server)
        .await;

    let outcome = adapter.read(&session, "g1").await.unwrap();

    assert_eq!(outcome, ReadOutcome::Found(DeviceGroupFields::new("rack")));
}

#[tokio::test]
async fn test_read_not_found() {
    let (server, adapter, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(group_path("gone")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(adapter.read(&session, "gone").await.unwrap().is_not_found());
}

#[tokio::test]
async fn test_read_malformed_body() {
    let (server, adapter, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(group_path("g1")))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let result = adapter.read(&session, "g1").await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "[]"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_update() {
    let (server, adapter, session) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(group_path("g1")))
        .and(body_json(json!({ "name": "lab" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "g1", "name": "lab" })))
        .expect(1)
        .mount(&server)
        .await;

    let stored = adapter
        .update(&session, "g1", &DeviceGroupFields::new("lab"))
        .await
        .unwrap();

    assert_eq!(stored.name, "lab");
}

#[tokio::test]
async fn test_update_malformed_body() {
    let (server, adapter, session) = setup().await;

    Mock::given(method("PATCH"))
        .and(path(group_path("g1")))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let result = adapter
        .update(&session, "g1", &DeviceGroupFields::new("lab"))
        .await;

    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

#[tokio::test]
async fn test_delete_idempotent() {
    let (server, adapter, session) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(group_path("g1")))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(group_path("g1")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    adapter.delete(&session, "g1").await.unwrap();
    adapter.delete(&session, "g1").await.unwrap();
}
