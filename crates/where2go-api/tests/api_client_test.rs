#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use where2go_api::{ApiClient, Error, StateSave, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

/// Responds with the request body wrapped in a success envelope.
struct Echo;

impl Respond for Echo {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": body }))
    }
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_sends_identifier_as_email() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "email": "ab", "password": "abcdef" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "user": { "_id": "u1", "email": "a@b.com" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "abcdef".to_string().into();
    let resp = client.login("ab", &secret).await.unwrap();

    assert!(resp.success);
    let user = resp.data.unwrap().user;
    assert_eq!(user.id, "u1");
    assert_eq!(user.email, "a@b.com");
}

#[tokio::test]
async fn test_login_rejection_is_not_transport_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong-password".to_string().into();
    let resp = client.login("admin", &secret).await.unwrap();

    assert!(!resp.success);
    assert_eq!(resp.message.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_login_rejection_with_empty_data_keeps_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Invalid credentials",
            "data": {}
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong-password".to_string().into();
    let resp = client.login("admin", &secret).await.unwrap();

    assert!(!resp.success);
    assert!(resp.data.is_none());
    assert_eq!(resp.message.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_session_cookie_is_sent_on_later_requests() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sid=s3cr3t; Path=/; HttpOnly")
                .set_body_json(json!({
                    "success": true,
                    "data": { "user": { "_id": "u1", "email": "a@b.com" } }
                })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/user-info"))
        .and(header("cookie", "sid=s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "_id": "u1", "email": "a@b.com", "username": "admin" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "abcdef".to_string().into();
    client.login("a@b.com", &secret).await.unwrap();

    assert_eq!(client.cookie_header().as_deref(), Some("sid=s3cr3t"));
    let profile = client.user_info().await.unwrap().data.unwrap();
    assert_eq!(profile.username.as_deref(), Some("admin"));
}

// ── Transport failures ──────────────────────────────────────────────

#[tokio::test]
async fn test_closed_port_returns_transport_error() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    drop(server);

    let client = ApiClient::new(base_url, &TransportConfig::default()).unwrap();
    let result = client.user_info().await;

    match result {
        Err(ref e @ Error::Transport(_)) => assert!(e.is_transport()),
        other => panic!("expected Transport error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/state/state-listing"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let result = client.list_states().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert!(body.contains("Bad Gateway"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Catalog ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_states() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/state/state-listing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "_id": "s1",
                "name": "Maharashtra",
                "totalCities": 3,
                "createdAt": "2024-05-01T10:00:00Z",
                "updatedAt": "2024-05-02T10:00:00Z"
            }]
        })))
        .mount(&server)
        .await;

    let states = client.list_states().await.unwrap().data.unwrap();

    assert_eq!(states.len(), 1);
    assert_eq!(states[0].id, "s1");
    assert_eq!(states[0].name, "Maharashtra");
    assert_eq!(states[0].total_cities, Some(3));
    assert!(states[0].created_at.is_some());
}

#[tokio::test]
async fn test_listing_rejection_with_object_data_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/state/state-listing"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "message": "Forbidden",
            "data": {}
        })))
        .mount(&server)
        .await;

    let err = client
        .list_states()
        .await
        .unwrap()
        .into_data("/admin/state/state-listing")
        .unwrap_err();

    assert!(!err.is_transport());
    assert_eq!(err.backend_message(), Some("Forbidden"));
}

#[tokio::test]
async fn test_successful_listing_with_object_data_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/state/state-listing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": {} })),
        )
        .mount(&server)
        .await;

    let err = client.list_states().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }));
}

#[tokio::test]
async fn test_state_id_cannot_escape_detail_path() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "State not found"
        })))
        .mount(&server)
        .await;

    let resp = client.get_state("../../user/logout").await.unwrap();
    assert!(!resp.success);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.path(),
        "/admin/state/..%2F..%2Fuser%2Flogout"
    );
}

#[tokio::test]
async fn test_city_detail_includes_destinations() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/city/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "_id": "c1",
                "name": "Pune",
                "pincode": 411001,
                "destinations": [{ "_id": "d1", "name": "Shaniwar Wada", "likes": 7 }]
            }
        })))
        .mount(&server)
        .await;

    let city = client.get_city("c1").await.unwrap().data.unwrap();

    assert_eq!(city.name, "Pune");
    assert_eq!(city.destinations.len(), 1);
    assert_eq!(city.destinations[0].likes, Some(7));
}

#[tokio::test]
async fn test_post_body_survives_echo() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/admin/state/add-edit-state"))
        .respond_with(Echo)
        .mount(&server)
        .await;

    let body = StateSave {
        id: Some("s1".into()),
        name: "Goa".into(),
        cities: vec!["c1".into(), "c2".into()],
    };
    let echoed = client.save_state(&body).await.unwrap().data.unwrap();
    let back: StateSave = serde_json::from_value(echoed).unwrap();

    assert_eq!(back, body);
}

#[tokio::test]
async fn test_nested_payload_survives_echo() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/echo"))
        .respond_with(Echo)
        .mount(&server)
        .await;

    let payload = json!({
        "name": "Pune",
        "pincode": "411001",
        "tags": ["fort", "heritage"],
        "meta": { "featured": true, "rank": 3, "note": null }
    });
    let echoed: Value = client.post("/echo", &payload).await.unwrap().data.unwrap();

    assert_eq!(echoed, payload);
}

#[tokio::test]
async fn test_logout_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.logout().await.unwrap();
    assert!(resp.ensure_success().is_ok());
}
