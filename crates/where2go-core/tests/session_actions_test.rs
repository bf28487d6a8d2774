#![allow(clippy::unwrap_used)]
// Session actions and catalog service against a wiremock backend.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use where2go_core::{
    ClientConfig, CityForm, CoreError, Readiness, Session, SessionContext, StateForm,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SessionContext) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
    let ctx = SessionContext::new(config.build_client().unwrap());
    (server, ctx)
}

fn secret(s: &str) -> SecretString {
    s.to_string().into()
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn rejected(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": false, "message": message }))
}

async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ok(json!({ "user": { "_id": "u1", "email": "a@b.com" } })))
        .mount(server)
        .await;
}

// ── login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_merges_user_and_keeps_readiness() {
    let (server, ctx) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_json(json!({ "email": "ab", "password": "abcdef" })))
        .respond_with(ok(json!({ "user": { "_id": "u1", "email": "a@b.com" } })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = ctx.actions().login("ab", &secret("abcdef")).await.unwrap();
    assert!(resp.success);

    let expected = Session {
        user_id: "u1".into(),
        email: "a@b.com".into(),
        ..Session::default()
    };
    assert_eq!(*ctx.store().get(), expected);
    assert_eq!(ctx.store().readiness(), Readiness::Unknown);
}

#[tokio::test]
async fn test_login_rejection_leaves_store_unchanged() {
    let (server, ctx) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(rejected("Invalid credentials"))
        .mount(&server)
        .await;

    let resp = ctx.actions().login("ab", &secret("wrong1")).await.unwrap();
    assert!(!resp.success);
    assert_eq!(resp.message.as_deref(), Some("Invalid credentials"));
    assert_eq!(*ctx.store().get(), Session::default());
}

#[tokio::test]
async fn test_login_rejection_with_empty_data_is_not_transport_error() {
    let (server, ctx) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Invalid credentials",
            "data": {}
        })))
        .mount(&server)
        .await;

    let resp = ctx.actions().login("ab", &secret("wrong1")).await.unwrap();
    assert!(!resp.success);
    assert_eq!(resp.message.as_deref(), Some("Invalid credentials"));
    assert_eq!(*ctx.store().get(), Session::default());
}

#[tokio::test]
async fn test_login_transport_failure_is_err() {
    let config = ClientConfig::new(Url::parse("http://127.0.0.1:1").unwrap());
    let ctx = SessionContext::new(config.build_client().unwrap());

    let result = ctx.actions().login("ab", &secret("abcdef")).await;
    assert!(result.unwrap_err().is_transport());
    assert_eq!(*ctx.store().get(), Session::default());
}

// ── logout ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_logout_success_resets_identity() {
    let (server, ctx) = setup().await;
    mount_login_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    ctx.actions().login("ab", &secret("abcdef")).await.unwrap();
    assert!(ctx.store().get().is_authenticated());

    let resp = ctx.actions().logout().await.unwrap();
    assert!(resp.success);
    assert_eq!(*ctx.store().get(), Session::default());
}

#[tokio::test]
async fn test_logout_after_profile_fetch_leaves_ready_anonymous() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/user/user-info"))
        .respond_with(ok(json!({ "_id": "u1", "email": "a@b.com", "username": "admin" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        ctx.actions().fetch_profile().await,
        Readiness::ReadyAuthenticated
    );

    let resp = ctx.actions().logout().await.unwrap();
    assert!(resp.success);

    assert_eq!(ctx.store().readiness(), Readiness::ReadyAnonymous);
    assert_eq!(
        *ctx.store().get(),
        Session {
            is_ready: true,
            ..Session::default()
        }
    );
}

#[tokio::test]
async fn test_logout_failure_keeps_session() {
    let (server, ctx) = setup().await;
    mount_login_ok(&server).await;
    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .respond_with(rejected("nope"))
        .mount(&server)
        .await;

    ctx.actions().login("ab", &secret("abcdef")).await.unwrap();
    let resp = ctx.actions().logout().await.unwrap();

    assert!(!resp.success);
    assert_eq!(ctx.store().get().user_id, "u1");
}

// ── fetch_profile ───────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_profile_success_merges_and_marks_ready() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/user/user-info"))
        .respond_with(ok(json!({
            "_id": "u1",
            "email": "a@b.com",
            "username": "admin",
            "avatar": "https://cdn.example/a.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let readiness = ctx.actions().fetch_profile().await;

    assert_eq!(readiness, Readiness::ReadyAuthenticated);
    let session = ctx.store().get();
    assert_eq!(session.user_id, "u1");
    assert_eq!(session.username, "admin");
    assert_eq!(session.avatar, "https://cdn.example/a.png");
    assert!(session.is_ready);
}

#[tokio::test]
async fn test_fetch_profile_rejection_only_marks_ready() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/user/user-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let readiness = ctx.actions().fetch_profile().await;

    assert_eq!(readiness, Readiness::ReadyAnonymous);
    assert_eq!(
        *ctx.store().get(),
        Session {
            is_ready: true,
            ..Session::default()
        }
    );
}

#[tokio::test]
async fn test_fetch_profile_transport_failure_marks_ready() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/user/user-info"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let readiness = ctx.actions().fetch_profile().await;
    assert_eq!(readiness, Readiness::ReadyAnonymous);
}

#[tokio::test]
async fn test_fetch_profile_runs_once() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/user/user-info"))
        .respond_with(ok(json!({ "_id": "u1", "email": "a@b.com" })))
        .expect(1)
        .mount(&server)
        .await;

    ctx.actions().fetch_profile().await;
    assert!(ctx.actions().profile_fetched());
    let second = ctx.actions().fetch_profile().await;

    assert_eq!(second, Readiness::ReadyAuthenticated);
}

#[tokio::test]
async fn test_subscriber_sees_readiness_change() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/user/user-info"))
        .respond_with(rejected("no session"))
        .mount(&server)
        .await;

    let mut ready = ctx.store().subscribe(|s| s.is_ready);
    assert!(!*ready.current());

    ctx.actions().fetch_profile().await;
    assert_eq!(ready.changed().await, Some(true));
}

// ── SessionContext ──────────────────────────────────────────────────

#[tokio::test]
async fn test_initialize_settles_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/user-info"))
        .respond_with(ok(json!({ "_id": "u1", "email": "a@b.com" })))
        .mount(&server)
        .await;

    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
    let ctx = SessionContext::initialize(config.build_client().unwrap()).await;

    assert_eq!(ctx.store().readiness(), Readiness::ReadyAuthenticated);
    let session = ctx.require_authenticated().await.unwrap();
    assert_eq!(session.email, "a@b.com");
}

#[tokio::test]
async fn test_require_authenticated_rejects_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/user-info"))
        .respond_with(rejected("no session"))
        .mount(&server)
        .await;

    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
    let ctx = SessionContext::initialize(config.build_client().unwrap()).await;

    assert!(matches!(
        ctx.require_authenticated().await,
        Err(CoreError::NotAuthenticated)
    ));
}

// ── Catalog ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_catalog_rejection_maps_to_core_error() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/admin/state/state-listing"))
        .respond_with(rejected("Unauthorized"))
        .mount(&server)
        .await;

    let err = ctx.catalog().states().await.unwrap_err();
    match err {
        CoreError::Rejected { message } => assert_eq!(message.as_deref(), Some("Unauthorized")),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_catalog_rejection_with_object_data_keeps_message() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/admin/city/city-listing"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "message": "Forbidden",
            "data": {}
        })))
        .mount(&server)
        .await;

    let err = ctx.catalog().cities().await.unwrap_err();
    assert!(!err.is_transport());
    assert_eq!(err.user_message().as_deref(), Some("Forbidden"));
}

#[tokio::test]
async fn test_invalid_city_form_makes_no_request() {
    let (server, ctx) = setup().await;
    Mock::given(method("POST"))
        .and(path("/admin/city/add-edit-city"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let form = CityForm {
        name: "Pune".into(),
        pincode: "012345".into(),
        ..CityForm::default()
    };
    let err = ctx.catalog().save_city(&form).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "pincode"));
}

#[tokio::test]
async fn test_state_form_merges_detail_and_orphans() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/admin/state/s1"))
        .respond_with(ok(json!({
            "_id": "s1",
            "name": "Goa",
            "cities": [{ "_id": "c1", "name": "Panaji" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/city/get-orphan-cities"))
        .respond_with(ok(json!([{ "_id": "c2", "name": "Margao" }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/state/add-edit-state"))
        .and(body_json(json!({ "id": "s1", "name": "Goa", "cities": ["c1", "c2"] })))
        .respond_with(ok(json!({ "_id": "s1" })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = ctx.catalog();
    let mut form: StateForm = catalog.state_form(Some("s1")).await.unwrap();
    assert_eq!(form.name, "Goa");
    assert_eq!(form.cities.len(), 1);
    assert_eq!(form.orphans.len(), 1);
    assert!(!form.orphans[0].checked);

    form.check("c2", true).unwrap();
    let saved = catalog.save_state(&form).await.unwrap();
    assert_eq!(saved["_id"], "s1");
}

#[tokio::test]
async fn test_new_state_form_has_only_orphans() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path("/admin/city/get-orphan-cities"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let form = ctx.catalog().state_form(None).await.unwrap();
    assert_eq!(form, StateForm::default());
}
