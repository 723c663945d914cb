//! End-to-end behaviour of the client against a mock backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use picksleague_core::api::NEW_TOKEN_HEADER;
use picksleague_core::models::Page;
use picksleague_core::{
    ApiClient, ApiEndpoint, ErrorKind, KeyValueStore, MemoryStore, RuntimeMode, SessionStorage,
    StorageKey,
};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(server: &MockServer) -> ApiEndpoint {
    // Trailing slash exercises normalisation
    ApiEndpoint::resolve(Some(&format!("{}/", server.uri())), RuntimeMode::Test).unwrap()
}

fn client_with(server: &MockServer, store: MemoryStore) -> (ApiClient, SessionStorage) {
    let session = SessionStorage::from_store(store);
    let client = ApiClient::new(endpoint(server), session.clone()).unwrap();
    (client, session)
}

fn user_json(id: i64, username: &str) -> serde_json::Value {
    json!({ "id": id, "username": username, "email": format!("{}@example.com", username) })
}

#[tokio::test]
async fn test_stored_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/leagues"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "id": 7, "name": "Sunday Crew", "memberCount": 6 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, MemoryStore::with_token("tok-1"));
    let response = client.leagues().list().await.unwrap();

    assert!(response.success);
    assert_eq!(response.into_data().unwrap()[0].name, "Sunday Crew");
}

#[tokio::test]
async fn test_no_token_means_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/races"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, MemoryStore::new());
    client.races().schedule().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_rotated_token_is_used_by_next_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer old"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(NEW_TOKEN_HEADER, "rotated")
                .set_body_json(json!({ "success": true, "data": user_json(1, "pole") })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/drivers"))
        .and(header("authorization", "Bearer rotated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session) = client_with(&server, MemoryStore::with_token("old"));
    client.auth().me().await.unwrap();
    assert_eq!(session.token().await.unwrap().as_deref(), Some("rotated"));

    client.drivers().list().await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/leagues/5/standings"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "success": false, "message": "Token expired" })),
        )
        .mount(&server)
        .await;

    let store = MemoryStore::with_token("stale");
    store
        .set(StorageKey::CurrentUser, &user_json(3, "drafter").to_string())
        .await
        .unwrap();
    let (client, session) = client_with(&server, store);

    let err = client.leagues().standings(5).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.user_message(), "Token expired");
    assert_eq!(session.token().await.unwrap(), None);
    assert_eq!(session.current_user().await.unwrap(), None);
}

#[tokio::test]
async fn test_join_with_bad_code_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/leagues/join"))
        .and(body_json(json!({ "code": "ABC123" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "Invalid code" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, session) = client_with(&server, MemoryStore::with_token("tok"));
    let response = client.leagues().join_by_code("ABC123").await.unwrap();

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("Invalid code"));
    assert!(response.data.is_none());
    assert_eq!(session.token().await.unwrap().as_deref(), Some("tok"));
}

#[tokio::test]
async fn test_failure_envelope_with_partial_data_keeps_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/leagues/join"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Invalid code",
            "data": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, MemoryStore::with_token("tok"));
    let response = client.leagues().join_by_code("ABC123").await.unwrap();

    assert!(!response.success);
    assert_eq!(response.message_or(""), "Invalid code");
    assert!(response.data.is_none());
}

#[tokio::test]
async fn test_server_error_keeps_status_and_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/races/current"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let (client, session) = client_with(&server, MemoryStore::with_token("tok"));
    let err = client.races().current().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert!(!err.is_unauthorized());
    assert!(err.user_message().contains("503"));
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Bind then release a port so nothing is listening on it
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let endpoint =
        ApiEndpoint::resolve(Some(&format!("http://127.0.0.1:{}", port)), RuntimeMode::Test)
            .unwrap();

    let session = SessionStorage::from_store(MemoryStore::with_token("tok"));
    let client = ApiClient::new(endpoint, session.clone()).unwrap();
    let err = client.leagues().list().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.is_network());
    assert_eq!(err.status(), None);
    assert!(err.url().unwrap().ends_with("/api/leagues"));
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn test_unresponsive_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/drivers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": [] }))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let session = SessionStorage::from_store(MemoryStore::new());
    let client = ApiClient::builder(endpoint(&server), session)
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let started = Instant::now();
    let err = client.drivers().list().await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.user_message().contains("timed out"));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_avatar_upload_is_multipart_without_leaking_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/avatar"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": 1, "username": "pole", "avatarUrl": "/uploads/avatars/1.png" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notifications/preferences"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "pickReminders": false }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session) = client_with(&server, MemoryStore::with_token("tok"));
    let response = client
        .auth()
        .upload_avatar("me.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
        .await
        .unwrap();
    assert!(response.success);

    let stored = session.current_user().await.unwrap().unwrap();
    assert_eq!(
        client.endpoint().asset_url(stored.avatar_url.as_deref().unwrap()),
        format!("{}/uploads/avatars/1.png", server.uri())
    );

    let prefs = client.notifications().preferences().await.unwrap();
    let prefs = prefs.into_data().unwrap();
    assert!(!prefs.pick_reminders);
    assert!(prefs.race_results);
}

#[tokio::test]
async fn test_login_stores_session_and_logout_clears_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "pole@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "token": "fresh", "user": user_json(9, "pole") }
        })))
        .mount(&server)
        .await;

    let (client, session) = client_with(&server, MemoryStore::new());
    let response = client
        .auth()
        .login("pole@example.com", "hunter2")
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(session.token().await.unwrap().as_deref(), Some("fresh"));
    assert_eq!(session.current_user().await.unwrap().unwrap().id, 9);

    client.auth().logout().await.unwrap();
    assert!(!session.is_authenticated().await);
    assert_eq!(session.current_user().await.unwrap(), None);
}

#[tokio::test]
async fn test_failed_login_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Incorrect password"
        })))
        .mount(&server)
        .await;

    let (client, session) = client_with(&server, MemoryStore::new());
    let response = client.auth().login("pole@example.com", "nope").await.unwrap();

    assert!(!response.success);
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn test_identifiers_are_interpolated_positionally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/picks/3/week/12/user/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "leagueId": 3, "week": 12, "userId": 99, "picks": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/picks/3/week/12/2"))
        .and(body_json(json!({ "driverId": 24 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "position": 2, "driverId": 24 }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/leagues/3/members/99/picks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, MemoryStore::with_token("tok"));

    let week = client.picks().for_user(3, 12, 99).await.unwrap().into_data().unwrap();
    assert_eq!((week.league_id, week.week, week.user_id), (3, 12, Some(99)));

    let pick = client.picks().submit(3, 12, 2, 24).await.unwrap().into_data().unwrap();
    assert_eq!((pick.position, pick.driver_id), (2, 24));

    client.leagues().member_picks(3, 99).await.unwrap();
}

#[tokio::test]
async fn test_path_segments_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/notifications/devices/ExponentPushToken%5Babc%5D"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, MemoryStore::with_token("tok"));
    let response = client
        .notifications()
        .unregister_device("ExponentPushToken[abc]")
        .await
        .unwrap();
    assert!(response.success);
}

#[tokio::test]
async fn test_activity_feed_sends_page_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activity/4"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "id": 1, "type": "pick_submitted", "userId": 2 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_with(&server, MemoryStore::with_token("tok"));
    let items = client
        .activity()
        .feed(4, &Page::default().next())
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert_eq!(items[0].kind, "pick_submitted");
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/drivers/7"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": 7, "name": "Car Seven" }
        })))
        .expect(8)
        .mount(&server)
        .await;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_token("tok"));
    let client = ApiClient::new(endpoint(&server), SessionStorage::new(store)).unwrap();

    let calls = (0..8).map(|_| {
        let client = client.clone();
        async move { client.drivers().get(7).await }
    });
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(|r| r.as_ref().map(|r| r.success).unwrap_or(false)));
}
