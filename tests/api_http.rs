// HTTP-level tests for the users API client against a mock server.

use serde_json::json;
use userdesk::api::{ApiClient, DeleteOutcome, User};
use userdesk::config::ApiConfig;
use userdesk::error::Error;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    // MockServer::uri() is "http://127.0.0.1:PORT"
    let host = server.uri().trim_start_matches("http://").to_string();
    ApiClient::new(ApiConfig::with_host(host)).expect("client builds")
}

#[tokio::test]
async fn get_users_returns_backend_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "name": "Bob", "email": "bob@example.com"},
            {"id": 1, "name": "Alice", "email": "alice@example.com"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let users = client_for(&server).get_users().await.unwrap();
    assert_eq!(
        users,
        vec![User::new(2, "Bob", "bob@example.com"), User::new(1, "Alice", "alice@example.com")]
    );
}

#[tokio::test]
async fn get_users_empty_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(client_for(&server).get_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_user_posts_name_and_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"name":"Alice","email":"alice@example.com"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 11, "name": "Alice", "email": "alice@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server).create_user("Alice", "alice@example.com").await.unwrap();
    assert_eq!(created.id, Some(11));
}

#[tokio::test]
async fn update_user_puts_to_id_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/3"))
        .and(body_json(json!({"name": "Bob", "email": "bob@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "Bob", "email": "bob@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client_for(&server).update_user(3, "Bob", "bob@example.com").await.unwrap();
    assert_eq!(updated, User::new(3, "Bob", "bob@example.com"));
}

#[tokio::test]
async fn delete_user_sends_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/3"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server).delete_user(3).await.unwrap();
    assert_eq!(outcome.result.as_deref(), Some("success"));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn delete_user_with_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/5"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    assert_eq!(client_for(&server).delete_user(5).await.unwrap(), DeleteOutcome::default());
}

#[tokio::test]
async fn get_user_and_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "name": "Dee", "email": "dee@example.com"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Status": "OK"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.get_user(4).await.unwrap().name.as_deref(), Some("Dee"));
    assert!(client.health().await.unwrap().is_ok());
}

#[tokio::test]
async fn html_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    assert!(matches!(client_for(&server).get_users().await, Err(Error::Decode(_))));
}

#[tokio::test]
async fn backend_error_body_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/9"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "sql: connection refused"})))
        .mount(&server)
        .await;

    let err = client_for(&server).update_user(9, "x", "x@y.zz").await.unwrap_err();
    match err {
        Error::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message.as_deref(), Some("sql: connection refused"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // port 9 (discard) is closed on test machines
    let client = ApiClient::new(ApiConfig::with_host("127.0.0.1:9")).unwrap();
    assert!(matches!(client.get_users().await, Err(Error::Transport(_))));
}
