//! Integration tests for calling catalog tools by name

use libpostiz::dispatch::{call_tool, error_response, parse_params_json};
use libpostiz::http::mock::MockTransport;
use libpostiz::http::Method;
use libpostiz::settings::AuthScheme;
use libpostiz::{PostizClient, PostizError, Settings};
use serde_json::json;

fn client(transport: &MockTransport) -> PostizClient<MockTransport> {
    PostizClient::new(
        transport.clone(),
        Settings::new("https://postiz.test/api", "test-token"),
        AuthScheme::Raw,
    )
}

#[tokio::test]
async fn test_create_post_arguments_reach_the_body() {
    let transport = MockTransport::ok(r#"[{"postId":"p1"}]"#);
    let client = client(&transport);

    let arguments = parse_params_json(
        r#"{
            "content": "Hello from an agent",
            "integration_id": "int-3",
            "post_type": "schedule",
            "publish_date": "2025-03-01T10:00:00.000Z",
            "media_urls": ["https://cdn.test/a.png"]
        }"#,
    )
    .unwrap();

    let data = call_tool(&client, "create_post", arguments).await.unwrap();
    assert_eq!(data[0]["postId"], "p1");

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.url, "https://postiz.test/api/public/v1/posts");
    assert_eq!(sent.header_value("Authorization"), Some("test-token"));

    let body = sent.body.unwrap();
    assert_eq!(body["type"], "schedule");
    assert_eq!(body["date"], "2025-03-01T10:00:00.000Z");
    assert_eq!(body["shortLink"], false);
    assert_eq!(body["posts"][0]["integration"], json!({"id": "int-3"}));
    assert_eq!(
        body["posts"][0]["value"],
        json!([{"content": "Hello from an agent"}, {"media": "https://cdn.test/a.png"}])
    );
}

#[tokio::test]
async fn test_registered_name_is_accepted() {
    let transport = MockTransport::ok(r#"[{"id":"int-1"}]"#);
    let client = client(&transport);

    let data = call_tool(&client, "get_integrations_1A", json!({}))
        .await
        .unwrap();

    assert_eq!(data[0]["id"], "int-1");
    assert_eq!(
        transport.last_request().unwrap().url,
        "https://postiz.test/api/public/v1/integrations"
    );
}

#[tokio::test]
async fn test_unknown_tool_sends_nothing() {
    let transport = MockTransport::echo();
    let client = client(&transport);

    let err = call_tool(&client, "delete_post", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(&err, PostizError::UnknownTool(name) if name == "delete_post"));
    assert_eq!(err.to_string(), "Unknown tool: delete_post");
    assert_eq!(err.exit_code(), 3);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_get_posts_defaults_and_sort() {
    let transport = MockTransport::ok(r#"{"posts":[]}"#);
    let client = client(&transport);

    call_tool(&client, "get_posts", json!({"year": 2024, "display": "week", "week": 12}))
        .await
        .unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.method, Method::Get);
    assert_eq!(sent.query_value("display"), Some("week"));
    assert_eq!(sent.query_value("year"), Some("2024"));
    assert_eq!(sent.query_value("month"), Some("1"));
    assert_eq!(sent.query_value("week"), Some("12"));
    assert_eq!(sent.query_value("day"), Some("1"));
    assert_eq!(sent.query_value("sort"), Some("desc"));

    call_tool(&client, "get_posts", json!({"year": 2024, "newest_first": false}))
        .await
        .unwrap();
    let sent = transport.last_request().unwrap();
    assert_eq!(sent.query_value("display"), Some("month"));
    assert_eq!(sent.query_value("sort"), Some("asc"));
}

#[tokio::test]
async fn test_get_posts_rejects_unknown_display() {
    let transport = MockTransport::echo();
    let client = client(&transport);

    let err = call_tool(&client, "get_posts", json!({"display": "fortnight"}))
        .await
        .unwrap_err();

    assert!(matches!(err, PostizError::InvalidInput(_)));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_login_has_no_authorization_header() {
    let transport = MockTransport::ok(r#"{"token":"abc"}"#);
    let client = client(&transport);

    let data = call_tool(
        &client,
        "login",
        json!({"email": "me@example.com", "password": "hunter22"}),
    )
    .await
    .unwrap();
    assert_eq!(data["token"], "abc");

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.url, "https://postiz.test/api/auth/login");
    assert_eq!(sent.header_value("Authorization"), None);
    assert_eq!(
        sent.body.unwrap(),
        json!({"email": "me@example.com", "password": "hunter22"})
    );
}

#[tokio::test]
async fn test_missing_or_invalid_arguments_fail_before_network() {
    let transport = MockTransport::echo();
    let client = client(&transport);

    let cases = [
        ("create_post", json!({"content": "Hi", "integration_id": "int-1"})),
        ("create_post", json!({"content": "Hello world"})),
        ("create_post", json!({"content": "Hello world", "integration_id": "int-1", "post_type": "later"})),
        ("login", json!({"email": "me@example.com"})),
    ];

    for (name, arguments) in cases {
        let err = call_tool(&client, name, arguments.clone()).await.unwrap_err();
        assert!(
            matches!(err, PostizError::InvalidInput(_)),
            "{} {} gave {:?}",
            name,
            arguments,
            err
        );
    }

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_rejected_call_renders_error_response() {
    let transport = MockTransport::status(401, r#"{"message":"Unauthorized"}"#);
    let client = client(&transport);

    let err = call_tool(&client, "get_self", json!({})).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);

    let response = error_response(&err);
    assert_eq!(response["success"], false);
    assert!(response["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to get user info"));
    assert_eq!(response["details"]["status"], 401);
    assert_eq!(response["details"]["body"]["message"], "Unauthorized");
}
