//! Integration tests for the signed client against a mock Cerb server.

use std::collections::BTreeMap;

use cerb::signature::{SignatureContext, md5_hex};
use cerb::{
    CerbClient, CerbError, Fields, FormPairs, ProtocolError, RestMethod, SearchQuery,
    TransportError,
};
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const ACCESS_KEY: &str = "test-key";
const SECRET: &str = "test-secret";

fn probe_body() -> serde_json::Value {
    json!({
        "__status": "success",
        "__version": "9.1",
        "__build": "1234",
        "results": []
    })
}

async fn mount_probe(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/contexts/list.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(probe_body()))
        .mount(server)
        .await;
}

async fn connected(server: &MockServer) -> CerbClient {
    mount_probe(server).await;
    CerbClient::connect(ACCESS_KEY, SECRET, server.uri())
        .await
        .expect("probe should succeed")
}

async fn last_request_to(server: &MockServer, request_path: &str) -> Request {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .into_iter()
        .rev()
        .find(|r| r.url.path() == request_path)
        .expect("request should have been sent")
}

fn form_body(request: &Request) -> Vec<(String, String)> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}

#[tokio::test]
async fn test_connect_exposes_version_and_build() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    assert_eq!(client.version(), "9.1");
    assert_eq!(client.build(), "1234");
    assert!(client.base_url().as_str().ends_with('/'));
}

#[tokio::test]
async fn test_connect_fails_on_failure_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contexts/list.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"__status": "fail", "message": "bad auth"})),
        )
        .mount(&server)
        .await;

    let err = CerbClient::connect(ACCESS_KEY, SECRET, server.uri())
        .await
        .unwrap_err();
    assert_eq!(err.as_remote().map(|e| e.message.as_str()), Some("bad auth"));
}

#[tokio::test]
async fn test_connect_requires_build() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contexts/list.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"__status": "success", "__version": "9.1"})),
        )
        .mount(&server)
        .await;

    let err = CerbClient::connect(ACCESS_KEY, SECRET, server.uri())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CerbError::Protocol(ProtocolError::MissingField { ref field }) if field == "__build"
    ));
}

#[tokio::test]
async fn test_send_failure_envelope_is_remote_error() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("GET"))
        .and(path("/records/ticket/1.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"__status": "fail", "message": "bad auth"})),
        )
        .mount(&server)
        .await;

    let err = client.get_record("ticket", 1, &[]).await.unwrap_err();
    match err {
        CerbError::RemoteApi(remote) => assert_eq!(remote.message, "bad auth"),
        other => panic!("expected RemoteApi, got {other:?}"),
    }
}

#[tokio::test]
async fn test_send_non_string_status_is_remote_error() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("GET"))
        .and(path("/records/ticket/1.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"__status": false, "message": "denied"})),
        )
        .mount(&server)
        .await;

    let err = client.get_record("ticket", 1, &[]).await.unwrap_err();
    match err {
        CerbError::RemoteApi(remote) => {
            assert_eq!(remote.status, "false");
            assert_eq!(remote.message, "denied");
        }
        other => panic!("expected RemoteApi, got {other:?}"),
    }
}

#[tokio::test]
async fn test_signature_matches_captured_request() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("POST"))
        .and(path("/records/ticket/create.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"__status": "success", "id": 9})),
        )
        .mount(&server)
        .await;

    let mut fields = Fields::new();
    fields.insert("subject".to_string(), json!("Printer on fire"));
    fields.insert("custom_42".to_string(), json!("Red"));
    client
        .create_record("ticket", &["custom_"], &fields)
        .await
        .unwrap();

    let request = last_request_to(&server, "/records/ticket/create.json").await;
    let date = request.headers.get("date").unwrap().to_str().unwrap();
    let auth = request.headers.get("cerb-auth").unwrap().to_str().unwrap();
    let body = String::from_utf8(request.body.clone()).unwrap();
    let secret_digest = md5_hex(SECRET);

    let expected = SignatureContext {
        verb: RestMethod::Post,
        date,
        path: request.url.path(),
        query: request.url.query().unwrap_or(""),
        body: &body,
        secret_digest: &secret_digest,
    }
    .auth_header_value(ACCESS_KEY);

    assert_eq!(auth, expected);
    assert_eq!(request.url.query(), Some("expand=custom_"));
    assert_eq!(
        form_body(&request),
        vec![
            ("fields[custom_42]".to_string(), "Red".to_string()),
            ("fields[subject]".to_string(), "Printer on fire".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_request_headers() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    let request = last_request_to(&server, "/contexts/list.json").await;
    assert_eq!(
        request.headers.get("content-type").unwrap(),
        "application/x-www-form-urlencoded; charset=utf-8"
    );
    assert_eq!(request.headers.get("content-length").unwrap(), "0");
    assert!(request.headers.get("date").is_some());
    assert!(
        request
            .headers
            .get("cerb-auth")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("test-key:")
    );
    assert_eq!(client.access_key(), ACCESS_KEY);
}

#[tokio::test]
async fn test_empty_params_omit_query_string() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    client.get_contexts().await.unwrap();

    let request = last_request_to(&server, "/contexts/list.json").await;
    assert_eq!(request.url.query(), None);
}

#[tokio::test]
async fn test_non_2xx_failure_envelope_is_remote_error() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/records/ticket/5.json"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"__status": "fail", "message": "Access denied"})),
        )
        .mount(&server)
        .await;

    let err = client.delete_record("ticket", 5).await.unwrap_err();
    assert_eq!(
        err.as_remote().map(|e| e.message.as_str()),
        Some("Access denied")
    );
}

#[tokio::test]
async fn test_non_2xx_without_envelope_is_transport_error() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("GET"))
        .and(path("/records/ticket/search.json"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client
        .search_records("ticket", &SearchQuery::new())
        .await
        .unwrap_err();
    match err {
        CerbError::Transport(TransportError::HttpStatus { status, body }) => {
            assert_eq!(status, 502);
            assert!(body.contains("Bad Gateway"));
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_transport_error() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("GET"))
        .and(path("/contexts/activity/events.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_activity_events().await.unwrap_err();
    assert!(matches!(
        err,
        CerbError::Transport(TransportError::InvalidJson(_))
    ));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let err = CerbClient::connect(ACCESS_KEY, SECRET, "http://127.0.0.1:1/rest/")
        .await
        .unwrap_err();
    assert!(matches!(err, CerbError::Transport(ref t) if t.is_connection()));
}

#[tokio::test]
async fn test_parse_new_message_body() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("POST"))
        .and(path("/parser/parse.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"__status": "success"})))
        .mount(&server)
        .await;

    client
        .parse_new_message("a@x.com", "b@x.com", "Hi", Some("Body"))
        .await
        .unwrap();

    let request = last_request_to(&server, "/parser/parse.json").await;
    assert_eq!(
        form_body(&request),
        vec![(
            "message".to_string(),
            "From: a@x.com\nTo: b@x.com\nSubject: Hi\n\nBody".to_string()
        )]
    );
}

#[tokio::test]
async fn test_parse_reply_subject_and_default_body() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("POST"))
        .and(path("/parser/parse.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"__status": "success"})))
        .mount(&server)
        .await;

    client
        .parse_reply("a@x.com", "b@x.com", "ABC-123", None)
        .await
        .unwrap();

    let request = last_request_to(&server, "/parser/parse.json").await;
    let (_, message) = &form_body(&request)[0];
    assert!(message.contains("Subject: [parser #ABC-123] Reply\n"));
    assert!(message.ends_with("\n\nNo Content"));
}

#[tokio::test]
async fn test_update_uses_put_with_expand() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("PUT"))
        .and(path("/records/task/3.json"))
        .and(query_param("expand", ""))
        .and(body_string("fields%5Bstatus%5D=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"__status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut fields = Fields::new();
    fields.insert("status".to_string(), json!(true));
    client.update_record("task", 3, &[], &fields).await.unwrap();
}

#[tokio::test]
async fn test_upsert_sends_expand_then_query() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/records/contact/upsert.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"__status": "success"})))
        .mount(&server)
        .await;

    client
        .upsert_record("contact", "email:a@x.com", &["custom_"], &Fields::new())
        .await
        .unwrap();

    let request = last_request_to(&server, "/records/contact/upsert.json").await;
    assert_eq!(
        request.url.query(),
        Some("expand=custom_&query=email%3Aa%40x.com")
    );
}

#[tokio::test]
async fn test_search_params() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("GET"))
        .and(path("/records/ticket/search.json"))
        .and(query_param("limit", "100"))
        .and(query_param("page", ""))
        .and(query_param("q", "status:o"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"__status": "success", "results": [{"id": 1}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let envelope = client
        .search_records("ticket", &SearchQuery::new().query("status:o"))
        .await
        .unwrap();
    assert_eq!(envelope.results().unwrap().len(), 1);
}

#[tokio::test]
async fn test_link_and_activity_payloads() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"__status": "success"})))
        .mount(&server)
        .await;

    client
        .link(
            "cerberusweb.contexts.ticket:1",
            &["cerberusweb.contexts.task:2".to_string()],
        )
        .await
        .unwrap();
    let request = last_request_to(&server, "/contexts/link.json").await;
    assert_eq!(
        form_body(&request)[1],
        (
            "targets".to_string(),
            r#"["cerberusweb.contexts.task:2"]"#.to_string()
        )
    );

    client
        .create_activity_event("cerberusweb.contexts.ticket:1", "custom.note", None, None)
        .await
        .unwrap();
    let request = last_request_to(&server, "/contexts/activity/create.json").await;
    let body = form_body(&request);
    assert_eq!(body[2], ("variables".to_string(), "[]".to_string()));
    assert_eq!(body[3], ("urls".to_string(), "[]".to_string()));
}

#[tokio::test]
async fn test_import_package_payload() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("POST"))
        .and(path("/packages/import.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"__status": "success"})))
        .mount(&server)
        .await;

    let mut prompts = BTreeMap::new();
    prompts.insert("target_group".to_string(), "Support".to_string());
    client
        .import_package(&json!({"package": {"name": "demo"}}), &prompts)
        .await
        .unwrap();

    let request = last_request_to(&server, "/packages/import.json").await;
    let body = form_body(&request);
    assert_eq!(body[0].0, "prompts[target_group]");
    assert_eq!(body[1].0, "package_json");
}

#[tokio::test]
async fn test_default_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contexts/list.json"))
        .and(header("x-request-source", "integration-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(probe_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = CerbClient::builder(ACCESS_KEY, SECRET)
        .base_url(server.uri())
        .default_header("X-Request-Source", "integration-test")
        .unwrap()
        .connect()
        .await
        .unwrap();
    assert_eq!(client.build(), "1234");
}

#[tokio::test]
async fn test_send_with_raw_pairs() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("GET"))
        .and(path("/workers/me.json"))
        .and(query_param("expand", "groups"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"__status": "success", "id": 1})),
        )
        .mount(&server)
        .await;

    let envelope = client
        .send(
            RestMethod::Get,
            "workers/me",
            &FormPairs::new(),
            &FormPairs::new().with("expand", "groups"),
        )
        .await
        .unwrap();
    assert_eq!(envelope.get("id"), Some(&json!(1)));
}
