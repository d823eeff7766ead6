//! Fake Metaname API for HTTP-level tests
//!
//! [`FakeMetaname`] answers JSON-RPC requests the way the real API does for
//! a small fixed account, echoing the request id unless a method asks for
//! something else.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const ACCOUNT_REFERENCE: &str = "test_account_reference";
pub const API_KEY: &str = "test_api_key";

/// Zones owned by the fake account
pub const OWNED_ZONES: &[&str] = &["example.com", "another-test.example.com", "example.net"];

pub struct FakeMetaname;

impl Respond for FakeMetaname {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let id = body["id"].clone();
        let params = body["params"].as_array().cloned().unwrap_or_default();
        let arg = |i: usize| params.get(i).cloned().unwrap_or(Value::Null);

        let authenticated = arg(0) == json!(ACCOUNT_REFERENCE) && arg(1) == json!(API_KEY);

        let reply = match body["method"].as_str().unwrap_or_default() {
            _ if !authenticated => error(&id, "Authentication failed", -1),
            "price" if arg(2) == json!("example.com") => json!({"jsonrpc": "2.0", "id": id, "result": 999.99}),
            "price" => error(&id, "Invalid domain name", -4),
            "invalid-json" => {
                return ResponseTemplate::new(200).set_body_string("<html>Bad gateway</html>");
            }
            "general-failure" => return ResponseTemplate::new(502),
            "wrong-sequence" => json!({"jsonrpc": "2.0", "id": "invalid", "result": {}}),
            "undefined-response" => json!({"jsonrpc": "2.0", "id": id, "invalid": "invalid"}),
            "null-result" => json!({"jsonrpc": "2.0", "id": id, "result": null}),
            "dns_zone" => {
                if OWNED_ZONES.iter().any(|zone| arg(2) == json!(zone)) {
                    json!({"jsonrpc": "2.0", "id": id, "result": []})
                } else {
                    error(&id, "Invalid domain name", -4)
                }
            }
            "create_dns_record"
                if arg(2) == json!("example.com")
                    && arg(3)
                        == json!({
                            "name": "_acme-challenge.test.example.com.",
                            "type": "TXT",
                            "aux": null,
                            "ttl": 60,
                            "data": "test_validation",
                        }) =>
            {
                json!({"jsonrpc": "2.0", "id": id, "result": "record_reference"})
            }
            "delete_dns_record"
                if arg(2) == json!("example.com") && arg(3) == json!("record_reference") =>
            {
                json!({"jsonrpc": "2.0", "id": id, "result": {}})
            }
            _ => json!({}),
        };

        ResponseTemplate::new(200).set_body_json(reply)
    }
}

fn error(id: &Value, message: &str, code: i64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"message": message, "code": code},
    })
}

/// Start a server answering JSON-RPC POSTs carrying the JSON content type
pub async fn fake_metaname() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("content-type", "application/json"))
        .respond_with(FakeMetaname)
        .mount(&server)
        .await;
    server
}

/// Request bodies the server has received, in order
pub async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|r| serde_json::from_slice(&r.body).ok())
        .collect()
}
