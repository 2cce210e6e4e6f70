mod common;

use common::{Reply, StubExecutor};
use curl_runner::{CurlRunner, ExecutionRequest, ExecutionStatus, Runner};
use serde_json::json;

const OK_RESPONSE: &str =
    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\r\n{\"success\":\"true\"}";

fn request(content: serde_json::Value) -> ExecutionRequest {
    ExecutionRequest::new("exec-1", content)
}

fn get_json(expected_status: u64, expected_body: &str) -> serde_json::Value {
    json!({
        "command": ["curl", "https://reqbin.com/echo/get/json", "-H", "Accept: application/json"],
        "expected_status": expected_status,
        "expected_body": expected_body,
    })
}

#[tokio::test]
async fn matching_status_and_body_pass() {
    let runner = CurlRunner::new(StubExecutor::replying(OK_RESPONSE));
    let result = runner
        .run(&request(get_json(200, "{\"success\":\"true\"}")))
        .await;

    assert_eq!(result.status(), ExecutionStatus::Passed, "{result:?}");
    assert_eq!(result.output(), OK_RESPONSE);
    assert_eq!(result.error_message(), None);
}

#[tokio::test]
async fn status_mismatch_fails_with_both_codes() {
    let runner = CurlRunner::new(StubExecutor::replying(
        "HTTP/1.1 404 Not Found\r\n\r\nnothing here",
    ));
    let result = runner.run(&request(get_json(200, ""))).await;

    assert_eq!(result.status(), ExecutionStatus::Failed);
    let msg = result.error_message().unwrap();
    assert!(msg.contains("200") && msg.contains("404"), "{msg}");
    assert!(result.output().starts_with("HTTP/1.1 404"));
}

#[tokio::test]
async fn missing_body_fails_even_with_matching_status() {
    let runner = CurlRunner::new(StubExecutor::replying("HTTP/1.1 200 OK\r\n\r\n{}"));
    let result = runner.run(&request(get_json(200, "success"))).await;

    assert_eq!(result.status(), ExecutionStatus::Failed);
    assert!(result.error_message().unwrap().contains("success"));
}

#[tokio::test]
async fn non_curl_command_is_rejected_without_spawning() {
    let runner = CurlRunner::new(StubExecutor::replying(OK_RESPONSE));
    let result = runner
        .run(&request(json!({
            "command": ["wget", "https://example.com"],
            "expected_status": 200,
        })))
        .await;

    assert_eq!(result.status(), ExecutionStatus::Error);
    assert!(result.error_message().unwrap().contains("wget"));
    assert_eq!(runner.executor().calls(), 0);
}

#[tokio::test]
async fn empty_output_is_an_error_not_a_panic() {
    let runner = CurlRunner::new(StubExecutor::replying(""));
    let result = runner.run(&request(get_json(200, ""))).await;

    assert_eq!(result.status(), ExecutionStatus::Error);
    assert_eq!(
        result.error_message(),
        Some("no HTTP status code found in curl output")
    );
}

#[tokio::test]
async fn params_are_substituted_before_execution() {
    let runner = CurlRunner::new(StubExecutor::replying(OK_RESPONSE));
    let req = request(json!({
        "command": ["curl", "https://{{host}}/items/{{ .id }}", "-H", "Authorization: Bearer {{token}}"],
        "expected_status": "200",
    }))
    .with_param("host", "api.example.com")
    .with_param("id", "42")
    .with_param("token", "t0k3n");

    let result = runner.run(&req).await;
    assert!(result.is_passed(), "{result:?}");

    let seen = runner.executor().seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "curl");
    assert_eq!(
        seen[0].1,
        [
            "https://api.example.com/items/42",
            "-H",
            "Authorization: Bearer t0k3n"
        ]
    );
}

#[tokio::test]
async fn unresolved_placeholder_errors_before_execution() {
    let runner = CurlRunner::new(StubExecutor::replying(OK_RESPONSE));
    let result = runner
        .run(&request(json!({
            "command": ["curl", "https://{{host}}/"],
            "expected_status": 200,
        })))
        .await;

    assert_eq!(result.status(), ExecutionStatus::Error);
    assert!(result.error_message().unwrap().contains("`host`"));
    assert_eq!(runner.executor().calls(), 0);
}

#[tokio::test]
async fn process_failure_is_an_error_with_captured_output() {
    let runner = CurlRunner::new(StubExecutor::new(Reply::Exit {
        code: 6,
        stdout: "partial".to_string(),
    }));
    let result = runner.run(&request(get_json(200, ""))).await;

    assert_eq!(result.status(), ExecutionStatus::Error);
    assert_eq!(result.output(), "partial");
    assert!(result.error_message().unwrap().contains("exit code 6"));
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let runner = CurlRunner::new(StubExecutor::replying(OK_RESPONSE));
    for content in [json!("{\"command\": "), json!({"command": "curl"}), json!(null)] {
        let result = runner.run(&request(content.clone())).await;
        assert_eq!(result.status(), ExecutionStatus::Error, "{content}");
        assert!(result.error_message().is_some());
    }
    assert_eq!(runner.executor().calls(), 0);
}

#[tokio::test]
async fn payload_as_json_text_is_accepted() {
    let runner = CurlRunner::new(StubExecutor::replying(OK_RESPONSE));
    let text = get_json(200, "success").to_string();
    let req = ExecutionRequest::from_json(&json!({"id": "x", "metadata": text}).to_string()).unwrap();

    assert!(runner.run(&req).await.is_passed());
}

#[tokio::test]
async fn repeated_and_concurrent_runs_agree() {
    let runner = CurlRunner::new(StubExecutor::replying("HTTP/1.1 503 Unavailable\r\n"));
    let req = request(get_json(200, ""));

    let first = runner.run(&req).await;
    let (a, b) = tokio::join!(runner.run(&req), runner.run(&req));

    assert_eq!(first, a);
    assert_eq!(a, b);
    assert_eq!(runner.executor().calls(), 3);
}
