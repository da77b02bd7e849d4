use dossier_llm_sdk::client::LlmClient;
use dossier_llm_sdk::error::LlmError;
use dossier_llm_sdk::openai::OpenAIClient;
use dossier_llm_sdk::types::{CompletionRequest, Message, ResponseFormat, Role};
use mockito::Matcher;
use serde_json::json;

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19 }
    })
    .to_string()
}

#[tokio::test]
async fn test_complete_sends_json_mode_and_system_prompt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-mini",
            "max_completion_tokens": 300,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": "Réponds en JSON" },
                { "role": "user", "content": "Bonjour" }
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(r#"{"ok":true}"#))
        .create_async()
        .await;

    let client = OpenAIClient::new("test-key")
        .unwrap()
        .with_base_url(server.url())
        .with_model("gpt-4o-mini");

    let request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("Bonjour")])
        .with_system("Réponds en JSON")
        .with_max_tokens(300)
        .with_response_format(ResponseFormat::JsonObject);

    let response = client.complete(request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text(), r#"{"ok":true}"#);
    assert_eq!(response.role, Role::Assistant);
    assert_eq!(response.usage.input_tokens, 12);
    assert_eq!(response.usage.output_tokens, 7);
    assert_eq!(response.stop_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#)
        .create_async()
        .await;

    let client = OpenAIClient::new("bad-key")
        .unwrap()
        .with_base_url(server.url());

    let result = client
        .complete(CompletionRequest::new("gpt-4o", vec![Message::user("x")]))
        .await;

    match result {
        Err(LlmError::Authentication(message)) => {
            assert_eq!(message, "Incorrect API key provided")
        }
        other => panic!("expected authentication error, got {:?}", other.map(|r| r.text())),
    }
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_header("retry-after", "12")
        .with_body("slow down")
        .create_async()
        .await;

    let client = OpenAIClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let result = client
        .complete(CompletionRequest::new("gpt-4o", vec![Message::user("x")]))
        .await;

    match result {
        Err(LlmError::RateLimit {
            message,
            retry_after,
        }) => {
            assert_eq!(message, "slow down");
            assert_eq!(retry_after, Some(12));
        }
        other => panic!("expected rate limit error, got {:?}", other.map(|r| r.text())),
    }
}

#[test]
fn test_empty_choices_is_internal_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "id": "x", "model": "gpt-4o", "choices": [] }).to_string(),
        )
        .create();

    let client = OpenAIClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let result = tokio_test::block_on(
        client.complete(CompletionRequest::new("gpt-4o", vec![Message::user("x")])),
    );

    assert!(matches!(result, Err(LlmError::Internal(_))));
}

#[tokio::test]
async fn test_server_error_is_transient_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .with_body(r#"{"error":{"message":"overloaded","type":"server_error"}}"#)
        .create_async()
        .await;

    let client = OpenAIClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let err = client
        .complete(CompletionRequest::new("gpt-4o", vec![Message::user("x")]))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Status { status: 503, .. }));
    assert!(err.is_transient());
    assert!(!LlmError::invalid_request("bad").is_transient());
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("<html>proxy error</html>")
        .create_async()
        .await;

    let client = OpenAIClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let result = client
        .complete(CompletionRequest::new("gpt-4o", vec![Message::user("x")]))
        .await;

    assert!(matches!(result, Err(LlmError::Parse(_))));
}
