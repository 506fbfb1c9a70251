use serde_json::json;
use travel_agent_model::{
    ErrorKind, ModelFinishReason, ModelMessage, ModelProvider,
    ModelProviderError, ModelRequest,
};
use travel_agent_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> OpenAIProvider {
    let config = OpenAIConfigBuilder::with_api_key("test-key")
        .with_base_url(server.uri())
        .build();
    OpenAIProvider::new(config)
}

fn hello_request() -> ModelRequest {
    ModelRequest {
        messages: vec![ModelMessage::User("Hello".to_owned())],
        tools: vec![],
    }
}

#[tokio::test]
async fn test_text_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "gpt-4o", "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Where would you like to go?"
                },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = provider_for(&server)
        .send_request(&hello_request())
        .await
        .unwrap();
    assert_eq!(resp.content.as_deref(), Some("Where would you like to go?"));
    assert!(resp.tool_calls.is_empty());
    assert_eq!(resp.finish_reason, ModelFinishReason::Stop);
}

#[tokio::test]
async fn test_status_maps_to_error_kind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429).set_body_string("Rate limit reached"),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .send_request(&hello_request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    assert!(err.message().contains("Rate limit reached"));
}

#[tokio::test]
async fn test_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("data: {}\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .send_request(&hello_request())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);
}
