//! Gateway behavior against mocked provider endpoints.
//!
//! | Provider   | Endpoint                                  | Auth                 | Text field                          |
//! |------------|-------------------------------------------|----------------------|-------------------------------------|
//! | OpenAI     | /chat/completions                         | Bearer               | choices[0].message.content          |
//! | OpenRouter | /chat/completions                         | Bearer + X-Title     | choices[0].message.content          |
//! | Anthropic  | /v1/messages                              | x-api-key + version  | content[0].text                     |
//! | Gemini     | /v1beta/models/{model}:generateContent    | ?key=                | candidates[0].content.parts[0].text |
//! | Ollama     | /api/chat                                 | none                 | message.content                     |

use std::io::Write;
use std::time::Duration;

use mockito::{Matcher, Server};
use researchdoro_core::ai::{AiGateway, AiProvider, AiSettings, ChatMessage, ResearchContext, SessionData};
use researchdoro_core::GatewayError;
use serde_json::json;

fn settings(provider: AiProvider, base_url: &str) -> AiSettings {
    AiSettings {
        provider,
        api_key: if provider == AiProvider::Ollama {
            String::new()
        } else {
            "test-key".into()
        },
        base_url: Some(base_url.to_string()),
        enabled: true,
        ..AiSettings::default()
    }
}

fn path_for(provider: AiProvider) -> &'static str {
    match provider {
        AiProvider::OpenAi | AiProvider::OpenRouter => "/chat/completions",
        AiProvider::Anthropic => "/v1/messages",
        AiProvider::Gemini => "/v1beta/models/gemini-1.5-flash:generateContent",
        AiProvider::Ollama => "/api/chat",
    }
}

fn reply_body(provider: AiProvider, text: &str) -> String {
    let body = match provider {
        AiProvider::OpenAi | AiProvider::OpenRouter => json!({
            "choices": [{ "message": { "role": "assistant", "content": text } }]
        }),
        AiProvider::Anthropic => json!({
            "content": [{ "type": "text", "text": text }]
        }),
        AiProvider::Gemini => json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        }),
        AiProvider::Ollama => json!({
            "message": { "role": "assistant", "content": text },
            "done": true
        }),
    };
    body.to_string()
}

fn research_context() -> ResearchContext {
    let mut ctx = ResearchContext::with_topic("Coral reef resilience");
    ctx.add_focus_area("Marine ecology");
    ctx.record_query("bleaching thresholds");
    ctx
}

#[tokio::test]
async fn quick_query_succeeds_against_every_backend() {
    for provider in AiProvider::ALL {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", path_for(provider))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply_body(provider, "Reefs recover in decades."))
            .expect(1)
            .create_async()
            .await;

        let gateway = AiGateway::from_settings(settings(provider, &server.url()));
        let answer = gateway
            .quick_query("How fast do reefs recover?", Some(&research_context()))
            .await;
        assert_eq!(answer.as_deref(), Ok("Reefs recover in decades."), "{provider}");
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn unauthorized_is_invalid_api_key_for_every_backend() {
    for provider in AiProvider::ALL {
        let mut server = Server::new_async().await;
        server
            .mock("POST", path_for(provider))
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error":{"message":"bad key"}}"#)
            .create_async()
            .await;

        let gateway = AiGateway::from_settings(settings(provider, &server.url()));
        let err = gateway.quick_query("q", None).await.unwrap_err();
        assert_eq!(err, GatewayError::InvalidApiKey, "{provider}");
        assert_eq!(err.to_string(), "invalid API key");
    }
}

#[tokio::test]
async fn rate_limit_and_credit_errors_are_classified() {
    let mut limited = Server::new_async().await;
    limited
        .mock("POST", "/chat/completions")
        .with_status(429)
        .create_async()
        .await;
    let gateway = AiGateway::from_settings(settings(AiProvider::OpenRouter, &limited.url()));
    assert_eq!(
        gateway.quick_query("q", None).await,
        Err(GatewayError::RateLimited)
    );

    let mut broke = Server::new_async().await;
    broke
        .mock("POST", "/chat/completions")
        .with_status(402)
        .with_body(r#"{"error":{"message":"Insufficient credits"}}"#)
        .create_async()
        .await;
    gateway
        .reconfigure(settings(AiProvider::OpenRouter, &broke.url()))
        .unwrap();
    assert_eq!(
        gateway.quick_query("q", None).await,
        Err(GatewayError::InsufficientCredits)
    );
}

#[tokio::test]
async fn missing_envelope_field_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"msg_1","content":[]}"#)
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::Anthropic, &server.url()));
    let err = gateway.quick_query("q", None).await.unwrap_err();
    assert_eq!(err, GatewayError::InvalidResponse);
    assert_eq!(err.to_string(), "invalid response format from provider");
}

#[tokio::test]
async fn malformed_json_is_operation_failed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::OpenAi, &server.url()));
    match gateway.quick_query("q", None).await {
        Err(GatewayError::Failed(reason)) => assert!(reason.contains("malformed response body")),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_operation_failed_with_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/chat")
        .with_status(404)
        .with_body(r#"{"error":"model 'llama3.2' not found"}"#)
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::Ollama, &server.url()));
    let err = gateway.quick_query("q", None).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "operation failed: HTTP 404: model 'llama3.2' not found"
    );
}

#[tokio::test]
async fn unreachable_local_service_is_reported() {
    // Nothing listens on port 1.
    let gateway = AiGateway::from_settings(settings(AiProvider::Ollama, "http://127.0.0.1:1"));
    assert_eq!(
        gateway.quick_query("q", None).await,
        Err(GatewayError::LocalServiceUnavailable)
    );
}

#[tokio::test]
async fn unreachable_remote_is_generic_failure() {
    let gateway = AiGateway::from_settings(settings(AiProvider::OpenAi, "http://127.0.0.1:1"));
    assert!(matches!(
        gateway.quick_query("q", None).await,
        Err(GatewayError::Failed(_))
    ));
}

#[tokio::test]
async fn disabled_gateway_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut disabled = settings(AiProvider::OpenAi, &server.url());
    disabled.enabled = false;
    let gateway = AiGateway::from_settings(disabled);

    assert_eq!(gateway.quick_query("q", None).await, Err(GatewayError::NotConfigured));
    assert_eq!(
        gateway.chat(&[ChatMessage::user("hi")], None).await,
        Err(GatewayError::NotConfigured)
    );
    assert_eq!(
        gateway.analyze_session(&SessionData::default(), None).await,
        Err(GatewayError::NotConfigured)
    );
    assert_eq!(
        gateway.generate_insights(&json!({}), None).await,
        Err(GatewayError::NotConfigured)
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn openai_request_carries_auth_and_context() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 1000,
            })),
            Matcher::Regex("Current topic: Coral reef resilience".into()),
        ]))
        .with_status(200)
        .with_body(reply_body(AiProvider::OpenAi, "ok"))
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::OpenAi, &server.url()));
    gateway
        .quick_query("q", Some(&research_context()))
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn anthropic_request_uses_vendor_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "messages": [{ "role": "user", "content": "What is resilience?" }]
        })))
        .with_status(200)
        .with_body(reply_body(AiProvider::Anthropic, "ok"))
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::Anthropic, &server.url()));
    gateway.quick_query("What is resilience?", None).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn gemini_sends_key_in_query_and_context_as_exchange() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_body(Matcher::Regex(r#""role":"model""#.into()))
        .with_status(200)
        .with_body(reply_body(AiProvider::Gemini, "ok"))
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::Gemini, &server.url()));
    let history = [
        ChatMessage::user("Summarize my last note"),
        ChatMessage::assistant("You noted coral cover fell 20%."),
        ChatMessage::user("And the cause?"),
    ];
    let answer = gateway.chat(&history, Some(&research_context())).await;
    assert_eq!(answer.as_deref(), Ok("ok"));
    mock.assert_async().await;
}

#[tokio::test]
async fn ollama_request_disables_streaming() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({ "stream": false, "model": "llama3.2" })))
        .with_status(200)
        .with_body(reply_body(AiProvider::Ollama, "local answer"))
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::Ollama, &server.url()));
    assert_eq!(
        gateway.quick_query("q", None).await.as_deref(),
        Ok("local answer")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn insights_are_parsed_from_bullets() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(reply_body(
            AiProvider::OpenAi,
            "- Do X\n- Do Y\nNot a bullet\n* Do Z",
        ))
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::OpenAi, &server.url()));
    let insights = gateway
        .generate_insights(&json!({ "completedPomodoros": 6, "focusMinutes": 150 }), None)
        .await
        .unwrap();
    assert_eq!(insights, vec!["Do X", "Do Y", "Do Z"]);
}

#[tokio::test]
async fn analyze_session_serializes_metrics() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("Completed pomodoros: 4".into()))
        .with_status(200)
        .with_body(reply_body(AiProvider::OpenAi, "Solid pacing."))
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::OpenAi, &server.url()));
    let session = SessionData {
        total_minutes: 100,
        completed_pomodoros: 4,
        breaks_taken: 3,
        goal: Some("Finish literature review".into()),
        notes: vec![],
    };
    assert_eq!(
        gateway.analyze_session(&session, None).await.as_deref(),
        Ok("Solid pacing.")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn reconfigure_applies_to_next_call() {
    let mut first = Server::new_async().await;
    let mut second = Server::new_async().await;
    first
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(reply_body(AiProvider::OpenAi, "from first"))
        .create_async()
        .await;
    second
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(reply_body(AiProvider::Ollama, "from second"))
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::OpenAi, &first.url()));
    assert_eq!(gateway.quick_query("q", None).await.as_deref(), Ok("from first"));

    gateway
        .reconfigure(settings(AiProvider::Ollama, &second.url()))
        .unwrap();
    assert_eq!(gateway.quick_query("q", None).await.as_deref(), Ok("from second"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reconfigure_leaves_in_flight_call_on_old_backend() {
    let mut first = Server::new_async().await;
    let mut second = Server::new_async().await;
    let slow_body = reply_body(AiProvider::OpenAi, "from first");
    let slow = first
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_chunked_body(move |w| {
            std::thread::sleep(Duration::from_millis(300));
            w.write_all(slow_body.as_bytes())
        })
        .expect(1)
        .create_async()
        .await;
    let fast = second
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(reply_body(AiProvider::Ollama, "from second"))
        .expect(1)
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::OpenAi, &first.url()));
    let (answer, ()) = tokio::join!(gateway.quick_query("q", None), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        gateway
            .reconfigure(settings(AiProvider::Ollama, &second.url()))
            .unwrap();
    });
    assert_eq!(answer.as_deref(), Ok("from first"));
    assert_eq!(gateway.active_provider(), Some(AiProvider::Ollama));

    assert_eq!(gateway.quick_query("q", None).await.as_deref(), Ok("from second"));
    slow.assert_async().await;
    fast.assert_async().await;
}

#[tokio::test]
async fn concurrent_calls_complete_independently() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(reply_body(AiProvider::OpenAi, "- Read one paper a day"))
        .expect(2)
        .create_async()
        .await;

    let gateway = AiGateway::from_settings(settings(AiProvider::OpenAi, &server.url()));
    let ctx = research_context();
    let data = json!({});
    let (answer, insights) = tokio::join!(
        gateway.quick_query("q", Some(&ctx)),
        gateway.generate_insights(&data, Some(&ctx)),
    );
    assert_eq!(answer.as_deref(), Ok("- Read one paper a day"));
    assert_eq!(insights, Ok(vec!["Read one paper a day".to_string()]));
}
