//! Keyword chat responder with GenAI `chat` spans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use taskweave_observability::genai::{assistant_message, user_message};
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Instrument};
use uuid::Uuid;

/// Default simulated model latency for a chat reply.
pub const CHAT_LATENCY: Duration = Duration::from_millis(100);

/// Open a span for one simulated model call.
///
/// The request settings are fixed; response fields start empty and are
/// filled by [`record_model_response`].
macro_rules! model_call_span {
    ($name:literal, $conversation_id:expr, $input:expr) => {
        tracing::info_span!(
            $name,
            gen_ai.operation.name = taskweave_observability::GenAiOperation::Chat.as_str(),
            gen_ai.provider.name = taskweave_observability::PROVIDER_OPENAI,
            gen_ai.request.model = taskweave_observability::genai::SIMULATED_MODEL,
            gen_ai.conversation.id = %$conversation_id,
            gen_ai.input.messages = %$input,
            gen_ai.request.max_tokens = 2048u32,
            gen_ai.request.temperature = 0.7f64,
            gen_ai.request.top_p = 1.0f64,
            gen_ai.request.frequency_penalty = 0.0f64,
            gen_ai.request.presence_penalty = 0.0f64,
            gen_ai.request.choice.count = 1u32,
            gen_ai.request.seed = 42u64,
            gen_ai.output.messages = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.id = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
        )
    };
}

pub(crate) use model_call_span;

/// Fill the response half of a span opened by [`model_call_span!`].
pub(crate) fn record_model_response(
    span: &tracing::Span,
    output_messages: &str,
    input_tokens: usize,
    output_tokens: usize,
) {
    span.record("gen_ai.output.messages", output_messages);
    span.record("gen_ai.usage.input_tokens", input_tokens);
    span.record("gen_ai.usage.output_tokens", output_tokens);
    span.record(
        "gen_ai.response.id",
        format!("chatcmpl-{}", Utc::now().timestamp()).as_str(),
    );
    span.record("gen_ai.response.finish_reasons", r#"["stop"]"#);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub timestamp: DateTime<Utc>,
}

/// Chat responder. Spans go to the injected dispatch, or to the current
/// dispatcher when none was given.
#[derive(Debug, Clone)]
pub struct ChatService {
    latency: Duration,
    dispatch: Option<Dispatch>,
}

impl Default for ChatService {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatService {
    pub fn new() -> Self {
        Self {
            latency: CHAT_LATENCY,
            dispatch: None,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Where spans go.
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Answer one message inside a `chat.process` span.
    pub async fn process(&self, request: ChatRequest) -> ChatResponse {
        match &self.dispatch {
            Some(dispatch) => {
                self.process_traced(request)
                    .with_subscriber(dispatch.clone())
                    .await
            }
            None => self.process_traced(request).await,
        }
    }

    async fn process_traced(&self, request: ChatRequest) -> ChatResponse {
        let conversation_id = Uuid::new_v4();
        let span = model_call_span!(
            "chat.process",
            conversation_id,
            user_message(&request.message)
        );

        let reply = async {
            tracing::debug!(user_id = %request.user_id, "Processing chat message");
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            reply_for(&request.message)
        }
        .instrument(span.clone())
        .await;

        record_model_response(
            &span,
            &assistant_message(&reply),
            request.message.chars().count(),
            reply.chars().count(),
        );

        ChatResponse {
            reply,
            timestamp: Utc::now(),
        }
    }
}

fn has_word(lower: &str, word: &str) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w == word)
}

/// Reply chosen by the first matching keyword rule (case-insensitive).
pub fn reply_for(message: &str) -> String {
    let lower = message.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    if has("golang")
        || has("go语言")
        || (has_word(&lower, "go") && (has("language") || has("语言")))
    {
        "Go is a statically typed, compiled language designed at Google. It pairs a small, \
         readable syntax with first-class concurrency and strong performance, which makes it \
         a good fit for network services and distributed systems."
            .to_string()
    } else if has("weather") || has("天气") {
        "I can't fetch live weather data myself, but the weather tool can look it up for you."
            .to_string()
    } else if has("thank") || has("谢谢") {
        "You're welcome! Let me know if there is anything else I can help with.".to_string()
    } else if has("hello") || has_word(&lower, "hi") || has("你好") || has("您好") {
        "Hello! Happy to help. I'm an AI assistant and can answer questions or help you get \
         things done."
            .to_string()
    } else {
        format!(
            "I understand you said: {}. That's an interesting topic, and I can tell you more \
             about it.",
            message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskweave_testing::SpanRecorder;

    #[test]
    fn test_reply_rules_first_match_wins() {
        assert!(reply_for("What is Golang?").starts_with("Go is"));
        assert!(reply_for("Is Go a good language?").starts_with("Go is"));
        assert!(reply_for("Go check the WEATHER").starts_with("I can't fetch"));
        assert!(reply_for("谢谢").starts_with("You're welcome"));
        assert!(reply_for("Hi there").starts_with("Hello!"));
        assert!(reply_for("this is fine").starts_with("I understand you said: this is fine."));
        // "going" is not the word "go"
        assert!(!reply_for("I'm going to learn a language").starts_with("Go is"));
    }

    #[tokio::test]
    async fn test_process_emits_chat_span() {
        let recorder = SpanRecorder::new();
        let service = ChatService::new().with_latency(Duration::ZERO);

        let response = service
            .process(ChatRequest::new("hello", "user123"))
            .with_subscriber(recorder.dispatch())
            .await;
        assert!(response.reply.starts_with("Hello!"));

        let span = recorder.find("chat.process").unwrap();
        assert_eq!(span.field("gen_ai.operation.name"), Some("chat"));
        assert_eq!(span.field("gen_ai.provider.name"), Some("openai"));
        assert_eq!(span.field("gen_ai.request.seed"), Some("42"));
        assert_eq!(span.field("gen_ai.usage.input_tokens"), Some("5"));
        assert_eq!(span.field("gen_ai.response.finish_reasons"), Some(r#"["stop"]"#));
        assert!(span.field("gen_ai.response.id").unwrap().starts_with("chatcmpl-"));
        assert!(span.closed);
    }

    #[tokio::test]
    async fn test_injected_dispatch_receives_spans() {
        let injected = SpanRecorder::new();
        let ambient = SpanRecorder::new();
        let service = ChatService::new()
            .with_latency(Duration::ZERO)
            .dispatch(injected.dispatch());

        service
            .process(ChatRequest::new("thanks", "user123"))
            .with_subscriber(ambient.dispatch())
            .await;

        assert!(injected.find("chat.process").is_some());
        assert!(ambient.find("chat.process").is_none());
    }
}
