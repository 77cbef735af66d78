//! Character prompt architect.
//!
//! `neogenesis` turns a structured description of a fictional character into
//! a prompt for an image or video generator. The heart of the crate is the
//! [`compiler`]: a pure, deterministic function from [`CharacterParams`] to a
//! prompt string in one of two dialects (a Midjourney `/imagine` command, or a
//! generic comma-separated tag string for Stable Diffusion style tools).
//!
//! ```
//! use neogenesis::{CharacterParams, Dialect, compile};
//!
//! let params = CharacterParams {
//!     race: Some("Elf".into()),
//!     role: Some("Mage".into()),
//!     prompt_format: Dialect::Midjourney,
//!     ..Default::default()
//! };
//! assert_eq!(compile(&params), "/imagine prompt: A Elf Mage --ar 16:9 --v 6.0");
//! ```
//!
//! Around the compiler sit a few optional collaborators:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`params`] | The parameter record, mode enums and the legacy JSON shim |
//! | [`compiler`] | Clause builders, dialect assembly, aspect phrases, quality tags |
//! | [`sheet`] | Six-angle character sheets and clipboard bundles |
//! | [`preamble`] | Instructional block composed ahead of a prompt by callers |
//! | [`presets`] | Curated characters overlaid onto a record |
//! | [`enhance`] | LLM enhancement over OpenRouter with schema-checked replies |
//! | [`history`] | Capped on-disk history of enhanced prompts |
//! | [`config`] | Defaults and environment overrides for the CLI |
//! | [`api`] | Retry with backoff for the HTTP client |

pub mod api;
pub mod compiler;
pub mod config;
pub mod enhance;
pub mod history;
pub mod params;
pub mod preamble;
pub mod presets;
pub mod sheet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub use compiler::{compile, compile_as, join_colors};
pub use params::{CharacterParams, ClassCategory, DesignMode, Dialect, MediaMode};
pub use sheet::{SheetEntry, character_sheet, render_bundle};

// ── Constants ──────────────────────────────────────────────────────

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model for enhancement requests.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

// ── Schema generation ──────────────────────────────────────────────

/// JSON Schema of `T` as a `serde_json::Value`, for `response_format` and
/// for validating replies.
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body. Unset optional fields are omitted.
#[derive(Serialize, Debug, Default)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}
fn is_zero_f32(v: &f32) -> bool {
    *v == 0.0
}

/// JSON output format type. Replies are always schema constrained.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub enum ResponseFormatType {
    #[serde(rename = "json_schema")]
    JsonSchema,
}

/// Structured output mode.
#[derive(Serialize, Debug)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub fmt_type: ResponseFormatType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<NamedSchema>,
}

/// A named schema the reply must follow.
#[derive(Serialize, Debug)]
pub struct NamedSchema {
    pub name: String,
    pub schema: serde_json::Value,
}

impl ResponseFormat {
    /// Ask for a reply matching the schema of `T`.
    pub fn schema_of<T: JsonSchema>(name: impl Into<String>) -> Self {
        Self {
            fmt_type: ResponseFormatType::JsonSchema,
            json_schema: Some(NamedSchema {
                name: name.into(),
                schema: json_schema_for::<T>(),
            }),
        }
    }
}

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// A message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Clean return type from [`OpenRouterClient::chat`].
#[derive(Debug)]
pub struct ChatCompletion {
    pub content: Option<String>,
    pub usage: Option<UsageInfo>,
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// Parse a raw response body into a [`ChatCompletion`].
fn parse_completion(text: &str) -> Result<ChatCompletion, String> {
    let parsed: RawChatResponse =
        serde_json::from_str(text).map_err(|e| format!("failed to parse response: {e}"))?;

    if let Some(err) = parsed.error {
        return Err(format!("OpenRouter API error: {}", err.message));
    }

    if let Some(ref usage) = parsed.usage {
        debug!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens.unwrap_or(0),
            usage.completion_tokens.unwrap_or(0),
            usage.total_tokens.unwrap_or(0),
        );
    }

    let choice = parsed.choices.and_then(|c| c.into_iter().next());
    Ok(match choice {
        Some(c) => ChatCompletion {
            content: c.message.content,
            usage: parsed.usage,
            finish_reason: c.finish_reason,
        },
        None => {
            debug!("LLM output: empty (no choices)");
            ChatCompletion {
                content: None,
                usage: parsed.usage,
                finish_reason: None,
            }
        }
    })
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the OpenRouter chat completions API.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    /// Create a client with the default attribution headers.
    pub fn new(api_key: impl Into<String>) -> Result<Self, String> {
        Self::with_headers(api_key, "https://github.com/neogenesis", "neogenesis")
    }

    /// Create a client with custom Referer and X-Title headers.
    pub fn with_headers(
        api_key: impl Into<String>,
        referer: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("neogenesis/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            referer: referer.into(),
            title: title.into(),
        })
    }

    /// Send a chat completion request.
    pub async fn chat(&self, body: &ChatRequest) -> Result<ChatCompletion, String> {
        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={}",
            body.model.as_deref().unwrap_or("(none)"),
            body.messages.len(),
            body.max_tokens,
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("failed to read response: {e}"))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(format!("OpenRouter API HTTP {status}: {text}"));
        }

        parse_completion(&text)
    }
}
