//! The enhancement client.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::brief::{Movement, input_brief};
use super::instructions::{
    INVENTORY_REQUEST, design_kit_instructions, design_kit_request, enhance_instructions,
    enhance_request, inventory_instructions,
};
use super::{GeneratedPrompt, KIT_ANCHOR_LABEL, PromptReply, validate_for_enhancement};
use crate::api::RetryConfig;
use crate::params::CharacterParams;
use crate::preamble::with_preamble;
use crate::sheet::SheetEntry;
use crate::{ChatRequest, Message, OpenRouterClient, ResponseFormat, json_schema_for};

/// Reply shape of a design-kit request.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
pub struct DesignKit {
    pub images: Vec<SheetEntry>,
}

/// Sends enhancement requests and post-processes the replies.
pub struct Enhancer {
    client: OpenRouterClient,
    model: String,
    retry: RetryConfig,
    preamble: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl Enhancer {
    pub fn new(client: OpenRouterClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            retry: RetryConfig::default(),
            preamble: None,
            max_tokens: 4096,
            temperature: 0.7,
        }
    }

    /// Prepend `preamble` to enhanced prompts (and to the first kit entry).
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// One enhanced prompt for `params`.
    pub async fn enhance(&self, params: &CharacterParams) -> Result<GeneratedPrompt, String> {
        validate_for_enhancement(params)?;
        let brief = input_brief(params, Movement::for_mode(params.mode));
        let content = self
            .request::<PromptReply>(
                "generated_prompt",
                enhance_instructions(params.prompt_format),
                enhance_request(&brief),
            )
            .await?;
        let reply = parse_generated_prompt(&content)?;
        info!("Enhanced prompt: {} chars", reply.prompt.len());
        Ok(self.finish_prompt(reply))
    }

    /// The seven-image design kit for `params`.
    pub async fn design_kit(&self, params: &CharacterParams) -> Result<Vec<SheetEntry>, String> {
        validate_for_enhancement(params)?;
        let brief = input_brief(params, Movement::Pose);
        let content = self
            .request::<DesignKit>(
                "design_kit",
                design_kit_instructions(params),
                design_kit_request(&brief),
            )
            .await?;
        let entries = parse_design_kit(&content)?;
        info!("Design kit: {} entries", entries.len());
        Ok(finish_kit(entries, self.preamble.as_deref()))
    }

    /// An inventory sprite-sheet prompt for `params`.
    pub async fn inventory(&self, params: &CharacterParams) -> Result<GeneratedPrompt, String> {
        validate_for_enhancement(params)?;
        let content = self
            .request::<PromptReply>(
                "inventory_prompt",
                inventory_instructions(params),
                INVENTORY_REQUEST.to_string(),
            )
            .await?;
        parse_generated_prompt(&content)
    }

    fn finish_prompt(&self, mut reply: GeneratedPrompt) -> GeneratedPrompt {
        if let Some(preamble) = &self.preamble {
            reply.prompt = with_preamble(preamble, &reply.prompt);
        }
        reply
    }

    /// Request body asking for a reply matching the schema of `T`.
    fn chat_request<T: JsonSchema>(
        &self,
        schema_name: &str,
        system: String,
        user: String,
    ) -> ChatRequest {
        ChatRequest {
            model: Some(self.model.clone()),
            messages: vec![Message::system(system), Message::user(user)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: Some(ResponseFormat::schema_of::<T>(schema_name)),
        }
    }

    async fn request<T: JsonSchema>(
        &self,
        schema_name: &str,
        system: String,
        user: String,
    ) -> Result<String, String> {
        let body = self.chat_request::<T>(schema_name, system, user);
        debug!("Enhancement request '{schema_name}' to {}", self.model);
        let completion = self.retry.run(|| self.client.chat(&body)).await?;
        completion
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| "Empty LLM response".to_string())
    }
}

// ── Reply handling ─────────────────────────────────────────────────

/// Strip a Markdown code fence some models wrap JSON in.
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Check `value` against the schema of `T`.
pub fn validate_reply<T: JsonSchema>(value: &serde_json::Value) -> Result<(), String> {
    let schema = json_schema_for::<T>();
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| format!("invalid reply schema: {e}"))?;
    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("  - {}: {e}", e.instance_path()))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "reply did not match the expected schema:\n{}",
            errors.join("\n")
        ))
    }
}

fn parse_checked<T: JsonSchema + DeserializeOwned>(value: serde_json::Value) -> Result<T, String> {
    validate_reply::<T>(&value)?;
    serde_json::from_value(value).map_err(|e| format!("failed to decode reply: {e}"))
}

fn parse_json(content: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(strip_code_fence(content))
        .map_err(|e| format!("reply is not valid JSON: {e}"))
}

/// Parse a `{prompt, negativePrompt}` reply.
pub fn parse_generated_prompt(content: &str) -> Result<GeneratedPrompt, String> {
    parse_checked(parse_json(content)?)
}

/// Parse a design-kit reply. A bare array of entries is accepted as well as
/// the `{"images": [...]}` object.
pub fn parse_design_kit(content: &str) -> Result<Vec<SheetEntry>, String> {
    let value = match parse_json(content)? {
        serde_json::Value::Array(items) => serde_json::json!({ "images": items }),
        other => other,
    };
    let kit: DesignKit = parse_checked(value)?;
    Ok(kit.images)
}

/// Force the anchor label onto the first entry and put the preamble ahead of
/// its prompt. The other entries are left untouched.
pub fn finish_kit(mut entries: Vec<SheetEntry>, preamble: Option<&str>) -> Vec<SheetEntry> {
    if let Some(first) = entries.first_mut() {
        first.label = KIT_ANCHOR_LABEL.to_string();
        if let Some(preamble) = preamble {
            first.prompt = with_preamble(preamble, &first.prompt);
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preamble::ELITE_PREAMBLE;

    #[test]
    fn parses_plain_reply() {
        let reply = parse_generated_prompt(r#"{"prompt":"A knight","negativePrompt":"blur"}"#)
            .unwrap();
        assert_eq!(reply.prompt, "A knight");
        assert_eq!(reply.negative_prompt, "blur");
    }

    #[test]
    fn parses_fenced_reply() {
        let content = "```json\n{\"prompt\":\"A knight\",\"negativePrompt\":\"\"}\n```";
        assert_eq!(parse_generated_prompt(content).unwrap().prompt, "A knight");
    }

    #[test]
    fn schema_violation_is_reported() {
        let err = parse_generated_prompt(r#"{"prompt": 42}"#).unwrap_err();
        assert!(err.contains("did not match"), "{err}");
        assert!(err.contains("/prompt"), "{err}");
    }

    #[test]
    fn missing_prompt_is_rejected() {
        assert!(parse_generated_prompt(r#"{"negativePrompt":"x"}"#).is_err());
    }

    #[test]
    fn not_json_is_rejected() {
        let err = parse_generated_prompt("Sure! Here is your prompt").unwrap_err();
        assert!(err.starts_with("reply is not valid JSON"));
    }

    #[test]
    fn kit_accepts_object_and_array() {
        let object = r#"{"images":[{"label":"A","prompt":"one"},{"label":"B","prompt":"two"}]}"#;
        let array = r#"[{"label":"A","prompt":"one"},{"label":"B","prompt":"two"}]"#;
        assert_eq!(parse_design_kit(object).unwrap().len(), 2);
        assert_eq!(parse_design_kit(array).unwrap()[1].prompt, "two");
    }

    #[test]
    fn kit_entry_without_label_is_rejected() {
        assert!(parse_design_kit(r#"[{"prompt":"one"}]"#).is_err());
    }

    #[test]
    fn finish_kit_touches_first_entry_only() {
        let entries = vec![
            SheetEntry {
                label: "Hero shot".into(),
                prompt: "first".into(),
            },
            SheetEntry {
                label: "RPG TOKEN".into(),
                prompt: "second".into(),
            },
        ];
        let kit = finish_kit(entries, Some(ELITE_PREAMBLE));
        assert_eq!(kit[0].label, KIT_ANCHOR_LABEL);
        assert!(kit[0].prompt.starts_with(ELITE_PREAMBLE));
        assert!(kit[0].prompt.ends_with("\n\nfirst"));
        assert_eq!(kit[1].label, "RPG TOKEN");
        assert_eq!(kit[1].prompt, "second");
    }

    #[test]
    fn finish_kit_handles_empty_reply() {
        assert!(finish_kit(Vec::new(), Some(ELITE_PREAMBLE)).is_empty());
    }

    #[test]
    fn prompt_request_requires_both_keys() {
        let client = OpenRouterClient::new("test-key").unwrap();
        let enhancer = Enhancer::new(client, "test-model");
        let body = enhancer.chat_request::<PromptReply>(
            "generated_prompt",
            "sys".into(),
            "user".into(),
        );
        let json = serde_json::to_value(&body).unwrap();
        let schema = &json["response_format"]["json_schema"]["schema"];
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(
            schema["required"],
            serde_json::json!(["negativePrompt", "prompt"])
        );
    }

    #[test]
    fn code_fence_variants() {
        assert_eq!(strip_code_fence("  {}  "), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json\n[1]\n```\n"), "[1]");
    }
}
