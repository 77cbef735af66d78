//! LLM enhancement of a character record.
//!
//! The local compiler renders a record literally. Enhancement instead hands a
//! structured brief to a hosted model and asks for a richer prompt back, in
//! one of three shapes:
//!
//! - a single enhanced prompt with a negative prompt ([`Enhancer::enhance`])
//! - a seven-image design kit ([`Enhancer::design_kit`])
//! - an inventory sprite sheet prompt ([`Enhancer::inventory`])
//!
//! Replies are requested with a JSON-schema `response_format` and checked
//! against the same schema before deserializing.

pub mod brief;
pub mod client;
pub mod instructions;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::params::{CharacterParams, text};

pub use brief::{Movement, input_brief};
pub use client::Enhancer;
pub use instructions::{
    InstructionBuilder, consistency_phrase, design_kit_instructions, enhance_instructions,
    inventory_instructions,
};

/// Label forced onto the first design-kit entry.
pub const KIT_ANCHOR_LABEL: &str = "Personaje potenciado con IA";

/// An enhanced prompt and the things to keep out of the image.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPrompt {
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: String,
}

/// Reply shape requested from the model. Unlike [`GeneratedPrompt`], both
/// keys are required by its schema; decoding still goes through the lenient
/// type.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PromptReply {
    pub prompt: String,
    pub negative_prompt: String,
}

/// Reject records too empty to enhance.
pub fn validate_for_enhancement(params: &CharacterParams) -> Result<(), String> {
    if text(&params.race).is_none()
        && text(&params.role).is_none()
        && text(&params.details).is_none()
    {
        return Err("Missing essential data (Race/Role).".to_string());
    }
    Ok(())
}
