//! Character-sheet variations.
//!
//! A sheet is a fixed set of labelled prompts that show the same character
//! from several angles. Every variant keeps the identity, outfit and style of
//! the base record, swaps in its own pose, framing and expression, and moves
//! the character into a neutral studio so the renders stay comparable.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::compiler::compile;
use crate::params::{CharacterParams, Dialect, MediaMode};

/// One labelled prompt of a sheet or design kit.
#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq, Eq)]
pub struct SheetEntry {
    /// Short caption, e.g. "Side Profile".
    pub label: String,
    /// Ready-to-paste prompt text.
    pub prompt: String,
}

/// Per-variant overrides.
#[derive(Debug, Clone, Copy)]
pub struct SheetVariant {
    pub label: &'static str,
    /// Used as the pose in image mode and as the action in video mode.
    pub movement: &'static str,
    pub framing: &'static str,
    /// `None` clears the expression (nothing to read from behind).
    pub emotion: Option<&'static str>,
}

pub const SHEET_VARIANTS: [SheetVariant; 6] = [
    SheetVariant {
        label: "Front View",
        movement: "standing straight in a relaxed A-pose, facing the camera",
        framing: "full body shot, front view",
        emotion: Some("neutral expression"),
    },
    SheetVariant {
        label: "Side Profile",
        movement: "standing in strict side profile, facing left",
        framing: "full body shot, side view",
        emotion: Some("calm expression"),
    },
    SheetVariant {
        label: "Back View",
        movement: "standing with the back turned to the camera",
        framing: "full body shot, rear view",
        emotion: None,
    },
    SheetVariant {
        label: "Three-Quarter Portrait",
        movement: "turned three-quarters toward the camera",
        framing: "medium shot, three-quarter view",
        emotion: Some("confident expression"),
    },
    SheetVariant {
        label: "Close-Up",
        movement: "head and shoulders squared to the camera",
        framing: "extreme close-up portrait",
        emotion: Some("intense expression"),
    },
    SheetVariant {
        label: "Action Pose",
        movement: "mid-leap in a dynamic combat stance",
        framing: "full body shot, dynamic low angle",
        emotion: Some("fierce determined expression"),
    },
];

/// Neutral studio shared by every variant.
pub const STUDIO_SETTING: &str = "clean photo studio";
pub const STUDIO_BACKGROUND: &str = "a seamless solid white backdrop";
pub const STUDIO_LIGHTING: &str = "Professional studio lighting";

/// Width of the rule between entries of a rendered bundle.
const RULE_WIDTH: usize = 40;

impl SheetVariant {
    /// The base record with this variant's overrides and the studio applied.
    pub fn apply(&self, base: &CharacterParams) -> CharacterParams {
        let mut params = base.clone();
        match params.mode {
            MediaMode::Image => params.pose = Some(self.movement.to_string()),
            MediaMode::Video => params.action = Some(self.movement.to_string()),
        }
        params.framing = Some(self.framing.to_string());
        params.emotion = self.emotion.map(str::to_string);
        params.setting = Some(STUDIO_SETTING.to_string());
        params.background = Some(STUDIO_BACKGROUND.to_string());
        params.lighting = Some(STUDIO_LIGHTING.to_string());
        params.atmosphere = None;
        params
    }
}

/// Compile every sheet variant of `base`, in [`SHEET_VARIANTS`] order.
pub fn character_sheet(base: &CharacterParams) -> Vec<SheetEntry> {
    SHEET_VARIANTS
        .iter()
        .map(|variant| SheetEntry {
            label: variant.label.to_string(),
            prompt: compile(&variant.apply(base)),
        })
        .collect()
}

/// Render a sheet or kit as one clipboard-ready text block.
pub fn render_bundle(entries: &[SheetEntry], dialect: Dialect) -> String {
    let intro = match dialect {
        Dialect::Midjourney => format!(
            "Here is a list of {} Midjourney prompts. Run them one by one.",
            entries.len()
        ),
        Dialect::Generic => format!(
            "Act as an expert image generator. Create a Character Design Kit of {} images.",
            entries.len()
        ),
    };
    let rule = format!("\n\n{}\n\n", "-".repeat(RULE_WIDTH));
    let body = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("IMAGE {}: [{}]\n{}", i + 1, entry.label, entry.prompt))
        .collect::<Vec<_>>()
        .join(&rule);
    format!("{intro}\n\n{body}")
}
