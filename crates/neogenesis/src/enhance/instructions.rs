//! System instructions for the three enhancement requests.
//!
//! Instructions are assembled with [`InstructionBuilder`]: an opening role
//! statement followed by headed sections, joined with blank lines. Sections
//! whose content is empty are dropped.

use crate::enhance::KIT_ANCHOR_LABEL;
use crate::params::{CharacterParams, Dialect, color_entries, text};

/// Builder for multi-section system instructions.
///
/// ```
/// use neogenesis::enhance::InstructionBuilder;
///
/// let text = InstructionBuilder::new("You are a prompt engineer.")
///     .section("Rules", "Output JSON.")
///     .section_if(false, "Hidden", || "never shown".into())
///     .section_opt("Missing", None::<String>)
///     .build();
///
/// assert_eq!(text, "You are a prompt engineer.\n\n### Rules\nOutput JSON.");
/// ```
pub struct InstructionBuilder {
    sections: Vec<String>,
}

impl InstructionBuilder {
    /// Start with an unheaded role statement.
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            sections: vec![role.into()],
        }
    }

    /// Append `### heading` and its content. Skipped if `content` is empty.
    pub fn section(mut self, heading: &str, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.trim().is_empty() {
            self.sections.push(format!("### {heading}\n{content}"));
        }
        self
    }

    /// Append a section only when `cond` holds. `content` is not evaluated
    /// otherwise.
    pub fn section_if(
        self,
        cond: bool,
        heading: &str,
        content: impl FnOnce() -> String,
    ) -> Self {
        if cond {
            self.section(heading, content())
        } else {
            self
        }
    }

    /// Append a section when `content` is `Some`.
    pub fn section_opt(self, heading: &str, content: Option<impl Into<String>>) -> Self {
        match content {
            Some(c) => self.section(heading, c),
            None => self,
        }
    }

    /// Append unheaded text.
    pub fn raw(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.trim().is_empty() {
            self.sections.push(content);
        }
        self
    }

    pub fn build(self) -> String {
        self.sections.join("\n\n")
    }
}

// ── Single prompt ──────────────────────────────────────────────────

const ENGINEER_ROLE: &str = "You have to act as a senior cinematic prompt engineer for high-end image generation.
Your task is to enhance the prompt by adding relevant details that strengthen the existing concept, character, and visual impact.
You are allowed to enrich the description with elements that logically belong to the character, setting, or art style.
You are NOT allowed to change, remove, or contradict any existing concept.
Do NOT replace the subject, art style, environment, camera framing, or mood.
Do NOT introduce unrelated themes.
All additions must reinforce the original idea.
Improve structure, clarity, artistic language, lighting, texture, and composition.
Preserve the core identity of the prompt at all times.
Return only the improved prompt.";

const FRAMING_RULE: &str = "You MUST strictly adhere to the provided 'Framing' (Camera Shot).
- If input says \"Close-up\", the prompt MUST describe a Close-up.
- If input says \"Full Body\", you MUST ensure the full character is visible.
- Do NOT change the shot type for \"artistic reasons\". The user's choice is final.";

fn dialect_format_rule(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Midjourney => {
            "FORMAT FOR MIDJOURNEY: Start with \"/imagine prompt:\", include descriptive tags, and END with parameters (e.g., --v 6.0 --ar 16:9)."
        }
        Dialect::Generic => {
            "FORMAT FOR GENERIC AI: Use dense, descriptive, high-quality tags separated by commas. No /imagine command. DO NOT USE --ar parameters."
        }
    }
}

/// Instructions for a single enhanced prompt in `dialect`.
pub fn enhance_instructions(dialect: Dialect) -> String {
    InstructionBuilder::new(ENGINEER_ROLE)
        .section("CRITICAL INSTRUCTION: CAMERA FRAMING", FRAMING_RULE)
        .section(
            "FORMATTING RULES",
            format!(
                "1. Output MUST be valid JSON.\n2. {}\n3. Do NOT include any preamble in the JSON output; it is added afterwards.",
                dialect_format_rule(dialect)
            ),
        )
        .build()
}

/// User message closing an enhancement request.
pub fn enhance_request(brief: &str) -> String {
    format!("{brief}\n\nOutput JSON only with keys: \"prompt\", \"negativePrompt\".")
}

// ── Design kit ─────────────────────────────────────────────────────

/// The seven design-kit images and what each must show.
pub const KIT_IMAGES: [(&str, &str); 7] = [
    (KIT_ANCHOR_LABEL, "The main artistic shot."),
    (
        "ARCHITECTURE TRIPTYCH",
        "Front view, Side view, Back view. T-Pose or A-Pose. Wide spacing. Solid White BG.",
    ),
    (
        "ACTION DYNAMICS",
        "3 distinct combat/movement poses. Non-overlapping. Solid White BG.",
    ),
    (
        "EXPRESSION GRID",
        "2x3 grid of facial emotions. Focus on face. Solid White BG.",
    ),
    (
        "RPG TOKEN",
        "Circular or Square framing focused on the head/bust. High contrast.",
    ),
    (
        "GEAR KNOLLING",
        "The character's items (Weapons, Accessories) laid out on a flat surface. Top-down view.",
    ),
    (
        "VICTORY POSE",
        "A full-body heroic pose showing the character in their prime.",
    ),
];

/// `Character consistency: <race role gender>, <hair>, <skin>, <outfit colors> outfit`.
///
/// Blank pieces are skipped so the phrase never carries empty slots.
pub fn consistency_phrase(p: &CharacterParams) -> String {
    let words = |parts: &[Option<&str>], sep: &str| -> Option<String> {
        let parts: Vec<&str> = parts.iter().flatten().copied().collect();
        (!parts.is_empty()).then(|| parts.join(sep))
    };
    let identity = words(&[text(&p.race), text(&p.role), text(&p.gender)], " ");
    let hair_colors: Vec<&str> = color_entries(&p.hair_colors).collect();
    let hair_colors = (!hair_colors.is_empty()).then(|| hair_colors.join("&"));
    let hair = words(&[hair_colors.as_deref(), text(&p.hair_style)], " ");
    let outfit: Vec<&str> = color_entries(&p.outfit_colors).collect();
    let outfit = (!outfit.is_empty()).then(|| format!("{} outfit", outfit.join("&")));

    let pieces = words(
        &[
            identity.as_deref(),
            hair.as_deref(),
            text(&p.skin_tone),
            outfit.as_deref(),
        ],
        ", ",
    );
    match pieces {
        Some(pieces) => format!("Character consistency: {pieces}"),
        None => "Character consistency: same character in every image".to_string(),
    }
}

/// Instructions for the seven-image design kit of `p`.
pub fn design_kit_instructions(p: &CharacterParams) -> String {
    let dialect_rules = match p.prompt_format {
        Dialect::Midjourney => {
            "- Start prompts with \"/imagine prompt:\"\n- End with parameters (e.g. --v 6.0 --ar X:Y)"
        }
        Dialect::Generic => {
            "- Use descriptive natural language tags.\n- **FORBIDDEN:** Do NOT use \"--ar\" parameters in Generic Mode. Instead, use words like \"Vertical format\", \"Square format\", \"Wide format\"."
        }
    };
    let image_list = KIT_IMAGES
        .iter()
        .enumerate()
        .map(|(i, (label, what))| format!("{}. **\"{label}\"**: {what}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    InstructionBuilder::new(
        "You are the \"Director of Character Consistency\" for a Concept Art studio.\n\
         Your goal is to generate a JSON object whose \"images\" array holds 7 prompts based on the Input Data.",
    )
    .section(
        "STRATEGY: ABSOLUTE CONSISTENCY",
        format!(
            "**PROMPT 1: THE ANCHOR (\"{KIT_ANCHOR_LABEL}\")**\n\
             - This is the Masterpiece. Use the exact Lighting, Framing, and Style requested.\n\
             - This defines the Source of Truth for the character's look.\n\n\
             **PROMPTS 2-7: THE VARIATIONS (Consistency Mode)**\n\
             - In EVERY prompt from 2 to 7, describe the character again so no new person is invented.\n\
             - **MANDATORY INJECTION:** include this phrase in prompts 2-7: \"{}\".\n\
             - Do NOT rely on \"same character as above\".\n\
             - Change only the pose, framing, and action suitable for the specific sheet type.\n\
             - **SAFETY MARGINS:** For sheets (Arch, Action, Expressions), figures must NOT touch. Use \"Solid White Background\".",
            consistency_phrase(p)
        ),
    )
    .section("FORMATTING RULES (STRICT)", dialect_rules)
    .section("THE 7 REQUIRED PROMPTS", image_list)
    .build()
}

/// User message closing a design-kit request.
pub fn design_kit_request(brief: &str) -> String {
    format!("{brief}\n\nGenerate the 7-Prompt Design Kit. Output JSON only.")
}

// ── Inventory ──────────────────────────────────────────────────────

/// Aspect code the inventory sheet uses in the Midjourney dialect.
pub const INVENTORY_ASPECT: &str = "--ar 3:2";

/// Instructions for an inventory sprite sheet of `p`.
pub fn inventory_instructions(p: &CharacterParams) -> String {
    let owner = [text(&p.race), text(&p.role)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let items = [
        text(&p.held_item),
        text(&p.headwear),
        text(&p.footwear),
        text(&p.class_extras),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");
    let palette = color_entries(&p.outfit_colors).collect::<Vec<_>>().join(" and ");
    let format = match p.prompt_format {
        Dialect::Midjourney => format!("/imagine prompt: ... {INVENTORY_ASPECT}"),
        Dialect::Generic => "Detailed description without --ar parameters".to_string(),
    };

    InstructionBuilder::new(
        "You are a video game asset designer.\n\
         Generate an inventory sheet (sprite sheet, knolling style) for the character described below.",
    )
    .section_if(!owner.is_empty(), "Character", || owner.clone())
    .section_opt("Style", text(&p.style))
    .section("Key Items", items)
    .section("Item Palette", palette)
    .section(
        "Layout",
        "Background: Solid White. Objects separated, none overlapping.",
    )
    .section("Format", format)
    .raw("OUTPUT ENGLISH. Output JSON only with keys: \"prompt\", \"negativePrompt\".")
    .build()
}

/// User message for an inventory request.
pub const INVENTORY_REQUEST: &str = "Generate the inventory prompt.";
