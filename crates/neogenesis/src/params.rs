//! The character parameter record and its mode enums.
//!
//! [`CharacterParams`] is the single input of the prompt compiler. Every text
//! attribute is optional: omission is structural rather than a magic string.
//! The JSON shape is the camelCase one produced by the legacy web form, and the
//! [`legacy`] shim folds that form's placeholder values (`""`, `"None"`,
//! `"Nothing"`) into `None` while deserializing, so old exports load as-is.

use serde::{Deserialize, Serialize};

/// Default aspect-ratio code for a fresh record.
pub const DEFAULT_ASPECT_RATIO: &str = "--ar 16:9";

/// Placeholder strings the legacy form used for "not set".
pub const SENTINELS: [&str; 2] = ["None", "Nothing"];

/// Target medium. Decides which movement field feeds the action clause.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaMode {
    #[default]
    Image,
    Video,
}

/// Output dialect of the compiled prompt.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `/imagine prompt: ... --ar W:H --v 6.0`
    Midjourney,
    /// Comma-separated natural-language tags, no `--` flags.
    #[default]
    Generic,
}

impl Dialect {
    /// Human-readable target name used in enhancement briefs.
    pub fn target_name(self) -> &'static str {
        match self {
            Dialect::Midjourney => "Midjourney v6",
            Dialect::Generic => "Generic/Stable Diffusion",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Midjourney => write!(f, "midjourney"),
            Dialect::Generic => write!(f, "generic"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "midjourney" | "mj" => Ok(Dialect::Midjourney),
            "generic" | "sd" => Ok(Dialect::Generic),
            other => Err(format!(
                "unknown prompt format '{other}' (expected midjourney or generic)"
            )),
        }
    }
}

impl std::str::FromStr for MediaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(MediaMode::Image),
            "video" => Ok(MediaMode::Video),
            other => Err(format!("unknown media mode '{other}' (expected image or video)")),
        }
    }
}

/// Form layout the record was edited in. Carried for round-tripping only.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DesignMode {
    #[default]
    Quick,
    Advanced,
}

/// Which role catalogue the primary role was picked from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassCategory {
    #[default]
    Fantasy,
    Realistic,
}

impl std::fmt::Display for ClassCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassCategory::Fantasy => write!(f, "fantasy"),
            ClassCategory::Realistic => write!(f, "realistic"),
        }
    }
}

/// Full attribute record for one character.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterParams {
    // ── Mode flags ─────────────────────────────────────────────────
    pub mode: MediaMode,
    pub prompt_format: Dialect,
    pub design_mode: DesignMode,

    // ── Identity ───────────────────────────────────────────────────
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub race: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<String>,
    pub class_category: ClassCategory,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub secondary_role: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_role: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub body_type: Option<String>,

    // ── Head & face ────────────────────────────────────────────────
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub skin_tone: Option<String>,
    #[serde(
        deserialize_with = "legacy::colors",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub skin_color: Vec<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub hair_style: Option<String>,
    #[serde(
        deserialize_with = "legacy::colors",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub hair_colors: Vec<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub eye_feature: Option<String>,
    #[serde(
        deserialize_with = "legacy::colors",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub eye_colors: Vec<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub denture: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub nose_shape: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub face_markings: Option<String>,

    // ── Outfit & gear ──────────────────────────────────────────────
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub headwear: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub upper_body: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub lower_body: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_body: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub footwear: Option<String>,
    #[serde(
        deserialize_with = "legacy::colors",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub outfit_colors: Vec<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub held_item: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub class_extras: Option<String>,

    // ── Expression & movement ──────────────────────────────────────
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub emotion: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub pose: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<String>,

    // ── Composition ────────────────────────────────────────────────
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub style: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub setting: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub background: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub framing: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub lighting: Option<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub atmosphere: Option<String>,
    #[serde(
        deserialize_with = "legacy::colors",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub colors: Vec<String>,
    #[serde(
        deserialize_with = "legacy::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<String>,
    /// Verbatim aspect-ratio code, e.g. `--ar 16:9`.
    pub aspect_ratio: String,
}

impl Default for CharacterParams {
    fn default() -> Self {
        Self {
            mode: MediaMode::default(),
            prompt_format: Dialect::default(),
            design_mode: DesignMode::default(),
            race: None,
            gender: None,
            age: None,
            class_category: ClassCategory::default(),
            role: None,
            secondary_role: None,
            sub_role: None,
            body_type: None,
            skin_tone: None,
            skin_color: Vec::new(),
            hair_style: None,
            hair_colors: Vec::new(),
            eye_feature: None,
            eye_colors: Vec::new(),
            denture: None,
            nose_shape: None,
            face_markings: None,
            headwear: None,
            upper_body: None,
            lower_body: None,
            full_body: None,
            footwear: None,
            outfit_colors: Vec::new(),
            held_item: None,
            class_extras: None,
            emotion: None,
            pose: None,
            action: None,
            style: None,
            setting: None,
            background: None,
            framing: None,
            lighting: None,
            atmosphere: None,
            colors: Vec::new(),
            details: None,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }
}

impl CharacterParams {
    /// Parse a record from JSON, accepting the legacy form's sentinels.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("failed to parse character params: {e}"))
    }

    /// The movement descriptor for the current medium: pose for images,
    /// action for video. The other field is ignored.
    pub fn movement(&self) -> Option<&str> {
        match self.mode {
            MediaMode::Image => text(&self.pose),
            MediaMode::Video => text(&self.action),
        }
    }

    /// The aspect-ratio code, or `None` when blank.
    pub fn aspect_code(&self) -> Option<&str> {
        let code = self.aspect_ratio.trim();
        (!code.is_empty()).then_some(code)
    }

    /// Every free-text attribute, in declaration order.
    pub fn text_fields_mut(&mut self) -> [&mut Option<String>; 30] {
        [
            &mut self.race,
            &mut self.gender,
            &mut self.age,
            &mut self.role,
            &mut self.secondary_role,
            &mut self.sub_role,
            &mut self.body_type,
            &mut self.skin_tone,
            &mut self.hair_style,
            &mut self.eye_feature,
            &mut self.denture,
            &mut self.nose_shape,
            &mut self.face_markings,
            &mut self.headwear,
            &mut self.upper_body,
            &mut self.lower_body,
            &mut self.full_body,
            &mut self.footwear,
            &mut self.held_item,
            &mut self.class_extras,
            &mut self.emotion,
            &mut self.pose,
            &mut self.action,
            &mut self.style,
            &mut self.setting,
            &mut self.background,
            &mut self.framing,
            &mut self.lighting,
            &mut self.atmosphere,
            &mut self.details,
        ]
    }

    /// Every color list, in declaration order.
    pub fn color_lists_mut(&mut self) -> [&mut Vec<String>; 5] {
        [
            &mut self.skin_color,
            &mut self.hair_colors,
            &mut self.eye_colors,
            &mut self.outfit_colors,
            &mut self.colors,
        ]
    }
}

/// Whether a raw value is one of the legacy "not set" placeholders.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || SENTINELS.contains(&trimmed)
}

/// Read an optional attribute, treating blanks and placeholders as absent.
///
/// Records built in code can still carry `Some("")` or `Some("None")`; every
/// read in the compiler goes through here so those never reach the output.
pub fn text(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|v| !is_placeholder(v))
        .map(str::trim)
}

/// Non-blank entries of a color list, in order.
pub fn color_entries(colors: &[String]) -> impl Iterator<Item = &str> {
    colors.iter().map(|c| c.trim()).filter(|c| !c.is_empty())
}

/// Deserialization shim for records exported by the legacy web form.
pub mod legacy {
    use serde::{Deserialize, Deserializer};

    use super::is_placeholder;

    /// Optional text: `null`, blanks, `"None"` and `"Nothing"` become `None`.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .filter(|v| !is_placeholder(v))
            .map(|v| v.trim().to_string()))
    }

    /// Color list: `null` becomes empty, blank entries are dropped.
    pub fn colors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Vec<String>>::deserialize(deserializer)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_fresh_form() {
        let params = CharacterParams::default();
        assert_eq!(params.mode, MediaMode::Image);
        assert_eq!(params.prompt_format, Dialect::Generic);
        assert_eq!(params.aspect_ratio, "--ar 16:9");
        assert!(params.race.is_none());
        assert!(params.colors.is_empty());
    }

    #[test]
    fn legacy_sentinels_become_none() {
        let json = r##"{
            "race": "Elf",
            "faceMarkings": "None",
            "heldItem": "Nothing",
            "fullBody": "",
            "headwear": "   ",
            "hairColors": ["#ff00ff", ""]
        }"##;
        let params = CharacterParams::from_json(json).unwrap();
        assert_eq!(params.race.as_deref(), Some("Elf"));
        assert!(params.face_markings.is_none());
        assert!(params.held_item.is_none());
        assert!(params.full_body.is_none());
        assert!(params.headwear.is_none());
        assert_eq!(params.hair_colors, vec!["#ff00ff".to_string()]);
    }

    #[test]
    fn legacy_null_fields_accepted() {
        let json = r#"{"race": null, "skinColor": null, "mode": "video"}"#;
        let params = CharacterParams::from_json(json).unwrap();
        assert!(params.race.is_none());
        assert!(params.skin_color.is_empty());
        assert_eq!(params.mode, MediaMode::Video);
    }

    #[test]
    fn serializes_camel_case_and_skips_absent() {
        let params = CharacterParams {
            secondary_role: Some("Rogue".into()),
            prompt_format: Dialect::Midjourney,
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["secondaryRole"], "Rogue");
        assert_eq!(json["promptFormat"], "midjourney");
        assert!(json.get("race").is_none());
        assert!(json.get("hairColors").is_none());
    }

    #[test]
    fn movement_is_mode_gated() {
        let mut params = CharacterParams {
            pose: Some("Sitting naturally".into()),
            action: Some("Running fast".into()),
            ..Default::default()
        };
        assert_eq!(params.movement(), Some("Sitting naturally"));
        params.mode = MediaMode::Video;
        assert_eq!(params.movement(), Some("Running fast"));
    }

    #[test]
    fn text_filters_placeholders_built_in_code() {
        assert_eq!(text(&Some("None".into())), None);
        assert_eq!(text(&Some("Nothing".into())), None);
        assert_eq!(text(&Some("  ".into())), None);
        assert_eq!(text(&Some(" Mage ".into())), Some("Mage"));
        assert_eq!(text(&None), None);
    }

    #[test]
    fn text_fields_cover_every_attribute() {
        let mut params = CharacterParams::default();
        for field in params.text_fields_mut() {
            *field = Some("x".into());
        }
        for list in params.color_lists_mut() {
            list.push("red".into());
        }
        let json = serde_json::to_value(&params).unwrap();
        let set = json
            .as_object()
            .unwrap()
            .values()
            .filter(|v| **v == serde_json::json!("x") || **v == serde_json::json!(["red"]))
            .count();
        assert_eq!(set, 35);
    }

    #[test]
    fn dialect_parses_from_cli_strings() {
        assert_eq!("MidJourney".parse::<Dialect>(), Ok(Dialect::Midjourney));
        assert_eq!("generic".parse::<Dialect>(), Ok(Dialect::Generic));
        assert!("dalle".parse::<Dialect>().is_err());
    }
}
