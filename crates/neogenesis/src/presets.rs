//! Curated characters that can be dropped onto any record.
//!
//! A preset is a partial record in the legacy JSON shape. Applying it
//! overwrites the fields it names and leaves the rest of the base alone, so
//! mode flags and the output dialect survive. Placeholder values such as
//! `"None"` clear the base field.

use serde_json::{Value, json};

use crate::params::{CharacterParams, DesignMode};

/// A named partial record.
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: &'static str,
    pub overlay: Value,
}

impl Preset {
    /// Overlay this preset onto `base` and switch to the advanced layout.
    pub fn apply(&self, base: &CharacterParams) -> Result<CharacterParams, String> {
        let mut merged = serde_json::to_value(base)
            .map_err(|e| format!("failed to serialize base params: {e}"))?;
        if let (Some(target), Some(fields)) = (merged.as_object_mut(), self.overlay.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        let mut params: CharacterParams = serde_json::from_value(merged)
            .map_err(|e| format!("failed to apply preset '{}': {e}", self.name))?;
        params.design_mode = DesignMode::Advanced;
        Ok(params)
    }
}

/// All curated presets, in display order.
pub fn presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "CYBER RONIN 2077",
            overlay: json!({
                "race": "Human", "gender": "Female", "age": "Young Adult",
                "role": "Warrior", "subRole": "Cyber-Samurai", "skinTone": "Pale skin",
                "classCategory": "fantasy", "bodyType": "Athletic build",
                "style": "Cyberpunk 2077 art style, hyper-realistic, neon lights, gritty future",
                "setting": "Futuristic Neon City", "background": "Detailed Environment",
                "emotion": "Determined look", "pose": "Dynamic battle stance ready to fight",
                "framing": "Full body shot showing shoes to head",
                "lighting": "Neon Lighting", "atmosphere": "Rainy",
                "colors": ["#00ffff", "#ff00ff"],
                "details": "Wearing a transparent raincoat over cybernetic armor, holding a glowing katana",
                "aspectRatio": "--ar 16:9",
                "hairStyle": "Bob Cut", "hairColors": ["#ff00ff"],
                "eyeFeature": "Cybernetic", "eyeColors": ["#00ffff"],
                "headwear": "None", "upperBody": "Leather Jacket", "lowerBody": "Leggings",
                "footwear": "Sneakers", "heldItem": "Katana",
                "outfitColors": ["#000000", "#FFFF00"]
            }),
        },
        Preset {
            name: "GOTHIC VAMPIRE",
            overlay: json!({
                "race": "Vampire", "gender": "Male", "age": "Ancient",
                "role": "Necromancer", "subRole": "Aristocrat", "skinTone": "Pale skin",
                "classCategory": "fantasy", "bodyType": "Slender build",
                "style": "Gothic Horror, Edgar Allan Poe vibe, dark victorian, melancholic, mist, high contrast",
                "setting": "Ruins", "background": "Detailed Environment",
                "emotion": "Seductive gaze", "pose": "Sitting naturally",
                "framing": "Cowboy Shot", "lighting": "Dramatic", "atmosphere": "Foggy",
                "colors": ["#8b0000", "#000000"],
                "details": "Holding a glass of blood wine, bats flying in background",
                "aspectRatio": "--ar 4:5",
                "hairStyle": "Long Straight", "hairColors": ["#ffffff"],
                "eyeFeature": "Red", "eyeColors": ["#ff0000"],
                "headwear": "None", "fullBody": "Trench Coat", "footwear": "Dress Shoes",
                "heldItem": "Drink", "outfitColors": ["#000000", "#8b0000"]
            }),
        },
        Preset {
            name: "ARCANE BRAWLER",
            overlay: json!({
                "race": "Human", "gender": "Female", "age": "Adult",
                "role": "Warrior", "subRole": "Street Fighter", "skinTone": "Tan skin",
                "classCategory": "fantasy", "bodyType": "Muscular",
                "style": "Arcane TV Show style, painterly 3D texture, Fortiche production artstyle",
                "setting": "Indoor", "background": "Detailed Environment",
                "emotion": "Furious angry expression", "pose": "Combat",
                "framing": "Waist Up", "lighting": "Volumetric", "atmosphere": "Dusty",
                "colors": ["#ff4500", "#1a1a1a"],
                "details": "Neon tattoos glowing, hextech gauntlets",
                "aspectRatio": "--ar 16:9",
                "hairStyle": "Mohawk", "hairColors": ["#ff4500"],
                "eyeFeature": "Glowing", "eyeColors": ["#00ff00"],
                "headwear": "Goggles", "upperBody": "Shirtless/Top", "lowerBody": "Cargo Pants",
                "footwear": "Combat Boots", "heldItem": "Nothing",
                "outfitColors": ["#333333", "#ff4500"]
            }),
        },
    ]
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Case-insensitive lookup. Dashes and underscores match spaces, so
/// `cyber-ronin-2077` finds "CYBER RONIN 2077".
pub fn find_preset(name: &str) -> Option<Preset> {
    let wanted = normalize(name);
    presets().into_iter().find(|p| normalize(p.name) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Dialect, MediaMode};

    #[test]
    fn three_presets() {
        let names: Vec<&str> = presets().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            ["CYBER RONIN 2077", "GOTHIC VAMPIRE", "ARCANE BRAWLER"]
        );
    }

    #[test]
    fn lookup_is_forgiving() {
        assert!(find_preset("gothic vampire").is_some());
        assert!(find_preset("cyber-ronin-2077").is_some());
        assert!(find_preset("arcane_brawler").is_some());
        assert!(find_preset("space pirate").is_none());
    }

    #[test]
    fn apply_keeps_unnamed_fields() {
        let base = CharacterParams {
            mode: MediaMode::Video,
            prompt_format: Dialect::Midjourney,
            action: Some("Running".into()),
            headwear: Some("Crown".into()),
            ..Default::default()
        };
        let params = find_preset("CYBER RONIN 2077").unwrap().apply(&base).unwrap();
        assert_eq!(params.mode, MediaMode::Video);
        assert_eq!(params.prompt_format, Dialect::Midjourney);
        assert_eq!(params.action.as_deref(), Some("Running"));
        assert_eq!(params.design_mode, DesignMode::Advanced);
        assert_eq!(params.race.as_deref(), Some("Human"));
        // "None" in the preset clears the base value.
        assert!(params.headwear.is_none());
        assert_eq!(params.outfit_colors, ["#000000", "#FFFF00"]);
    }

    #[test]
    fn nothing_held_item_is_cleared() {
        let params = find_preset("ARCANE BRAWLER")
            .unwrap()
            .apply(&CharacterParams::default())
            .unwrap();
        assert!(params.held_item.is_none());
        assert_eq!(params.aspect_ratio, "--ar 16:9");
    }
}
