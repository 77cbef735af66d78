//! Clause builders of a compiled prompt.
//!
//! Each builder reads the record and returns its clause, or `None` when every
//! field it covers is unset. Dialect assembly only decides how the surviving
//! clauses are glued together.

use super::colors::joined;
use crate::params::{CharacterParams, color_entries, text};

/// A clause builder.
pub type SegmentBuilder = fn(&CharacterParams) -> Option<String>;

/// Builders in output order, named for diagnostics.
pub const SEGMENTS: [(&str, SegmentBuilder); 5] = [
    ("subject", subject),
    ("outfit", outfit),
    ("action", action),
    ("environment", environment),
    ("style", style),
];

/// Accumulates pieces of one clause. A separator is only written between two
/// pieces, never before the first.
#[derive(Default)]
struct Clause(String);

impl Clause {
    fn chain(&mut self, sep: &str, piece: &str) {
        if !self.0.is_empty() {
            self.0.push_str(sep);
        }
        self.0.push_str(piece);
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn finish(self) -> Option<String> {
        (!self.0.is_empty()).then_some(self.0)
    }
}

// ── Subject ────────────────────────────────────────────────────────

/// Primary role, compounded with the secondary role and sub-role.
pub fn role_phrase(p: &CharacterParams) -> Option<String> {
    let base = match (text(&p.role), text(&p.secondary_role)) {
        (Some(role), Some(second)) => Some(format!("{role} / {second} Hybrid")),
        (Some(role), None) => Some(role.to_string()),
        (None, second) => second.map(str::to_string),
    };
    match (base, text(&p.sub_role)) {
        (Some(base), Some(sub)) => Some(format!("{base} ({sub})")),
        (None, Some(sub)) => Some(format!("({sub})")),
        (base, None) => base,
    }
}

/// `A <age> <gender> <race> <role>`.
pub fn identity(p: &CharacterParams) -> Option<String> {
    let role = role_phrase(p);
    let words: Vec<&str> = [
        text(&p.age),
        text(&p.gender),
        text(&p.race),
        role.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    (!words.is_empty()).then(|| format!("A {}", words.join(" ")))
}

/// Physical trait fragments in fixed order.
pub fn physical_traits(p: &CharacterParams) -> Vec<String> {
    let mut traits = Vec::new();

    match (joined(&p.skin_color), text(&p.skin_tone)) {
        (Some(colors), tone) => traits.push(format!("with {colors} {}", tone.unwrap_or("skin"))),
        (None, Some(tone)) => traits.push(format!("with {tone}")),
        (None, None) => {}
    }

    match (joined(&p.hair_colors), text(&p.hair_style)) {
        (Some(colors), Some(style)) => traits.push(format!("has {colors} {style} hair")),
        (None, Some(style)) => traits.push(format!("has {style} hair")),
        (Some(colors), None) => traits.push(format!("has {colors} hair")),
        (None, None) => {}
    }

    match (joined(&p.eye_colors), text(&p.eye_feature)) {
        (Some(colors), feature) => traits.push(format!("{colors} {}", feature.unwrap_or("eyes"))),
        (None, Some(feature)) => traits.push(feature.to_string()),
        (None, None) => {}
    }

    for field in [&p.denture, &p.nose_shape, &p.face_markings, &p.body_type] {
        if let Some(value) = text(field) {
            traits.push(value.to_string());
        }
    }
    traits
}

/// Identity followed by the physical traits, comma separated.
pub fn subject(p: &CharacterParams) -> Option<String> {
    let mut clause = Clause::default();
    if let Some(identity) = identity(p) {
        clause.chain(", ", &identity);
    }
    for t in physical_traits(p) {
        clause.chain(", ", &t);
    }
    clause.finish()
}

// ── Outfit ─────────────────────────────────────────────────────────

/// Garments and gear, tinted by the outfit colors, then the held item.
pub fn outfit(p: &CharacterParams) -> Option<String> {
    let mut clause = Clause::default();

    if let Some(headwear) = text(&p.headwear) {
        clause.chain(", ", &format!("wearing a {headwear}"));
    }
    if let Some(full) = text(&p.full_body) {
        clause.chain(", ", &format!("dressed in a {full}"));
    } else {
        let upper = text(&p.upper_body).map(|u| format!("a {u}"));
        let pieces: Vec<&str> = [upper.as_deref(), text(&p.lower_body)]
            .into_iter()
            .flatten()
            .collect();
        if !pieces.is_empty() {
            clause.chain(", ", &format!("wearing {}", pieces.join(" and ")));
        }
    }
    if let Some(footwear) = text(&p.footwear) {
        clause.chain(", ", &format!("with {footwear}"));
    }
    if let Some(extras) = text(&p.class_extras) {
        clause.chain(", ", &format!("equipped with {extras}"));
    }

    if !clause.is_empty()
        && let Some(colors) = joined(&p.outfit_colors)
    {
        clause.0.push_str(&format!(" (colored in {colors})"));
    }

    if let Some(item) = text(&p.held_item) {
        clause.chain(", ", &format!("holding a {item}"));
    }
    clause.finish()
}

// ── Action ─────────────────────────────────────────────────────────

/// `looking <emotion>, while <movement>`.
pub fn action(p: &CharacterParams) -> Option<String> {
    let mut clause = Clause::default();
    if let Some(emotion) = text(&p.emotion) {
        clause.chain(", ", &format!("looking {emotion}"));
    }
    if let Some(movement) = p.movement() {
        clause.chain(", ", &format!("while {movement}"));
    }
    clause.finish()
}

// ── Environment ────────────────────────────────────────────────────

/// Background choices that mean "let the setting speak" and never render.
fn is_implicit_background(background: &str) -> bool {
    let lower = background.to_lowercase();
    lower.contains("detailed") || lower == "default"
}

/// Setting, background, lighting and atmosphere.
pub fn environment(p: &CharacterParams) -> Option<String> {
    let mut clause = Clause::default();
    if let Some(setting) = text(&p.setting) {
        clause.chain(", ", &format!("in a {setting}"));
    }
    if let Some(background) = text(&p.background).filter(|b| !is_implicit_background(b)) {
        clause.chain(", ", &format!("with {background}"));
    }
    if let Some(lighting) = text(&p.lighting) {
        clause.chain(". ", &format!("The scene is illuminated by {lighting}"));
    }
    if let Some(atmosphere) = text(&p.atmosphere) {
        clause.chain(", ", &format!("creating a {atmosphere}"));
    }
    clause.finish()
}

// ── Style ──────────────────────────────────────────────────────────

/// Art style, framing and free-text details, without the palette.
fn style_body(p: &CharacterParams) -> Option<String> {
    let mut clause = Clause::default();
    if let Some(style) = text(&p.style) {
        clause.chain("", &format!("Artstyle: {style}"));
    }
    if let Some(framing) = text(&p.framing) {
        let piece = if clause.is_empty() {
            format!("Shot as {framing}")
        } else {
            format!("shot as {framing}")
        };
        clause.chain(", ", &piece);
    }
    if let Some(details) = text(&p.details) {
        clause.chain(". ", &format!("Extra details: {details}"));
    }
    clause.finish()
}

/// `Overall Palette: <every color>`.
pub fn palette(p: &CharacterParams) -> Option<String> {
    let colors: Vec<&str> = color_entries(&p.colors).collect();
    (!colors.is_empty()).then(|| format!("Overall Palette: {}", colors.join(", ")))
}

/// Style clause closed by the global palette.
pub fn style(p: &CharacterParams) -> Option<String> {
    match (style_body(p), palette(p)) {
        (Some(body), Some(palette)) => Some(format!("{body}. {palette}")),
        (body, palette) => body.or(palette),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MediaMode;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn identity_orders_adjectives() {
        let p = CharacterParams {
            race: s("Elf"),
            gender: s("Female"),
            age: s("Young Adult"),
            role: s("Mage"),
            ..Default::default()
        };
        assert_eq!(subject(&p).unwrap(), "A Young Adult Female Elf Mage");
    }

    #[test]
    fn hybrid_and_sub_role() {
        let p = CharacterParams {
            role: s("Warrior"),
            secondary_role: s("Rogue"),
            sub_role: s("Berserker"),
            ..Default::default()
        };
        assert_eq!(
            role_phrase(&p).unwrap(),
            "Warrior / Rogue Hybrid (Berserker)"
        );
    }

    #[test]
    fn secondary_without_primary_stands_alone() {
        let p = CharacterParams {
            secondary_role: s("Rogue"),
            ..Default::default()
        };
        assert_eq!(role_phrase(&p).unwrap(), "Rogue");
    }

    #[test]
    fn traits_without_identity_have_no_article() {
        let p = CharacterParams {
            skin_tone: s("Pale porcelain skin"),
            body_type: s("Athletic build"),
            ..Default::default()
        };
        assert_eq!(
            subject(&p).unwrap(),
            "with Pale porcelain skin, Athletic build"
        );
    }

    #[test]
    fn colored_traits() {
        let p = CharacterParams {
            race: s("Orc"),
            skin_color: vec!["green".into()],
            hair_colors: vec!["#000000".into(), "#FFFF00".into()],
            hair_style: s("Mohawk"),
            eye_colors: vec!["red".into()],
            ..Default::default()
        };
        assert_eq!(
            subject(&p).unwrap(),
            "A Orc, with green skin, has two-toned #000000 and #FFFF00 Mohawk hair, red eyes"
        );
    }

    #[test]
    fn full_body_wins_over_separates() {
        let p = CharacterParams {
            full_body: s("Samurai Armor"),
            upper_body: s("Leather Jacket"),
            lower_body: s("Cargo Pants"),
            ..Default::default()
        };
        let clause = outfit(&p).unwrap();
        assert_eq!(clause, "dressed in a Samurai Armor");
    }

    #[test]
    fn separates_and_tint() {
        let p = CharacterParams {
            headwear: s("Hood"),
            upper_body: s("Leather Jacket"),
            lower_body: s("Cargo Pants"),
            footwear: s("Combat Boots"),
            outfit_colors: vec!["black".into()],
            held_item: s("Katana"),
            ..Default::default()
        };
        assert_eq!(
            outfit(&p).unwrap(),
            "wearing a Hood, wearing a Leather Jacket and Cargo Pants, with Combat Boots (colored in black), holding a Katana"
        );
    }

    #[test]
    fn held_item_alone_has_no_leading_comma() {
        let p = CharacterParams {
            held_item: s("Staff"),
            outfit_colors: vec!["red".into()],
            ..Default::default()
        };
        assert_eq!(outfit(&p).unwrap(), "holding a Staff");
    }

    #[test]
    fn action_uses_mode_movement() {
        let mut p = CharacterParams {
            emotion: s("Angry"),
            pose: s("Kneeling"),
            action: s("Sprinting"),
            ..Default::default()
        };
        assert_eq!(action(&p).unwrap(), "looking Angry, while Kneeling");
        p.mode = MediaMode::Video;
        p.emotion = None;
        assert_eq!(action(&p).unwrap(), "while Sprinting");
    }

    #[test]
    fn environment_full_chain() {
        let p = CharacterParams {
            setting: s("Neon City"),
            background: s("Bokeh"),
            lighting: s("Neon Lights"),
            atmosphere: s("moody atmosphere"),
            ..Default::default()
        };
        assert_eq!(
            environment(&p).unwrap(),
            "in a Neon City, with Bokeh. The scene is illuminated by Neon Lights, creating a moody atmosphere"
        );
    }

    #[test]
    fn environment_skips_detailed_background() {
        let p = CharacterParams {
            background: s("Detailed Environment"),
            lighting: s("Moonlight"),
            ..Default::default()
        };
        assert_eq!(
            environment(&p).unwrap(),
            "The scene is illuminated by Moonlight"
        );
    }

    #[test]
    fn background_without_setting() {
        let p = CharacterParams {
            background: s("Solid Color"),
            ..Default::default()
        };
        assert_eq!(environment(&p).unwrap(), "with Solid Color");
    }

    #[test]
    fn style_and_palette() {
        let p = CharacterParams {
            style: s("Anime"),
            framing: s("Close-up"),
            details: s("rain"),
            colors: vec!["red".into(), "gold".into(), "black".into()],
            ..Default::default()
        };
        assert_eq!(
            style(&p).unwrap(),
            "Artstyle: Anime, shot as Close-up. Extra details: rain. Overall Palette: red, gold, black"
        );
    }

    #[test]
    fn framing_alone_is_capitalized() {
        let p = CharacterParams {
            framing: s("Wide shot"),
            ..Default::default()
        };
        assert_eq!(style(&p).unwrap(), "Shot as Wide shot");
    }

    #[test]
    fn palette_alone() {
        let p = CharacterParams {
            colors: vec!["teal".into(), "".into(), "orange".into()],
            ..Default::default()
        };
        assert_eq!(style(&p).unwrap(), "Overall Palette: teal, orange");
    }

    #[test]
    fn empty_record_has_no_segments() {
        let p = CharacterParams::default();
        for (name, build) in SEGMENTS {
            assert_eq!(build(&p), None, "segment {name} should be empty");
        }
    }
}
