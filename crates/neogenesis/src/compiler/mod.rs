//! Local prompt compiler.
//!
//! Turns a [`CharacterParams`] record into a prompt string for an image or
//! video generator. The compiler is a pure function: no I/O, no randomness, no
//! logging. Two dialects are supported:
//!
//! - **Midjourney**: `/imagine prompt: <clauses joined by ". "> --ar W:H --v 6.0`
//! - **Generic**: clauses, an aspect-ratio phrase and a quality-tag bundle,
//!   all comma separated, with no `--` flags anywhere.
//!
//! Clauses come from the ordered builders in [`segments::SEGMENTS`]. Callers
//! that want an instructional preamble compose it themselves with
//! [`crate::preamble::with_preamble`].

pub mod aspect;
pub mod colors;
pub mod quality;
pub mod segments;

pub use aspect::natural_aspect;
pub use colors::join_colors;
pub use quality::quality_tags;

use crate::params::{CharacterParams, Dialect, text};

/// Midjourney command prefix.
pub const MJ_PREFIX: &str = "/imagine prompt:";

/// Midjourney model flag closing every command.
pub const MJ_VERSION: &str = "--v 6.0";

/// Compile in the dialect selected by `params.prompt_format`.
pub fn compile(params: &CharacterParams) -> String {
    compile_as(params, params.prompt_format)
}

/// Compile in an explicit dialect, ignoring `params.prompt_format`.
pub fn compile_as(params: &CharacterParams, dialect: Dialect) -> String {
    match dialect {
        Dialect::Midjourney => midjourney(params),
        Dialect::Generic => generic(params),
    }
}

/// Every non-empty clause, in order.
pub fn clauses(params: &CharacterParams) -> Vec<String> {
    segments::SEGMENTS
        .iter()
        .filter_map(|(_, build)| build(params))
        .collect()
}

fn midjourney(params: &CharacterParams) -> String {
    let core = clauses(params).join(". ");
    let mut parts = vec![MJ_PREFIX];
    if !core.is_empty() {
        parts.push(core.as_str());
    }
    if let Some(code) = params.aspect_code() {
        parts.push(code);
    }
    parts.push(MJ_VERSION);
    collapse_periods(&parts.join(" "))
}

fn generic(params: &CharacterParams) -> String {
    let params = without_flags(params);
    let aspect = params.aspect_code().and_then(natural_aspect);
    let tags = quality_tags(text(&params.style));

    clauses(&params)
        .into_iter()
        .chain(aspect.map(str::to_string))
        .chain(std::iter::once(tags.to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A copy of `params` with [`strip_flags`] applied to every text value and
/// color entry. A value left empty becomes absent, so its clause label is
/// never rendered.
pub fn without_flags(params: &CharacterParams) -> CharacterParams {
    let mut clean = params.clone();
    for field in clean.text_fields_mut() {
        if let Some(value) = field.as_deref()
            && value.contains("--")
        {
            let stripped = strip_flags(value);
            *field = (!stripped.is_empty()).then_some(stripped);
        }
    }
    for list in clean.color_lists_mut() {
        list.retain_mut(|color| {
            if color.contains("--") {
                *color = strip_flags(color);
            }
            !color.is_empty()
        });
    }
    clean
}

/// Collapse `..` and ` .` until neither remains.
pub fn collapse_periods(prompt: &str) -> String {
    let mut out = prompt.to_string();
    while out.contains("..") || out.contains(" .") {
        out = out.replace("..", ".").replace(" .", ".");
    }
    out
}

/// Drop `--flag` tokens together with their argument, then fold any dash
/// run left inside a word to a single dash.
///
/// The argument is the token right after the flag unless that token is
/// itself a flag. Free text can carry Midjourney flags pasted by the user;
/// generic targets would read them as literal text.
pub fn strip_flags(value: &str) -> String {
    if !value.contains("--") {
        return value.trim().to_string();
    }
    let mut kept = Vec::new();
    let mut tokens = value.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        if token.starts_with("--") {
            tokens.next_if(|next| !next.starts_with("--"));
        } else {
            kept.push(token);
        }
    }
    let mut out = kept.join(" ");
    while out.contains("--") {
        out = out.replace("--", "-");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MediaMode;

    fn elf_mage(dialect: Dialect) -> CharacterParams {
        CharacterParams {
            race: Some("Elf".into()),
            gender: Some("Female".into()),
            age: Some("Young Adult".into()),
            role: Some("Mage".into()),
            emotion: Some("Stoic expression".into()),
            pose: Some("Sitting naturally".into()),
            style: Some(
                "Studio Ghibli art style, watercolor backgrounds, high quality anime".into(),
            ),
            aspect_ratio: "--ar 16:9".into(),
            prompt_format: dialect,
            ..Default::default()
        }
    }

    #[test]
    fn midjourney_scenario() {
        let out = compile(&elf_mage(Dialect::Midjourney));
        assert!(out.starts_with("/imagine prompt: A Young Adult Female Elf Mage"));
        assert!(out.ends_with("--ar 16:9 --v 6.0"));
        assert!(out.contains("looking Stoic expression, while Sitting naturally"));
        assert!(!out.contains("widescreen"));
    }

    #[test]
    fn generic_scenario() {
        let out = compile(&elf_mage(Dialect::Generic));
        assert!(out.starts_with("A Young Adult Female Elf Mage, looking Stoic expression"));
        assert!(out.contains("cinematic widescreen 16:9 format"));
        assert!(out.contains("pixiv top tier"));
        assert!(!out.contains("--"));
    }

    #[test]
    fn compile_as_overrides_format() {
        let params = elf_mage(Dialect::Generic);
        assert!(compile_as(&params, Dialect::Midjourney).starts_with(MJ_PREFIX));
    }

    #[test]
    fn empty_record_midjourney() {
        let params = CharacterParams {
            prompt_format: Dialect::Midjourney,
            ..Default::default()
        };
        assert_eq!(compile(&params), "/imagine prompt: --ar 16:9 --v 6.0");
    }

    #[test]
    fn empty_record_generic() {
        assert_eq!(
            compile(&CharacterParams::default()),
            "cinematic widescreen 16:9 format, masterpiece, best quality, ultra-detailed, sharp focus, 8k"
        );
    }

    #[test]
    fn blank_aspect_code_is_omitted() {
        let params = CharacterParams {
            prompt_format: Dialect::Midjourney,
            aspect_ratio: "  ".into(),
            race: Some("Dwarf".into()),
            ..Default::default()
        };
        assert_eq!(compile(&params), "/imagine prompt: A Dwarf --v 6.0");
    }

    #[test]
    fn unknown_aspect_dropped_in_generic() {
        let params = CharacterParams {
            aspect_ratio: "--ar 3:2".into(),
            race: Some("Dwarf".into()),
            style: Some("Pixar".into()),
            ..Default::default()
        };
        assert_eq!(
            compile(&params),
            "A Dwarf, Artstyle: Pixar, unreal engine 5 render, octane render, 8k, raytracing, global illumination, 3d masterpiece"
        );
    }

    #[test]
    fn midjourney_collapses_doubled_periods() {
        let params = CharacterParams {
            prompt_format: Dialect::Midjourney,
            details: Some("rain-soaked streets.".into()),
            colors: vec!["red".into()],
            ..Default::default()
        };
        let out = compile(&params);
        assert!(out.contains("Extra details: rain-soaked streets. Overall Palette: red"));
        assert!(!out.contains(".."));
    }

    #[test]
    fn generic_strips_pasted_flags() {
        let params = CharacterParams {
            details: Some("glowing runes --stylize 250 --chaos 10".into()),
            ..Default::default()
        };
        let out = compile(&params);
        assert!(!out.contains("--"));
        assert!(
            out.contains("Extra details: glowing runes, cinematic"),
            "{out}"
        );
        assert!(!out.contains("250"));
    }

    #[test]
    fn flag_only_value_is_absent() {
        let params = CharacterParams {
            style: Some("Anime".into()),
            details: Some("--chaos".into()),
            ..Default::default()
        };
        assert_eq!(
            compile(&params),
            "Artstyle: Anime, cinematic widescreen 16:9 format, masterpiece, best quality, \
             highly detailed, sharp lines, 4k, pixiv top tier, trending on artstation"
        );
    }

    #[test]
    fn flag_only_clause_leaves_no_separator() {
        let params = CharacterParams {
            race: Some("Dwarf".into()),
            setting: Some("--ar 16:9".into()),
            ..Default::default()
        };
        assert_eq!(
            compile(&params),
            "A Dwarf, cinematic widescreen 16:9 format, masterpiece, best quality, \
             ultra-detailed, sharp focus, 8k"
        );
    }

    #[test]
    fn midjourney_keeps_pasted_flags() {
        let params = CharacterParams {
            prompt_format: Dialect::Midjourney,
            details: Some("runes --chaos 10".into()),
            ..Default::default()
        };
        assert!(compile(&params).contains("Extra details: runes --chaos 10"));
    }

    #[test]
    fn flag_arguments_are_dropped() {
        assert_eq!(
            strip_flags("runes --stylize 250 --tile --chaos 10 glow"),
            "runes glow"
        );
        assert_eq!(strip_flags("--ar 16:9"), "");
        assert_eq!(strip_flags("blood---red cloak"), "blood-red cloak");
    }

    #[test]
    fn flagged_colors_are_cleaned() {
        let params = CharacterParams {
            colors: vec!["--no red".into(), "gold".into()],
            ..Default::default()
        };
        assert_eq!(without_flags(&params).colors, ["gold"]);
    }

    #[test]
    fn video_mode_uses_action() {
        let params = CharacterParams {
            mode: MediaMode::Video,
            pose: Some("Standing still".into()),
            action: Some("Casting a fireball".into()),
            ..Default::default()
        };
        let out = compile(&params);
        assert!(out.contains("while Casting a fireball"));
        assert!(!out.contains("Standing still"));
    }

    #[test]
    fn collapse_is_repeated_until_stable() {
        assert_eq!(collapse_periods("a .... b . c"), "a. b. c");
    }
}
