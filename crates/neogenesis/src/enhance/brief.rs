//! The `INPUT DATA` brief sent to the enhancement model.
//!
//! Unlike the compiler, the brief is labelled and line oriented; the model is
//! told what each value means instead of reading it out of prose. Lines with
//! no data are left out entirely.

use crate::params::{CharacterParams, MediaMode, color_entries, text};

/// Which movement field feeds the `Action` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Pose,
    Action,
}

impl Movement {
    /// Pose for images, action for video.
    pub fn for_mode(mode: MediaMode) -> Self {
        match mode {
            MediaMode::Image => Movement::Pose,
            MediaMode::Video => Movement::Action,
        }
    }
}

fn join_present<'a>(parts: impl IntoIterator<Item = Option<&'a str>>, sep: &str) -> Option<String> {
    let parts: Vec<&str> = parts.into_iter().flatten().collect();
    (!parts.is_empty()).then(|| parts.join(sep))
}

fn ampersand(colors: &[String]) -> Option<String> {
    join_present(color_entries(colors).map(Some), " & ")
}

fn subject_line(p: &CharacterParams) -> Option<String> {
    let role = match (text(&p.role), text(&p.secondary_role)) {
        (Some(role), Some(second)) => Some(format!("{role} / {second}")),
        (role, second) => role.or(second).map(str::to_string),
    };
    let who = join_present([text(&p.race), role.as_deref()], " ")?;
    Some(format!("{who} ({})", p.class_category))
}

fn physical_line(p: &CharacterParams) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(style) = text(&p.hair_style) {
        parts.push(match ampersand(&p.hair_colors) {
            Some(colors) => format!("{colors} {style} hair"),
            None => format!("{style} hair"),
        });
    }
    match (ampersand(&p.eye_colors), text(&p.eye_feature)) {
        (Some(colors), feature) => parts.push(format!("{colors} {}", feature.unwrap_or("eyes"))),
        (None, Some(feature)) => parts.push(feature.to_string()),
        (None, None) => {}
    }
    if let Some(colors) = ampersand(&p.skin_color) {
        parts.push(format!("{colors} colored skin"));
    } else if let Some(tone) = text(&p.skin_tone) {
        parts.push(tone.to_string());
    }
    if let Some(markings) = text(&p.face_markings) {
        parts.push(markings.to_string());
    }
    if let Some(denture) = text(&p.denture) {
        parts.push(format!("Dentures: {denture}"));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn gear_line(p: &CharacterParams) -> Option<String> {
    let mut parts = Vec::new();
    let mut labelled = |label: &str, value: Option<&str>| {
        if let Some(v) = value {
            parts.push(format!("{label}: {v}"));
        }
    };
    labelled("Headwear", text(&p.headwear));
    if text(&p.full_body).is_some() {
        labelled("Attire", text(&p.full_body));
    } else {
        labelled("Upper", text(&p.upper_body));
        labelled("Lower", text(&p.lower_body));
    }
    labelled("Accessory", text(&p.class_extras));
    labelled("Shoes", text(&p.footwear));
    labelled("Holding", text(&p.held_item));

    let gear = (!parts.is_empty()).then(|| parts.join(", "));
    let palette = ampersand(&p.outfit_colors).map(|c| format!("(Palette: {c})"));
    join_present([gear.as_deref(), palette.as_deref()], " ")
}

/// Build the labelled brief for `params`.
pub fn input_brief(p: &CharacterParams, movement: Movement) -> String {
    let movement_value = match movement {
        Movement::Pose => text(&p.pose),
        Movement::Action => text(&p.action),
    };
    let colors = join_present(color_entries(&p.colors).map(Some), ", ");

    let lines: [(&str, Option<String>); 14] = [
        ("Subject", subject_line(p)),
        (
            "Stats",
            join_present([text(&p.gender), text(&p.age), text(&p.body_type)], ", "),
        ),
        ("Physical", physical_line(p)),
        ("Gear", gear_line(p)),
        ("Mood", text(&p.emotion).map(str::to_string)),
        ("Action", movement_value.map(str::to_string)),
        ("Framing", text(&p.framing).map(str::to_string)),
        ("Style", text(&p.style).map(str::to_string)),
        ("Location", text(&p.setting).map(str::to_string)),
        (
            "Ambience",
            join_present([text(&p.atmosphere), text(&p.lighting)], ", "),
        ),
        ("Colors", colors),
        ("Extra", text(&p.details).map(str::to_string)),
        ("Aspect Ratio", p.aspect_code().map(str::to_string)),
        ("Target Format", Some(p.prompt_format.target_name().to_string())),
    ];

    let mut brief = String::from("INPUT DATA:");
    for (label, value) in lines {
        if let Some(value) = value {
            brief.push_str(&format!("\n- {label}: {value}"));
        }
    }
    brief
}
