//! Aspect-ratio codes and their natural-language phrasing.
//!
//! Midjourney takes the raw `--ar W:H` code; the generic dialect has no flag
//! syntax and gets a descriptive phrase instead. Unknown ratios have no phrase
//! and are dropped from generic output.

/// The ratios the form offers, with their generic-dialect phrasing.
pub const ASPECT_PHRASES: [(&str, &str); 6] = [
    ("16:9", "cinematic widescreen 16:9 format"),
    ("1:1", "square 1:1 format, centered composition"),
    ("9:16", "vertical mobile 9:16 format, tall aspect ratio"),
    ("4:5", "vertical portrait 4:5 format"),
    ("4:3", "classic TV 4:3 format"),
    ("21:9", "ultrawide panoramic 21:9 format"),
];

/// Extract the `W:H` ratio from a code such as `--ar 16:9` or `--aspect 4:5`.
/// A bare `16:9` is accepted as well.
pub fn ratio_of(code: &str) -> Option<&str> {
    let mut tokens = code.split_whitespace();
    let first = tokens.next()?;
    let ratio = if first.starts_with("--") {
        tokens.next()?
    } else {
        first
    };
    let (w, h) = ratio.split_once(':')?;
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    (numeric(w) && numeric(h)).then_some(ratio)
}

/// Natural-language phrase for an aspect-ratio code, `None` when unrecognized.
pub fn natural_aspect(code: &str) -> Option<&'static str> {
    let ratio = ratio_of(code)?;
    ASPECT_PHRASES
        .iter()
        .find(|(r, _)| *r == ratio)
        .map(|(_, phrase)| *phrase)
}
