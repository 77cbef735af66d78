//! Quality-tag bundles for the generic dialect.
//!
//! The bundle is picked by keyword matching against the chosen art style.
//! Rules are evaluated top to bottom and the first match wins, so a style
//! that mentions both "cinematic" and "anime" gets the photographic bundle.

/// A named tag bundle and the style keywords that select it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityRule {
    pub name: &'static str,
    /// Lowercase substrings; any one of them selects the rule.
    pub keywords: &'static [&'static str],
    pub tags: &'static str,
}

impl QualityRule {
    fn matches(&self, style_lower: &str) -> bool {
        self.keywords.iter().any(|k| style_lower.contains(k))
    }
}

pub const PHOTOGRAPHIC: QualityRule = QualityRule {
    name: "photographic",
    // "real" also covers "realistic" and "realism".
    keywords: &["photorealistic", "cinematic", "real", "gothic"],
    tags: "raw photo, 8k uhd, dslr, soft lighting, high quality, film grain, Fujifilm XT3, intricate details",
};

pub const ILLUSTRATION: QualityRule = QualityRule {
    name: "illustration",
    keywords: &["anime", "ghibli", "illustration", "arcane"],
    tags: "masterpiece, best quality, highly detailed, sharp lines, 4k, pixiv top tier, trending on artstation",
};

pub const RENDER_3D: QualityRule = QualityRule {
    name: "3d-render",
    keywords: &["3d", "pixar", "render", "fortnite"],
    tags: "unreal engine 5 render, octane render, 8k, raytracing, global illumination, 3d masterpiece",
};

/// Tags used when no rule matches, including when no style is set.
pub const DEFAULT_TAGS: &str = "masterpiece, best quality, ultra-detailed, sharp focus, 8k";

/// Rules in precedence order.
pub const QUALITY_RULES: [QualityRule; 3] = [PHOTOGRAPHIC, ILLUSTRATION, RENDER_3D];

/// The first rule matching `style`, if any.
pub fn classify(style: &str) -> Option<&'static QualityRule> {
    let lower = style.to_lowercase();
    QUALITY_RULES.iter().find(|rule| rule.matches(&lower))
}

/// Tag bundle for an optional style.
pub fn quality_tags(style: Option<&str>) -> &'static str {
    style
        .and_then(classify)
        .map_or(DEFAULT_TAGS, |rule| rule.tags)
}
