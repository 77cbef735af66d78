//! Instructional preamble placed ahead of a finished prompt.
//!
//! The compiler never adds it; the CLI and the enhancement client compose it
//! on request.

/// Directive block for chat-style image generators.
pub const ELITE_PREAMBLE: &str = "You have to act as an elite AI image generation engine specialized in cinematic, high-end visual art.
Interpret my prompts literally and with maximum artistic precision.
Prioritize visual coherence, dramatic composition, lighting quality, atmosphere, and texture detail.
Render with professional photography standards and production-grade realism.
Always aim for masterpiece-level output.
Do not simplify. Do not stylize arbitrarily. Do not censor artistic intent.
Execute exactly what is described.";

/// `<preamble>\n\n<prompt>`. A blank preamble, or a prompt that already
/// opens with it (models sometimes echo it back), leaves the prompt untouched.
pub fn with_preamble(preamble: &str, prompt: &str) -> String {
    if preamble.trim().is_empty() || has_preamble(preamble, prompt) {
        return prompt.to_string();
    }
    format!("{preamble}\n\n{prompt}")
}

/// Whether `prompt` already starts with `preamble`.
pub fn has_preamble(preamble: &str, prompt: &str) -> bool {
    !preamble.trim().is_empty() && prompt.starts_with(preamble)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_is_separated_by_blank_line() {
        let out = with_preamble(ELITE_PREAMBLE, "/imagine prompt: A Dwarf --v 6.0");
        assert!(out.starts_with("You have to act as an elite"));
        assert!(out.contains("Execute exactly what is described.\n\n/imagine prompt:"));
        assert!(has_preamble(ELITE_PREAMBLE, &out));
    }

    #[test]
    fn empty_preamble_is_identity() {
        assert_eq!(with_preamble("", "prompt"), "prompt");
        assert_eq!(with_preamble("  \n", "prompt"), "prompt");
        assert!(!has_preamble("", "prompt"));
    }

    #[test]
    fn preamble_is_added_once() {
        let once = with_preamble(ELITE_PREAMBLE, "A knight");
        assert_eq!(with_preamble(ELITE_PREAMBLE, &once), once);
        assert_eq!(
            once.matches("Execute exactly what is described.").count(),
            1
        );
    }

    #[test]
    fn preamble_has_seven_directives() {
        assert_eq!(ELITE_PREAMBLE.lines().count(), 7);
    }
}
