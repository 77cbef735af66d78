//! Color-list rendering shared by the skin, hair, eye and outfit clauses.

use crate::params::color_entries;

/// Render an ordered color list.
///
/// - no colors: empty string
/// - one color: the color itself
/// - two or more: `two-toned <first> and <second>`; extra entries are ignored
pub fn join_colors(colors: &[String]) -> String {
    let mut entries = color_entries(colors);
    match (entries.next(), entries.next()) {
        (None, _) => String::new(),
        (Some(only), None) => only.to_string(),
        (Some(first), Some(second)) => format!("two-toned {first} and {second}"),
    }
}

/// [`join_colors`] as an `Option`, `None` for an empty list.
pub(crate) fn joined(colors: &[String]) -> Option<String> {
    let rendered = join_colors(colors);
    (!rendered.is_empty()).then_some(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_renders_nothing() {
        assert_eq!(join_colors(&[]), "");
        assert_eq!(joined(&[]), None);
    }

    #[test]
    fn single_color_is_bare() {
        assert_eq!(join_colors(&list(&["#ff00ff"])), "#ff00ff");
    }

    #[test]
    fn two_colors_are_two_toned() {
        assert_eq!(
            join_colors(&list(&["#000000", "#FFFF00"])),
            "two-toned #000000 and #FFFF00"
        );
    }

    #[test]
    fn extra_colors_ignored() {
        assert_eq!(
            join_colors(&list(&["red", "blue", "green"])),
            "two-toned red and blue"
        );
    }

    #[test]
    fn blank_entries_skipped() {
        assert_eq!(join_colors(&list(&["", "teal", "  "])), "teal");
    }
}
