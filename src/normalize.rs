use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::extraction::numbers::static_regex;
use crate::registry::TrackedActivityDefinition;

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| static_regex(r"[\s-]+"));

/// Map a spoken activity name onto its canonical registry spelling
///
/// Comparison is case-insensitive and treats runs of spaces and hyphens as a
/// single space. An exact canonical-name match wins; otherwise the first
/// registry entry (in registry order) with a matching keyword wins. A keyword
/// matches when either string contains the other, or when they agree after
/// folding one trailing "s".
///
/// # Returns
/// The canonical name, or `raw` unchanged when nothing matches
#[must_use]
pub fn normalize_activity_name(raw: &str, registry: &[TrackedActivityDefinition]) -> String {
    let input = collapse(raw);
    if input.is_empty() || registry.is_empty() {
        return raw.to_owned();
    }

    if let Some(exact) = exact_match(&input, registry) {
        return exact.to_owned();
    }

    let keyword_match = registry.iter().find(|entry| {
        entry
            .keywords
            .iter()
            .any(|keyword| keyword_matches(&input, &collapse(keyword)))
    });

    if let Some(entry) = keyword_match {
        // resolve through the exact pass so repeated normalization is stable
        let canonical = exact_match(&collapse(&entry.canonical_name), registry)
            .unwrap_or(&entry.canonical_name);
        debug!(raw = raw, canonical = canonical, "activity name matched keyword");
        return canonical.to_owned();
    }

    debug!(raw = raw, "no registry match, keeping original name");
    raw.to_owned()
}

/// Lowercase, collapse space/hyphen runs to one space, trim
#[must_use]
pub fn collapse(name: &str) -> String {
    SEPARATORS
        .replace_all(&name.to_lowercase(), " ")
        .trim()
        .to_owned()
}

fn exact_match<'r>(input: &str, registry: &'r [TrackedActivityDefinition]) -> Option<&'r str> {
    registry
        .iter()
        .find(|entry| collapse(&entry.canonical_name) == input)
        .map(|entry| entry.canonical_name.as_str())
}

fn keyword_matches(input: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }

    let input_stem = input.strip_suffix('s').unwrap_or(input);
    let keyword_stem = keyword.strip_suffix('s').unwrap_or(keyword);

    input.contains(keyword)
        || keyword.contains(input)
        || input_stem == keyword_stem
        || input.strip_suffix('s') == Some(keyword)
        || keyword.strip_suffix('s') == Some(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_activities;

    fn pushups_only() -> Vec<TrackedActivityDefinition> {
        vec![TrackedActivityDefinition::new(
            "p",
            "Pushups",
            &["pushup", "push-ups", "push ups"],
        )]
    }

    #[test]
    fn test_collapse() {
        assert_eq!(collapse("  Push -- Ups "), "push ups");
        assert_eq!(collapse("Sit\t-ups"), "sit ups");
    }

    #[test]
    fn test_keyword_match() {
        assert_eq!(normalize_activity_name("push ups", &pushups_only()), "Pushups");
        assert_eq!(normalize_activity_name("Push-Ups", &pushups_only()), "Pushups");
    }

    #[test]
    fn test_exact_match_ignores_case_and_separators() {
        let registry = default_activities();
        assert_eq!(normalize_activity_name("sit ups", &registry), "Sit-ups");
        assert_eq!(normalize_activity_name("SQUATS", &registry), "Squats");
    }

    #[test]
    fn test_plural_fold() {
        let registry = default_activities();
        assert_eq!(normalize_activity_name("Walks", &registry), "Walk");
        assert_eq!(normalize_activity_name("runs", &registry), "Run");
    }

    #[test]
    fn test_first_entry_in_registry_order_wins() {
        let registry = vec![
            TrackedActivityDefinition::new("a", "Jog", &["run"]),
            TrackedActivityDefinition::new("b", "Run", &["running"]),
        ];
        // exact canonical match beats an earlier keyword match
        assert_eq!(normalize_activity_name("run", &registry), "Run");
        // "running" contains the first entry's "run" keyword
        assert_eq!(normalize_activity_name("running", &registry), "Jog");
    }

    #[test]
    fn test_empty_registry_is_identity() {
        assert_eq!(normalize_activity_name("Apples", &[]), "Apples");
    }

    #[test]
    fn test_no_match_returns_original_unchanged() {
        assert_eq!(
            normalize_activity_name("  Jumping Jacks", &default_activities()),
            "  Jumping Jacks"
        );
    }

    #[test]
    fn test_blank_input_is_not_matched() {
        assert_eq!(normalize_activity_name("  ", &default_activities()), "  ");
        assert_eq!(normalize_activity_name("", &default_activities()), "");
    }

    #[test]
    fn test_empty_keywords_never_match() {
        let registry = vec![TrackedActivityDefinition::new("y", "Yoga", &[""])];
        assert_eq!(normalize_activity_name("Apples", &registry), "Apples");
    }

    #[test]
    fn test_idempotent() {
        let registry = vec![
            TrackedActivityDefinition::new("a", "Sit-ups", &["situp"]),
            TrackedActivityDefinition::new("b", "Sit ups", &["crunch"]),
            TrackedActivityDefinition::new("c", "Walk", &["walking"]),
        ];
        for raw in ["situps", "crunches", "Walks", "sit ups", "Apples", "walking", ""] {
            let once = normalize_activity_name(raw, &registry);
            assert_eq!(normalize_activity_name(&once, &registry), once, "input {raw:?}");
        }
    }
}
