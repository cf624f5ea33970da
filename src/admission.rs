//! Accept/reject checks applied to detected activity names
//!
//! There are two separate checks:
//!
//! - the activation check runs inside the extraction cascade on the raw
//!   candidate name and matches active canonical names or keyword substrings;
//! - the existence check runs at persistence time on the normalized name and
//!   requires an exact (case-insensitive) canonical name.
//!
//! They can disagree; see the integration tests for the observed cases.

use tracing::debug;

use crate::registry::{ActivityRegistry, VocabularyMode};

/// Decides whether a raw candidate name is currently being listened for
#[cfg_attr(test, mockall::automock)]
pub trait ActivationCheck {
    /// Returns true if `name` should be accepted by the cascade
    fn is_active(&self, name: &str) -> bool;
}

/// Activation check that accepts every name
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl ActivationCheck for AllowAll {
    fn is_active(&self, _name: &str) -> bool {
        true
    }
}

impl<F> ActivationCheck for F
where
    F: Fn(&str) -> bool,
{
    fn is_active(&self, name: &str) -> bool {
        self(name)
    }
}

impl ActivationCheck for ActivityRegistry {
    fn is_active(&self, name: &str) -> bool {
        if self.activation_mode() == VocabularyMode::Open {
            return true;
        }

        let lower = name.to_lowercase();
        self.active().any(|entry| {
            entry.canonical_name.to_lowercase() == lower
                || entry
                    .keywords
                    .iter()
                    .any(|keyword| lower.contains(&keyword.to_lowercase()))
        })
    }
}

/// Outcome of the existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence {
    /// The name is a registry canonical name, or the registry is open
    Accepted,
    /// The name is unknown
    Rejected {
        /// Most similar canonical name, for diagnostics only
        closest: Option<String>,
    },
}

impl Existence {
    /// True for [`Existence::Accepted`]
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Minimum Jaro-Winkler similarity for a rejection hint
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Checks a normalized name against the registry's canonical names
///
/// Inactive entries still count as existing. An open registry accepts
/// every name.
#[must_use]
pub fn check_existence(name: &str, registry: &ActivityRegistry) -> Existence {
    if registry.existence_mode() == VocabularyMode::Open {
        return Existence::Accepted;
    }

    let lower = name.trim().to_lowercase();
    if lower.is_empty() {
        return Existence::Rejected { closest: None };
    }

    if registry
        .entries()
        .iter()
        .any(|entry| entry.canonical_name.to_lowercase() == lower)
    {
        return Existence::Accepted;
    }

    Existence::Rejected {
        closest: closest_canonical(&lower, registry),
    }
}

/// Canonical name most similar to `lower`, if any clears the threshold
fn closest_canonical(lower: &str, registry: &ActivityRegistry) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;

    for entry in registry.entries() {
        let similarity = strsim::jaro_winkler(lower, &entry.canonical_name.to_lowercase());
        debug!(
            canonical = %entry.canonical_name,
            similarity = %similarity,
            "existence suggestion check"
        );

        if similarity >= SUGGESTION_THRESHOLD
            && best.map_or(true, |(_, best_score)| similarity > best_score)
        {
            best = Some((entry.canonical_name.as_str(), similarity));
        }
    }

    best.map(|(name, _)| name.to_owned())
}
