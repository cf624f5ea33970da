use tracing::{debug, info};

use super::tiers::{ActivityCandidate, Tier};
use crate::admission::ActivationCheck;

/// The single structured activity read from a finalized transcript segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Detected activity name (not yet normalized against the registry)
    pub name: String,
    /// Quantity as a base-10 digit string
    pub quantity: Option<String>,
    /// Free-text unit such as "reps", "mins" or "miles"
    pub unit: Option<String>,
    /// The verbatim segment the activity was read from
    pub transcribed_phrase: String,
}

impl ExtractionResult {
    fn from_candidate(candidate: ActivityCandidate, text: &str) -> Self {
        Self {
            name: candidate.name,
            quantity: candidate.quantity,
            unit: candidate.unit,
            transcribed_phrase: text.to_owned(),
        }
    }
}

/// Runs the tier cascade over one segment and stops at the first admitted candidate
///
/// Tiers are evaluated lazily in the configured order; a later tier is only
/// scanned once every candidate of the earlier tiers has been rejected by the
/// activation check.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    tiers: Vec<Tier>,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self {
            tiers: Tier::ORDER.to_vec(),
        }
    }
}

impl ExtractionPipeline {
    /// Pipeline with the standard five-tier order
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline evaluating only the given tiers, in the given order
    #[must_use]
    pub fn with_tiers(tiers: impl IntoIterator<Item = Tier>) -> Self {
        Self {
            tiers: tiers.into_iter().collect(),
        }
    }

    /// Tier evaluation order
    #[must_use]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// All candidates in cascade order, before admission
    pub fn candidates<'a>(&'a self, text: &'a str) -> impl Iterator<Item = ActivityCandidate> + 'a {
        self.tiers.iter().flat_map(move |tier| tier.candidates(text))
    }

    /// Extracts at most one activity from a finalized segment
    pub fn extract<G>(&self, text: &str, gate: &G) -> Option<ExtractionResult>
    where
        G: ActivationCheck + ?Sized,
    {
        let _span = tracing::debug_span!("extraction", text_len = text.len()).entered();

        for candidate in self.candidates(text) {
            if gate.is_active(&candidate.name) {
                info!(
                    name = %candidate.name,
                    quantity = ?candidate.quantity,
                    unit = ?candidate.unit,
                    tier = %candidate.source_tier,
                    "activity detected"
                );
                return Some(ExtractionResult::from_candidate(candidate, text));
            }

            debug!(
                name = %candidate.name,
                tier = %candidate.source_tier,
                "candidate not active, continuing"
            );
        }

        debug!("no activity detected");
        None
    }

    /// Extracts from `text` and hands the accepted result to `on_detected`
    ///
    /// Returns `true` if an activity was detected and accepted.
    pub fn process_segment<G, F>(&self, text: &str, gate: &G, on_detected: F) -> bool
    where
        G: ActivationCheck + ?Sized,
        F: FnOnce(ExtractionResult),
    {
        self.extract(text, gate).map(on_detected).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::{AllowAll, MockActivationCheck};

    #[test]
    fn test_default_order() {
        assert_eq!(ExtractionPipeline::new().tiers(), Tier::ORDER.as_slice());
    }

    #[test]
    fn test_extract_carries_transcribed_phrase() {
        let result = ExtractionPipeline::new()
            .extract("I did 20 pushups", &AllowAll)
            .unwrap();
        assert_eq!(result.name, "Pushups");
        assert_eq!(result.transcribed_phrase, "I did 20 pushups");
    }

    #[test]
    fn test_greedy_stop_calls_gate_once() {
        let mut gate = MockActivationCheck::new();
        gate.expect_is_active()
            .withf(|name| name == "Pushups")
            .times(1)
            .return_const(true);

        let result = ExtractionPipeline::new().extract("I did 20 pushups and 5 apples", &gate);
        assert_eq!(result.unwrap().quantity.as_deref(), Some("20"));
    }

    #[test]
    fn test_rejected_candidate_falls_through_to_later_tier() {
        let mut gate = MockActivationCheck::new();
        gate.expect_is_active().returning(|name| name == "Apples");

        let result = ExtractionPipeline::new()
            .extract("I did 20 pushups and 5 apples", &gate)
            .unwrap();
        assert_eq!(result.name, "Apples");
        assert_eq!(result.quantity.as_deref(), Some("5"));
    }

    #[test]
    fn test_all_rejected_yields_nothing() {
        let mut gate = MockActivationCheck::new();
        gate.expect_is_active().return_const(false);

        assert!(ExtractionPipeline::new()
            .extract("I did 20 pushups and went for a 30 minute walk", &gate)
            .is_none());
    }

    #[test]
    fn test_with_tiers_restricts_cascade() {
        let pipeline = ExtractionPipeline::with_tiers([Tier::Fallback]);
        let result = pipeline.extract("I did 20 pushs", &AllowAll).unwrap();
        assert_eq!(result.name, "Pushups");
        assert_eq!(result.unit.as_deref(), Some("reps"));
    }

    #[test]
    fn test_process_segment_invokes_callback_once() {
        let mut seen = Vec::new();
        let detected =
            ExtractionPipeline::new().process_segment("5 apples", &AllowAll, |r| seen.push(r));
        assert!(detected);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].name, "Apples");
    }

    #[test]
    fn test_process_segment_without_match() {
        let mut called = false;
        let detected =
            ExtractionPipeline::new().process_segment("hello there", &AllowAll, |_| called = true);
        assert!(!detected);
        assert!(!called);
    }

    #[test]
    fn test_closure_gate() {
        let only_walks = |name: &str| name == "Walk";
        let result = ExtractionPipeline::new()
            .extract("went for a 30 minute walk", &only_walks)
            .unwrap();
        assert_eq!(result.unit.as_deref(), Some("mins"));
    }
}
