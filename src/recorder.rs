use thiserror::Error;
use tracing::{debug, info, warn};

use crate::admission::{check_existence, Existence};
use crate::extraction::ExtractionResult;
use crate::normalize::normalize_activity_name;
use crate::registry::ActivityRegistry;

/// Name fragments of exercises counted in repetitions
const REP_ACTIVITIES: [&str; 26] = [
    "situp", "sit-up", "sit ups", "situps",
    "pushup", "push-up", "push ups", "pushups",
    "squat", "squats",
    "pullup", "pull-up", "pull ups", "pullups",
    "crunch", "crunches",
    "burpee", "burpees",
    "jumping jack", "jumping jacks",
    "lunge", "lunges",
    "dip", "dips",
    "plank", "planks",
];

/// Errors reported by an activity store
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry with this id exists
    #[error("activity {0} not found")]
    NotFound(u64),

    /// The backing store failed
    #[error("activity store failed: {0}")]
    Backend(String),
}

/// An activity ready to be written to a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    /// Canonical (normalized) activity name
    pub name: String,
    /// Quantity as a base-10 digit string
    pub quantity: Option<String>,
    /// Unit, defaulted to "reps" for rep-based exercises
    pub unit: Option<String>,
    /// Transcript segment the activity was heard in
    pub transcribed_phrase: Option<String>,
}

/// An activity as held by a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedActivity {
    /// Store-assigned identifier
    pub id: u64,
    /// Stored fields
    pub activity: NewActivity,
}

/// User edits to a logged activity; blank fields clear the value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityEdit {
    /// New name
    pub name: String,
    /// New quantity, blank for none
    pub quantity: String,
    /// New unit, blank for none
    pub unit: String,
}

/// Persistence collaborator for accepted activities
#[cfg_attr(test, mockall::automock)]
pub trait ActivityStore {
    /// Stores a new activity and returns its id
    ///
    /// # Errors
    /// Returns error if the backing store rejects the write
    fn insert(&mut self, activity: NewActivity) -> Result<u64, StoreError>;

    /// Replaces the stored fields of an existing activity
    ///
    /// # Errors
    /// Returns error if `id` is unknown or the write fails
    fn update(&mut self, id: u64, activity: NewActivity) -> Result<(), StoreError>;
}

/// Volatile store used by the CLI and tests, newest entry first
#[derive(Debug, Default)]
pub struct InMemoryLog {
    next_id: u64,
    entries: Vec<LoggedActivity>,
}

impl InMemoryLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logged activities, newest first
    #[must_use]
    pub fn entries(&self) -> &[LoggedActivity] {
        &self.entries
    }
}

impl ActivityStore for InMemoryLog {
    fn insert(&mut self, activity: NewActivity) -> Result<u64, StoreError> {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.insert(0, LoggedActivity { id, activity });
        Ok(id)
    }

    fn update(&mut self, id: u64, activity: NewActivity) -> Result<(), StoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(StoreError::NotFound(id))?;
        entry.activity = activity;
        Ok(())
    }
}

/// What happened to an activity handed to the recorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Written to the store
    Logged(LoggedActivity),
    /// Dropped by the existence check; nothing was written
    Rejected {
        /// Name as detected or edited
        name: String,
        /// Name after normalization
        normalized: String,
    },
    /// The edit changed nothing; nothing was written
    Unchanged,
}

/// Normalizes, validates and stores detected activities
#[derive(Debug)]
pub struct ActivityRecorder<S> {
    store: S,
}

impl<S: ActivityStore> ActivityRecorder<S> {
    /// Recorder writing to `store`
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the recorder, returning the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Records an extraction result against the current registry snapshot
    ///
    /// # Errors
    /// Returns error if the store rejects the write
    pub fn record(
        &mut self,
        result: ExtractionResult,
        registry: &ActivityRegistry,
    ) -> Result<RecordOutcome, StoreError> {
        let Some(activity) = admit(
            &result.name,
            result.quantity,
            result.unit,
            Some(result.transcribed_phrase),
            registry,
        ) else {
            return Ok(rejected(&result.name, registry));
        };

        let id = self.store.insert(activity.clone())?;
        info!(id = id, name = %activity.name, "activity logged");
        Ok(RecordOutcome::Logged(LoggedActivity { id, activity }))
    }

    /// Applies a user edit to a logged activity
    ///
    /// The edited name goes through the same normalization and existence
    /// check as a detected one; a rejected edit leaves the entry untouched.
    ///
    /// # Errors
    /// Returns error if the store rejects the write
    pub fn amend(
        &mut self,
        current: &LoggedActivity,
        edit: &ActivityEdit,
        registry: &ActivityRegistry,
    ) -> Result<RecordOutcome, StoreError> {
        let name = edit.name.trim();
        let quantity = non_blank(&edit.quantity);
        let unit = non_blank(&edit.unit);

        let old = &current.activity;
        if name == old.name && quantity == old.quantity && unit == old.unit {
            debug!(id = current.id, "edit unchanged, skipping write");
            return Ok(RecordOutcome::Unchanged);
        }

        let Some(activity) = admit(
            name,
            quantity,
            unit,
            old.transcribed_phrase.clone(),
            registry,
        ) else {
            return Ok(rejected(name, registry));
        };

        self.store.update(current.id, activity.clone())?;
        info!(id = current.id, name = %activity.name, "activity updated");
        Ok(RecordOutcome::Logged(LoggedActivity {
            id: current.id,
            activity,
        }))
    }
}

/// Normalizes `name` and applies the existence check and rep-unit default
fn admit(
    name: &str,
    quantity: Option<String>,
    unit: Option<String>,
    transcribed_phrase: Option<String>,
    registry: &ActivityRegistry,
) -> Option<NewActivity> {
    let normalized = normalize_activity_name(name, registry.entries());
    if !check_existence(&normalized, registry).is_accepted() {
        return None;
    }

    let unit = unit.or_else(|| {
        (quantity.is_some() && is_rep_activity(&normalized)).then(|| "reps".to_owned())
    });

    Some(NewActivity {
        name: normalized,
        quantity,
        unit,
        transcribed_phrase,
    })
}

fn rejected(name: &str, registry: &ActivityRegistry) -> RecordOutcome {
    let normalized = normalize_activity_name(name, registry.entries());
    let closest = match check_existence(&normalized, registry) {
        Existence::Rejected { closest } => closest,
        Existence::Accepted => None,
    };
    warn!(
        name = name,
        normalized = %normalized,
        closest = ?closest,
        "activity does not match any tracked activity, rejecting"
    );
    RecordOutcome::Rejected {
        name: name.to_owned(),
        normalized,
    }
}

/// True if the activity is counted in repetitions
#[must_use]
pub fn is_rep_activity(name: &str) -> bool {
    let lower = name.to_lowercase();
    REP_ACTIVITIES.iter().any(|term| lower.contains(term))
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TrackedActivityDefinition;
    use mockall::predicate::eq;

    fn result(name: &str, quantity: Option<&str>, unit: Option<&str>) -> ExtractionResult {
        ExtractionResult {
            name: name.to_owned(),
            quantity: quantity.map(str::to_owned),
            unit: unit.map(str::to_owned),
            transcribed_phrase: format!("heard {name}"),
        }
    }

    #[test]
    fn test_record_normalizes_and_defaults_reps() {
        let mut store = MockActivityStore::new();
        store
            .expect_insert()
            .with(eq(NewActivity {
                name: "Squats".to_owned(),
                quantity: Some("25".to_owned()),
                unit: Some("reps".to_owned()),
                transcribed_phrase: Some("heard squat".to_owned()),
            }))
            .times(1)
            .returning(|_| Ok(7));

        let mut recorder = ActivityRecorder::new(store);
        let outcome = recorder
            .record(result("squat", Some("25"), None), &ActivityRegistry::defaults())
            .unwrap();
        assert!(matches!(outcome, RecordOutcome::Logged(LoggedActivity { id: 7, .. })));
    }

    #[test]
    fn test_record_keeps_explicit_unit() {
        let mut recorder = ActivityRecorder::new(InMemoryLog::new());
        recorder
            .record(
                result("Pushups", Some("3"), Some("sets")),
                &ActivityRegistry::defaults(),
            )
            .unwrap();
        let entry = &recorder.store().entries()[0];
        assert_eq!(entry.activity.unit.as_deref(), Some("sets"));
    }

    #[test]
    fn test_record_no_reps_without_quantity() {
        let mut recorder = ActivityRecorder::new(InMemoryLog::new());
        recorder
            .record(result("Squats", None, None), &ActivityRegistry::defaults())
            .unwrap();
        assert_eq!(recorder.store().entries()[0].activity.unit, None);
    }

    #[test]
    fn test_rejected_activity_is_never_stored() {
        let mut store = MockActivityStore::new();
        store.expect_insert().never();

        let mut recorder = ActivityRecorder::new(store);
        let outcome = recorder
            .record(result("Apples", Some("5"), None), &ActivityRegistry::defaults())
            .unwrap();
        assert_eq!(
            outcome,
            RecordOutcome::Rejected {
                name: "Apples".to_owned(),
                normalized: "Apples".to_owned(),
            }
        );
    }

    #[test]
    fn test_open_registry_accepts_anything() {
        let mut recorder = ActivityRecorder::new(InMemoryLog::new());
        let outcome = recorder
            .record(result("Apples", Some("5"), None), &ActivityRegistry::default())
            .unwrap();
        assert!(matches!(outcome, RecordOutcome::Logged(_)));
        assert_eq!(recorder.store().entries()[0].activity.name, "Apples");
    }

    #[test]
    fn test_store_error_propagates() {
        let mut store = MockActivityStore::new();
        store
            .expect_insert()
            .returning(|_| Err(StoreError::Backend("disk full".to_owned())));

        let mut recorder = ActivityRecorder::new(store);
        let err = recorder
            .record(result("Run", Some("3"), Some("miles")), &ActivityRegistry::defaults())
            .unwrap_err();
        assert_eq!(err.to_string(), "activity store failed: disk full");
    }

    #[test]
    fn test_in_memory_log_newest_first() {
        let mut log = InMemoryLog::new();
        let registry = ActivityRegistry::defaults();
        let mut recorder = ActivityRecorder::new(log);
        recorder.record(result("Run", None, None), &registry).unwrap();
        recorder.record(result("Walk", None, None), &registry).unwrap();
        log = recorder.into_store();

        let names: Vec<&str> = log.entries().iter().map(|e| e.activity.name.as_str()).collect();
        assert_eq!(names, vec!["Walk", "Run"]);
        assert_eq!(log.entries()[0].id, 2);
    }

    #[test]
    fn test_amend_normalizes_edited_name() {
        let registry = ActivityRegistry::defaults();
        let mut recorder = ActivityRecorder::new(InMemoryLog::new());
        let RecordOutcome::Logged(logged) = recorder
            .record(result("Run", Some("3"), Some("miles")), &registry)
            .unwrap()
        else {
            panic!("expected logged");
        };

        let edit = ActivityEdit {
            name: " push ups ".to_owned(),
            quantity: "10".to_owned(),
            unit: String::new(),
        };
        let outcome = recorder.amend(&logged, &edit, &registry).unwrap();

        let RecordOutcome::Logged(updated) = outcome else {
            panic!("expected logged");
        };
        assert_eq!(updated.activity.name, "Pushups");
        assert_eq!(updated.activity.unit.as_deref(), Some("reps"));
        assert_eq!(updated.activity.transcribed_phrase.as_deref(), Some("heard Run"));
        assert_eq!(recorder.store().entries()[0], updated);
    }

    #[test]
    fn test_amend_unchanged_skips_write() {
        let mut store = MockActivityStore::new();
        store.expect_update().never();

        let current = LoggedActivity {
            id: 1,
            activity: NewActivity {
                name: "Run".to_owned(),
                quantity: Some("3".to_owned()),
                unit: None,
                transcribed_phrase: None,
            },
        };
        let edit = ActivityEdit {
            name: "Run ".to_owned(),
            quantity: " 3".to_owned(),
            unit: "  ".to_owned(),
        };

        let mut recorder = ActivityRecorder::new(store);
        let outcome = recorder
            .amend(&current, &edit, &ActivityRegistry::defaults())
            .unwrap();
        assert_eq!(outcome, RecordOutcome::Unchanged);
    }

    #[test]
    fn test_amend_rejected_leaves_entry() {
        let registry = ActivityRegistry::new(vec![TrackedActivityDefinition::new(
            "r",
            "Run",
            &["run"],
        )]);
        let mut store = MockActivityStore::new();
        store.expect_update().never();

        let current = LoggedActivity {
            id: 4,
            activity: NewActivity {
                name: "Run".to_owned(),
                quantity: None,
                unit: None,
                transcribed_phrase: None,
            },
        };
        let edit = ActivityEdit {
            name: "Knitting".to_owned(),
            ..ActivityEdit::default()
        };

        let mut recorder = ActivityRecorder::new(store);
        let outcome = recorder.amend(&current, &edit, &registry).unwrap();
        assert!(matches!(outcome, RecordOutcome::Rejected { .. }));
    }

    #[test]
    fn test_amend_unknown_id() {
        let mut recorder = ActivityRecorder::new(InMemoryLog::new());
        let ghost = LoggedActivity {
            id: 99,
            activity: NewActivity {
                name: "Run".to_owned(),
                quantity: None,
                unit: None,
                transcribed_phrase: None,
            },
        };
        let edit = ActivityEdit {
            name: "Walk".to_owned(),
            ..ActivityEdit::default()
        };
        let err = recorder
            .amend(&ghost, &edit, &ActivityRegistry::defaults())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(99)));
    }

    #[test]
    fn test_is_rep_activity() {
        assert!(is_rep_activity("Pushups"));
        assert!(is_rep_activity("Jumping Jacks"));
        assert!(!is_rep_activity("Run"));
        assert!(!is_rep_activity("Meditated"));
    }
}
