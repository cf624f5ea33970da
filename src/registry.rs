use serde::Deserialize;

/// A tracked activity as configured by the user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackedActivityDefinition {
    /// Stable identifier
    #[serde(default)]
    pub id: String,
    /// Authoritative spelling of the activity name
    #[serde(rename = "name")]
    pub canonical_name: String,
    /// Inactive activities are still known but not listened for
    #[serde(default = "default_active")]
    pub active: bool,
    /// Synonyms and stems to listen for (e.g. "push ups", "pushup")
    #[serde(default)]
    pub keywords: Vec<String>,
}

const fn default_active() -> bool {
    true
}

impl TrackedActivityDefinition {
    /// Creates an active definition
    pub fn new(
        id: impl Into<String>,
        canonical_name: impl Into<String>,
        keywords: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            canonical_name: canonical_name.into(),
            active: true,
            keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
        }
    }

    /// Returns the same definition marked inactive
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }
}

/// How an admission gate treats names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyMode {
    /// Every name is admitted
    Open,
    /// Names must match the registry
    Registry,
}

/// Read-only snapshot of the tracked activities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityRegistry {
    entries: Vec<TrackedActivityDefinition>,
    open_vocabulary: bool,
}

impl ActivityRegistry {
    /// Snapshot of the given definitions, in registry order
    #[must_use]
    pub const fn new(entries: Vec<TrackedActivityDefinition>) -> Self {
        Self {
            entries,
            open_vocabulary: false,
        }
    }

    /// Empty registry in open-vocabulary mode
    #[must_use]
    pub fn open() -> Self {
        Self::default().with_open_vocabulary(true)
    }

    /// The default activity set offered to new users
    #[must_use]
    pub fn defaults() -> Self {
        Self::new(default_activities())
    }

    /// Forces open-vocabulary mode regardless of the configured entries
    #[must_use]
    pub fn with_open_vocabulary(mut self, open: bool) -> Self {
        self.open_vocabulary = open;
        self
    }

    /// All definitions, in registry order
    #[must_use]
    pub fn entries(&self) -> &[TrackedActivityDefinition] {
        &self.entries
    }

    /// Definitions currently listened for
    pub fn active(&self) -> impl Iterator<Item = &TrackedActivityDefinition> {
        self.entries.iter().filter(|entry| entry.active)
    }

    /// True if no definitions are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mode of the activation check: open when forced or when nothing is active
    #[must_use]
    pub fn activation_mode(&self) -> VocabularyMode {
        if self.open_vocabulary || self.active().next().is_none() {
            VocabularyMode::Open
        } else {
            VocabularyMode::Registry
        }
    }

    /// Mode of the existence check: open when forced or when the registry is empty
    #[must_use]
    pub fn existence_mode(&self) -> VocabularyMode {
        if self.open_vocabulary || self.entries.is_empty() {
            VocabularyMode::Open
        } else {
            VocabularyMode::Registry
        }
    }
}

impl From<Vec<TrackedActivityDefinition>> for ActivityRegistry {
    fn from(entries: Vec<TrackedActivityDefinition>) -> Self {
        Self::new(entries)
    }
}

/// Activities every new user starts with
#[must_use]
pub fn default_activities() -> Vec<TrackedActivityDefinition> {
    vec![
        TrackedActivityDefinition::new("pushups", "Pushups", &["pushup", "push-ups", "push ups"]),
        TrackedActivityDefinition::new("meditated", "Meditated", &["meditat", "meditation"]),
        TrackedActivityDefinition::new("run", "Run", &["run", "running", "ran"]),
        TrackedActivityDefinition::new("walk", "Walk", &["walk", "walking", "walked"]),
        TrackedActivityDefinition::new(
            "sit-ups",
            "Sit-ups",
            &["situp", "sit-up", "sit ups", "situps"],
        ),
        TrackedActivityDefinition::new("squats", "Squats", &["squat", "squats"]),
    ]
}
