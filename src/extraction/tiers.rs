use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::numbers::{
    canonical_digits, extract_any_number, static_phrase, static_regex, NumberPhrase,
};

/// Minute spellings accepted after a duration
const MINUTES: &str = r"(?:minutes?|mins?)\b";

/// Words that follow a number in a duration rather than an activity count
const TIME_UNITS: [&str; 12] = [
    "min", "minute", "minutes", "mins", "hour", "hours", "hr", "hrs", "second", "seconds", "sec",
    "secs",
];

/// One rule group of the extraction cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Hard-coded Pushups, Sit Ups and Meditated
    Specific,
    /// "(went for a) N minute walk"
    TimeBased,
    /// "I (just) did / completed / finished N things"
    General,
    /// Any bare "N things"
    Adjacency,
    /// Substring keywords with a default unit
    Fallback,
}

impl Tier {
    /// Cascade order, highest priority first
    pub const ORDER: [Self; 5] = [
        Self::Specific,
        Self::TimeBased,
        Self::General,
        Self::Adjacency,
        Self::Fallback,
    ];

    /// 1-based priority rank
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Specific => 1,
            Self::TimeBased => 2,
            Self::General => 3,
            Self::Adjacency => 4,
            Self::Fallback => 5,
        }
    }

    /// Candidates this tier reads from `text`, in sub-pattern order
    #[must_use]
    pub fn candidates(self, text: &str) -> Vec<ActivityCandidate> {
        match self {
            Self::Specific => specific_candidates(text),
            Self::TimeBased => time_based_candidates(text),
            Self::General => general_candidates(text),
            Self::Adjacency => adjacency_candidates(text),
            Self::Fallback => fallback_candidates(text),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Specific => "specific",
            Self::TimeBased => "time-based",
            Self::General => "general",
            Self::Adjacency => "adjacency",
            Self::Fallback => "fallback",
        };
        f.write_str(label)
    }
}

/// A provisional activity read from a transcript, awaiting admission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCandidate {
    /// Detected activity name, not yet reconciled with the registry
    pub name: String,
    /// Quantity as a base-10 digit string
    pub quantity: Option<String>,
    /// Free-text unit such as "reps" or "mins"
    pub unit: Option<String>,
    /// Tier that produced this candidate
    pub source_tier: Tier,
}

impl ActivityCandidate {
    fn new(name: impl Into<String>, source_tier: Tier) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
            source_tier,
        }
    }

    fn quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    fn unit(mut self, unit: Option<&str>) -> Self {
        self.unit = unit.map(str::to_owned);
        self
    }
}

struct SpecificActivity {
    name: &'static str,
    keywords: &'static [&'static str],
    numeric: Regex,
    written: NumberPhrase,
    unit: &'static str,
    allow_no_quantity: bool,
}

impl SpecificActivity {
    fn new(
        name: &'static str,
        keywords: &'static [&'static str],
        trigger: &str,
        unit: &'static str,
    ) -> Self {
        Self {
            name,
            keywords,
            numeric: static_regex(&format!(r"(?i)(\d+)\s*{trigger}")),
            written: static_phrase("", trigger),
            unit,
            allow_no_quantity: false,
        }
    }
}

static SPECIFIC: LazyLock<Vec<SpecificActivity>> = LazyLock::new(|| {
    vec![
        SpecificActivity::new(
            "Pushups",
            &["pushup", "push-up", "pushs"],
            r"(?:pushup|push-ups?|pushs)",
            "reps",
        ),
        SpecificActivity::new(
            "Sit Ups",
            &["situp", "sit up", "sit-up"],
            r"(?:situp|sit-ups?|sit\s+ups?)",
            "reps",
        ),
        SpecificActivity {
            allow_no_quantity: true,
            ..SpecificActivity::new("Meditated", &["meditat"], MINUTES, "mins")
        },
    ]
});

static TIME_BASED: LazyLock<NumberPhrase> = LazyLock::new(|| {
    static_phrase(
        r"(?:went\s+for\s+a\s+)?",
        &format!(r"{MINUTES}\s+(?P<word>\w+)"),
    )
});

static GENERAL: LazyLock<NumberPhrase> = LazyLock::new(|| {
    static_phrase(
        r"\b(?:I\s+(?:just\s+)?did|completed|finished)\s+",
        r"(?P<word>\w+)",
    )
});

static ADJACENT: LazyLock<NumberPhrase> =
    LazyLock::new(|| static_phrase("", r"(?P<word>\w+)"));

struct FallbackKeyword {
    keyword: &'static str,
    unit: Option<&'static str>,
    name: Option<&'static str>,
}

const FALLBACK_KEYWORDS: [FallbackKeyword; 7] = [
    FallbackKeyword {
        keyword: "run",
        unit: Some("miles"),
        name: None,
    },
    FallbackKeyword {
        keyword: "walk",
        unit: Some("miles"),
        name: None,
    },
    FallbackKeyword {
        keyword: "exercise",
        unit: None,
        name: None,
    },
    FallbackKeyword {
        keyword: "situp",
        unit: Some("reps"),
        name: Some("Sit-ups"),
    },
    FallbackKeyword {
        keyword: "sit up",
        unit: Some("reps"),
        name: Some("Sit-ups"),
    },
    FallbackKeyword {
        keyword: "squat",
        unit: Some("reps"),
        name: None,
    },
    FallbackKeyword {
        keyword: "pushs",
        unit: Some("reps"),
        name: Some("Pushups"),
    },
];

/// Turns a spoken word into an activity name
///
/// "push" and "pushs" always read as "Pushups"; anything else only has its
/// first letter capitalized.
#[must_use]
pub fn activity_name_from_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower == "push" || lower == "pushs" {
        return "Pushups".to_owned();
    }

    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn is_time_unit(word: &str) -> bool {
    TIME_UNITS.contains(&word.to_lowercase().as_str())
}

fn specific_candidates(text: &str) -> Vec<ActivityCandidate> {
    let lower = text.to_lowercase();
    let mut candidates = Vec::new();

    for activity in SPECIFIC.iter() {
        if !activity.keywords.iter().any(|k| lower.contains(k)) {
            continue;
        }

        if let Some(digits) = activity.numeric.captures(text).and_then(|c| c.get(1)) {
            candidates.push(
                ActivityCandidate::new(activity.name, Tier::Specific)
                    .quantity(canonical_digits(digits.as_str()))
                    .unit(Some(activity.unit)),
            );
        }

        if let Some(written) = activity.written.find(text) {
            candidates.push(
                ActivityCandidate::new(activity.name, Tier::Specific)
                    .quantity(written.number.value)
                    .unit(Some(activity.unit)),
            );
        }

        if activity.allow_no_quantity {
            candidates.push(ActivityCandidate::new(activity.name, Tier::Specific));
        }
    }

    candidates
}

fn time_based_candidates(text: &str) -> Vec<ActivityCandidate> {
    TIME_BASED
        .digit_matches(text)
        .take(1)
        .chain(TIME_BASED.word_matches(text).take(1))
        .filter_map(|m| {
            let word = m.word?;
            Some(
                ActivityCandidate::new(activity_name_from_word(&word), Tier::TimeBased)
                    .quantity(m.number.value)
                    .unit(Some("mins")),
            )
        })
        .collect()
}

fn general_candidates(text: &str) -> Vec<ActivityCandidate> {
    GENERAL
        .digit_matches(text)
        .take(1)
        .chain(GENERAL.word_matches(text))
        .chain(GENERAL.compound_matches(text).take(1))
        .filter_map(|m| {
            let word = m.word?;
            Some(
                ActivityCandidate::new(activity_name_from_word(&word), Tier::General)
                    .quantity(m.number.value),
            )
        })
        .collect()
}

fn adjacency_candidates(text: &str) -> Vec<ActivityCandidate> {
    ADJACENT
        .digit_matches(text)
        .chain(ADJACENT.word_matches(text))
        .chain(ADJACENT.compound_matches(text))
        .filter_map(|m| {
            let word = m.word?.to_lowercase();
            if is_time_unit(&word) {
                return None;
            }
            Some(
                ActivityCandidate::new(activity_name_from_word(&word), Tier::Adjacency)
                    .quantity(m.number.value),
            )
        })
        .collect()
}

fn fallback_candidates(text: &str) -> Vec<ActivityCandidate> {
    let lower = text.to_lowercase();

    FALLBACK_KEYWORDS
        .iter()
        .filter(|entry| lower.contains(entry.keyword))
        .map(|entry| {
            let name = entry
                .name
                .map_or_else(|| activity_name_from_word(entry.keyword), str::to_owned);
            let candidate = ActivityCandidate::new(name, Tier::Fallback).unit(entry.unit);
            match extract_any_number(text) {
                Some(number) => candidate.quantity(number.value),
                None => candidate,
            }
        })
        .collect()
}
