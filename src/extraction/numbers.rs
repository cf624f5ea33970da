//! Spoken-number decoding for transcript segments
//!
//! Recognizes digit runs, the single number words zero through twenty plus
//! the tens thirty..ninety, and two-word compounds such as "forty-seven".
//! Decoded word values never exceed 99.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use thiserror::Error;

/// Number words in the fixed enumeration order used for list-order priority
pub const NUMBER_WORDS: [(&str, u8); 28] = [
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

const TENS: &str = "twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety";
const ONES: &str = "one|two|three|four|five|six|seven|eight|nine";

static COMPOUND_EXACT: LazyLock<Regex> =
    LazyLock::new(|| static_regex(&format!(r"(?i)^\s*({TENS})[-\s]+({ONES})\s*$")));
static ANY_DIGITS: LazyLock<Regex> = LazyLock::new(|| static_regex(r"\d+"));
static ANY_WORDS: LazyLock<Vec<(u8, Regex)>> = LazyLock::new(|| {
    NUMBER_WORDS
        .iter()
        .map(|(word, value)| (*value, static_regex(&format!(r"(?i)\b{word}\b"))))
        .collect()
});
static ANY_COMPOUND: LazyLock<Regex> =
    LazyLock::new(|| static_regex(&format!(r"(?i)\b({TENS})[-\s]+({ONES})\b")));
static COMPOUND_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| static_regex(&format!(r"(?i)\b(?:{TENS})[-\s]+$")));
static COMPOUND_AFTER: LazyLock<Regex> =
    LazyLock::new(|| static_regex(&format!(r"(?i)^[-\s]+(?:{ONES})\b")));

/// Errors raised while building a number phrase from caller-supplied patterns
#[derive(Debug, Error)]
pub enum PatternError {
    /// The lead or tail pattern did not compile
    #[error("invalid number phrase pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// A decoded quantity and the span of text it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberToken {
    /// Base-10 digit string without sign or leading zeros
    pub value: String,
    /// Byte range of the full matched phrase in the source text
    pub span: Range<usize>,
}

impl NumberToken {
    /// Returns the matched phrase as it appears in `text`
    #[must_use]
    pub fn matched<'t>(&self, text: &'t str) -> &'t str {
        &text[self.span.clone()]
    }
}

/// One textual match of a [`NumberPhrase`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    /// The decoded number
    pub number: NumberToken,
    /// Text of the `word` capture group, when the tail pattern declares one
    pub word: Option<String>,
}

/// A number sandwiched between a lead and a tail pattern
///
/// Each phrase compiles three independent searches, tried in fixed order:
/// a digit run, each single number word in [`NUMBER_WORDS`] order, and a
/// tens+ones compound. A number word that is half of a compound ("twenty"
/// or "five" in "twenty-five") never counts as a single word. The tail may
/// declare a `(?P<word>...)` group which is reported back on every match.
#[derive(Debug)]
pub struct NumberPhrase {
    digits: Regex,
    words: Vec<(u8, Regex)>,
    compound: Regex,
}

impl NumberPhrase {
    /// Builds a phrase matching `{lead}<number>\s+{tail}`
    ///
    /// # Errors
    /// Returns error if `lead` or `tail` is not a valid regex fragment
    pub fn new(lead: &str, tail: &str) -> Result<Self, PatternError> {
        let digits = Regex::new(&format!(r"(?i){lead}(?P<digits>\d+)\s+{tail}"))?;
        let words = NUMBER_WORDS
            .iter()
            .map(|(word, value)| {
                Regex::new(&format!(r"(?i){lead}\b(?P<num>{word})\s+{tail}"))
                    .map(|re| (*value, re))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let compound = Regex::new(&format!(
            r"(?i){lead}\b(?P<tens>{TENS})[-\s]+(?P<ones>{ONES})\s+{tail}"
        ))?;

        Ok(Self {
            digits,
            words,
            compound,
        })
    }

    /// Builds a phrase with no lead, i.e. a number immediately before `tail`
    ///
    /// # Errors
    /// Returns error if `tail` is not a valid regex fragment
    pub fn trailing(tail: &str) -> Result<Self, PatternError> {
        Self::new("", tail)
    }

    /// Every digit-run match, leftmost first
    pub fn digit_matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = PhraseMatch> + 'a {
        self.digits.captures_iter(text).filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(PhraseMatch {
                number: NumberToken {
                    value: canonical_digits(caps.name("digits")?.as_str()),
                    span: whole.range(),
                },
                word: caps.name("word").map(|m| m.as_str().to_owned()),
            })
        })
    }

    /// The first match of each single number word, in list order
    pub fn word_matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = PhraseMatch> + 'a {
        self.words.iter().filter_map(move |(value, re)| {
            let caps = re.captures_iter(text).find(|caps| {
                caps.name("num")
                    .is_some_and(|num| !within_compound(text, num.range(), *value))
            })?;
            let whole = caps.get(0)?;
            Some(PhraseMatch {
                number: NumberToken {
                    value: value.to_string(),
                    span: whole.range(),
                },
                word: caps.name("word").map(|m| m.as_str().to_owned()),
            })
        })
    }

    /// Every tens+ones compound match, leftmost first
    pub fn compound_matches<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = PhraseMatch> + 'a {
        self.compound.captures_iter(text).filter_map(|caps| {
            let whole = caps.get(0)?;
            let value = compose(caps.name("tens")?.as_str(), caps.name("ones")?.as_str())?;
            Some(PhraseMatch {
                number: NumberToken {
                    value: value.to_string(),
                    span: whole.range(),
                },
                word: caps.name("word").map(|m| m.as_str().to_owned()),
            })
        })
    }

    /// First match by priority: digits, then single words, then compounds
    #[must_use]
    pub fn find(&self, text: &str) -> Option<PhraseMatch> {
        self.digit_matches(text)
            .next()
            .or_else(|| self.word_matches(text).next())
            .or_else(|| self.compound_matches(text).next())
    }
}

/// Decodes a single number word, case-insensitively
#[must_use]
pub fn decode_word(word: &str) -> Option<u8> {
    let lower = word.trim().to_lowercase();
    NUMBER_WORDS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, value)| *value)
}

/// Decodes a `<tens>[-\s]+<ones>` compound such as "forty-seven"
#[must_use]
pub fn decode_compound(phrase: &str) -> Option<u8> {
    let caps = COMPOUND_EXACT.captures(phrase)?;
    compose(caps.get(1)?.as_str(), caps.get(2)?.as_str())
}

/// Finds a number immediately followed by whitespace and `trailing`
///
/// # Errors
/// Returns error if `trailing` is not a valid regex fragment
pub fn extract_number_before_word(
    text: &str,
    trailing: &str,
) -> Result<Option<NumberToken>, PatternError> {
    let phrase = NumberPhrase::trailing(trailing)?;
    Ok(phrase.find(text).map(|m| m.number))
}

/// Finds any number in `text`: a digit run, then a number word, then a compound
#[must_use]
pub fn extract_any_number(text: &str) -> Option<NumberToken> {
    if let Some(m) = ANY_DIGITS.find(text) {
        return Some(NumberToken {
            value: canonical_digits(m.as_str()),
            span: m.range(),
        });
    }

    for (value, re) in ANY_WORDS.iter() {
        if let Some(m) = re
            .find_iter(text)
            .find(|m| !within_compound(text, m.range(), *value))
        {
            return Some(NumberToken {
                value: value.to_string(),
                span: m.range(),
            });
        }
    }

    let caps = ANY_COMPOUND.captures(text)?;
    let whole = caps.get(0)?;
    let value = compose(caps.get(1)?.as_str(), caps.get(2)?.as_str())?;
    Some(NumberToken {
        value: value.to_string(),
        span: whole.range(),
    })
}

/// True if the number word at `span` is one half of a tens+ones compound
fn within_compound(text: &str, span: Range<usize>, value: u8) -> bool {
    let ones_half = (1..=9).contains(&value) && COMPOUND_BEFORE.is_match(&text[..span.start]);
    let tens_half = value >= 20 && COMPOUND_AFTER.is_match(&text[span.end..]);
    ones_half || tens_half
}

fn compose(tens: &str, ones: &str) -> Option<u8> {
    Some(decode_word(tens)? + decode_word(ones)?)
}

/// Strips leading zeros so "007" reads as "7" and "000" as "0"
pub(crate) fn canonical_digits(run: &str) -> String {
    let trimmed = run.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Compiles a built-in pattern
#[allow(clippy::expect_used)] // patterns are string constants covered by tests
pub(crate) fn static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

/// Compiles a built-in number phrase
#[allow(clippy::expect_used)] // patterns are string constants covered by tests
pub(crate) fn static_phrase(lead: &str, tail: &str) -> NumberPhrase {
    NumberPhrase::new(lead, tail).expect("built-in number phrase must compile")
}
