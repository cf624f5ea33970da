use tracing::debug;

/// One piece of a transcript delta from the speech recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptPiece {
    /// Text the recognizer will not revise
    Final(String),
    /// Provisional text that may still change
    Interim(String),
}

/// Result of applying one delta to the accumulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    /// Running transcript plus the current interim text, for display
    pub display: String,
    /// Finalized segment to hand to the extraction pipeline
    pub finalized: Option<String>,
    /// True while interim text is pending
    pub speaking: bool,
}

/// Running transcript for one listening session
///
/// Owned by the capture side; the extraction engine only ever sees the
/// finalized segments it hands out. The transcript is cleared when the
/// speaker starts talking again after a pause.
#[derive(Debug, Clone, Default)]
pub struct TranscriptAccumulator {
    transcript: String,
    speaking: bool,
}

impl TranscriptAccumulator {
    /// Empty accumulator, not speaking
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an ordered delta of pieces
    pub fn apply(&mut self, delta: &[TranscriptPiece]) -> SessionUpdate {
        let mut finals = String::new();
        let mut interim = String::new();

        for piece in delta {
            match piece {
                TranscriptPiece::Final(text) => {
                    finals.push_str(text);
                    finals.push(' ');
                }
                TranscriptPiece::Interim(text) => interim.push_str(text),
            }
        }

        let speaking = !interim.is_empty();
        if speaking && !self.speaking {
            debug!("speech started, resetting transcript");
            self.transcript.clear();
        }
        self.speaking = speaking;
        self.transcript.push_str(&finals);

        let finalized = finals.trim();
        SessionUpdate {
            display: format!("{}{interim}", self.transcript),
            finalized: (!finalized.is_empty()).then(|| finalized.to_owned()),
            speaking,
        }
    }

    /// Transcript of finalized text so far in this session
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// True while interim text is pending
    #[must_use]
    pub const fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Clears the transcript and the speaking flag
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.speaking = false;
    }
}
