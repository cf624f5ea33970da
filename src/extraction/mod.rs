/// Digit runs and spoken number words
pub mod numbers;
/// Cascade orchestration and the extraction result
pub mod pipeline;
/// The ordered extraction tiers
pub mod tiers;

pub use numbers::{
    decode_compound, decode_word, extract_any_number, extract_number_before_word, NumberToken,
};
pub use pipeline::{ExtractionPipeline, ExtractionResult};
pub use tiers::{ActivityCandidate, Tier};
