//! Habit Voice - turns spoken transcript segments into habit log entries
//!
//! The core is a deterministic rule cascade that reads at most one
//! `(name, quantity, unit)` activity from each finalized transcript segment,
//! plus a normalizer that reconciles free-form names with the user's
//! registry of tracked activities.

/// Activation and existence checks
pub mod admission;
/// Configuration management
pub mod config;
/// Transcript-to-activity extraction engine
pub mod extraction;
/// Activity name normalization against the registry
pub mod normalize;
/// Normalization, validation and storage of detected activities
pub mod recorder;
/// Tracked activity registry
pub mod registry;
/// Transcript session accumulation
pub mod session;
/// Logging setup
pub mod telemetry;
