//! Core domain types for Venosim.
//!
//! This crate is deliberately free of IO and async: everything here is a
//! plain value that the engine, provider, and renderer crates agree on.
//!
//! - [`Stage`] - the discrete phases of the simulated disease narrative
//! - [`Explanation`] / [`Severity`] - the structured text payload produced
//!   by the explanation provider
//! - [`RequestSeq`] - monotonically increasing explanation request id used
//!   to discard stale responses
//! - [`ApiKey`] - Gemini credential with a redacting `Debug` impl

mod explanation;
mod ids;
mod secret;
mod stage;

pub use explanation::{Explanation, ExplanationError, Severity};
pub use ids::RequestSeq;
pub use secret::ApiKey;
pub use stage::Stage;
