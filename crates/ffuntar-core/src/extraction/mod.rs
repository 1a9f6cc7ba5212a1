//! The per-entry deduplicating extraction pipeline.
//!
//! A regular entry flows through three stages:
//!
//! 1. [`resolve`] maps its path to a candidate in the reference directory
//! 2. [`compare`] reads the entry stream and the candidate in lockstep
//! 3. [`materialize`] links, copies, or recovers the destination
//!
//! [`ExtractionEngine`] routes entries and applies the run's failure policy.

pub mod compare;
pub mod engine;
pub mod materialize;
pub mod outcome;
pub mod resolve;

pub use compare::ComparisonOutcome;
pub use compare::ComparisonState;
pub use compare::Comparator;
pub use engine::ExtractionEngine;
pub use materialize::Materializer;
pub use outcome::ExtractionOutcome;
pub use resolve::ReferenceResolver;
