//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! fund operations test suite.
//!
//! # Modules
//!
//! - `fixtures`: The bundled dataset, well-known ids, and ready-made services
//! - `builders`: Builder patterns for record construction
//! - `assertions`: Custom assertion helpers for aggregates and scores
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
