//! Core of the unique-names migration.
//!
//! Detects rows that would violate the new uniqueness constraints on
//! pipeline, run, model and model version identifiers, computes the
//! deterministic renames, and sequences them before the constraint DDL.

mod entity;
mod env_config;
mod error;
pub mod orchestrator;
mod resolve;
mod store_trait;

pub use entity::*;
pub use env_config::env_parse_with_default;
pub use error::*;
pub use orchestrator::MigrationReport;
pub use resolve::*;
pub use store_trait::*;
