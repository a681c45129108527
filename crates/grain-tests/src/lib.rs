//! Integration tests for the grain crates.
//!
//! This crate contains end-to-end tests that exercise `grain-core` and
//! `grain-ops` together: blend-mode laws, the fitting postcondition, the
//! overlay orchestration and the synthesis seeding rule.

pub mod digest;
