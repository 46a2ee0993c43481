//! Fixture verification harness for frankenfmt.
//!
//! This crate provides:
//! - Fixture sets: JSON cases naming a core operation, its inputs and the
//!   expected textual output
//! - A runner that executes them under a width policy and diffs the results
//! - Markdown/JSON reports and JSONL structured logs of every run
//! - Environment configuration shared by the CLI

#![forbid(unsafe_code)]

pub mod config;
pub mod diff;
pub mod error;
pub mod exec;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use config::{HarnessConfig, WidthPolicy};
pub use error::HarnessError;
pub use fixtures::{FixtureArg, FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
