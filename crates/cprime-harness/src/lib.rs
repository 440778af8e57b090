//! Scenario harness for the cprime runtime.
//!
//! This crate provides:
//! - Scenarios: self-checking runs of the exception channel and readers
//! - Runner: executes scenarios and records one JSONL entry per run
//! - Structured log: JSONL records plus validation of emitted logs

#![forbid(unsafe_code)]

pub mod error;
pub mod runner;
pub mod scenarios;
pub mod structured_log;

pub use error::HarnessError;
pub use runner::{ScenarioRunner, Summary};
pub use scenarios::{SCENARIOS, Scenario, ScenarioReport};
