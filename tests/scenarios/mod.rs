//! Scenario-based tests for the scaffolding pipeline

mod cleanup;
mod failure_handling;
mod resume;
