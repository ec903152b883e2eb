//! Application layer containing the orchestration of the order process.
//!
//! This module defines the `ScenarioRunner`, which sequences the steps of a
//! scripted scenario, calls the partner services through the domain ports
//! and reports progress to an observer.

pub mod runner;
