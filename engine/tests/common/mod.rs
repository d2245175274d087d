//! Common test utilities and infrastructure
//!
//! Shared fixtures and builders used across the engine test suites.

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{EngineBuilder, TestHelpers};
