//! Shared types for the field sales location engine
//!
//! Holds the contract record model and its persisted column layout, the shared
//! error type, and the tracing setup used by every component.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
