//! Location enrichment and route engine for field sales
//!
//! This library keeps the canonical contract table, resolves missing customer
//! coordinates through a rate-limited geocoder, caches the enriched view, and
//! orders visits nearest-first from the agent's position.

pub mod config;
pub mod core;
pub mod engine_impl;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::{EngineConfig, GeocoderConfig};
pub use self::core::{FieldMapping, ImportReport, RawRow, RecordFilter, RoutePlan, RouteStop};
pub use engine_impl::LocationEngine;
pub use error::{EngineError, EngineResult};
pub use traits::*;
pub use types::*;
pub use services::*;
