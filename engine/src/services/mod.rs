//! Service implementations
//!
//! Real implementations of the engine's outside-facing traits: durable table
//! storage and the HTTP geocoder with its shared rate limiter.

pub mod json_storage;
pub mod memory_storage;
pub mod nominatim;
pub mod rate_limiter;

#[cfg(test)]
mod tests;

pub use json_storage::JsonTableStorage;
pub use memory_storage::MemoryTableStorage;
pub use nominatim::NominatimGeocoder;
pub use rate_limiter::RateLimiter;
