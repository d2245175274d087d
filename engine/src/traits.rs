//! Trait definitions with mockall annotations for testing
//!
//! The engine depends on two outside resources: the durable contract table and
//! the address resolution service. Both sit behind these traits so the record
//! store and enrichment cache can be exercised without disk or network.

use async_trait::async_trait;
use shared::{ContractRecord, Coordinate};

use crate::error::EngineResult;
use crate::types::GeocodeFailure;

/// Durable backing for the contract table
///
/// Every save is a whole-table rewrite; there is no row-level primitive.
#[mockall::automock]
#[async_trait]
pub trait TableStorage: Send + Sync {
    /// Load the persisted table
    ///
    /// # Returns
    /// `None` when nothing has been persisted yet, otherwise the rows in
    /// persisted order
    async fn load(&self) -> EngineResult<Option<Vec<ContractRecord>>>;

    /// Replace the persisted table with `rows`
    async fn save(&self, rows: &[ContractRecord]) -> EngineResult<()>;

    /// Human-readable location used in logs and errors
    fn location(&self) -> String;
}

/// Address to coordinate resolution
#[mockall::automock]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text address
    ///
    /// Implementations enforce their own rate limit; callers may invoke this
    /// from several tasks and calls will queue.
    async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeFailure>;
}
