pub mod enrichment;
pub mod filter;
pub mod import;
pub mod record_store;
pub mod route;
pub mod seed;
pub mod snapshot;
pub mod summary;

pub use enrichment::EnrichmentCache;
pub use filter::RecordFilter;
pub use import::{DefaultedField, FieldMapping, ImportReport, RawRow, SkipReason, SkippedRow, normalize_rows};
pub use record_store::{RecordStore, WriteSession};
pub use route::{Located, RoutePlan, RouteStop, fallback_origin, optimize, plan_route};
pub use seed::demo_records;
pub use snapshot::SnapshotCell;
pub use summary::summarize;
