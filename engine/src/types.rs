//! Engine data types

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{Column, ContractRecord, ContractStatus};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Why a single address could not be resolved. Every variant is treated as
/// "unresolved" by the enrichment pass; none of them abort it.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeFailure {
    NoMatch,
    Timeout,
    RateLimited,
    ServiceUnavailable(String),
    InvalidResponse(String),
    NetworkError(String),
}

impl fmt::Display for GeocodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeFailure::NoMatch => write!(f, "no match"),
            GeocodeFailure::Timeout => write!(f, "request timed out"),
            GeocodeFailure::RateLimited => write!(f, "rate limited by service"),
            GeocodeFailure::ServiceUnavailable(status) => write!(f, "service unavailable ({status})"),
            GeocodeFailure::InvalidResponse(reason) => write!(f, "invalid response: {reason}"),
            GeocodeFailure::NetworkError(reason) => write!(f, "network error: {reason}"),
        }
    }
}

/// A write to one of the mutable fields of a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    Status(ContractStatus),
    Checked(bool),
}

impl FieldUpdate {
    /// Parse a `(field name, value)` pair as supplied by a form
    pub fn parse(field: &str, value: &str) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
        };
        match field.parse::<Column>().map_err(|_| invalid())? {
            Column::Status => Ok(FieldUpdate::Status(value.parse().map_err(|_| invalid())?)),
            Column::Checked => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(FieldUpdate::Checked(true)),
                "false" | "0" | "no" => Ok(FieldUpdate::Checked(false)),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }

    pub fn column(&self) -> Column {
        match self {
            FieldUpdate::Status(_) => Column::Status,
            FieldUpdate::Checked(_) => Column::Checked,
        }
    }

    pub(crate) fn apply(&self, record: &mut ContractRecord) {
        match *self {
            FieldUpdate::Status(status) => record.status = status,
            FieldUpdate::Checked(checked) => record.checked = checked,
        }
    }
}

/// A point-in-time, coordinate-complete copy of the record table
#[derive(Debug, Clone)]
pub struct EnrichedSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub records: Arc<Vec<ContractRecord>>,
    /// Records still lacking coordinates after this pass
    pub unresolved: usize,
    /// Geocoder calls issued to build this snapshot
    pub geocoder_calls: usize,
}

impl EnrichedSnapshot {
    pub fn new(records: Vec<ContractRecord>, geocoder_calls: usize) -> Self {
        let unresolved = records.iter().filter(|r| !r.is_located()).count();
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            records: Arc::new(records),
            unresolved,
            geocoder_calls,
        }
    }

    pub fn get(&self, contract_no: &str) -> Option<&ContractRecord> {
        self.records.iter().find(|r| r.contract_no == contract_no)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-status totals for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSummary {
    pub total: usize,
    pub unconfirmed: usize,
    pub in_progress: usize,
    pub done: usize,
    pub checked: usize,
    /// Records still awaiting confirmation, in store order
    pub unconfirmed_records: Vec<ContractRecord>,
}
