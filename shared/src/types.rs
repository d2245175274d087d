//! Core shared types: contract records, statuses, coordinates and table columns

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SharedError;

/// Placeholder written to the Stop Start Date column when no date is set
pub const NO_DATE: &str = "-";

/// Default values applied to optional fields when a row omits them
pub mod defaults {
    pub const MANAGER: &str = "unassigned";
    pub const ADDRESS: &str = "no address";
    pub const CONTACT: &str = "no contact";
    pub const STOP_REASON: &str = "normal";
}

/// Logical component emitting log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentId {
    RecordStore,
    Geocoder,
    EnrichmentCache,
    RouteOptimizer,
    Importer,
    Engine,
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::RecordStore => write!(f, "record_store"),
            ComponentId::Geocoder => write!(f, "geocoder"),
            ComponentId::EnrichmentCache => write!(f, "enrichment_cache"),
            ComponentId::RouteOptimizer => write!(f, "route_optimizer"),
            ComponentId::Importer => write!(f, "importer"),
            ComponentId::Engine => write!(f, "engine"),
        }
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a coordinate from two optional halves; a pair with a missing
    /// or non-finite half is treated as absent.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(Self::new(lat, lng)),
            _ => None,
        }
    }

    /// Planar Euclidean distance in degree space
    pub fn planar_distance(&self, other: &Coordinate) -> f64 {
        (self.latitude - other.latitude).hypot(self.longitude - other.longitude)
    }

    /// Shift both axes by the same number of degrees
    pub fn offset(&self, degrees: f64) -> Self {
        Self::new(self.latitude + degrees, self.longitude + degrees)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = SharedError;

    /// Parses `"lat,lng"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SharedError::InvalidCoordinate { input: s.to_string() };
        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
        Coordinate::from_parts(Some(lat), Some(lng)).ok_or_else(invalid)
    }
}

/// Visit status of a contract. Persisted with its Korean label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContractStatus {
    #[default]
    #[serde(rename = "미확인")]
    Unconfirmed,
    #[serde(rename = "진행중")]
    InProgress,
    #[serde(rename = "완료")]
    Done,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 3] = [
        ContractStatus::Unconfirmed,
        ContractStatus::InProgress,
        ContractStatus::Done,
    ];

    /// Label used in the persisted table
    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::Unconfirmed => "미확인",
            ContractStatus::InProgress => "진행중",
            ContractStatus::Done => "완료",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContractStatus {
    type Err = SharedError;

    /// Accepts the persisted Korean label or the English variant name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "미확인" | "Unconfirmed" => Ok(ContractStatus::Unconfirmed),
            "진행중" | "InProgress" => Ok(ContractStatus::InProgress),
            "완료" | "Done" => Ok(ContractStatus::Done),
            other => Err(SharedError::InvalidStatus { input: other.to_string() }),
        }
    }
}

/// Columns of the persisted contract table, in schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Branch,
    ContractNo,
    CompanyName,
    MonthlyFee,
    Manager,
    Contact,
    Address,
    StopReason,
    StopStartDate,
    StopDays,
    Latitude,
    Longitude,
    Status,
    Checked,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Branch,
        Column::ContractNo,
        Column::CompanyName,
        Column::MonthlyFee,
        Column::Manager,
        Column::Contact,
        Column::Address,
        Column::StopReason,
        Column::StopStartDate,
        Column::StopDays,
        Column::Latitude,
        Column::Longitude,
        Column::Status,
        Column::Checked,
    ];

    /// Header name in the persisted table
    pub fn header(&self) -> &'static str {
        match self {
            Column::Branch => "Branch",
            Column::ContractNo => "Contract No",
            Column::CompanyName => "Company Name",
            Column::MonthlyFee => "Monthly Fee",
            Column::Manager => "Manager",
            Column::Contact => "Contact",
            Column::Address => "Address",
            Column::StopReason => "Stop Reason",
            Column::StopStartDate => "Stop Start Date",
            Column::StopDays => "Stop Days",
            Column::Latitude => "Latitude",
            Column::Longitude => "Longitude",
            Column::Status => "Status",
            Column::Checked => "Checked",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Column::ALL
            .into_iter()
            .find(|column| column.header().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SharedError::UnknownColumn { name: trimmed.to_string() })
    }
}

/// One customer contract row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ContractRow", into = "ContractRow")]
pub struct ContractRecord {
    pub branch: String,
    pub contract_no: String,
    pub company_name: String,
    monthly_fee: f64,
    pub manager: String,
    pub contact: String,
    pub address: String,
    pub stop_reason: String,
    pub stop_start_date: Option<NaiveDate>,
    pub stop_days: u32,
    pub position: Option<Coordinate>,
    pub status: ContractStatus,
    pub checked: bool,
}

impl ContractRecord {
    /// Create a record with every optional field at its default
    pub fn new(contract_no: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            branch: String::new(),
            contract_no: contract_no.into(),
            company_name: company_name.into(),
            monthly_fee: 0.0,
            manager: defaults::MANAGER.to_string(),
            contact: defaults::CONTACT.to_string(),
            address: defaults::ADDRESS.to_string(),
            stop_reason: defaults::STOP_REASON.to_string(),
            stop_start_date: None,
            stop_days: 0,
            position: None,
            status: ContractStatus::Unconfirmed,
            checked: false,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager = manager.into();
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_monthly_fee(mut self, fee: f64) -> Self {
        self.set_monthly_fee(fee);
        self
    }

    pub fn with_position(mut self, position: Coordinate) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_status(mut self, status: ContractStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_stop(mut self, reason: impl Into<String>, start: Option<NaiveDate>, days: u32) -> Self {
        self.stop_reason = reason.into();
        self.stop_start_date = start;
        self.stop_days = days;
        self
    }

    pub fn monthly_fee(&self) -> f64 {
        self.monthly_fee
    }

    /// Negative or non-finite fees are stored as zero
    pub fn set_monthly_fee(&mut self, fee: f64) {
        self.monthly_fee = if fee.is_finite() && fee > 0.0 { fee } else { 0.0 };
    }

    pub fn is_located(&self) -> bool {
        self.position.is_some()
    }

    /// Text form of a column, as it appears in the persisted table
    pub fn column_text(&self, column: Column) -> String {
        match column {
            Column::Branch => self.branch.clone(),
            Column::ContractNo => self.contract_no.clone(),
            Column::CompanyName => self.company_name.clone(),
            Column::MonthlyFee => format_number(self.monthly_fee),
            Column::Manager => self.manager.clone(),
            Column::Contact => self.contact.clone(),
            Column::Address => self.address.clone(),
            Column::StopReason => self.stop_reason.clone(),
            Column::StopStartDate => format_date(self.stop_start_date),
            Column::StopDays => self.stop_days.to_string(),
            Column::Latitude => self.position.map(|p| format_number(p.latitude)).unwrap_or_default(),
            Column::Longitude => self.position.map(|p| format_number(p.longitude)).unwrap_or_default(),
            Column::Status => self.status.label().to_string(),
            Column::Checked => self.checked.to_string(),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Parse a `YYYY-MM-DD` date; `-`, blanks and malformed text yield `None`
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == NO_DATE {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Column-shaped row used for the persisted table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContractRow {
    #[serde(rename = "Branch", default)]
    branch: String,
    #[serde(rename = "Contract No")]
    contract_no: String,
    #[serde(rename = "Company Name", default)]
    company_name: String,
    #[serde(rename = "Monthly Fee", default)]
    monthly_fee: f64,
    #[serde(rename = "Manager", default)]
    manager: Option<String>,
    #[serde(rename = "Contact", default)]
    contact: Option<String>,
    #[serde(rename = "Address", default)]
    address: Option<String>,
    #[serde(rename = "Stop Reason", default)]
    stop_reason: Option<String>,
    #[serde(rename = "Stop Start Date", default)]
    stop_start_date: Option<String>,
    #[serde(rename = "Stop Days", default)]
    stop_days: i64,
    #[serde(rename = "Latitude", default)]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", default)]
    longitude: Option<f64>,
    #[serde(rename = "Status", default)]
    status: ContractStatus,
    #[serde(rename = "Checked", default)]
    checked: bool,
}

impl From<ContractRow> for ContractRecord {
    fn from(row: ContractRow) -> Self {
        let mut record = ContractRecord {
            branch: row.branch,
            contract_no: row.contract_no,
            company_name: row.company_name,
            monthly_fee: 0.0,
            manager: row.manager.unwrap_or_else(|| defaults::MANAGER.to_string()),
            contact: row.contact.unwrap_or_else(|| defaults::CONTACT.to_string()),
            address: row.address.unwrap_or_else(|| defaults::ADDRESS.to_string()),
            stop_reason: row.stop_reason.unwrap_or_else(|| defaults::STOP_REASON.to_string()),
            stop_start_date: row.stop_start_date.as_deref().and_then(parse_date),
            stop_days: u32::try_from(row.stop_days).unwrap_or(0),
            position: Coordinate::from_parts(row.latitude, row.longitude),
            status: row.status,
            checked: row.checked,
        };
        record.set_monthly_fee(row.monthly_fee);
        record
    }
}

impl From<ContractRecord> for ContractRow {
    fn from(record: ContractRecord) -> Self {
        ContractRow {
            stop_start_date: Some(format_date(record.stop_start_date)),
            branch: record.branch,
            contract_no: record.contract_no,
            company_name: record.company_name,
            monthly_fee: record.monthly_fee,
            manager: Some(record.manager),
            contact: Some(record.contact),
            address: Some(record.address),
            stop_reason: Some(record.stop_reason),
            stop_days: i64::from(record.stop_days),
            latitude: record.position.map(|p| p.latitude),
            longitude: record.position.map(|p| p.longitude),
            status: record.status,
            checked: record.checked,
        }
    }
}
