//! Tabular import with column mapping
//!
//! Raw rows arrive as `source column -> text`. A [`FieldMapping`] says which
//! source column feeds each importable field. Malformed numbers and dates fall
//! back to safe defaults and are reported; only rows without a contract number
//! (or repeating one already seen) are skipped.

use std::collections::{HashMap, HashSet};

use shared::{Column, ContractRecord, ComponentId, component_info, component_warn, defaults, parse_date};

/// One raw row keyed by source column name
pub type RawRow = HashMap<String, String>;

/// Fields the import tool can map, in display order
pub const IMPORT_FIELDS: [Column; 10] = [
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
];

/// Substrings that suggest a source column feeds a field
fn hints(field: Column) -> &'static [&'static str] {
    match field {
        Column::Branch => &["지사", "본부", "branch"],
        Column::ContractNo => &["계약번호", "계약", "번호", "contract"],
        Column::CompanyName => &["상호", "고객사", "이름", "name", "company"],
        Column::MonthlyFee => &["월정료", "금액", "fee"],
        Column::Manager => &["사원", "담당자", "manager"],
        Column::Contact => &["휴대폰", "연락처", "전화번호", "phone", "contact"],
        Column::Address => &["주소", "설치주소", "address"],
        Column::StopReason => &["정지사유", "사유", "reason"],
        Column::StopStartDate => &["정지시작일자", "정지일자", "date"],
        Column::StopDays => &["당월말_정지일수", "정지일수", "days"],
        _ => &[],
    }
}

/// Which source column feeds each importable field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMapping {
    columns: HashMap<Column, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every importable field to the source column of the same header name
    pub fn identity() -> Self {
        IMPORT_FIELDS
            .iter()
            .fold(Self::new(), |mapping, field| mapping.map(*field, field.header()))
    }

    pub fn map(mut self, field: Column, source: impl Into<String>) -> Self {
        self.columns.insert(field, source.into());
        self
    }

    pub fn source(&self, field: Column) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    /// Guess a source column for every importable field. The first column
    /// (in source order) containing any of the field's hints wins; fields with
    /// no matching column stay unmapped and import as defaults.
    pub fn guess(source_columns: &[String]) -> Self {
        IMPORT_FIELDS.iter().fold(Self::new(), |mapping, field| {
            let guessed = source_columns.iter().find(|column| {
                let lowered = column.to_lowercase();
                hints(*field).iter().any(|hint| lowered.contains(hint))
            });
            match guessed {
                Some(column) => mapping.map(*field, column.clone()),
                None => mapping,
            }
        })
    }
}

/// Why a row was not imported
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingContractNo,
    DuplicateContractNo(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 0-based position in the input
    pub row: usize,
    pub reason: SkipReason,
}

/// A malformed value replaced by its default
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultedField {
    pub row: usize,
    pub contract_no: String,
    pub field: Column,
    pub raw: String,
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
    pub defaulted: Vec<DefaultedField>,
}

/// Normalize raw rows into contract records.
///
/// Imported records start unconfirmed, unchecked and without coordinates.
pub fn normalize_rows(rows: &[RawRow], mapping: &FieldMapping) -> (Vec<ContractRecord>, ImportReport) {
    let mut report = ImportReport::default();
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for (index, raw) in rows.iter().enumerate() {
        let value = |field: Column| -> Option<&str> {
            mapping
                .source(field)
                .and_then(|source| raw.get(source))
                .map(|text| text.trim())
                .filter(|text| !text.is_empty())
        };

        let Some(contract_no) = value(Column::ContractNo) else {
            report.skipped.push(SkippedRow { row: index, reason: SkipReason::MissingContractNo });
            continue;
        };
        if !seen.insert(contract_no.to_string()) {
            report.skipped.push(SkippedRow {
                row: index,
                reason: SkipReason::DuplicateContractNo(contract_no.to_string()),
            });
            continue;
        }

        let text = |field: Column, default: &str| value(field).unwrap_or(default).to_string();
        let mut record = ContractRecord::new(contract_no, text(Column::CompanyName, ""))
            .with_branch(text(Column::Branch, ""))
            .with_manager(text(Column::Manager, defaults::MANAGER))
            .with_contact(text(Column::Contact, defaults::CONTACT))
            .with_address(text(Column::Address, defaults::ADDRESS));
        record.stop_reason = text(Column::StopReason, defaults::STOP_REASON);

        let mut defaulted = |field: Column, raw: &str| {
            report.defaulted.push(DefaultedField {
                row: index,
                contract_no: contract_no.to_string(),
                field,
                raw: raw.to_string(),
            });
        };

        if let Some(raw_fee) = value(Column::MonthlyFee) {
            match parse_amount(raw_fee) {
                Some(fee) => record.set_monthly_fee(fee),
                None => defaulted(Column::MonthlyFee, raw_fee),
            }
        }

        if let Some(raw_days) = value(Column::StopDays) {
            match parse_days(raw_days) {
                Some(days) => record.stop_days = days,
                None => defaulted(Column::StopDays, raw_days),
            }
        }

        if let Some(raw_date) = value(Column::StopStartDate) {
            record.stop_start_date = parse_date(raw_date).or_else(|| raw_date.get(..10).and_then(parse_date));
            if record.stop_start_date.is_none() && raw_date != shared::NO_DATE {
                defaulted(Column::StopStartDate, raw_date);
            }
        }

        records.push(record);
    }

    report.imported = records.len();
    for field in &report.defaulted {
        component_warn!(
            ComponentId::Importer,
            "Row {} ({}): malformed {} '{}' replaced by default",
            field.row,
            field.contract_no,
            field.field,
            field.raw
        );
    }
    component_info!(
        ComponentId::Importer,
        "📥 Normalized {} rows: {} imported, {} skipped, {} defaulted values",
        rows.len(),
        report.imported,
        report.skipped.len(),
        report.defaulted.len()
    );

    (records, report)
}

/// Non-negative amount with thousands separators removed
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

/// Non-negative whole day count; spreadsheet floats like "3.0" are accepted
fn parse_days(raw: &str) -> Option<u32> {
    let days = raw.trim().parse::<f64>().ok()?;
    (days.is_finite() && days >= 0.0 && days.fract() == 0.0 && days <= f64::from(u32::MAX))
        .then_some(days as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::ContractStatus;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_malformed_fee_defaults_to_zero() {
        let rows = vec![row(&[("Contract No", "C1"), ("Company Name", "Alpha"), ("Monthly Fee", "abc")])];
        let (records, report) = normalize_rows(&rows, &FieldMapping::identity());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].monthly_fee(), 0.0);
        assert_eq!(report.defaulted.len(), 1);
        assert_eq!(report.defaulted[0].field, Column::MonthlyFee);
        assert_eq!(report.defaulted[0].raw, "abc");
    }

    #[test]
    fn test_missing_optional_fields_get_defaults() {
        let rows = vec![row(&[("Contract No", "C1")])];
        let (records, report) = normalize_rows(&rows, &FieldMapping::identity());

        let record = &records[0];
        assert_eq!(record.manager, "unassigned");
        assert_eq!(record.address, "no address");
        assert_eq!(record.contact, "no contact");
        assert_eq!(record.stop_reason, "normal");
        assert_eq!(record.stop_start_date, None);
        assert_eq!(record.stop_days, 0);
        assert_eq!(record.monthly_fee(), 0.0);
        assert_eq!(record.status, ContractStatus::Unconfirmed);
        assert!(!record.checked);
        assert!(report.defaulted.is_empty());
    }

    #[test]
    fn test_numeric_and_date_parsing() {
        let rows = vec![row(&[
            ("Contract No", "C1"),
            ("Monthly Fee", "100,000"),
            ("Stop Days", "3.0"),
            ("Stop Start Date", "2024-03-01 00:00:00"),
        ])];
        let (records, report) = normalize_rows(&rows, &FieldMapping::identity());

        assert_eq!(records[0].monthly_fee(), 100000.0);
        assert_eq!(records[0].stop_days, 3);
        assert_eq!(records[0].stop_start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(report.defaulted.is_empty());
    }

    #[test]
    fn test_negative_and_garbage_values_are_reported() {
        let rows = vec![row(&[
            ("Contract No", "C1"),
            ("Monthly Fee", "-5"),
            ("Stop Days", "two"),
            ("Stop Start Date", "someday"),
        ])];
        let (records, report) = normalize_rows(&rows, &FieldMapping::identity());

        assert_eq!(records[0].monthly_fee(), 0.0);
        assert_eq!(records[0].stop_days, 0);
        assert_eq!(records[0].stop_start_date, None);
        let fields: Vec<Column> = report.defaulted.iter().map(|d| d.field).collect();
        assert_eq!(fields, vec![Column::MonthlyFee, Column::StopDays, Column::StopStartDate]);
    }

    #[test]
    fn test_dash_date_is_not_malformed() {
        let rows = vec![row(&[("Contract No", "C1"), ("Stop Start Date", "-")])];
        let (_, report) = normalize_rows(&rows, &FieldMapping::identity());
        assert!(report.defaulted.is_empty());
    }

    #[test]
    fn test_rows_without_or_repeating_contract_no_are_skipped() {
        let rows = vec![
            row(&[("Contract No", "C1"), ("Company Name", "First")]),
            row(&[("Contract No", "  "), ("Company Name", "Blank")]),
            row(&[("Contract No", "C1"), ("Company Name", "Again")]),
            row(&[("Contract No", "C2"), ("Company Name", "Second")]),
        ];
        let (records, report) = normalize_rows(&rows, &FieldMapping::identity());

        assert_eq!(report.imported, 2);
        assert_eq!(records[0].company_name, "First");
        assert_eq!(
            report.skipped,
            vec![
                SkippedRow { row: 1, reason: SkipReason::MissingContractNo },
                SkippedRow { row: 2, reason: SkipReason::DuplicateContractNo("C1".to_string()) },
            ]
        );
    }

    #[test]
    fn test_custom_mapping() {
        let rows = vec![row(&[("계약번호", "K-1"), ("상호명", "가나상사"), ("설치주소", "서울시청")])];
        let mapping = FieldMapping::new()
            .map(Column::ContractNo, "계약번호")
            .map(Column::CompanyName, "상호명")
            .map(Column::Address, "설치주소");
        let (records, _) = normalize_rows(&rows, &mapping);

        assert_eq!(records[0].contract_no, "K-1");
        assert_eq!(records[0].company_name, "가나상사");
        assert_eq!(records[0].address, "서울시청");
    }

    #[test]
    fn test_guess_mapping_from_headers() {
        let columns: Vec<String> = ["지사", "계약번호", "상호", "월정료", "담당사원", "휴대폰", "설치주소", "정지사유", "정지시작일자", "당월말_정지일수"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let mapping = FieldMapping::guess(&columns);

        assert_eq!(mapping.source(Column::Branch), Some("지사"));
        assert_eq!(mapping.source(Column::ContractNo), Some("계약번호"));
        assert_eq!(mapping.source(Column::CompanyName), Some("상호"));
        assert_eq!(mapping.source(Column::MonthlyFee), Some("월정료"));
        assert_eq!(mapping.source(Column::Manager), Some("담당사원"));
        assert_eq!(mapping.source(Column::Contact), Some("휴대폰"));
        assert_eq!(mapping.source(Column::Address), Some("설치주소"));
        assert_eq!(mapping.source(Column::StopReason), Some("정지사유"));
        assert_eq!(mapping.source(Column::StopStartDate), Some("정지시작일자"));
        assert_eq!(mapping.source(Column::StopDays), Some("당월말_정지일수"));
    }

    #[test]
    fn test_guess_leaves_unmatched_fields_unmapped() {
        let columns = vec!["alpha".to_string(), "Customer Name".to_string()];
        let mapping = FieldMapping::guess(&columns);
        assert_eq!(mapping.source(Column::CompanyName), Some("Customer Name"));
        assert_eq!(mapping.source(Column::MonthlyFee), None);
        assert_eq!(FieldMapping::guess(&[]), FieldMapping::new());
    }
}
