//! Record filters for listing and route subsets

use shared::{Column, ContractRecord, ContractStatus};

use crate::error::EngineResult;

/// Conjunction of field equality pairs plus the listing extras: a
/// case-insensitive company-name search and a status set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    equals: Vec<(Column, String)>,
    name_query: Option<String>,
    statuses: Vec<ContractStatus>,
}

impl RecordFilter {
    /// Filter that matches every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(column header, value)` pairs
    pub fn from_pairs(pairs: &[(&str, &str)]) -> EngineResult<Self> {
        pairs.iter().try_fold(Self::new(), |filter, (column, value)| {
            Ok(filter.eq(column.parse::<Column>()?, *value))
        })
    }

    /// Require `column` to equal `value` in its persisted text form
    pub fn eq(mut self, column: Column, value: impl Into<String>) -> Self {
        self.equals.push((column, value.into()));
        self
    }

    /// Shorthand for the agent's own contracts
    pub fn manager(self, manager: impl Into<String>) -> Self {
        self.eq(Column::Manager, manager)
    }

    /// Company names containing `query`, ignoring case. Blank queries are ignored.
    pub fn name_contains(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        let trimmed = query.trim();
        self.name_query = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// Records whose status is one of `statuses`. An empty set does not filter.
    pub fn status_in(mut self, statuses: impl IntoIterator<Item = ContractStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_empty() && self.name_query.is_none() && self.statuses.is_empty()
    }

    pub fn matches(&self, record: &ContractRecord) -> bool {
        let equals = self
            .equals
            .iter()
            .all(|(column, value)| record.column_text(*column) == *value);
        let name = self
            .name_query
            .as_ref()
            .is_none_or(|query| record.company_name.to_lowercase().contains(query));
        let status = self.statuses.is_empty() || self.statuses.contains(&record.status);
        equals && name && status
    }

    /// Matching records, preserving input order
    pub fn apply<'a, I>(&self, records: I) -> Vec<ContractRecord>
    where
        I: IntoIterator<Item = &'a ContractRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn records() -> Vec<ContractRecord> {
        vec![
            ContractRecord::new("C1", "Alpha Tech").with_manager("Alice"),
            ContractRecord::new("C2", "Beta Corp")
                .with_manager("Alice")
                .with_status(ContractStatus::Done),
            ContractRecord::new("C3", "alphabet soup").with_manager("Bob"),
        ]
    }

    fn numbers(records: &[ContractRecord]) -> Vec<&str> {
        records.iter().map(|r| r.contract_no.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all_in_order() {
        let all = records();
        assert_eq!(numbers(&RecordFilter::new().apply(&all)), vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn test_equality_pairs_are_conjunctive() {
        let all = records();
        let filter = RecordFilter::from_pairs(&[("Manager", "Alice"), ("Status", "완료")]).unwrap();
        assert_eq!(numbers(&filter.apply(&all)), vec!["C2"]);
    }

    #[test]
    fn test_name_search_ignores_case() {
        let all = records();
        let filter = RecordFilter::new().name_contains("ALPHA");
        assert_eq!(numbers(&filter.apply(&all)), vec!["C1", "C3"]);

        let blank = RecordFilter::new().name_contains("   ");
        assert!(blank.is_empty());
    }

    #[test]
    fn test_status_set() {
        let all = records();
        let filter = RecordFilter::new()
            .manager("Alice")
            .status_in([ContractStatus::Unconfirmed, ContractStatus::InProgress]);
        assert_eq!(numbers(&filter.apply(&all)), vec!["C1"]);

        let unrestricted = RecordFilter::new().status_in(Vec::<ContractStatus>::new());
        assert_eq!(unrestricted.apply(&all).len(), 3);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let result = RecordFilter::from_pairs(&[("Nickname", "x")]);
        assert!(matches!(result, Err(EngineError::SharedError(_))));
    }
}
