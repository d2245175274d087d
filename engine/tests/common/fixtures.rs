//! Test fixtures and data for engine tests

use std::collections::HashMap;

use engine::RawRow;
use shared::{ContractRecord, ContractStatus, Coordinate};

/// Standard test data
pub struct TestFixtures;

impl TestFixtures {
    pub const GANGNAM: &'static str = "Gangnam Station";
    pub const BUSAN: &'static str = "Busan Station";
    pub const UNKNOWN_ADDRESS: &'static str = "X";

    pub fn gangnam() -> Coordinate {
        Coordinate::new(37.4979, 127.0276)
    }

    pub fn busan() -> Coordinate {
        Coordinate::new(35.1152, 129.0422)
    }

    /// Agent origin used by the route scenarios
    pub fn origin() -> Coordinate {
        Coordinate::new(37.50, 127.00)
    }

    /// Two located contracts and two that still need geocoding
    pub fn mixed_records() -> Vec<ContractRecord> {
        vec![
            ContractRecord::new("C001", "Alpha Tech")
                .with_manager("Alice")
                .with_address("Seoul City Hall")
                .with_position(Coordinate::new(37.5665, 126.978)),
            ContractRecord::new("C002", "Beta Corp")
                .with_manager("Alice")
                .with_address(Self::GANGNAM)
                .with_status(ContractStatus::InProgress),
            ContractRecord::new("C003", "Gamma Inc")
                .with_manager("Bob")
                .with_address(Self::BUSAN),
            ContractRecord::new("C004", "Delta LLC")
                .with_manager("Bob")
                .with_address("Haeundae Beach")
                .with_position(Coordinate::new(35.1587, 129.1604)),
        ]
    }

    /// The three-record route scenario: A and B located, C not
    pub fn route_scenario() -> Vec<ContractRecord> {
        vec![
            ContractRecord::new("C", "Charlie Co").with_address(Self::UNKNOWN_ADDRESS),
            ContractRecord::new("B", "Bravo Co").with_position(Coordinate::new(37.55, 127.00)),
            ContractRecord::new("A", "Alpha Co").with_position(Coordinate::new(37.50, 127.01)),
        ]
    }

    /// Import rows keyed by the source spreadsheet's own headers
    pub fn spreadsheet_rows() -> Vec<RawRow> {
        let row = |pairs: &[(&str, &str)]| -> RawRow {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>()
        };
        vec![
            row(&[("계약번호", "K-100"), ("상호", "가나상사"), ("월정료", "120,000"), ("설치주소", "Gangnam Station")]),
            row(&[("계약번호", "K-200"), ("상호", "다라상사"), ("월정료", "abc"), ("설치주소", "Busan Station")]),
            row(&[("계약번호", ""), ("상호", "Nameless"), ("월정료", "5000"), ("설치주소", "Nowhere")]),
        ]
    }
}
