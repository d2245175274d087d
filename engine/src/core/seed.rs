//! Demo contracts written on first start when no table exists

use shared::{ContractRecord, ContractStatus, Coordinate, defaults};

struct SeedRow {
    branch: &'static str,
    contract_no: &'static str,
    company_name: &'static str,
    monthly_fee: f64,
    manager: &'static str,
    contact: &'static str,
    address: &'static str,
    position: (f64, f64),
    status: ContractStatus,
    checked: bool,
}

const SEED: [SeedRow; 5] = [
    SeedRow {
        branch: "Seoul",
        contract_no: "C001",
        company_name: "Alpha Tech",
        monthly_fee: 100000.0,
        manager: "Alice",
        contact: "010-1111-2222",
        address: "Seoul City Hall",
        position: (37.5665, 126.9780),
        status: ContractStatus::Unconfirmed,
        checked: false,
    },
    SeedRow {
        branch: "Seoul",
        contract_no: "C002",
        company_name: "Beta Corp",
        monthly_fee: 150000.0,
        manager: "Alice",
        contact: "010-3333-4444",
        address: "Gangnam Station",
        position: (37.4979, 127.0276),
        status: ContractStatus::InProgress,
        checked: true,
    },
    SeedRow {
        branch: "Busan",
        contract_no: "C003",
        company_name: "Gamma Inc",
        monthly_fee: 120000.0,
        manager: "Bob",
        contact: "010-5555-6666",
        address: "Busan Station",
        position: (35.1152, 129.0422),
        status: ContractStatus::Done,
        checked: true,
    },
    SeedRow {
        branch: "Busan",
        contract_no: "C004",
        company_name: "Delta LLC",
        monthly_fee: 200000.0,
        manager: "Bob",
        contact: "010-7777-8888",
        address: "Haeundae Beach",
        position: (35.1587, 129.1604),
        status: ContractStatus::Unconfirmed,
        checked: false,
    },
    SeedRow {
        branch: "Daegu",
        contract_no: "C005",
        company_name: "Epsilon Co",
        monthly_fee: 90000.0,
        manager: "Charlie",
        contact: "010-9999-0000",
        address: "Dongdaegu Station",
        position: (35.8797, 128.6285),
        status: ContractStatus::InProgress,
        checked: true,
    },
];

/// Five located contracts across three branches and three managers
pub fn demo_records() -> Vec<ContractRecord> {
    SEED.iter()
        .map(|row| {
            ContractRecord::new(row.contract_no, row.company_name)
                .with_branch(row.branch)
                .with_monthly_fee(row.monthly_fee)
                .with_manager(row.manager)
                .with_contact(row.contact)
                .with_address(row.address)
                .with_position(Coordinate::new(row.position.0, row.position.1))
                .with_status(row.status)
                .with_checked(row.checked)
                .with_stop(defaults::STOP_REASON, None, 0)
        })
        .collect()
}
