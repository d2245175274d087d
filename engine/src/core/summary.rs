//! Per-status totals for the admin dashboard

use shared::{ContractRecord, ContractStatus};

use crate::types::StatusSummary;

pub fn summarize(records: &[ContractRecord]) -> StatusSummary {
    records.iter().fold(
        StatusSummary {
            total: records.len(),
            ..StatusSummary::default()
        },
        |mut summary, record| {
            match record.status {
                ContractStatus::Unconfirmed => {
                    summary.unconfirmed += 1;
                    summary.unconfirmed_records.push(record.clone());
                }
                ContractStatus::InProgress => summary.in_progress += 1,
                ContractStatus::Done => summary.done += 1,
            }
            if record.checked {
                summary.checked += 1;
            }
            summary
        },
    )
}
