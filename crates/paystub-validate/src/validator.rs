//! Batch-level validation gates.
//!
//! Three gates run in order, each short-circuiting the whole batch:
//!
//! 1. **Structural**: every required column must be present.
//! 2. **Email syntax**: the first invalid address rejects the batch,
//!    reporting the row and employee. Delivery itself is per-row, but one
//!    bad address deliberately blocks the entire submission.
//! 3. **Period parsing**: every `period` cell must match `%Y-%m-%d`.
//!
//! Money fields are not coerced here; they ride through as raw text and a
//! bad value surfaces later as that row's rendering failure.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use paystub_ingest::RawTable;
use paystub_model::{PayrollRecord, REQUIRED_COLUMNS};

use crate::email::{EmailSyntaxError, check_email};

/// Fixed date pattern for the `period` column.
pub const PERIOD_FORMAT: &str = "%Y-%m-%d";

/// A batch that passed every batch-level gate. Rows are in input order.
#[derive(Debug, Clone, Default)]
pub struct ValidatedBatch {
    pub records: Vec<PayrollRecord>,
}

impl ValidatedBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Why a whole batch was refused before any row was processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchRejection {
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Invalid email '{email}' for employee {employee} (row {row}): {reason}")]
    InvalidEmail {
        row: usize,
        employee: String,
        email: String,
        reason: EmailSyntaxError,
    },
    #[error("Invalid date format in period column: {source}")]
    InvalidPeriod {
        value: String,
        source: chrono::format::ParseError,
    },
}

/// Column positions of the required fields, resolved once per batch.
struct ColumnIndexes {
    full_name: usize,
    email: usize,
    position: usize,
    health_discount: usize,
    social_discount: usize,
    taxes_discount: usize,
    other_discount: usize,
    gross_salary: usize,
    gross_payment: usize,
    net_payment: usize,
    period: usize,
}

impl ColumnIndexes {
    fn resolve(table: &RawTable) -> Result<Self, BatchRejection> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(BatchRejection::MissingColumns(missing));
        }
        let index = |name: &str| table.column_index(name).unwrap_or_default();
        Ok(Self {
            full_name: index("full_name"),
            email: index("email"),
            position: index("position"),
            health_discount: index("health_discount_amount"),
            social_discount: index("social_discount_amount"),
            taxes_discount: index("taxes_discount_amount"),
            other_discount: index("other_discount_amount"),
            gross_salary: index("gross_salary"),
            gross_payment: index("gross_payment"),
            net_payment: index("net_payment"),
            period: index("period"),
        })
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Run all batch-level gates over a raw table.
pub fn validate_batch(table: &RawTable) -> Result<ValidatedBatch, BatchRejection> {
    let columns = ColumnIndexes::resolve(table)?;

    for (idx, row) in table.rows.iter().enumerate() {
        let email = cell(row, columns.email);
        if let Err(reason) = check_email(email) {
            return Err(BatchRejection::InvalidEmail {
                row: idx + 1,
                employee: cell(row, columns.full_name).to_string(),
                email: email.to_string(),
                reason,
            });
        }
    }

    let mut periods = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let raw = cell(row, columns.period);
        match NaiveDate::parse_from_str(raw, PERIOD_FORMAT) {
            Ok(period) => periods.push(period),
            Err(source) => {
                return Err(BatchRejection::InvalidPeriod {
                    value: raw.to_string(),
                    source,
                });
            }
        }
    }

    let records = table
        .rows
        .iter()
        .zip(periods)
        .map(|(row, period)| PayrollRecord {
            full_name: cell(row, columns.full_name).to_string(),
            email: cell(row, columns.email).to_string(),
            position: cell(row, columns.position).to_string(),
            period,
            health_discount_amount: cell(row, columns.health_discount).to_string(),
            social_discount_amount: cell(row, columns.social_discount).to_string(),
            taxes_discount_amount: cell(row, columns.taxes_discount).to_string(),
            other_discount_amount: cell(row, columns.other_discount).to_string(),
            gross_salary: cell(row, columns.gross_salary).to_string(),
            gross_payment: cell(row, columns.gross_payment).to_string(),
            net_payment: cell(row, columns.net_payment).to_string(),
        })
        .collect::<Vec<_>>();

    info!(rows = records.len(), "batch validated");
    Ok(ValidatedBatch { records })
}
