use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column headers every submitted batch must carry.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "full_name",
    "email",
    "position",
    "health_discount_amount",
    "social_discount_amount",
    "taxes_discount_amount",
    "other_discount_amount",
    "gross_salary",
    "gross_payment",
    "net_payment",
    "period",
];

/// One employee's payroll data for one period, after the batch-level gates.
///
/// The email has passed syntax validation and the period has parsed; the
/// seven money fields stay as the raw cell text. Coercing them is the
/// renderer's job: a bad amount fails that row's document, not the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    pub full_name: String,
    pub email: String,
    pub position: String,
    pub period: NaiveDate,
    pub health_discount_amount: String,
    pub social_discount_amount: String,
    pub taxes_discount_amount: String,
    pub other_discount_amount: String,
    pub gross_salary: String,
    pub gross_payment: String,
    pub net_payment: String,
}

/// The record's money fields coerced to numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneyAmounts {
    pub health_discount: f64,
    pub social_discount: f64,
    pub taxes_discount: f64,
    pub other_discount: f64,
    pub gross_salary: f64,
    pub gross_payment: f64,
    pub net_payment: f64,
}

impl MoneyAmounts {
    /// Sum of the four discount fields. Always computed, never read from
    /// the input.
    pub fn total_discounts(&self) -> f64 {
        self.health_discount + self.social_discount + self.taxes_discount + self.other_discount
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountError {
    #[error("field {field} has unparseable amount '{value}'")]
    Unparseable { field: &'static str, value: String },
    #[error("field {field} has negative amount {value}")]
    Negative { field: &'static str, value: f64 },
}

impl PayrollRecord {
    /// Coerce the raw money fields, rejecting unparseable or negative values.
    pub fn amounts(&self) -> Result<MoneyAmounts, AmountError> {
        Ok(MoneyAmounts {
            health_discount: parse_amount("health_discount_amount", &self.health_discount_amount)?,
            social_discount: parse_amount("social_discount_amount", &self.social_discount_amount)?,
            taxes_discount: parse_amount("taxes_discount_amount", &self.taxes_discount_amount)?,
            other_discount: parse_amount("other_discount_amount", &self.other_discount_amount)?,
            gross_salary: parse_amount("gross_salary", &self.gross_salary)?,
            gross_payment: parse_amount("gross_payment", &self.gross_payment)?,
            net_payment: parse_amount("net_payment", &self.net_payment)?,
        })
    }
}

fn parse_amount(field: &'static str, raw: &str) -> Result<f64, AmountError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed.parse().map_err(|_| AmountError::Unparseable {
        field,
        value: trimmed.to_string(),
    })?;
    if !value.is_finite() {
        return Err(AmountError::Unparseable {
            field,
            value: trimmed.to_string(),
        });
    }
    if value < 0.0 {
        return Err(AmountError::Negative { field, value });
    }
    Ok(value)
}
