//! Audit timestamps.
//!
//! Outcomes are stamped in the payroll operator's zone, not the server's
//! local zone. Santo Domingo is UTC-04:00 year round (no DST), so a fixed
//! offset is exact.

use chrono::{FixedOffset, Utc};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const AUDIT_OFFSET_HOURS: i32 = -4;

fn audit_zone() -> FixedOffset {
    FixedOffset::east_opt(AUDIT_OFFSET_HOURS * 3600).expect("offset within range")
}

/// Current time in the audit zone, formatted `YYYY-MM-DD HH:MM:SS`.
pub fn timestamp_now() -> String {
    Utc::now()
        .with_timezone(&audit_zone())
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
