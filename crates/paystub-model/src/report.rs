use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

/// The result of one delivery attempt for one row.
///
/// Created exactly once per processed row and immutable afterwards. The
/// serialized form is the wire entry
/// `{"email", "status", "timestamp", "error"?}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Success {
        recipient: String,
        timestamp: String,
    },
    Failure {
        recipient: String,
        timestamp: String,
        reason: String,
    },
}

impl DeliveryOutcome {
    pub fn recipient(&self) -> &str {
        match self {
            Self::Success { recipient, .. } | Self::Failure { recipient, .. } => recipient,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Self::Success { timestamp, .. } | Self::Failure { timestamp, .. } => timestamp,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }
}

impl Serialize for DeliveryOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { recipient, timestamp } => {
                let mut entry = serializer.serialize_struct("DeliveryOutcome", 3)?;
                entry.serialize_field("email", recipient)?;
                entry.serialize_field("status", "success")?;
                entry.serialize_field("timestamp", timestamp)?;
                entry.end()
            }
            Self::Failure {
                recipient,
                timestamp,
                reason,
            } => {
                let mut entry = serializer.serialize_struct("DeliveryOutcome", 4)?;
                entry.serialize_field("email", recipient)?;
                entry.serialize_field("status", "failure")?;
                entry.serialize_field("error", reason)?;
                entry.serialize_field("timestamp", timestamp)?;
                entry.end()
            }
        }
    }
}

/// Ordered per-row outcomes for one processed batch.
///
/// Length always equals the number of validated rows processed; batches
/// rejected at validation never construct a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub email_results: Vec<DeliveryOutcome>,
}

impl BatchReport {
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            email_results: Vec::with_capacity(rows),
        }
    }

    pub fn push(&mut self, outcome: DeliveryOutcome) {
        self.email_results.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.email_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.email_results.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.email_results.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.email_results.len() - self.success_count()
    }
}
