use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Countries the payroll service is registered for.
///
/// This is a closed set: anything outside it is rejected at the submission
/// boundary, so downstream code can rely on every locale lookup resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "do")]
    DominicanRepublic,
    #[serde(rename = "usa")]
    UnitedStates,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Country not defined. Only registered Dominican Republic (\"do\") and United States (\"usa\"), got '{code}'"
)]
pub struct UnknownCountry {
    pub code: String,
}

impl Country {
    /// Parse a submission country code, case-insensitively.
    pub fn from_code(code: &str) -> Result<Self, UnknownCountry> {
        match code.trim().to_ascii_lowercase().as_str() {
            "do" => Ok(Self::DominicanRepublic),
            "usa" => Ok(Self::UnitedStates),
            other => Err(UnknownCountry {
                code: other.to_string(),
            }),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::DominicanRepublic => "do",
            Self::UnitedStates => "usa",
        }
    }
}

impl Default for Country {
    fn default() -> Self {
        Self::DominicanRepublic
    }
}
