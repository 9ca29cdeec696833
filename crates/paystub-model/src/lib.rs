pub mod context;
pub mod country;
pub mod locale;
pub mod record;
pub mod report;

pub use context::{BatchContext, DEFAULT_COMPANY};
pub use country::{Country, UnknownCountry};
pub use locale::{Labels, labels};
pub use record::{AmountError, MoneyAmounts, PayrollRecord, REQUIRED_COLUMNS};
pub use report::{BatchReport, DeliveryOutcome};
