pub mod clock;
pub mod dispatcher;
pub mod message;
pub mod transport;

pub use clock::{TIMESTAMP_FORMAT, timestamp_now};
pub use dispatcher::Dispatcher;
pub use message::{attachment_name, body_text, build_message};
pub use transport::{DeliveryError, MailTransport, SmtpConfig, SmtpConfigError, SmtpMailer};
