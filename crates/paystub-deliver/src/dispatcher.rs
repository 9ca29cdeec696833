//! Per-row delivery with outcome classification.

use tracing::{info, warn};

use paystub_model::{BatchContext, DeliveryOutcome, PayrollRecord};

use crate::clock::timestamp_now;
use crate::message::build_message;
use crate::transport::{DeliveryError, MailTransport};

/// Sends one paystub to one recipient and classifies the result.
///
/// Delivery never bubbles an error: both arms fold into a
/// [`DeliveryOutcome`] so the caller's default control path is "record and
/// continue". One attempt per row, no retries.
pub struct Dispatcher<'a> {
    transport: &'a dyn MailTransport,
    sender: String,
}

impl<'a> Dispatcher<'a> {
    pub fn new(transport: &'a dyn MailTransport, sender: impl Into<String>) -> Self {
        Self {
            transport,
            sender: sender.into(),
        }
    }

    pub fn deliver(
        &self,
        record: &PayrollRecord,
        document: &[u8],
        context: &BatchContext,
    ) -> DeliveryOutcome {
        let recipient = record.email.clone();
        match self.try_deliver(record, document, context) {
            Ok(()) => {
                info!(recipient = %recipient, "paystub delivered");
                DeliveryOutcome::Success {
                    recipient,
                    timestamp: timestamp_now(),
                }
            }
            Err(error) => {
                warn!(recipient = %recipient, %error, "paystub delivery failed");
                DeliveryOutcome::Failure {
                    recipient,
                    timestamp: timestamp_now(),
                    reason: error.to_string(),
                }
            }
        }
    }

    fn try_deliver(
        &self,
        record: &PayrollRecord,
        document: &[u8],
        context: &BatchContext,
    ) -> Result<(), DeliveryError> {
        let message = build_message(&self.sender, record, document, context)?;
        self.transport.send(&message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use lettre::Message;
    use std::sync::Mutex;

    struct StubTransport {
        fail_with: Option<String>,
        sent: Mutex<Vec<Vec<u8>>>,
    }

    impl StubTransport {
        fn succeeding() -> Self {
            Self {
                fail_with: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                fail_with: Some(reason.to_string()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl MailTransport for StubTransport {
        fn send(&self, message: &Message) -> Result<(), DeliveryError> {
            if let Some(reason) = &self.fail_with {
                return Err(DeliveryError::Smtp(reason.clone()));
            }
            self.sent.lock().unwrap().push(message.formatted());
            Ok(())
        }
    }

    fn record() -> PayrollRecord {
        PayrollRecord {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            position: "Engineer".to_string(),
            period: chrono::NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            health_discount_amount: "100".to_string(),
            social_discount_amount: "200".to_string(),
            taxes_discount_amount: "300".to_string(),
            other_discount_amount: "50".to_string(),
            gross_salary: "5000".to_string(),
            gross_payment: "2500".to_string(),
            net_payment: "1850".to_string(),
        }
    }

    fn context() -> BatchContext {
        BatchContext::new(paystub_model::Country::UnitedStates, "acme")
    }

    fn assert_audit_timestamp(stamp: &str) {
        assert!(
            NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok(),
            "unexpected timestamp shape: {stamp}"
        );
    }

    #[test]
    fn successful_send_yields_success_outcome() {
        let transport = StubTransport::succeeding();
        let dispatcher = Dispatcher::new(&transport, "payroll@acme.example");
        let outcome = dispatcher.deliver(&record(), b"%PDF-fake", &context());

        assert!(outcome.is_success());
        assert_eq!(outcome.recipient(), "jane@example.com");
        assert_audit_timestamp(outcome.timestamp());
        assert_eq!(transport.sent_count(), 1);
    }

    #[test]
    fn transport_failure_yields_failure_outcome() {
        let transport = StubTransport::failing("connection refused");
        let dispatcher = Dispatcher::new(&transport, "payroll@acme.example");
        let outcome = dispatcher.deliver(&record(), b"%PDF-fake", &context());

        assert!(!outcome.is_success());
        assert!(outcome.failure_reason().unwrap().contains("connection refused"));
        assert_audit_timestamp(outcome.timestamp());
    }

    #[test]
    fn unbuildable_message_yields_failure_without_send() {
        let transport = StubTransport::succeeding();
        let dispatcher = Dispatcher::new(&transport, "payroll@acme.example");
        let mut bad = record();
        bad.email = "no spaces allowed@example".to_string();
        let outcome = dispatcher.deliver(&bad, b"", &context());

        assert!(!outcome.is_success());
        assert_eq!(transport.sent_count(), 0);
    }

    #[test]
    fn delivered_message_contains_attachment_and_body() {
        let transport = StubTransport::succeeding();
        let dispatcher = Dispatcher::new(&transport, "payroll@acme.example");
        dispatcher.deliver(&record(), b"%PDF-fake", &context());

        let sent = transport.sent.lock().unwrap();
        let formatted = String::from_utf8_lossy(&sent[0]).to_string();
        assert!(formatted.contains("To: jane@example.com"));
        assert!(formatted.contains("Jane Doe_paystub.pdf"));
        assert!(formatted.contains("Paystub Payment for Jane Doe:"));
    }
}
