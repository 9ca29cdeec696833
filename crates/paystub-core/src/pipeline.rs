//! Per-row orchestration of the paystub pipeline.
//!
//! Rows run sequentially in input order: render, then deliver. A render
//! failure folds into a `Failure` outcome for that row (no delivery is
//! attempted for it) and the batch moves on. One row can never abort its
//! siblings; the only shared state is the append-only outcome list.

use std::time::Instant;

use tracing::{info, info_span, warn};

use paystub_deliver::{Dispatcher, timestamp_now};
use paystub_model::{BatchContext, BatchReport, DeliveryOutcome, PayrollRecord};
use paystub_render::Renderer;

/// Drives validated rows through render and delivery, collecting one
/// outcome per row.
///
/// Guarantees: the report length equals the validated-row count and its
/// ordering matches the input ordering, whatever mix of successes and
/// failures occurred.
pub struct BatchProcessor<'a> {
    renderer: &'a Renderer,
    dispatcher: &'a Dispatcher<'a>,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(renderer: &'a Renderer, dispatcher: &'a Dispatcher<'a>) -> Self {
        Self {
            renderer,
            dispatcher,
        }
    }

    pub fn process(&self, records: &[PayrollRecord], context: &BatchContext) -> BatchReport {
        let batch_span = info_span!(
            "process_batch",
            country = context.country.code(),
            company = context.company(),
            rows = records.len()
        );
        let _batch_guard = batch_span.enter();
        let batch_start = Instant::now();

        let mut report = BatchReport::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let row_span = info_span!("process_row", row = index + 1, recipient = %record.email);
            let _row_guard = row_span.enter();
            report.push(self.process_row(record, context));
        }

        info!(
            rows = records.len(),
            success = report.success_count(),
            failure = report.failure_count(),
            duration_ms = batch_start.elapsed().as_millis(),
            "batch processed"
        );
        report
    }

    fn process_row(&self, record: &PayrollRecord, context: &BatchContext) -> DeliveryOutcome {
        match self.renderer.render(record, context) {
            Ok(document) => self.dispatcher.deliver(record, document.as_bytes(), context),
            Err(error) => {
                warn!(%error, "document generation failed");
                DeliveryOutcome::Failure {
                    recipient: record.email.clone(),
                    timestamp: timestamp_now(),
                    reason: format!("document generation failed: {error}"),
                }
            }
        }
    }
}
