//! Outgoing message assembly: bilingual plain-text body plus the rendered
//! paystub as a PDF attachment.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};

use paystub_model::{BatchContext, PayrollRecord};

use crate::transport::DeliveryError;

/// Attachment filename, derived from the employee name.
pub fn attachment_name(record: &PayrollRecord) -> String {
    format!("{}_paystub.pdf", record.full_name)
}

/// Plain-text body in the batch's locale. Amounts are echoed as submitted;
/// the rendered document carries the normalized figures.
pub fn body_text(record: &PayrollRecord, context: &BatchContext) -> String {
    let labels = context.labels();
    format!(
        "{heading} {name}:\n\
         {email_label}: {email}\n\
         {position_label}: {position}\n\
         {period_label}: {period}\n\
         \n\
         {health_label}: {health}\n\
         {social_label}: {social}\n\
         {taxes_label}: {taxes}\n\
         {other_label}: {other}\n\
         {gross_salary_label}: {gross_salary}\n\
         {gross_payment_label}: {gross_payment}\n\
         {net_payment_label}: {net_payment}\n",
        heading = labels.body_heading,
        name = record.full_name,
        email_label = labels.email,
        email = record.email,
        position_label = labels.position,
        position = record.position,
        period_label = labels.period,
        period = record.period.format("%Y-%m-%d"),
        health_label = labels.health_discount,
        health = record.health_discount_amount,
        social_label = labels.social_discount,
        social = record.social_discount_amount,
        taxes_label = labels.taxes_discount,
        taxes = record.taxes_discount_amount,
        other_label = labels.other_discount,
        other = record.other_discount_amount,
        gross_salary_label = labels.gross_salary,
        gross_salary = record.gross_salary,
        gross_payment_label = labels.gross_payment,
        gross_payment = record.gross_payment,
        net_payment_label = labels.net_payment,
        net_payment = record.net_payment,
    )
}

/// Assemble the full message: localized subject, plain body, PDF attachment.
pub fn build_message(
    sender: &str,
    record: &PayrollRecord,
    document: &[u8],
    context: &BatchContext,
) -> Result<Message, DeliveryError> {
    let from = parse_mailbox(sender)?;
    let to = parse_mailbox(&record.email)?;
    let attachment = Attachment::new(attachment_name(record)).body(
        document.to_vec(),
        ContentType::parse("application/pdf")?,
    );
    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(context.labels().title)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(body_text(record, context)))
                .singlepart(attachment),
        )?;
    Ok(message)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address.parse().map_err(|source| DeliveryError::Mailbox {
        address: address.to_string(),
        source,
    })
}
