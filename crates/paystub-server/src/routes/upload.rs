//! The batch-submission endpoint.
//!
//! `POST /upload` takes a multipart form with a `file` CSV plus optional
//! `country` and `company` fields, runs the pipeline, and answers with
//! either a single batch-level rejection or the full per-row report.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use thiserror::Error;
use tracing::{error, info};

use paystub_core::BatchProcessor;
use paystub_deliver::Dispatcher;
use paystub_ingest::{IngestError, read_table};
use paystub_model::{BatchContext, BatchReport, Country, DEFAULT_COMPANY};
use paystub_validate::{BatchRejection, validate_batch};

use crate::state::AppState;

use super::{bad_request, unauthorized};

/// Why a submission was refused before any row was processed.
#[derive(Debug, Error)]
enum UploadRejection {
    #[error("{0}")]
    Ingest(#[from] IngestError),
    #[error("{0}")]
    Batch(#[from] BatchRejection),
}

#[derive(Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    country: Option<String>,
    company: Option<String>,
}

pub async fn upload(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Multipart,
) -> HttpResponse {
    if !state.credentials.verify_header(req.headers()) {
        return unauthorized();
    }

    let form = match read_upload_form(payload).await {
        Ok(form) => form,
        Err(message) => return bad_request(&message),
    };

    let Some((filename, data)) = form.file else {
        return bad_request("No file part");
    };
    if filename.is_empty() {
        return bad_request("No selected file");
    }

    let country_code = form.country.unwrap_or_else(|| Country::default().code().to_string());
    let country = match Country::from_code(&country_code) {
        Ok(country) => country,
        Err(error) => return bad_request(&error.to_string()),
    };

    if !filename.ends_with(".csv") {
        return bad_request("Invalid file format, only .csv files are allowed");
    }

    let company = form.company.unwrap_or_else(|| DEFAULT_COMPANY.to_string());
    let context = BatchContext::new(country, &company);
    info!(
        file = %filename,
        country = country.code(),
        company = context.company(),
        bytes = data.len(),
        "batch submission received"
    );

    // The pipeline is synchronous; keep it off the async executor.
    let state = state.clone();
    match web::block(move || run_pipeline(&state, &context, &data)).await {
        Ok(Ok(report)) => HttpResponse::Ok().json(report),
        Ok(Err(rejection)) => bad_request(&rejection.to_string()),
        Err(join_error) => {
            error!(%join_error, "pipeline task failed");
            HttpResponse::InternalServerError().json(super::ErrorResponse {
                error: "internal processing failure".to_string(),
            })
        }
    }
}

fn run_pipeline(
    state: &AppState,
    context: &BatchContext,
    data: &[u8],
) -> Result<BatchReport, UploadRejection> {
    let table = read_table(data)?;
    let batch = validate_batch(&table)?;
    let dispatcher = Dispatcher::new(state.transport.as_ref(), state.sender.as_str());
    let processor = BatchProcessor::new(&state.renderer, &dispatcher);
    Ok(processor.process(&batch.records, context))
}

async fn read_upload_form(mut payload: Multipart) -> Result<UploadForm, String> {
    let mut form = UploadForm::default();
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|error| format!("Invalid multipart data: {error}"))?;
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or("")
                    .to_string();
                let data = read_field_bytes(&mut field).await?;
                form.file = Some((filename, data));
            }
            "country" => {
                let data = read_field_bytes(&mut field).await?;
                form.country = Some(String::from_utf8_lossy(&data).trim().to_string());
            }
            "company" => {
                let data = read_field_bytes(&mut field).await?;
                form.company = Some(String::from_utf8_lossy(&data).trim().to_string());
            }
            _ => {
                // Drain and ignore unknown fields.
                while field.next().await.is_some() {}
            }
        }
    }
    Ok(form)
}

async fn read_field_bytes(field: &mut Field) -> Result<Vec<u8>, String> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|error| format!("Invalid multipart data: {error}"))?;
        data.extend_from_slice(&bytes);
    }
    Ok(data)
}
