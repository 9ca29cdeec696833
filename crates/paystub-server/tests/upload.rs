//! End-to-end checks of the batch-submission endpoint with the SMTP
//! transport stubbed at its interface boundary.

use std::sync::{Arc, Mutex};

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDateTime;
use lettre::Message;

use paystub_deliver::{DeliveryError, MailTransport};
use paystub_render::Renderer;
use paystub_server::routes;
use paystub_server::{AppState, Credentials};

const BOUNDARY: &str = "x-paystub-test-boundary";

const HEADER_ROW: &str = "full_name,email,position,health_discount_amount,social_discount_amount,\
taxes_discount_amount,other_discount_amount,gross_salary,gross_payment,net_payment,period";

/// Records envelope recipients; optionally fails every send.
struct StubTransport {
    fail_with: Option<String>,
    attempts: Mutex<Vec<String>>,
}

impl StubTransport {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            attempts: Mutex::new(Vec::new()),
        })
    }

    fn attempted_recipients(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

impl MailTransport for StubTransport {
    fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        let recipients = message
            .envelope()
            .to()
            .iter()
            .map(|address| address.to_string())
            .collect::<Vec<_>>();
        self.attempts.lock().unwrap().extend(recipients);
        match &self.fail_with {
            Some(reason) => Err(DeliveryError::Smtp(reason.clone())),
            None => Ok(()),
        }
    }
}

fn app_state(transport: Arc<StubTransport>) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Credentials::new("admin", "secret").unwrap(),
        Renderer::new(),
        transport,
        "payroll@atdev.example",
    ))
}

fn basic_auth(user: &str, pass: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:{pass}")))
}

enum Part<'a> {
    File { filename: &'a str, content: &'a str },
    Text { name: &'a str, value: &'a str },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File { filename, content } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                         Content-Type: text/csv\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(content.as_bytes());
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(parts: &[Part<'_>]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/upload")
        .insert_header((header::AUTHORIZATION, basic_auth("admin", "secret")))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state).configure(routes::configure)).await
    };
}

#[actix_web::test]
async fn root_serves_a_banner() {
    let app = init_app!(app_state(StubTransport::succeeding()));
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("paystub"));
}

#[actix_web::test]
async fn upload_without_credentials_is_challenged() {
    let transport = StubTransport::succeeding();
    let app = init_app!(app_state(transport.clone()));
    let req = test::TestRequest::post()
        .uri("/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(&[]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
    assert!(transport.attempted_recipients().is_empty());
}

#[actix_web::test]
async fn upload_with_wrong_password_is_challenged() {
    let app = init_app!(app_state(StubTransport::succeeding()));
    let req = test::TestRequest::post()
        .uri("/upload")
        .insert_header((header::AUTHORIZATION, basic_auth("admin", "wrong")))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(&[]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn one_valid_row_reports_one_success() {
    let transport = StubTransport::succeeding();
    let app = init_app!(app_state(transport.clone()));

    let csv = format!(
        "{HEADER_ROW}\n\
         Jane Doe,jane@example.com,Engineer,100,200,300,50,5000,2500,1850,2024-03-31\n"
    );
    let req = upload_request(&[
        Part::File { filename: "payroll.csv", content: &csv },
        Part::Text { name: "country", value: "do" },
        Part::Text { name: "company", value: "ATDEv" },
    ])
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let results = body["email_results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["email"], "jane@example.com");
    assert_eq!(results[0]["status"], "success");

    let timestamp = results[0]["timestamp"].as_str().unwrap();
    assert!(
        NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok(),
        "unexpected timestamp: {timestamp}"
    );

    assert_eq!(transport.attempted_recipients(), vec!["jane@example.com"]);
}

#[actix_web::test]
async fn unsupported_country_is_rejected_without_a_report() {
    let transport = StubTransport::succeeding();
    let app = init_app!(app_state(transport.clone()));

    let csv = format!(
        "{HEADER_ROW}\n\
         Jane Doe,jane@example.com,Engineer,100,200,300,50,5000,2500,1850,2024-03-31\n"
    );
    let req = upload_request(&[
        Part::File { filename: "payroll.csv", content: &csv },
        Part::Text { name: "country", value: "fr" },
    ])
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("fr"));
    assert!(body.get("email_results").is_none());
    assert!(transport.attempted_recipients().is_empty());
}

#[actix_web::test]
async fn missing_columns_are_named_and_nothing_is_sent() {
    let transport = StubTransport::succeeding();
    let app = init_app!(app_state(transport.clone()));

    let csv = "full_name,email\nJane Doe,jane@example.com\n";
    let req = upload_request(&[Part::File { filename: "payroll.csv", content: csv }]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Missing columns:"), "{error}");
    assert!(error.contains("period"), "{error}");
    assert!(transport.attempted_recipients().is_empty());
}

#[actix_web::test]
async fn invalid_email_rejects_the_batch_before_any_send() {
    let transport = StubTransport::succeeding();
    let app = init_app!(app_state(transport.clone()));

    let csv = format!(
        "{HEADER_ROW}\n\
         Jane Doe,jane@example.com,Engineer,100,200,300,50,5000,2500,1850,2024-03-31\n\
         John Roe,broken-address,Analyst,50,60,70,0,4000,2000,1820,2024-03-31\n"
    );
    let req = upload_request(&[Part::File { filename: "payroll.csv", content: &csv }]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("broken-address"), "{error}");
    assert!(error.contains("John Roe"), "{error}");
    // Fail-fast: the valid first row was not delivered either.
    assert!(transport.attempted_recipients().is_empty());
}

#[actix_web::test]
async fn render_failure_is_reported_per_row_and_siblings_deliver() {
    let transport = StubTransport::succeeding();
    let app = init_app!(app_state(transport.clone()));

    let csv = format!(
        "{HEADER_ROW}\n\
         Jane Doe,jane@example.com,Engineer,100,200,300,50,5000,2500,1850,2024-03-31\n\
         John Roe,john@example.com,Analyst,oops,60,70,0,4000,2000,1820,2024-03-31\n\
         Ann Poe,ann@example.com,Manager,10,20,30,0,6000,3000,2940,2024-03-31\n"
    );
    let req = upload_request(&[Part::File { filename: "payroll.csv", content: &csv }]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let results = body["email_results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["status"], "success");
    assert_eq!(results[1]["status"], "failure");
    assert_eq!(results[2]["status"], "success");
    assert!(
        results[1]["error"]
            .as_str()
            .unwrap()
            .contains("document generation failed")
    );
    assert_eq!(
        transport.attempted_recipients(),
        vec!["jane@example.com", "ann@example.com"]
    );
}

#[actix_web::test]
async fn missing_file_part_is_rejected() {
    let app = init_app!(app_state(StubTransport::succeeding()));
    let req = upload_request(&[Part::Text { name: "country", value: "do" }]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No file part");
}

#[actix_web::test]
async fn empty_filename_is_rejected() {
    let app = init_app!(app_state(StubTransport::succeeding()));
    let req = upload_request(&[Part::File { filename: "", content: "x" }]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No selected file");
}

#[actix_web::test]
async fn non_csv_upload_is_rejected() {
    let app = init_app!(app_state(StubTransport::succeeding()));
    let req = upload_request(&[Part::File { filename: "payroll.txt", content: "x" }]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid file format, only .csv files are allowed");
}
