//! Payroll paystub batch service.

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{Level, info};

use paystub_server::logging::{LogFormat, init_logging};
use paystub_server::routes;
use paystub_server::{AppState, ServerConfig};

#[derive(Parser)]
#[command(
    name = "paystub-server",
    version,
    about = "Payroll paystub batch service",
    long_about = "Receive payroll CSV batches over HTTP, render per-employee\n\
                  paystub documents, and deliver them by email."
)]
struct Cli {
    /// Address to bind the HTTP listener on.
    #[arg(long, default_value = "127.0.0.1:5000")]
    bind: String,

    /// Log level.
    #[arg(long = "log-level", value_enum, default_value = "info")]
    log_level: LogLevelArg,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    log_format: LogFormatArg,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_logging(level_from(cli.log_level), format_from(cli.log_format));

    let config = ServerConfig::from_env().context("load configuration")?;
    let state = web::Data::new(
        AppState::from_config(&config).context("initialize application state")?,
    );

    info!(bind = %cli.bind, "paystub server listening");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(&cli.bind)?
    .run()
    .await?;
    Ok(())
}

fn level_from(arg: LogLevelArg) -> Level {
    match arg {
        LogLevelArg::Error => Level::ERROR,
        LogLevelArg::Warn => Level::WARN,
        LogLevelArg::Info => Level::INFO,
        LogLevelArg::Debug => Level::DEBUG,
        LogLevelArg::Trace => Level::TRACE,
    }
}

fn format_from(arg: LogFormatArg) -> LogFormat {
    match arg {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    }
}
