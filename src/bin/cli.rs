//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Prometheus exporter for S3 bucket object statistics.
//!
//! Examples:
//! ```bash
//! s3-exporter --s3.region us-east-1 --s3.buckets logs,media
//! s3-exporter --s3.region us-east-1 --s3.buckets logs --s3.prefix 2024/ --s3.delimiter /
//! s3-exporter --s3.region us-east-1 --s3.credentials-mapping /etc/s3-exporter/mapping.csv \
//!             --s3.endpoint-url minio.local:9000 --s3.disable-ssl --s3.force-path-style
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use s3_exporter::config::{ExporterArgs, ExporterConfig};
use s3_exporter::server::{self, AppState};
use s3_exporter::Exporter;

#[tokio::main]
async fn main() -> Result<()> {
    // Loads any variables from .env file that are not already set
    dotenvy::dotenv().ok();

    let args = ExporterArgs::parse();

    let filter = match args.verbose {
        0 => "warn",        // no -v: WARN level
        1 => "info",        // -v: INFO level
        _ => "debug",       // -vv or more: DEBUG level
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    // Capture `log` records emitted by dependencies
    tracing_log::LogTracer::init().ok();

    let config = ExporterConfig::from_args(&args).context("invalid configuration")?;
    info!(
        buckets = ?config.bucket_names(),
        prefix = %config.prefix,
        delimiter = %config.delimiter,
        region = %config.client.region,
        "starting s3-exporter"
    );

    let state = Arc::new(AppState {
        exporter: Exporter::from_config(&config),
        metrics_path: config.metrics_path.clone(),
    });

    let listener = server::bind(&config.listen_address).await?;
    server::serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    })
    .await
}
