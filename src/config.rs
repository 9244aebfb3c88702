// src/config.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Command-line surface and its validation into an [`ExporterConfig`].
//!
//! Every flag can also come from an `S3_EXPORTER_*` environment variable (or a
//! `.env` file loaded by the binary). Validation errors are [`ConfigError`]s
//! and abort startup.

use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_LISTEN_ADDRESS, DEFAULT_METRICS_PATH};
use crate::credentials::{CredentialSource, CredentialsMapping, StaticCredentials};
use crate::error::ConfigError;
use crate::object_store::BucketTarget;
use crate::s3_client::ClientSettings;

/// Export metrics for S3 buckets.
#[derive(Parser, Debug, Clone)]
#[command(name = "s3-exporter", author, version, about)]
pub struct ExporterArgs {
    /// Increase log verbosity: -v = Info, -vv = Debug
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Address to listen on for web interface and telemetry.
    #[arg(long = "web.listen-address", env = "S3_EXPORTER_WEB_LISTEN_ADDRESS", default_value = DEFAULT_LISTEN_ADDRESS)]
    pub listen_address: String,

    /// Path under which to expose metrics.
    #[arg(long = "web.metrics-path", env = "S3_EXPORTER_WEB_METRICS_PATH", default_value = DEFAULT_METRICS_PATH)]
    pub metrics_path: String,

    /// Comma-separated list of S3 buckets to monitor.
    #[arg(long = "s3.buckets", env = "S3_EXPORTER_S3_BUCKETS")]
    pub buckets: Option<String>,

    /// Path to the credentials mapping file (`bucket,access_key,secret_key_file` per line).
    #[arg(long = "s3.credentials-mapping", env = "S3_EXPORTER_S3_CREDENTIALS_MAPPING", value_name = "FILE")]
    pub credentials_mapping: Option<PathBuf>,

    /// Prefix to filter objects.
    #[arg(long = "s3.prefix", env = "S3_EXPORTER_S3_PREFIX", default_value = "")]
    pub prefix: String,

    /// Delimiter to group objects.
    #[arg(long = "s3.delimiter", env = "S3_EXPORTER_S3_DELIMITER", default_value = "")]
    pub delimiter: String,

    /// Custom endpoint URL.
    #[arg(long = "s3.endpoint-url", env = "S3_EXPORTER_S3_ENDPOINT_URL", default_value = "")]
    pub endpoint_url: String,

    /// AWS region.
    #[arg(long = "s3.region", env = "S3_EXPORTER_S3_REGION")]
    pub region: String,

    /// Talk plain HTTP to the endpoint.
    #[arg(long = "s3.disable-ssl", env = "S3_EXPORTER_S3_DISABLE_SSL")]
    pub disable_ssl: bool,

    /// Use path-style addressing (endpoint/bucket).
    #[arg(long = "s3.force-path-style", env = "S3_EXPORTER_S3_FORCE_PATH_STYLE")]
    pub force_path_style: bool,
}

/// Where the bucket list comes from. Exactly one source is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketSource {
    List(Vec<String>),
    CredentialsMapping(CredentialsMapping),
}

/// Validated exporter configuration.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub buckets: BucketSource,
    pub prefix: String,
    pub delimiter: String,
    pub client: ClientSettings,
    /// Normalised `host:port`.
    pub listen_address: String,
    pub metrics_path: String,
}

impl ExporterConfig {
    pub fn from_args(args: &ExporterArgs) -> Result<Self, ConfigError> {
        let buckets = match (&args.buckets, &args.credentials_mapping) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingBucketSources),
            (None, None) => return Err(ConfigError::NoBuckets),
            (Some(list), None) => {
                let buckets = split_buckets(list);
                if buckets.is_empty() {
                    return Err(ConfigError::NoBuckets);
                }
                BucketSource::List(buckets)
            }
            (None, Some(path)) => BucketSource::CredentialsMapping(load_credentials_mapping(path)?),
        };

        if args.region.trim().is_empty() {
            return Err(ConfigError::MissingRegion);
        }
        if !args.metrics_path.starts_with('/') {
            return Err(ConfigError::MetricsPath(args.metrics_path.clone()));
        }

        Ok(Self {
            buckets,
            prefix: args.prefix.clone(),
            delimiter: args.delimiter.clone(),
            client: ClientSettings {
                endpoint_url: args.endpoint_url.clone(),
                region: args.region.trim().to_string(),
                disable_ssl: args.disable_ssl,
                force_path_style: args.force_path_style,
            },
            listen_address: normalize_listen_address(&args.listen_address)?,
            metrics_path: args.metrics_path.clone(),
        })
    }

    pub fn bucket_names(&self) -> Vec<String> {
        match &self.buckets {
            BucketSource::List(list) => list.clone(),
            BucketSource::CredentialsMapping(mapping) => mapping.buckets().map(str::to_string).collect(),
        }
    }

    /// Fresh targets for one collection cycle.
    pub fn targets(&self) -> Vec<BucketTarget> {
        self.bucket_names()
            .into_iter()
            .map(|bucket| BucketTarget::new(bucket, self.prefix.clone(), self.delimiter.clone()))
            .collect()
    }

    pub fn credential_source(&self) -> CredentialSource {
        match &self.buckets {
            BucketSource::List(_) => CredentialSource::AmbientChain,
            BucketSource::CredentialsMapping(mapping) => CredentialSource::StaticMapping(mapping.clone()),
        }
    }
}

/// Split a comma-separated bucket list, trimming names and dropping blanks.
/// A repeated name keeps its first position.
pub fn split_buckets(buckets: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for bucket in buckets.split(',').map(str::trim).filter(|b| !b.is_empty()) {
        if !out.iter().any(|b| b == bucket) {
            out.push(bucket.to_string());
        }
    }
    out
}

/// Parse a credentials mapping: one `bucket,access_key,secret_key_file` per
/// line, blank lines ignored.
pub fn parse_credentials_mapping(path: &Path, data: &str) -> Result<CredentialsMapping, ConfigError> {
    let mut mapping = CredentialsMapping::new();
    for (idx, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let [bucket, access_key, secret_key_file] = parts.as_slice() else {
            return Err(ConfigError::MappingFormat { path: path.to_path_buf(), line: idx + 1 });
        };
        if bucket.is_empty() {
            return Err(ConfigError::MappingFormat { path: path.to_path_buf(), line: idx + 1 });
        }
        mapping.insert(
            *bucket,
            StaticCredentials {
                access_key: access_key.to_string(),
                secret_key_file: PathBuf::from(*secret_key_file),
            },
        );
    }
    if mapping.is_empty() {
        return Err(ConfigError::EmptyMapping { path: path.to_path_buf() });
    }
    Ok(mapping)
}

pub fn load_credentials_mapping(path: &Path) -> Result<CredentialsMapping, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::MappingRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_credentials_mapping(path, &data)
}

/// `:9340` → `0.0.0.0:9340`; anything else must already be `host:port`.
pub fn normalize_listen_address(addr: &str) -> Result<String, ConfigError> {
    let addr = addr.trim();
    let normalized = if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    };
    match normalized.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(normalized),
        _ => Err(ConfigError::ListenAddress(addr.to_string())),
    }
}
