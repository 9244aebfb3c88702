// src/error.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Error taxonomy for the exporter.
//!
//! * [`ListingError`] and [`ResolutionError`] are per-bucket: the collection
//!   engine turns them into `s3_list_success 0` and never lets them escape
//!   the worker.
//! * [`ConfigError`] is raised while validating the command line and is fatal
//!   at startup, before any scrape is served.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed, sendable source error coming from the storage SDK.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a paginated listing call.
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("list_objects_v2 on bucket `{bucket}` failed")]
    Request {
        bucket: String,
        #[source]
        source: BoxError,
    },

    #[error("listing of bucket `{bucket}` failed: {message}")]
    Backend { bucket: String, message: String },
}

/// Failure to produce a credential set or a lister for one bucket.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("no credentials found for bucket `{0}`")]
    UnknownBucket(String),

    #[error("error reading secret key file {} for bucket `{bucket}`", path.display())]
    SecretKeyFile {
        bucket: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid or conflicting startup configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("either --s3.buckets or --s3.credentials-mapping must be specified")]
    NoBuckets,

    #[error("--s3.buckets and --s3.credentials-mapping are mutually exclusive")]
    ConflictingBucketSources,

    #[error("--s3.region must not be empty")]
    MissingRegion,

    #[error("error loading credentials mapping {}", path.display())]
    MappingRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "invalid credentials mapping format at {}:{line}: expected `bucket,access_key,secret_key_file`",
        path.display()
    )]
    MappingFormat { path: PathBuf, line: usize },

    #[error("credentials mapping {} contains no buckets", path.display())]
    EmptyMapping { path: PathBuf },

    #[error("invalid listen address `{0}`")]
    ListenAddress(String),

    #[error("metrics path must start with '/', got `{0}`")]
    MetricsPath(String),
}

/// Anything that can fail a single bucket during one collection cycle.
#[derive(Error, Debug)]
pub enum BucketError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Listing(#[from] ListingError),
}
