// src/lib.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Crate root: module tree plus the re-exports used by src/bin/cli.rs and tests.

pub mod constants;
pub mod error;
pub mod config;

// Listing + aggregation core
pub mod object_store;
pub mod enumerator;
pub mod aggregator;
pub mod credentials;
pub mod collector;

// S3 backend
pub mod s3_client;

// Exposition
pub mod metrics;
pub mod server;

pub use aggregator::{BucketStats, LastModified};
pub use collector::{BucketReport, Exporter};
pub use config::{ExporterArgs, ExporterConfig};
pub use credentials::{CredentialResolver, CredentialSet, CredentialSource};
pub use error::{BucketError, ConfigError, ListingError, ResolutionError};
pub use metrics::{MetricKind, MetricSchema, Sample};
pub use object_store::{
    BucketTarget,
    GroupingMode,
    ListerFactory,
    ObjectEntry,
    ObjectLister,
    PageResult,
};
