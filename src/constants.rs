// src/constants.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Default values shared by the CLI, the collection engine and the HTTP layer.

/// Namespace prepended to every exported metric name (`s3_objects`, ...).
pub const NAMESPACE: &str = "s3";

/// Address the exporter listens on when `--web.listen-address` is not given.
pub const DEFAULT_LISTEN_ADDRESS: &str = ":9340";

/// Path under which metrics are served.
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Provider name attached to credentials read from the mapping file.
pub const STATIC_CREDENTIALS_PROVIDER: &str = "credentials-mapping";

// Label names
pub const LABEL_BUCKET: &str = "bucket";
pub const LABEL_PREFIX: &str = "prefix";
pub const LABEL_DELIMITER: &str = "delimiter";
