// src/object_store.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Pluggable listing abstraction. The S3 adapter lives in s3_client.rs; tests
// plug in scripted listers through the same traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::credentials::CredentialSet;
use crate::error::{ListingError, ResolutionError};

/// One unit of work for a collection cycle: a bucket plus the listing
/// parameters applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTarget {
    pub bucket: String,
    pub prefix: String,
    /// Empty means "no delimiter" (flat listing).
    pub delimiter: String,
}

/// How the listing groups keys, derived from the delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    /// No delimiter: every object is listed individually.
    Flat,
    /// Delimiter set: keys are folded into common prefixes.
    Grouped,
}

impl BucketTarget {
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            delimiter: delimiter.into(),
        }
    }

    pub fn grouping(&self) -> GroupingMode {
        GroupingMode::for_delimiter(&self.delimiter)
    }
}

impl GroupingMode {
    pub fn for_delimiter(delimiter: &str) -> Self {
        if delimiter.is_empty() {
            GroupingMode::Flat
        } else {
            GroupingMode::Grouped
        }
    }
}

/// A single listed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub entries: Vec<ObjectEntry>,
    /// Number of common-prefix groups reported on this page.
    pub common_prefixes: u64,
    /// Present iff more pages remain.
    pub continuation_token: Option<String>,
}

impl PageResult {
    pub fn is_final(&self) -> bool {
        self.continuation_token.is_none()
    }
}

/// Paginated listing capability of a storage backend.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// Fetch one page for `target`, continuing from `continuation_token` when given.
    async fn list_page(
        &self,
        target: &BucketTarget,
        continuation_token: Option<&str>,
    ) -> Result<PageResult, ListingError>;
}

/// Builds a lister bound to one bucket's credentials.
#[async_trait]
pub trait ListerFactory: Send + Sync {
    async fn build(
        &self,
        bucket: &str,
        credentials: &CredentialSet,
    ) -> Result<Arc<dyn ObjectLister>, ResolutionError>;
}
