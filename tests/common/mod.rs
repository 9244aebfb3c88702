// tests/common/mod.rs
//
// Scripted storage backend shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use s3_exporter::{
    BucketTarget, CredentialSet, ListerFactory, ListingError, ObjectEntry, ObjectLister, PageResult,
    ResolutionError,
};

/// How a scripted bucket behaves when listed.
#[derive(Clone, Default)]
pub struct BucketScript {
    pub pages: Vec<PageResult>,
    /// Page index from which every listing call fails.
    pub fail_at: Option<usize>,
    pub delay: Duration,
}

impl BucketScript {
    pub fn pages(pages: Vec<PageResult>) -> Self {
        Self { pages, ..Default::default() }
    }

    pub fn failing() -> Self {
        Self { fail_at: Some(0), ..Default::default() }
    }

    pub fn failing_at(mut self, page: usize) -> Self {
        self.fail_at = Some(page);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Per-bucket scripts plus a shared listing-call counter.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    scripts: Arc<HashMap<String, BucketScript>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedBackend {
    pub fn new(scripts: Vec<(&str, BucketScript)>) -> Self {
        Self {
            scripts: Arc::new(scripts.into_iter().map(|(b, s)| (b.to_string(), s)).collect()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

struct ScriptedLister {
    script: BucketScript,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ObjectLister for ScriptedLister {
    async fn list_page(
        &self,
        target: &BucketTarget,
        continuation_token: Option<&str>,
    ) -> Result<PageResult, ListingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.script.delay.is_zero() {
            tokio::time::sleep(self.script.delay).await;
        }
        // Tokens are the index of the next page.
        let idx = continuation_token.map(|t| t.parse::<usize>().unwrap()).unwrap_or(0);
        if self.script.fail_at.is_some_and(|at| idx >= at) {
            return Err(ListingError::Backend {
                bucket: target.bucket.clone(),
                message: "AccessDenied".to_string(),
            });
        }
        Ok(self.script.pages.get(idx).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ListerFactory for ScriptedBackend {
    async fn build(
        &self,
        bucket: &str,
        _credentials: &CredentialSet,
    ) -> Result<Arc<dyn ObjectLister>, ResolutionError> {
        let script = self
            .scripts
            .get(bucket)
            .cloned()
            .ok_or_else(|| ResolutionError::UnknownBucket(bucket.to_string()))?;
        Ok(Arc::new(ScriptedLister { script, calls: Arc::clone(&self.calls) }))
    }
}

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn entry(key: &str, size: u64, modified_secs: i64) -> ObjectEntry {
    ObjectEntry { key: key.to_string(), size, last_modified: ts(modified_secs) }
}

/// Chain `pages` together with index tokens so the last one is final.
pub fn paginate(pages: Vec<(Vec<ObjectEntry>, u64)>) -> Vec<PageResult> {
    let total = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, (entries, common_prefixes))| PageResult {
            entries,
            common_prefixes,
            continuation_token: (i + 1 < total).then(|| (i + 1).to_string()),
        })
        .collect()
}
