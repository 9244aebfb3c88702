// src/aggregator.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Folds a bucket's listing into a fixed-shape [`BucketStats`] record.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use crate::enumerator::{Enumeration, ObjectEnumerator};
use crate::error::ListingError;
use crate::object_store::{BucketTarget, ObjectEntry, ObjectLister};

/// Timestamp and size of the most recently modified object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastModified {
    pub timestamp: DateTime<Utc>,
    pub size: u64,
}

/// Aggregated statistics for one bucket in one collection cycle.
///
/// A failed listing yields `success == false` and every other field at its
/// default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketStats {
    pub success: bool,
    pub list_duration: Duration,
    pub object_count: u64,
    pub total_size: u64,
    pub max_size: u64,
    pub last_modified: LastModified,
    pub common_prefixes: u64,
}

impl BucketStats {
    pub fn failed() -> Self {
        Self::default()
    }
}

/// Running fold over listed entries.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    object_count: u64,
    total_size: u64,
    max_size: u64,
    last_modified: Option<LastModified>,
    common_prefixes: u64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, entry: &ObjectEntry) {
        self.object_count += 1;
        self.total_size = self.total_size.saturating_add(entry.size);
        self.max_size = self.max_size.max(entry.size);

        // Strictly newer only: the first entry carrying the max timestamp wins.
        let newer = match &self.last_modified {
            Some(current) => entry.last_modified > current.timestamp,
            None => true,
        };
        if newer {
            self.last_modified = Some(LastModified {
                timestamp: entry.last_modified,
                size: entry.size,
            });
        }
    }

    pub fn add_common_prefixes(&mut self, count: u64) {
        self.common_prefixes += count;
    }

    pub fn finish(self, list_duration: Duration) -> BucketStats {
        BucketStats {
            success: true,
            list_duration,
            object_count: self.object_count,
            total_size: self.total_size,
            max_size: self.max_size,
            last_modified: self.last_modified.unwrap_or_default(),
            common_prefixes: self.common_prefixes,
        }
    }
}

/// Reduce a finished enumeration into statistics.
pub fn aggregate(enumeration: &Enumeration, list_duration: Duration) -> BucketStats {
    let mut acc = StatsAccumulator::new();
    for entry in &enumeration.entries {
        acc.observe(entry);
    }
    acc.add_common_prefixes(enumeration.common_prefixes);
    acc.finish(list_duration)
}

/// Enumerate `target` through `lister` and aggregate the result, timing the
/// listing from the first request to the last page.
pub async fn collect_bucket_stats(
    lister: &dyn ObjectLister,
    target: &BucketTarget,
) -> Result<BucketStats, ListingError> {
    let start = Instant::now();
    let enumeration = ObjectEnumerator::new(lister, target).enumerate().await?;
    let elapsed = start.elapsed();
    Ok(aggregate(&enumeration, elapsed))
}
