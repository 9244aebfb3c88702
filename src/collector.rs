// src/collector.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! The collection engine: one scrape = one concurrent listing per bucket.
//!
//! Each bucket runs in its own Tokio task which resolves credentials, builds a
//! lister, walks every page and aggregates. The scrape waits for all tasks
//! before returning, so its output is always a complete snapshot. A failing
//! bucket (credentials, listing, or a panicked task) only reports
//! `s3_list_success 0` and never affects its siblings.
//!
//! Tasks live in a [`JoinSet`]: if the scrape future is dropped (client went
//! away, caller timeout) the set is dropped and every in-flight listing is
//! aborted at its next await point.

use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::aggregator::{collect_bucket_stats, BucketStats};
use crate::config::ExporterConfig;
use crate::credentials::CredentialResolver;
use crate::error::BucketError;
use crate::metrics::{shape_samples, MetricDesc, MetricSchema, Sample};
use crate::object_store::{BucketTarget, GroupingMode, ListerFactory};
use crate::s3_client::S3ListerFactory;

/// Statistics for one bucket in one cycle, paired with its target.
#[derive(Debug, Clone)]
pub struct BucketReport {
    pub target: BucketTarget,
    pub stats: BucketStats,
}

/// Collection engine.
pub struct Exporter {
    targets: Vec<BucketTarget>,
    grouping: GroupingMode,
    resolver: Arc<dyn CredentialResolver>,
    factory: Arc<dyn ListerFactory>,
    schema: &'static MetricSchema,
}

impl Exporter {
    /// Production wiring: credential source and S3 clients from `config`.
    pub fn from_config(config: &ExporterConfig) -> Self {
        Self::with_targets(
            config.targets(),
            GroupingMode::for_delimiter(&config.delimiter),
            Arc::new(config.credential_source()),
            Arc::new(S3ListerFactory::new(config.client.clone())),
        )
    }

    pub fn new(
        buckets: Vec<String>,
        prefix: impl Into<String>,
        delimiter: impl Into<String>,
        resolver: Arc<dyn CredentialResolver>,
        factory: Arc<dyn ListerFactory>,
    ) -> Self {
        let (prefix, delimiter) = (prefix.into(), delimiter.into());
        let grouping = GroupingMode::for_delimiter(&delimiter);
        let targets = buckets
            .into_iter()
            .map(|bucket| BucketTarget::new(bucket, prefix.clone(), delimiter.clone()))
            .collect();
        Self::with_targets(targets, grouping, resolver, factory)
    }

    fn with_targets(
        targets: Vec<BucketTarget>,
        grouping: GroupingMode,
        resolver: Arc<dyn CredentialResolver>,
        factory: Arc<dyn ListerFactory>,
    ) -> Self {
        Self {
            targets,
            grouping,
            resolver,
            factory,
            schema: MetricSchema::standard(),
        }
    }

    pub fn schema(&self) -> &'static MetricSchema {
        self.schema
    }

    pub fn grouping(&self) -> GroupingMode {
        self.grouping
    }

    /// Descriptors this exporter can emit.
    pub fn describe(&self) -> Vec<&'static MetricDesc> {
        self.schema.describe(self.grouping)
    }

    /// Run one collection cycle and return per-bucket statistics in configured
    /// bucket order.
    pub async fn collect_stats(&self) -> Vec<BucketReport> {
        let targets = self.targets.clone();
        let started = Instant::now();

        let mut tasks = JoinSet::new();
        for (idx, target) in targets.iter().cloned().enumerate() {
            let resolver = Arc::clone(&self.resolver);
            let factory = Arc::clone(&self.factory);
            tasks.spawn(async move {
                let outcome = run_bucket(&target, resolver.as_ref(), factory.as_ref()).await;
                (idx, outcome)
            });
        }

        let mut slots: Vec<Option<BucketStats>> = vec![None; targets.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, Ok(stats))) => {
                    debug!(
                        bucket = %targets[idx].bucket,
                        objects = stats.object_count,
                        duration = ?stats.list_duration,
                        "bucket listed"
                    );
                    slots[idx] = Some(stats);
                }
                Ok((idx, Err(err))) => {
                    warn!(
                        bucket = %targets[idx].bucket,
                        error = %format!("{:#}", anyhow::Error::new(err)),
                        "bucket collection failed"
                    );
                    slots[idx] = Some(BucketStats::failed());
                }
                // The slot stays empty and is reported as failed below.
                Err(join_err) => warn!(error = %join_err, "bucket task did not complete"),
            }
        }

        let reports: Vec<BucketReport> = targets
            .into_iter()
            .zip(slots)
            .map(|(target, stats)| BucketReport {
                target,
                stats: stats.unwrap_or_else(BucketStats::failed),
            })
            .collect();

        let failed = reports.iter().filter(|r| !r.stats.success).count();
        info!(
            buckets = reports.len(),
            failed,
            elapsed = %humantime::format_duration(started.elapsed()),
            "collection cycle finished"
        );
        reports
    }

    /// Run one collection cycle and shape the results into metric samples.
    pub async fn collect(&self) -> Vec<Sample> {
        self.collect_stats()
            .await
            .iter()
            .flat_map(|report| shape_samples(self.schema, &report.target, &report.stats))
            .collect()
    }
}

/// ResolvingCredentials → Listing → Aggregating for a single bucket.
async fn run_bucket(
    target: &BucketTarget,
    resolver: &dyn CredentialResolver,
    factory: &dyn ListerFactory,
) -> Result<BucketStats, BucketError> {
    let credentials = resolver.resolve(&target.bucket).await?;
    let lister = factory.build(&target.bucket, &credentials).await?;
    let stats = collect_bucket_stats(lister.as_ref(), target).await?;
    Ok(stats)
}
