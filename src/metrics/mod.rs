// src/metrics/mod.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Metric schema and sample shaping.
//!
//! The schema is a fixed, statically defined table of descriptors (name, help
//! text, label names) owned by the collection engine. Each scrape turns
//! per-bucket [`BucketStats`] into [`Sample`]s against that table; the
//! [`exposition`] module renders them in Prometheus text format.

pub mod exposition;

use crate::aggregator::BucketStats;
use crate::constants::{LABEL_BUCKET, LABEL_DELIMITER, LABEL_PREFIX, NAMESPACE};
use crate::object_store::{BucketTarget, GroupingMode};

pub use exposition::{render, Rendered};

/// Every metric the exporter can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    ListSuccess,
    ListDuration,
    LastModifiedObjectDate,
    LastModifiedObjectSize,
    ObjectTotal,
    SumSize,
    BiggestSize,
    CommonPrefixes,
}

/// Static descriptor for one metric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDesc {
    pub kind: MetricKind,
    /// Name without the namespace.
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

const FULL_LABELS: &[&str] = &[LABEL_BUCKET, LABEL_PREFIX, LABEL_DELIMITER];
const OBJECT_LABELS: &[&str] = &[LABEL_BUCKET, LABEL_PREFIX];

static DESCRIPTORS: [MetricDesc; 8] = [
    MetricDesc {
        kind: MetricKind::ListSuccess,
        name: "list_success",
        help: "If the ListObjects operation was a success",
        labels: FULL_LABELS,
    },
    MetricDesc {
        kind: MetricKind::ListDuration,
        name: "list_duration_seconds",
        help: "The total duration of the list operation",
        labels: FULL_LABELS,
    },
    MetricDesc {
        kind: MetricKind::LastModifiedObjectDate,
        name: "last_modified_object_date",
        help: "The last modified date of the object that was modified most recently",
        labels: OBJECT_LABELS,
    },
    MetricDesc {
        kind: MetricKind::LastModifiedObjectSize,
        name: "last_modified_object_size_bytes",
        help: "The size of the object that was modified most recently",
        labels: OBJECT_LABELS,
    },
    MetricDesc {
        kind: MetricKind::ObjectTotal,
        name: "objects",
        help: "The total number of objects for the bucket/prefix combination",
        labels: OBJECT_LABELS,
    },
    MetricDesc {
        kind: MetricKind::SumSize,
        name: "objects_size_sum_bytes",
        help: "The total size of all objects summed",
        labels: OBJECT_LABELS,
    },
    MetricDesc {
        kind: MetricKind::BiggestSize,
        name: "biggest_object_size_bytes",
        help: "The size of the biggest object",
        labels: OBJECT_LABELS,
    },
    MetricDesc {
        kind: MetricKind::CommonPrefixes,
        name: "common_prefixes",
        help: "A count of all the keys between the prefix and the next occurrence of the string specified by the delimiter",
        labels: FULL_LABELS,
    },
];

const FLAT_KINDS: &[MetricKind] = &[
    MetricKind::ListSuccess,
    MetricKind::ListDuration,
    MetricKind::LastModifiedObjectDate,
    MetricKind::LastModifiedObjectSize,
    MetricKind::ObjectTotal,
    MetricKind::SumSize,
    MetricKind::BiggestSize,
];

const GROUPED_KINDS: &[MetricKind] = &[
    MetricKind::ListSuccess,
    MetricKind::ListDuration,
    MetricKind::CommonPrefixes,
];

/// The exporter's metric table.
#[derive(Debug)]
pub struct MetricSchema {
    namespace: &'static str,
    descriptors: &'static [MetricDesc],
}

static STANDARD: MetricSchema = MetricSchema {
    namespace: NAMESPACE,
    descriptors: &DESCRIPTORS,
};

impl MetricSchema {
    pub fn standard() -> &'static MetricSchema {
        &STANDARD
    }

    pub fn desc(&self, kind: MetricKind) -> &MetricDesc {
        // The table holds one entry per MetricKind, in declaration order.
        &self.descriptors[kind as usize]
    }

    /// Fully qualified name, e.g. `s3_objects`.
    pub fn fq_name(&self, kind: MetricKind) -> String {
        format!("{}_{}", self.namespace, self.desc(kind).name)
    }

    /// Metric kinds emitted for a successful listing in `mode`.
    pub fn kinds_for(&self, mode: GroupingMode) -> &'static [MetricKind] {
        match mode {
            GroupingMode::Flat => FLAT_KINDS,
            GroupingMode::Grouped => GROUPED_KINDS,
        }
    }

    pub fn describe(&self, mode: GroupingMode) -> Vec<&MetricDesc> {
        self.kinds_for(mode).iter().map(|k| self.desc(*k)).collect()
    }
}

/// One metric sample: a name, its label values and a numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub kind: MetricKind,
    pub name: String,
    /// `(label name, label value)` in descriptor order.
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl Sample {
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }

    pub fn label_values(&self) -> Vec<&str> {
        self.labels.iter().map(|(_, v)| v.as_str()).collect()
    }
}

fn sample(schema: &MetricSchema, kind: MetricKind, target: &BucketTarget, value: f64) -> Sample {
    let desc = schema.desc(kind);
    let labels = desc
        .labels
        .iter()
        .map(|label| {
            let value = match *label {
                LABEL_BUCKET => target.bucket.clone(),
                LABEL_PREFIX => target.prefix.clone(),
                _ => target.delimiter.clone(),
            };
            (*label, value)
        })
        .collect();
    Sample {
        kind,
        name: schema.fq_name(kind),
        labels,
        value,
    }
}

/// Turn one bucket's statistics into samples.
///
/// A failed bucket only reports `list_success 0`. A successful one reports the
/// metric set selected by its grouping mode.
pub fn shape_samples(schema: &MetricSchema, target: &BucketTarget, stats: &BucketStats) -> Vec<Sample> {
    if !stats.success {
        return vec![sample(schema, MetricKind::ListSuccess, target, 0.0)];
    }

    schema
        .kinds_for(target.grouping())
        .iter()
        .map(|kind| {
            let value = match kind {
                MetricKind::ListSuccess => 1.0,
                MetricKind::ListDuration => stats.list_duration.as_secs_f64(),
                MetricKind::LastModifiedObjectDate => stats.last_modified.timestamp.timestamp() as f64,
                MetricKind::LastModifiedObjectSize => stats.last_modified.size as f64,
                MetricKind::ObjectTotal => stats.object_count as f64,
                MetricKind::SumSize => stats.total_size as f64,
                MetricKind::BiggestSize => stats.max_size as f64,
                MetricKind::CommonPrefixes => stats.common_prefixes as f64,
            };
            sample(schema, *kind, target, value)
        })
        .collect()
}
