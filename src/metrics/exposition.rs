// src/metrics/exposition.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Renders a scrape's samples in Prometheus text format. Every scrape gets a
// fresh Registry, so nothing from a previous cycle can leak into the output.

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use super::{MetricKind, MetricSchema, Sample};

/// An encoded scrape, ready to be written to an HTTP response.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Encode `samples` using the descriptors in `schema`.
pub fn render(schema: &MetricSchema, samples: &[Sample]) -> prometheus::Result<Rendered> {
    let registry = Registry::new();
    let mut families: Vec<(MetricKind, GaugeVec)> = Vec::new();

    for sample in samples {
        let gauge = match families.iter().find(|(kind, _)| *kind == sample.kind) {
            Some((_, gauge)) => gauge.clone(),
            None => {
                let desc = schema.desc(sample.kind);
                let gauge = GaugeVec::new(Opts::new(sample.name.clone(), desc.help), desc.labels)?;
                registry.register(Box::new(gauge.clone()))?;
                families.push((sample.kind, gauge.clone()));
                gauge
            }
        };
        gauge.with_label_values(&sample.label_values()).set(sample.value);
    }

    let encoder = TextEncoder::new();
    let mut body = Vec::new();
    encoder.encode(&registry.gather(), &mut body)?;

    Ok(Rendered {
        content_type: encoder.format_type().to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::BucketStats;
    use crate::metrics::shape_samples;
    use crate::object_store::BucketTarget;

    #[test]
    fn test_render_flat_and_failed_buckets() {
        let schema = MetricSchema::standard();
        let ok = BucketStats {
            success: true,
            object_count: 3,
            total_size: 600,
            max_size: 400,
            ..Default::default()
        };
        let mut samples = shape_samples(schema, &BucketTarget::new("data", "2024/", ""), &ok);
        samples.extend(shape_samples(schema, &BucketTarget::new("broken", "2024/", ""), &BucketStats::failed()));

        let rendered = render(schema, &samples).unwrap();
        let text = String::from_utf8(rendered.body).unwrap();

        assert!(rendered.content_type.starts_with("text/plain"));
        assert!(text.contains("# HELP s3_objects The total number of objects for the bucket/prefix combination"));
        assert!(text.contains("# TYPE s3_objects gauge"));
        assert!(text.contains("s3_objects{bucket=\"data\",prefix=\"2024/\"} 3"));
        assert!(text.contains("s3_biggest_object_size_bytes{bucket=\"data\",prefix=\"2024/\"} 400"));
        assert!(text.contains("s3_list_success{bucket=\"broken\",delimiter=\"\",prefix=\"2024/\"} 0"));
        assert!(text.contains("s3_list_success{bucket=\"data\",delimiter=\"\",prefix=\"2024/\"} 1"));
        assert!(!text.contains("bucket=\"broken\",prefix"));
        assert!(!text.contains("s3_common_prefixes"));
    }

    #[test]
    fn test_render_empty_scrape() {
        let rendered = render(MetricSchema::standard(), &[]).unwrap();
        assert!(rendered.body.is_empty());
    }
}
