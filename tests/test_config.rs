// tests/test_config.rs
//
// Startup configuration: credentials mapping files and bucket sources.

use clap::Parser;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

use s3_exporter::config::BucketSource;
use s3_exporter::{ConfigError, CredentialResolver, CredentialSet, ExporterArgs, ExporterConfig};

fn args(extra: &[&str]) -> ExporterArgs {
    let mut argv = vec!["s3-exporter", "--s3.region", "us-east-1"];
    argv.extend_from_slice(extra);
    ExporterArgs::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn test_mapping_file_drives_buckets_and_credentials() {
    let dir = tempdir().unwrap();
    let secret_path = dir.path().join("logs.secret");
    std::fs::write(&secret_path, "wJalrXUtnFEMI\n").unwrap();

    let mut mapping = NamedTempFile::new().unwrap();
    writeln!(mapping, "logs,AKIALOGS,{}", secret_path.display()).unwrap();
    writeln!(mapping).unwrap();
    writeln!(mapping, "media,AKIAMEDIA,{}", dir.path().join("missing").display()).unwrap();

    let path = mapping.path().to_string_lossy().to_string();
    let cfg = ExporterConfig::from_args(&args(&["--s3.credentials-mapping", &path, "--s3.delimiter", "/"])).unwrap();

    assert!(matches!(cfg.buckets, BucketSource::CredentialsMapping(_)));
    assert_eq!(cfg.bucket_names(), vec!["logs", "media"]);
    assert!(cfg.targets().iter().all(|t| t.delimiter == "/"));

    let source = cfg.credential_source();
    assert_eq!(
        source.resolve("logs").await.unwrap(),
        CredentialSet::Static {
            access_key: "AKIALOGS".to_string(),
            secret_key: "wJalrXUtnFEMI".to_string(),
        }
    );
    // An unreadable secret only fails its own bucket.
    assert!(source.resolve("media").await.is_err());
}

#[test]
fn test_missing_mapping_file_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.csv").to_string_lossy().to_string();
    let err = ExporterConfig::from_args(&args(&["--s3.credentials-mapping", &path])).unwrap_err();
    assert!(matches!(err, ConfigError::MappingRead { .. }));
}

#[test]
fn test_malformed_mapping_is_fatal() {
    let mut mapping = NamedTempFile::new().unwrap();
    writeln!(mapping, "logs;AKIA;/secret").unwrap();
    let path = mapping.path().to_string_lossy().to_string();

    let err = ExporterConfig::from_args(&args(&["--s3.credentials-mapping", &path])).unwrap_err();
    assert!(matches!(err, ConfigError::MappingFormat { line: 1, .. }));
    assert!(err.to_string().contains("bucket,access_key,secret_key_file"));
}

#[test]
fn test_client_settings_from_flags() {
    let cfg = ExporterConfig::from_args(&args(&[
        "--s3.buckets",
        "a",
        "--s3.endpoint-url",
        "minio:9000",
        "--s3.disable-ssl",
        "--s3.force-path-style",
        "--web.listen-address",
        "127.0.0.1:9999",
    ]))
    .unwrap();

    assert!(cfg.client.disable_ssl);
    assert!(cfg.client.force_path_style);
    assert_eq!(cfg.client.endpoint().as_deref(), Some("http://minio:9000"));
    assert_eq!(cfg.listen_address, "127.0.0.1:9999");
}
