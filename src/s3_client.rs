// src/s3_client.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! S3 adapter for the listing traits, built on the async AWS Rust SDK.
//!
//! A client is built per bucket per scrape from that bucket's resolved
//! credentials; connection pooling inside the SDK is not shared across
//! buckets.

use async_trait::async_trait;
use aws_config::environment::EnvironmentVariableCredentialsProvider;
use aws_config::meta::credentials::CredentialsProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::constants::STATIC_CREDENTIALS_PROVIDER;
use crate::credentials::CredentialSet;
use crate::error::{ListingError, ResolutionError};
use crate::object_store::{BucketTarget, ListerFactory, ObjectEntry, ObjectLister, PageResult};

/// Connection settings shared by every bucket's client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    /// Custom endpoint; empty means the SDK's regional default.
    pub endpoint_url: String,
    pub region: String,
    pub disable_ssl: bool,
    pub force_path_style: bool,
}

impl ClientSettings {
    /// Endpoint to hand to the SDK, with a scheme chosen by `disable_ssl` when
    /// the user supplied a bare host.
    pub fn endpoint(&self) -> Option<String> {
        let endpoint = self.endpoint_url.trim();
        if endpoint.is_empty() {
            return None;
        }
        if endpoint.contains("://") {
            return Some(endpoint.to_string());
        }
        let scheme = if self.disable_ssl { "http" } else { "https" };
        Some(format!("{}://{}", scheme, endpoint))
    }
}

/// Environment variables first, then the shared credentials/config profile.
/// Instance metadata, web identity and container endpoints are not consulted.
pub fn ambient_credentials_chain(profile: ProfileFileCredentialsProvider) -> CredentialsProviderChain {
    CredentialsProviderChain::first_try("Environment", EnvironmentVariableCredentialsProvider::new())
        .or_else("Profile", profile)
}

/// Build an S3 client for one bucket.
pub async fn build_client(settings: &ClientSettings, credentials: &CredentialSet) -> Client {
    let loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()));

    let mut loader = match credentials {
        CredentialSet::Static { access_key, secret_key } => loader.credentials_provider(Credentials::new(
            access_key.clone(),
            secret_key.clone(),
            None,
            None,
            STATIC_CREDENTIALS_PROVIDER,
        )),
        CredentialSet::AmbientChain => loader.credentials_provider(ambient_credentials_chain(
            ProfileFileCredentialsProvider::builder().build(),
        )),
    };

    if let Some(endpoint) = settings.endpoint() {
        loader = loader.endpoint_url(endpoint);
    }

    let cfg = loader.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&cfg)
        .force_path_style(settings.force_path_style)
        .build();
    Client::from_conf(s3_config)
}

/// `ListObjectsV2`-backed lister.
pub struct S3Lister {
    client: Client,
}

impl S3Lister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn to_utc(ts: Option<&aws_sdk_s3::primitives::DateTime>) -> DateTime<Utc> {
    ts.and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
        .unwrap_or_default()
}

#[async_trait]
impl ObjectLister for S3Lister {
    async fn list_page(
        &self,
        target: &BucketTarget,
        continuation_token: Option<&str>,
    ) -> Result<PageResult, ListingError> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(&target.bucket)
            .prefix(&target.prefix);
        if !target.delimiter.is_empty() {
            req = req.delimiter(&target.delimiter);
        }
        if let Some(token) = continuation_token {
            req = req.continuation_token(token);
        }

        let resp = req.send().await.map_err(|e| ListingError::Request {
            bucket: target.bucket.clone(),
            source: Box::new(e),
        })?;

        let entries = resp
            .contents()
            .iter()
            .map(|obj| ObjectEntry {
                key: obj.key().unwrap_or_default().to_string(),
                size: obj.size().and_then(|s| u64::try_from(s).ok()).unwrap_or(0),
                last_modified: to_utc(obj.last_modified()),
            })
            .collect();

        Ok(PageResult {
            entries,
            common_prefixes: resp.common_prefixes().len() as u64,
            continuation_token: resp.next_continuation_token().map(str::to_string),
        })
    }
}

/// Production [`ListerFactory`]: one SDK client per bucket per scrape.
#[derive(Debug, Clone)]
pub struct S3ListerFactory {
    settings: ClientSettings,
}

impl S3ListerFactory {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ListerFactory for S3ListerFactory {
    async fn build(
        &self,
        bucket: &str,
        credentials: &CredentialSet,
    ) -> Result<Arc<dyn ObjectLister>, ResolutionError> {
        debug!(bucket, credentials = ?credentials, "building S3 client");
        let client = build_client(&self.settings, credentials).await;
        Ok(Arc::new(S3Lister::new(client)))
    }
}
