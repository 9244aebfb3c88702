// src/credentials.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Per-bucket credential resolution.
//!
//! Two strategies exist: a static mapping loaded at startup
//! (`bucket,access_key,secret_key_file`), and the ambient chain (environment
//! variables, then the shared profile files) built in `s3_client`. The
//! secret key file is re-read on every resolution so rotated secrets are picked
//! up by the next scrape.

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

use crate::error::ResolutionError;

/// Credentials handed to the lister factory for one bucket.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSet {
    Static { access_key: String, secret_key: String },
    /// Let the SDK walk its default provider chain.
    AmbientChain,
}

// Never print the secret.
impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSet::Static { access_key, .. } => f
                .debug_struct("Static")
                .field("access_key", access_key)
                .field("secret_key", &"<redacted>")
                .finish(),
            CredentialSet::AmbientChain => f.write_str("AmbientChain"),
        }
    }
}

/// One line of the credentials mapping file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key: String,
    pub secret_key_file: PathBuf,
}

/// Bucket → static credentials, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsMapping {
    entries: Vec<(String, StaticCredentials)>,
}

impl CredentialsMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the credentials for `bucket`. A replaced bucket keeps
    /// its original position.
    pub fn insert(&mut self, bucket: impl Into<String>, creds: StaticCredentials) {
        let bucket = bucket.into();
        match self.entries.iter_mut().find(|(b, _)| *b == bucket) {
            Some((_, existing)) => *existing = creds,
            None => self.entries.push((bucket, creds)),
        }
    }

    pub fn get(&self, bucket: &str) -> Option<&StaticCredentials> {
        self.entries.iter().find(|(b, _)| b == bucket).map(|(_, c)| c)
    }

    pub fn buckets(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(b, _)| b.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves a credential set for a bucket name.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(&self, bucket: &str) -> Result<CredentialSet, ResolutionError>;
}

/// The two credential-sourcing strategies.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    StaticMapping(CredentialsMapping),
    AmbientChain,
}

#[async_trait]
impl CredentialResolver for CredentialSource {
    async fn resolve(&self, bucket: &str) -> Result<CredentialSet, ResolutionError> {
        match self {
            CredentialSource::AmbientChain => Ok(CredentialSet::AmbientChain),
            CredentialSource::StaticMapping(mapping) => {
                let creds = mapping
                    .get(bucket)
                    .ok_or_else(|| ResolutionError::UnknownBucket(bucket.to_string()))?;

                let secret = tokio::fs::read_to_string(&creds.secret_key_file)
                    .await
                    .map_err(|source| ResolutionError::SecretKeyFile {
                        bucket: bucket.to_string(),
                        path: creds.secret_key_file.clone(),
                        source,
                    })?;

                Ok(CredentialSet::Static {
                    access_key: creds.access_key.clone(),
                    secret_key: secret.trim().to_string(),
                })
            }
        }
    }
}
