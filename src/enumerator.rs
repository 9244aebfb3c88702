// src/enumerator.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Walks every page of a listing for one bucket target.

use tracing::debug;

use crate::error::ListingError;
use crate::object_store::{BucketTarget, ObjectEntry, ObjectLister};

/// Complete result of walking all pages for one target.
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    /// All entries, in page order.
    pub entries: Vec<ObjectEntry>,
    /// Sum of every page's common-prefix count.
    pub common_prefixes: u64,
    /// Number of listing calls issued.
    pub pages: usize,
}

/// Drives pagination for one [`BucketTarget`].
pub struct ObjectEnumerator<'a> {
    lister: &'a dyn ObjectLister,
    target: &'a BucketTarget,
}

impl<'a> ObjectEnumerator<'a> {
    pub fn new(lister: &'a dyn ObjectLister, target: &'a BucketTarget) -> Self {
        Self { lister, target }
    }

    /// List every page until one arrives without a continuation token.
    /// The first failing call aborts the walk and drops what was gathered.
    pub async fn enumerate(&self) -> Result<Enumeration, ListingError> {
        let mut out = Enumeration::default();
        let mut cont: Option<String> = None;

        loop {
            let page = self.lister.list_page(self.target, cont.as_deref()).await?;
            out.pages += 1;
            out.common_prefixes += page.common_prefixes;
            debug!(
                bucket = %self.target.bucket,
                page = out.pages,
                entries = page.entries.len(),
                common_prefixes = page.common_prefixes,
                "listed page"
            );
            let last = page.is_final();
            out.entries.extend(page.entries);
            if last {
                break;
            }
            cont = page.continuation_token;
        }

        Ok(out)
    }
}
