//! Namespaces: logical grouping and isolation of buckets.

use crate::error::CoreResult;
use crate::name::validate_name;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Serialized image of a namespace for the system catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NamespaceSnapshot {
    pub name: String,
    pub buckets: Vec<String>,
}

/// A logical grouping of related data.
///
/// Similar data that needs to be grouped differently can use a different
/// namespace. Namespaces isolate data by construction — each owns a
/// disjoint set of buckets — and keep searches cheap by limiting how much
/// data a scan has to traverse.
///
/// The bucket list is read far more often than it grows, so it sits
/// behind a read/write lock.
#[derive(Debug)]
pub struct Namespace {
    name: String,
    buckets: RwLock<Vec<String>>,
}

impl Namespace {
    /// Creates a namespace with the given name.
    ///
    /// # Errors
    ///
    /// `EmptyName`/`InvalidName` if the name fails the naming rule.
    pub fn new(name: &str) -> CoreResult<Self> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_owned(),
            buckets: RwLock::new(Vec::new()),
        })
    }

    /// The name of this namespace.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A snapshot of the names of the buckets in this namespace.
    #[must_use]
    pub fn buckets(&self) -> Vec<String> {
        self.buckets.read().clone()
    }

    /// Answers whether `bucket` belongs to this namespace.
    #[must_use]
    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.buckets.read().iter().any(|b| b == bucket)
    }

    /// Registers a bucket. Idempotent.
    pub(crate) fn add_bucket(&self, bucket: &str) {
        let mut buckets = self.buckets.write();
        if !buckets.iter().any(|b| b == bucket) {
            buckets.push(bucket.to_owned());
        }
    }

    pub(crate) fn snapshot(&self) -> NamespaceSnapshot {
        NamespaceSnapshot {
            name: self.name.clone(),
            buckets: self.buckets(),
        }
    }

    pub(crate) fn from_snapshot(snapshot: NamespaceSnapshot) -> Self {
        Self {
            name: snapshot.name,
            buckets: RwLock::new(snapshot.buckets),
        }
    }
}
