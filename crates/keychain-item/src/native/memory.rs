//! In-memory native item
//!
//! Behaves like a store entry without touching a real keychain. Attribute
//! buffers are held in their raw native form, so decoding rules are exercised
//! exactly as they would be against the platform store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{AttributeTag, NativeItem, OsStatus, ERR_SEC_NO_SUCH_ATTR};

/// Counters shared between a [`MemoryItem`] and the test that built it
///
/// The item may be moved into a facade and dropped there; the probe stays
/// behind so the caller can observe what happened to the native reference.
#[derive(Debug, Clone, Default)]
pub struct MemoryProbe {
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    releases: AtomicUsize,
    deletions: AtomicUsize,
    attribute_copies: AtomicUsize,
    secret_copies: AtomicUsize,
    buffers_allocated: AtomicUsize,
    buffers_freed: AtomicUsize,
}

impl MemoryProbe {
    /// How many times the native reference was released
    pub fn releases(&self) -> usize {
        self.counters.releases.load(Ordering::SeqCst)
    }

    /// How many times the entry was erased from the store
    pub fn deletions(&self) -> usize {
        self.counters.deletions.load(Ordering::SeqCst)
    }

    /// How many attribute copy calls reached the store
    pub fn attribute_copies(&self) -> usize {
        self.counters.attribute_copies.load(Ordering::SeqCst)
    }

    /// How many secret copy calls reached the store
    pub fn secret_copies(&self) -> usize {
        self.counters.secret_copies.load(Ordering::SeqCst)
    }

    /// Content buffers handed out but not yet freed
    pub fn outstanding_buffers(&self) -> usize {
        self.counters.buffers_allocated.load(Ordering::SeqCst)
            - self.counters.buffers_freed.load(Ordering::SeqCst)
    }

    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// A store entry held in memory
#[derive(Debug, Default)]
pub struct MemoryItem {
    attributes: HashMap<AttributeTag, Vec<u8>>,
    attribute_failures: HashMap<AttributeTag, OsStatus>,
    secret: Vec<u8>,
    secret_failure: Option<OsStatus>,
    delete_failure: Option<OsStatus>,
    probe: MemoryProbe,
}

impl MemoryItem {
    /// Create an entry with no attributes and an empty secret
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw native bytes of an attribute
    pub fn with_attribute(mut self, tag: AttributeTag, raw: impl Into<Vec<u8>>) -> Self {
        self.attributes.insert(tag, raw.into());
        self
    }

    /// Set the protected payload
    pub fn with_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Make every copy of `tag` fail with `status`
    pub fn failing_attribute(mut self, tag: AttributeTag, status: OsStatus) -> Self {
        self.attribute_failures.insert(tag, status);
        self
    }

    /// Make every secret copy fail with `status`
    pub fn failing_secret(mut self, status: OsStatus) -> Self {
        self.secret_failure = Some(status);
        self
    }

    /// Make deletion fail with `status`
    pub fn failing_delete(mut self, status: OsStatus) -> Self {
        self.delete_failure = Some(status);
        self
    }

    /// A probe observing this item's native calls
    pub fn probe(&self) -> MemoryProbe {
        self.probe.clone()
    }

    /// Hand out a content buffer and free it once the caller's copy exists
    fn copy_content(&self, content: &[u8]) -> Vec<u8> {
        MemoryProbe::bump(&self.probe.counters.buffers_allocated);
        let copied = content.to_vec();
        MemoryProbe::bump(&self.probe.counters.buffers_freed);
        copied
    }
}

impl NativeItem for MemoryItem {
    fn copy_attribute(&self, tag: AttributeTag) -> Result<Vec<u8>, OsStatus> {
        MemoryProbe::bump(&self.probe.counters.attribute_copies);

        if let Some(status) = self.attribute_failures.get(&tag) {
            return Err(*status);
        }

        match self.attributes.get(&tag) {
            Some(content) => Ok(self.copy_content(content)),
            None => Err(ERR_SEC_NO_SUCH_ATTR),
        }
    }

    fn copy_secret(&self) -> Result<Vec<u8>, OsStatus> {
        MemoryProbe::bump(&self.probe.counters.secret_copies);

        match self.secret_failure {
            Some(status) => Err(status),
            None => Ok(self.copy_content(&self.secret)),
        }
    }

    fn delete(&self) -> Result<(), OsStatus> {
        if let Some(status) = self.delete_failure {
            return Err(status);
        }
        MemoryProbe::bump(&self.probe.counters.deletions);
        Ok(())
    }
}

impl Drop for MemoryItem {
    fn drop(&mut self) {
        MemoryProbe::bump(&self.probe.counters.releases);
    }
}
