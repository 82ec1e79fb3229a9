//! Protected payload retrieval
//!
//! The secret is read through its own native call, never through the
//! attribute path, and is never text-decoded.

use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::handle::NativeItemHandle;
use crate::error::{KeychainError, Result};
use crate::native::StatusTranslator;

/// Secret bytes - automatically zeroed when dropped
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes {
    bytes: Vec<u8>,
}

impl SecretBytes {
    /// Wrap raw secret bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the secret bytes (use carefully - avoid copying)
    pub fn expose(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume and return the inner bytes
    pub fn into_inner(mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBytes")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Fetch the protected payload of the entry behind `handle`.
///
/// Any non-success status is an error; there is no absent case. An empty
/// secret comes back as zero bytes.
pub fn fetch_secret(
    handle: &NativeItemHandle,
    translator: &dyn StatusTranslator,
) -> Result<SecretBytes> {
    let item = handle.item()?;

    match item.copy_secret() {
        Ok(bytes) => {
            debug!("Copied secret ({} bytes)", bytes.len());
            Ok(SecretBytes::new(bytes))
        }
        Err(status) => {
            warn!("Secret copy failed with status {}", status);
            Err(KeychainError::native(status, translator))
        }
    }
}
