//! Single-attribute fetch
//!
//! All attribute getters funnel through [`fetch_attribute`]. The outcome is
//! one of three: the bytes, `None` when the entry lacks the attribute, or a
//! native error carrying the raw status code.

use tracing::{debug, warn};

use super::handle::NativeItemHandle;
use crate::error::{KeychainError, Result};
use crate::native::{AttributeTag, StatusTranslator, ERR_SEC_NO_SUCH_ATTR};

/// Fetch the raw content of one attribute.
pub fn fetch_attribute(
    handle: &NativeItemHandle,
    tag: AttributeTag,
    translator: &dyn StatusTranslator,
) -> Result<Option<Vec<u8>>> {
    let item = handle.item()?;

    match item.copy_attribute(tag) {
        Ok(bytes) => {
            debug!("Copied attribute {:?} ({} bytes)", tag, bytes.len());
            Ok(Some(bytes))
        }
        Err(ERR_SEC_NO_SUCH_ATTR) => {
            debug!("Attribute {:?} not present", tag);
            Ok(None)
        }
        Err(status) => {
            warn!("Attribute {:?} copy failed with status {}", tag, status);
            Err(KeychainError::native(status, translator))
        }
    }
}
