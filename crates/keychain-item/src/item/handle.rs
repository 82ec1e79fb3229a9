//! Ownership and lifecycle of the native item reference

use tracing::debug;

use crate::error::{KeychainError, Result};
use crate::native::{NativeItem, OsStatus};

/// Lifecycle state of a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Bound to a store entry
    Live,
    /// Reference released without erasing the entry
    Released,
    /// Entry erased and reference released (terminal)
    Deleted,
}

enum Slot {
    Live(Box<dyn NativeItem>),
    Released,
    Deleted,
}

/// Exclusive owner of one native item reference
///
/// The reference is released exactly once: on [`release`](Self::release),
/// on [`mark_deleted`](Self::mark_deleted), or when the handle is dropped.
/// After that no operation reaches the native item again.
pub struct NativeItemHandle {
    slot: Slot,
}

impl NativeItemHandle {
    /// Take ownership of a resolved native item
    pub fn new(item: impl NativeItem + 'static) -> Self {
        Self::from_boxed(Box::new(item))
    }

    pub fn from_boxed(item: Box<dyn NativeItem>) -> Self {
        Self {
            slot: Slot::Live(item),
        }
    }

    pub fn state(&self) -> HandleState {
        match self.slot {
            Slot::Live(_) => HandleState::Live,
            Slot::Released => HandleState::Released,
            Slot::Deleted => HandleState::Deleted,
        }
    }

    pub fn is_live(&self) -> bool {
        self.state() == HandleState::Live
    }

    /// Borrow the native item, failing fast once released or deleted
    pub fn item(&self) -> Result<&dyn NativeItem> {
        match &self.slot {
            Slot::Live(item) => Ok(item.as_ref()),
            Slot::Released => Err(KeychainError::InvalidState(
                "item reference has been released".to_string(),
            )),
            Slot::Deleted => Err(KeychainError::InvalidState(
                "item has been deleted".to_string(),
            )),
        }
    }

    /// Release the native reference. Does nothing if already released or deleted.
    pub fn release(&mut self) {
        if let Slot::Live(_) = self.slot {
            // Dropping the boxed item releases the reference.
            self.slot = Slot::Released;
            debug!("Released item reference");
        }
    }

    /// Erase the entry from the store, then release the reference.
    ///
    /// A handle that is no longer live is left untouched. If the store
    /// refuses the deletion, the handle stays live and the status is returned.
    pub fn mark_deleted(&mut self) -> std::result::Result<(), OsStatus> {
        let Slot::Live(item) = &self.slot else {
            debug!("Delete on a {:?} handle ignored", self.state());
            return Ok(());
        };

        item.delete()?;
        self.slot = Slot::Deleted;
        debug!("Deleted item and released its reference");
        Ok(())
    }
}

impl std::fmt::Debug for NativeItemHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeItemHandle")
            .field("state", &self.state())
            .finish()
    }
}
