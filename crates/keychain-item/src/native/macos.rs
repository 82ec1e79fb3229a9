//! Security.framework binding
//!
//! Uses the legacy `SecKeychainItem` API, the only one that exposes the
//! per-attribute content calls:
//! - `SecKeychainItemCopyContent` for attributes and the protected payload
//! - `SecKeychainItemFreeContent` to release content buffers
//! - `SecKeychainItemDelete` to erase an entry

#![allow(deprecated)]

use std::os::raw::c_void;
use std::ptr;

use core_foundation_sys::base::{CFRelease, CFTypeRef};
use security_framework::base::Error as SecurityError;
use security_framework_sys::base::SecKeychainItemRef;
use tracing::warn;

use super::{AttributeTag, NativeItem, OsStatus, StatusTranslator, DefaultStatusTranslator, ERR_SEC_PARAM};

#[repr(C)]
struct SecKeychainAttribute {
    tag: u32,
    length: u32,
    data: *mut c_void,
}

#[repr(C)]
struct SecKeychainAttributeList {
    count: u32,
    attr: *mut SecKeychainAttribute,
}

#[link(name = "Security", kind = "framework")]
extern "C" {
    fn SecKeychainItemCopyContent(
        item_ref: SecKeychainItemRef,
        item_class: *mut u32,
        attr_list: *mut SecKeychainAttributeList,
        length: *mut u32,
        out_data: *mut *mut c_void,
    ) -> OsStatus;

    fn SecKeychainItemFreeContent(
        attr_list: *mut SecKeychainAttributeList,
        data: *mut c_void,
    ) -> OsStatus;

    fn SecKeychainItemDelete(item_ref: SecKeychainItemRef) -> OsStatus;
}

/// A keychain entry owned through a `SecKeychainItemRef`
///
/// The reference is released exactly once, when this value is dropped.
pub struct MacKeychainItem {
    item_ref: SecKeychainItemRef,
}

// SAFETY: keychain item references are reference-counted CF objects; the
// Security framework serializes access to the underlying entry.
unsafe impl Send for MacKeychainItem {}

impl MacKeychainItem {
    /// Take ownership of an item reference obtained from a keychain search.
    ///
    /// # Safety
    ///
    /// `item_ref` must be a valid, retained `SecKeychainItemRef` whose
    /// retain count is transferred to the returned value.
    pub unsafe fn from_raw(item_ref: SecKeychainItemRef) -> Option<Self> {
        if item_ref.is_null() {
            None
        } else {
            Some(Self { item_ref })
        }
    }

    /// Copy a content buffer of `length` bytes, then free it.
    unsafe fn take_buffer(data: *const c_void, length: u32) -> Vec<u8> {
        if data.is_null() || length == 0 {
            Vec::new()
        } else {
            std::slice::from_raw_parts(data as *const u8, length as usize).to_vec()
        }
    }
}

impl NativeItem for MacKeychainItem {
    fn copy_attribute(&self, tag: AttributeTag) -> Result<Vec<u8>, OsStatus> {
        let mut attributes = [SecKeychainAttribute {
            tag: tag.0,
            length: 0,
            data: ptr::null_mut(),
        }];
        let mut list = SecKeychainAttributeList {
            count: 1,
            attr: attributes.as_mut_ptr(),
        };

        let status = unsafe {
            SecKeychainItemCopyContent(
                self.item_ref,
                ptr::null_mut(),
                &mut list,
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        if status != 0 {
            return Err(status);
        }

        // The store rewrites `list.attr`; read through it, not `attributes`.
        let copied = unsafe {
            match list.attr.as_ref() {
                Some(attr) => Self::take_buffer(attr.data, attr.length),
                None => Vec::new(),
            }
        };

        let status = unsafe { SecKeychainItemFreeContent(&mut list, ptr::null_mut()) };
        if status != 0 {
            warn!("Failed to free attribute content for {:?}: {}", tag, status);
        }

        Ok(copied)
    }

    fn copy_secret(&self) -> Result<Vec<u8>, OsStatus> {
        let mut length: u32 = 0;
        let mut data: *mut c_void = ptr::null_mut();

        let status = unsafe {
            SecKeychainItemCopyContent(
                self.item_ref,
                ptr::null_mut(),
                ptr::null_mut(),
                &mut length,
                &mut data,
            )
        };
        if status != 0 {
            return Err(status);
        }

        let copied = unsafe { Self::take_buffer(data, length) };

        if !data.is_null() {
            let status = unsafe { SecKeychainItemFreeContent(ptr::null_mut(), data) };
            if status != 0 {
                warn!("Failed to free secret content: {}", status);
            }
        }

        Ok(copied)
    }

    fn delete(&self) -> Result<(), OsStatus> {
        if self.item_ref.is_null() {
            return Err(ERR_SEC_PARAM);
        }
        match unsafe { SecKeychainItemDelete(self.item_ref) } {
            0 => Ok(()),
            status => Err(status),
        }
    }
}

impl Drop for MacKeychainItem {
    fn drop(&mut self) {
        unsafe { CFRelease(self.item_ref as CFTypeRef) };
    }
}

/// Asks Security.framework for the message of a status code
#[derive(Debug, Default, Clone, Copy)]
pub struct SecurityStatusTranslator;

impl StatusTranslator for SecurityStatusTranslator {
    fn describe(&self, code: OsStatus) -> String {
        SecurityError::from_code(code)
            .message()
            .unwrap_or_else(|| DefaultStatusTranslator.describe(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::ERR_SEC_ITEM_NOT_FOUND;

    #[test]
    fn test_null_reference_is_rejected() {
        assert!(unsafe { MacKeychainItem::from_raw(ptr::null_mut()) }.is_none());
    }

    #[test]
    fn test_translator_has_message() {
        let message = SecurityStatusTranslator.describe(ERR_SEC_ITEM_NOT_FOUND);
        assert!(!message.is_empty());
    }
}
