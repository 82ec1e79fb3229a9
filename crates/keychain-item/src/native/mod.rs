//! Native keychain seam
//!
//! Everything that talks to the platform store goes through [`NativeItem`]:
//! - `memory`: in-process item used by tests and non-macOS hosts
//! - `macos`: Security.framework binding (macOS only)
//!
//! An implementor owns exactly one native reference and releases it in `Drop`.

use std::fmt;
use std::sync::Arc;

pub mod memory;
#[cfg(target_os = "macos")]
pub mod macos;

pub use memory::{MemoryItem, MemoryProbe};
#[cfg(target_os = "macos")]
pub use macos::{MacKeychainItem, SecurityStatusTranslator};

/// Native status code as returned by the store (`OSStatus`)
pub type OsStatus = i32;

pub const ERR_SEC_SUCCESS: OsStatus = 0;
pub const ERR_SEC_PARAM: OsStatus = -50;
pub const ERR_SEC_USER_CANCELED: OsStatus = -128;
pub const ERR_SEC_AUTH_FAILED: OsStatus = -25293;
pub const ERR_SEC_NO_SUCH_KEYCHAIN: OsStatus = -25294;
pub const ERR_SEC_DUPLICATE_ITEM: OsStatus = -25299;
pub const ERR_SEC_ITEM_NOT_FOUND: OsStatus = -25300;
pub const ERR_SEC_NO_SUCH_ATTR: OsStatus = -25303;
pub const ERR_SEC_INVALID_ITEM_REF: OsStatus = -25304;
pub const ERR_SEC_INTERACTION_NOT_ALLOWED: OsStatus = -25308;

/// Native identifier of one item attribute
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeTag(pub u32);

impl AttributeTag {
    pub const CREATION_DATE: Self = Self::four_cc(b"cdat");
    pub const MODIFIED_DATE: Self = Self::four_cc(b"mdat");
    pub const DESCRIPTION: Self = Self::four_cc(b"desc");
    pub const COMMENT: Self = Self::four_cc(b"icmt");
    pub const CREATOR: Self = Self::four_cc(b"crtr");
    pub const TYPE: Self = Self::four_cc(b"type");
    pub const LABEL: Self = Self::four_cc(b"labl");
    pub const ACCOUNT: Self = Self::four_cc(b"acct");
    pub const SERVICE: Self = Self::four_cc(b"svce");
    pub const GENERIC: Self = Self::four_cc(b"gena");
    pub const SECURITY_DOMAIN: Self = Self::four_cc(b"sdmn");
    pub const SERVER: Self = Self::four_cc(b"srvr");
    pub const AUTHENTICATION_TYPE: Self = Self::four_cc(b"atyp");
    pub const PORT: Self = Self::four_cc(b"port");
    pub const PATH: Self = Self::four_cc(b"path");
    pub const PROTOCOL: Self = Self::four_cc(b"ptcl");

    /// Tag from its four-character code, read big-endian
    pub const fn four_cc(code: &[u8; 4]) -> Self {
        Self(u32::from_be_bytes(*code))
    }
}

impl fmt::Debug for AttributeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic()) {
            write!(f, "'{}'", String::from_utf8_lossy(&bytes))
        } else {
            write!(f, "{:#010x}", self.0)
        }
    }
}

/// One resolved store entry, as seen through the native API
///
/// Every method is a single blocking call into the store. Content buffers
/// handed out by the store are copied and released before returning.
pub trait NativeItem: Send {
    /// Copy the raw content of one attribute.
    ///
    /// Returns `Err(ERR_SEC_NO_SUCH_ATTR)` when the entry lacks the attribute.
    fn copy_attribute(&self, tag: AttributeTag) -> std::result::Result<Vec<u8>, OsStatus>;

    /// Copy the protected payload of the entry.
    fn copy_secret(&self) -> std::result::Result<Vec<u8>, OsStatus>;

    /// Erase the entry from its store. The reference itself is released on drop.
    fn delete(&self) -> std::result::Result<(), OsStatus>;
}

/// Turns a native status code into a human-readable message
pub trait StatusTranslator: Send + Sync {
    fn describe(&self, code: OsStatus) -> String;
}

/// Translator with a fixed catalog of common Security framework codes
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultStatusTranslator;

impl StatusTranslator for DefaultStatusTranslator {
    fn describe(&self, code: OsStatus) -> String {
        let message = match code {
            ERR_SEC_SUCCESS => "No error",
            ERR_SEC_PARAM => "One or more parameters passed to a function were not valid",
            ERR_SEC_USER_CANCELED => "User canceled the operation",
            ERR_SEC_AUTH_FAILED => "The user name or passphrase you entered is not correct",
            ERR_SEC_NO_SUCH_KEYCHAIN => "The specified keychain could not be found",
            ERR_SEC_DUPLICATE_ITEM => "The specified item already exists in the keychain",
            ERR_SEC_ITEM_NOT_FOUND => "The specified item could not be found in the keychain",
            ERR_SEC_NO_SUCH_ATTR => "The specified attribute does not exist",
            ERR_SEC_INVALID_ITEM_REF => "The specified item is no longer valid",
            ERR_SEC_INTERACTION_NOT_ALLOWED => "User interaction is not allowed",
            _ => return format!("Unknown keychain error (OSStatus {})", code),
        };
        message.to_string()
    }
}

/// The translator for the current platform
pub fn default_translator() -> Arc<dyn StatusTranslator> {
    #[cfg(target_os = "macos")]
    return Arc::new(SecurityStatusTranslator);

    #[cfg(not(target_os = "macos"))]
    return Arc::new(DefaultStatusTranslator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_cc_is_big_endian() {
        assert_eq!(AttributeTag::four_cc(b"acct").0, 0x6163_6374);
        assert_eq!(AttributeTag::LABEL.0, 0x6c61_626c);
    }

    #[test]
    fn test_tag_debug() {
        assert_eq!(format!("{:?}", AttributeTag::PROTOCOL), "'ptcl'");
        assert_eq!(format!("{:?}", AttributeTag(7)), "0x00000007");
    }

    #[test]
    fn test_default_translator_catalog() {
        let translator = DefaultStatusTranslator;
        assert_eq!(
            translator.describe(ERR_SEC_ITEM_NOT_FOUND),
            "The specified item could not be found in the keychain"
        );
        assert_eq!(
            translator.describe(-1),
            "Unknown keychain error (OSStatus -1)"
        );
    }
}
