//! # keychain-item
//!
//! Read and delete access to entries of a platform keychain:
//! - Typed getters over an item's metadata attributes (dates, account,
//!   server, protocol codes, ...) decoded from raw native buffers
//! - Retrieval of the protected secret, zeroized on drop
//! - Ordered snapshots of every attribute, rendered as JSON or YAML
//! - Deletion that invalidates the item handle
//!
//! Searching a keychain for items is left to the caller; this crate starts
//! from an already resolved native item (see [`native::NativeItem`]).

pub mod error;
pub mod item;
pub mod logging;
pub mod native;
pub mod render;
pub mod settings;

pub use error::{KeychainError, Result};
pub use item::{
    AttributeSpec, DecodeRule, DecodedValue, HandleState, KeychainItem, NativeItemHandle,
    SecretBytes, Snapshot,
};
pub use logging::init_logging;
pub use native::{
    AttributeTag, DefaultStatusTranslator, MemoryItem, MemoryProbe, NativeItem, OsStatus,
    StatusTranslator,
};
#[cfg(target_os = "macos")]
pub use native::{MacKeychainItem, SecurityStatusTranslator};
pub use settings::{BinaryEncoding, RenderSettings, SettingsManager, TimestampFormat};
