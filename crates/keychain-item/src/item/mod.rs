//! Keychain items
//!
//! Layers, leaves first:
//! - `handle`: ownership and lifecycle of the native reference
//! - `accessor`: single-attribute fetch (bytes, absent, or error)
//! - `coercion`: per-attribute decoding of raw bytes
//! - `secret`: protected payload retrieval
//! - `facade`: named getters, snapshot, and deletion

mod accessor;
mod coercion;
mod facade;
mod handle;
mod secret;
pub mod spec;
mod value;

pub use accessor::fetch_attribute;
pub use coercion::{decode, decode_secret, NULL_CODE, STORE_DATE_FORMAT};
pub use facade::KeychainItem;
pub use handle::{HandleState, NativeItemHandle};
pub use secret::{fetch_secret, SecretBytes};
pub use spec::{AttributeSpec, DecodeRule, ATTRIBUTES};
pub use value::{DecodedValue, Snapshot};
