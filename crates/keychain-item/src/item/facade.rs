//! Public read surface of a keychain item

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use super::accessor::fetch_attribute;
use super::coercion::{decode, decode_secret};
use super::handle::{HandleState, NativeItemHandle};
use super::secret::{fetch_secret, SecretBytes};
use super::spec::{self, AttributeSpec, ATTRIBUTES, SECRET_KEY};
use super::value::{DecodedValue, Snapshot};
use crate::error::{KeychainError, Result};
use crate::native::{default_translator, NativeItem, StatusTranslator};
use crate::render;
use crate::settings::RenderSettings;

/// A keychain entry: named attribute getters, the secret, snapshot, deletion.
///
/// Getters borrow the item; [`delete`](Self::delete) needs it mutably, so a
/// read can never overlap a delete on the same item.
///
/// # Example
///
/// ```
/// use keychain_item::{KeychainItem, MemoryItem, AttributeTag};
///
/// let item = KeychainItem::new(
///     MemoryItem::new()
///         .with_attribute(AttributeTag::LABEL, b"example.com".to_vec())
///         .with_attribute(AttributeTag::PORT, b"8080".to_vec())
///         .with_secret(b"hunter2".to_vec()),
/// );
///
/// assert_eq!(item.label().unwrap(), Some("example.com".to_string()));
/// assert_eq!(item.port().unwrap(), Some(8080));
/// assert_eq!(item.comment().unwrap(), None);
/// assert_eq!(item.secret().unwrap().expose(), b"hunter2");
/// ```
pub struct KeychainItem {
    handle: NativeItemHandle,
    translator: Arc<dyn StatusTranslator>,
}

impl KeychainItem {
    /// Wrap a resolved native item, using the platform status translator
    pub fn new(item: impl NativeItem + 'static) -> Self {
        Self::from_handle(NativeItemHandle::new(item))
    }

    pub fn from_handle(handle: NativeItemHandle) -> Self {
        Self {
            handle,
            translator: default_translator(),
        }
    }

    /// Use a custom translator for native status codes
    pub fn with_translator(mut self, translator: Arc<dyn StatusTranslator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn state(&self) -> HandleState {
        self.handle.state()
    }

    /// Fetch and decode one attribute described by `spec`
    pub fn decoded(&self, spec: &AttributeSpec) -> Result<DecodedValue> {
        let raw = fetch_attribute(&self.handle, spec.tag, self.translator.as_ref())?;
        decode(spec, raw)
    }

    /// Fetch an attribute by name; `Ok(None)` if the name is not a known attribute
    pub fn attribute(&self, name: &str) -> Result<Option<DecodedValue>> {
        match spec::lookup(name) {
            Some(spec) => self.decoded(spec).map(Some),
            None => Ok(None),
        }
    }

    pub fn creation_date(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.decoded(&spec::CREATION_DATE)?.into_timestamp())
    }

    pub fn modified_date(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.decoded(&spec::MODIFIED_DATE)?.into_timestamp())
    }

    /// Item kind, stored as the description attribute (e.g. "Web form password")
    pub fn kind(&self) -> Result<Option<String>> {
        Ok(self.decoded(&spec::KIND)?.into_text())
    }

    pub fn comment(&self) -> Result<Option<String>> {
        Ok(self.decoded(&spec::COMMENT)?.into_text())
    }

    pub fn creator(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.decoded(&spec::CREATOR)?.into_binary())
    }

    /// Item type code, byte-reversed from its stored big-endian form
    pub fn item_type(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.decoded(&spec::TYPE)?.into_binary())
    }

    pub fn label(&self) -> Result<Option<String>> {
        Ok(self.decoded(&spec::LABEL)?.into_text())
    }

    pub fn account(&self) -> Result<Option<String>> {
        Ok(self.decoded(&spec::ACCOUNT)?.into_text())
    }

    pub fn service(&self) -> Result<Option<String>> {
        Ok(self.decoded(&spec::SERVICE)?.into_text())
    }

    /// Generic attribute data
    pub fn value(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.decoded(&spec::VALUE)?.into_binary())
    }

    pub fn security_domain(&self) -> Result<Option<String>> {
        Ok(self.decoded(&spec::SECURITY_DOMAIN)?.into_text())
    }

    pub fn server(&self) -> Result<Option<String>> {
        Ok(self.decoded(&spec::SERVER)?.into_text())
    }

    /// Four-character authentication code in reading order (e.g. `b"http"`)
    pub fn authentication_type(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.decoded(&spec::AUTHENTICATION_TYPE)?.into_binary())
    }

    pub fn port(&self) -> Result<Option<u32>> {
        Ok(self.decoded(&spec::PORT)?.into_integer())
    }

    pub fn path(&self) -> Result<Option<String>> {
        Ok(self.decoded(&spec::PATH)?.into_text())
    }

    /// Protocol code, byte-reversed from its stored big-endian form
    pub fn protocol(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.decoded(&spec::PROTOCOL)?.into_binary())
    }

    /// The protected payload (password or token)
    pub fn secret(&self) -> Result<SecretBytes> {
        fetch_secret(&self.handle, self.translator.as_ref())
    }

    /// Every attribute plus the secret, in export order. Absent attributes are kept as nulls.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> Result<Snapshot> {
        let mut snapshot = Snapshot::with_capacity(ATTRIBUTES.len() + 1);

        for spec in ATTRIBUTES {
            snapshot.insert(spec.name, self.decoded(spec)?);
        }
        snapshot.insert(SECRET_KEY, decode_secret(self.secret()?));

        debug!("Built snapshot with {} entries", snapshot.len());
        Ok(snapshot)
    }

    /// Render the snapshot as JSON
    pub fn to_json(&self, settings: &RenderSettings) -> Result<String> {
        render::to_json(&self.snapshot()?, settings)
    }

    /// Render the snapshot as YAML
    pub fn to_yaml(&self, settings: &RenderSettings) -> Result<String> {
        render::to_yaml(&self.snapshot()?, settings)
    }

    /// Short identifier for logs, e.g. `#<Keychain::Item "example.com">`
    pub fn describe(&self) -> Result<String> {
        let label = self.label()?.unwrap_or_default();
        Ok(format!("#<Keychain::Item \"{}\">", label))
    }

    /// Erase the entry from the store and release the native reference.
    ///
    /// Deleting an already deleted item does nothing.
    pub fn delete(&mut self) -> Result<()> {
        self.handle
            .mark_deleted()
            .map_err(|status| KeychainError::native(status, self.translator.as_ref()))
    }
}

impl std::fmt::Debug for KeychainItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeychainItem")
            .field("state", &self.handle.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{AttributeTag, DefaultStatusTranslator, MemoryItem};

    fn item(native: MemoryItem) -> KeychainItem {
        KeychainItem::new(native).with_translator(Arc::new(DefaultStatusTranslator))
    }

    #[test]
    fn test_describe_uses_label() {
        let item = item(MemoryItem::new().with_attribute(AttributeTag::LABEL, b"github.com".to_vec()));
        assert_eq!(item.describe().unwrap(), "#<Keychain::Item \"github.com\">");
    }

    #[test]
    fn test_describe_without_label() {
        let item = item(MemoryItem::new());
        assert_eq!(item.describe().unwrap(), "#<Keychain::Item \"\">");
    }

    #[test]
    fn test_attribute_by_name() {
        let item = item(MemoryItem::new().with_attribute(AttributeTag::PATH, b"/login".to_vec()));
        assert_eq!(
            item.attribute("path").unwrap(),
            Some(DecodedValue::Text("/login".to_string()))
        );
        assert_eq!(item.attribute("password").unwrap(), None);
        assert_eq!(item.attribute("nope").unwrap(), None);
    }

    #[test]
    fn test_debug_never_fetches() {
        let native = MemoryItem::new().with_secret(b"hunter2".to_vec());
        let probe = native.probe();
        let item = item(native);

        let debug = format!("{:?}", item);
        assert_eq!(debug, "KeychainItem { state: Live }");
        assert_eq!(probe.attribute_copies() + probe.secret_copies(), 0);
    }
}
