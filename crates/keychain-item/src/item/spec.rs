//! Attribute specifications and registry.
//!
//! Every named getter on [`KeychainItem`](super::KeychainItem) is backed by one
//! entry here: the native tag it reads and the rule used to decode the bytes.

use crate::native::AttributeTag;

/// How raw attribute bytes become a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeRule {
    /// Bytes are UTF-8 text
    Utf8Text,

    /// Bytes are returned untouched
    Binary,

    /// Store-format date text (`YYYYMMDDhhmmssZ`), parsed as UTC
    Timestamp,

    /// Four-byte numeric code stored big-endian, returned byte-reversed.
    ///
    /// Four zero bytes mean "not set" and decode to null. The check is made
    /// on the stored bytes, before reversal.
    ReversedCode,

    /// Four ASCII characters, returned in stored order.
    ///
    /// Four zero bytes decode to null, as for `ReversedCode`.
    CharCode,

    /// Decimal ASCII integer
    DecimalInteger,
}

/// Specification for a single attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Name used by getters and snapshot keys (e.g. "label", "port")
    pub name: &'static str,

    /// Native tag passed to the store
    pub tag: AttributeTag,

    /// Decoding applied to the raw bytes
    pub rule: DecodeRule,
}

impl AttributeSpec {
    const fn new(name: &'static str, tag: AttributeTag, rule: DecodeRule) -> Self {
        Self { name, tag, rule }
    }
}

pub const CREATION_DATE: AttributeSpec =
    AttributeSpec::new("creation_date", AttributeTag::CREATION_DATE, DecodeRule::Timestamp);
pub const MODIFIED_DATE: AttributeSpec =
    AttributeSpec::new("modified_date", AttributeTag::MODIFIED_DATE, DecodeRule::Timestamp);
pub const KIND: AttributeSpec =
    AttributeSpec::new("kind", AttributeTag::DESCRIPTION, DecodeRule::Utf8Text);
pub const COMMENT: AttributeSpec =
    AttributeSpec::new("comment", AttributeTag::COMMENT, DecodeRule::Utf8Text);
pub const CREATOR: AttributeSpec =
    AttributeSpec::new("creator", AttributeTag::CREATOR, DecodeRule::Binary);
pub const TYPE: AttributeSpec =
    AttributeSpec::new("type", AttributeTag::TYPE, DecodeRule::ReversedCode);
pub const LABEL: AttributeSpec =
    AttributeSpec::new("label", AttributeTag::LABEL, DecodeRule::Utf8Text);
pub const ACCOUNT: AttributeSpec =
    AttributeSpec::new("account", AttributeTag::ACCOUNT, DecodeRule::Utf8Text);
pub const SERVICE: AttributeSpec =
    AttributeSpec::new("service", AttributeTag::SERVICE, DecodeRule::Utf8Text);
pub const VALUE: AttributeSpec =
    AttributeSpec::new("value", AttributeTag::GENERIC, DecodeRule::Binary);
pub const SECURITY_DOMAIN: AttributeSpec =
    AttributeSpec::new("security_domain", AttributeTag::SECURITY_DOMAIN, DecodeRule::Utf8Text);
pub const SERVER: AttributeSpec =
    AttributeSpec::new("server", AttributeTag::SERVER, DecodeRule::Utf8Text);
pub const AUTHENTICATION_TYPE: AttributeSpec = AttributeSpec::new(
    "authentication_type",
    AttributeTag::AUTHENTICATION_TYPE,
    DecodeRule::CharCode,
);
pub const PORT: AttributeSpec =
    AttributeSpec::new("port", AttributeTag::PORT, DecodeRule::DecimalInteger);
pub const PATH: AttributeSpec =
    AttributeSpec::new("path", AttributeTag::PATH, DecodeRule::Utf8Text);
pub const PROTOCOL: AttributeSpec =
    AttributeSpec::new("protocol", AttributeTag::PROTOCOL, DecodeRule::ReversedCode);

/// Registry of all item attributes, in export order.
///
/// Snapshots follow this order, with the secret appended last.
pub const ATTRIBUTES: &[AttributeSpec] = &[
    CREATION_DATE,
    MODIFIED_DATE,
    KIND,
    COMMENT,
    CREATOR,
    TYPE,
    LABEL,
    ACCOUNT,
    SERVICE,
    VALUE,
    SECURITY_DOMAIN,
    SERVER,
    AUTHENTICATION_TYPE,
    PORT,
    PATH,
    PROTOCOL,
];

/// Snapshot key under which the secret is exported
pub const SECRET_KEY: &str = "password";

/// Look up an attribute spec by name.
pub fn lookup(name: &str) -> Option<&'static AttributeSpec> {
    ATTRIBUTES.iter().find(|spec| spec.name == name)
}
