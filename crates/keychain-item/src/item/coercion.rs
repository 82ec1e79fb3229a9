//! Decoding of raw attribute bytes
//!
//! The store hands back byte buffers; which rule applies is decided by the
//! attribute's [`DecodeRule`]. Missing attributes arrive as `None` and always
//! decode to [`DecodedValue::Absent`].

use chrono::{DateTime, NaiveDateTime, Utc};

use super::secret::SecretBytes;
use super::spec::{AttributeSpec, DecodeRule};
use super::value::DecodedValue;
use crate::error::{KeychainError, Result};

/// Marker stored in four-byte code attributes that have no value
pub const NULL_CODE: [u8; 4] = [0, 0, 0, 0];

/// `strftime` layout of store dates, without the trailing NUL
pub const STORE_DATE_FORMAT: &str = "%Y%m%d%H%M%SZ";

/// Decode one attribute according to its spec.
pub fn decode(spec: &AttributeSpec, raw: Option<Vec<u8>>) -> Result<DecodedValue> {
    let Some(raw) = raw else {
        return Ok(DecodedValue::Absent);
    };

    match spec.rule {
        DecodeRule::Utf8Text => decode_text(spec.name, raw),
        DecodeRule::Binary => Ok(DecodedValue::Binary(raw)),
        DecodeRule::Timestamp => decode_timestamp(spec.name, &raw),
        DecodeRule::ReversedCode => Ok(decode_reversed_code(raw)),
        DecodeRule::CharCode => Ok(decode_char_code(raw)),
        DecodeRule::DecimalInteger => decode_integer(spec.name, &raw),
    }
}

/// Wrap the protected payload. Never text-decoded.
pub fn decode_secret(secret: SecretBytes) -> DecodedValue {
    DecodedValue::Secret(secret)
}

fn decode_text(name: &'static str, raw: Vec<u8>) -> Result<DecodedValue> {
    String::from_utf8(raw)
        .map(DecodedValue::Text)
        .map_err(|e| KeychainError::decode(name, format!("invalid UTF-8: {}", e)))
}

fn decode_timestamp(name: &'static str, raw: &[u8]) -> Result<DecodedValue> {
    let text = std::str::from_utf8(trim_nul(raw))
        .map_err(|e| KeychainError::decode(name, format!("invalid UTF-8: {}", e)))?;

    let parsed = NaiveDateTime::parse_from_str(text.trim(), STORE_DATE_FORMAT)
        .map_err(|e| KeychainError::decode(name, format!("bad store date '{}': {}", text, e)))?;

    Ok(DecodedValue::Timestamp(DateTime::<Utc>::from_naive_utc_and_offset(
        parsed, Utc,
    )))
}

fn decode_reversed_code(mut raw: Vec<u8>) -> DecodedValue {
    // Sentinel is checked on the stored order.
    if raw == NULL_CODE {
        return DecodedValue::Absent;
    }
    raw.reverse();
    DecodedValue::Binary(raw)
}

fn decode_char_code(raw: Vec<u8>) -> DecodedValue {
    if raw == NULL_CODE {
        DecodedValue::Absent
    } else {
        DecodedValue::Binary(raw)
    }
}

fn decode_integer(name: &'static str, raw: &[u8]) -> Result<DecodedValue> {
    let text = std::str::from_utf8(trim_nul(raw))
        .map_err(|e| KeychainError::decode(name, format!("invalid UTF-8: {}", e)))?
        .trim();

    if text.is_empty() {
        return Ok(DecodedValue::Absent);
    }

    text.parse::<u32>()
        .map(DecodedValue::Integer)
        .map_err(|e| KeychainError::decode(name, format!("'{}' is not a decimal integer: {}", text, e)))
}

fn trim_nul(raw: &[u8]) -> &[u8] {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &raw[..end]
}
