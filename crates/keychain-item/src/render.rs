//! JSON and YAML rendering of item snapshots
//!
//! Both formats serialize the same ordered view of a [`Snapshot`], so key
//! order and null handling are identical across them.

use base64::Engine;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::item::{DecodedValue, Snapshot, STORE_DATE_FORMAT};
use crate::settings::{BinaryEncoding, RenderSettings, TimestampFormat};

/// A snapshot paired with the settings used to write it
pub struct RenderView<'a> {
    snapshot: &'a Snapshot,
    settings: &'a RenderSettings,
}

impl<'a> RenderView<'a> {
    pub fn new(snapshot: &'a Snapshot, settings: &'a RenderSettings) -> Self {
        Self { snapshot, settings }
    }
}

impl Serialize for RenderView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.snapshot.len()))?;
        for (key, value) in self.snapshot.iter() {
            map.serialize_entry(key, &RenderValue::new(value, self.settings))?;
        }
        map.end()
    }
}

struct RenderValue<'a> {
    value: &'a DecodedValue,
    settings: &'a RenderSettings,
}

impl<'a> RenderValue<'a> {
    fn new(value: &'a DecodedValue, settings: &'a RenderSettings) -> Self {
        Self { value, settings }
    }
}

impl Serialize for RenderValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.value {
            DecodedValue::Absent => serializer.serialize_none(),
            DecodedValue::Text(text) => serializer.serialize_str(text),
            DecodedValue::Binary(bytes) => {
                serializer.serialize_str(&encode_binary(bytes, self.settings.binary_encoding))
            }
            DecodedValue::Integer(n) => serializer.serialize_u32(*n),
            DecodedValue::Timestamp(at) => {
                let text = match self.settings.timestamp_format {
                    TimestampFormat::Rfc3339 => at.to_rfc3339(),
                    TimestampFormat::StoreFormat => at.format(STORE_DATE_FORMAT).to_string(),
                };
                serializer.serialize_str(&text)
            }
            DecodedValue::Secret(secret) if self.settings.include_password => serializer
                .serialize_str(&encode_binary(secret.expose(), self.settings.binary_encoding)),
            DecodedValue::Secret(_) => serializer.serialize_none(),
        }
    }
}

/// Encode bytes as text
pub fn encode_binary(bytes: &[u8], encoding: BinaryEncoding) -> String {
    match encoding {
        BinaryEncoding::Hex => hex::encode(bytes),
        BinaryEncoding::Base64 => base64::engine::general_purpose::STANDARD.encode(bytes),
        BinaryEncoding::Utf8Lossy => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Render a snapshot as JSON
pub fn to_json(snapshot: &Snapshot, settings: &RenderSettings) -> Result<String> {
    let view = RenderView::new(snapshot, settings);
    let text = if settings.pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    Ok(text)
}

/// Render a snapshot as YAML
pub fn to_yaml(snapshot: &Snapshot, settings: &RenderSettings) -> Result<String> {
    Ok(serde_yaml::to_string(&RenderView::new(snapshot, settings))?)
}
