use std::sync::Arc;

use chrono::{TimeZone, Utc};
use keychain_item::item::spec::ATTRIBUTES;
use keychain_item::native::{
    ERR_SEC_AUTH_FAILED, ERR_SEC_INTERACTION_NOT_ALLOWED, ERR_SEC_INVALID_ITEM_REF,
};
use keychain_item::{
    AttributeTag, BinaryEncoding, DecodedValue, DefaultStatusTranslator, HandleState,
    KeychainError, KeychainItem, MemoryItem, RenderSettings,
};

const EXPORT_KEYS: [&str; 17] = [
    "creation_date",
    "modified_date",
    "kind",
    "comment",
    "creator",
    "type",
    "label",
    "account",
    "service",
    "value",
    "security_domain",
    "server",
    "authentication_type",
    "port",
    "path",
    "protocol",
    "password",
];

fn internet_password() -> MemoryItem {
    MemoryItem::new()
        .with_attribute(AttributeTag::CREATION_DATE, b"20130102030405Z\0".to_vec())
        .with_attribute(AttributeTag::MODIFIED_DATE, b"20140506070809Z\0".to_vec())
        .with_attribute(AttributeTag::DESCRIPTION, b"Web form password".to_vec())
        .with_attribute(AttributeTag::CREATOR, b"aapl".to_vec())
        .with_attribute(AttributeTag::TYPE, [0, 0, 0, 0].to_vec())
        .with_attribute(AttributeTag::LABEL, b"github.com (alice)".to_vec())
        .with_attribute(AttributeTag::ACCOUNT, b"alice".to_vec())
        .with_attribute(AttributeTag::SECURITY_DOMAIN, b"".to_vec())
        .with_attribute(AttributeTag::SERVER, b"github.com".to_vec())
        .with_attribute(AttributeTag::AUTHENTICATION_TYPE, b"form".to_vec())
        .with_attribute(AttributeTag::PORT, b"443".to_vec())
        .with_attribute(AttributeTag::PATH, b"/login".to_vec())
        .with_attribute(AttributeTag::PROTOCOL, b"sptt".to_vec())
        .with_secret(b"correct horse battery staple".to_vec())
}

fn item(native: MemoryItem) -> KeychainItem {
    KeychainItem::new(native).with_translator(Arc::new(DefaultStatusTranslator))
}

#[test]
fn test_typed_getters() {
    let item = item(internet_password());

    assert_eq!(
        item.creation_date().unwrap(),
        Some(Utc.with_ymd_and_hms(2013, 1, 2, 3, 4, 5).unwrap())
    );
    assert_eq!(
        item.modified_date().unwrap(),
        Some(Utc.with_ymd_and_hms(2014, 5, 6, 7, 8, 9).unwrap())
    );
    assert_eq!(item.kind().unwrap(), Some("Web form password".to_string()));
    assert_eq!(item.comment().unwrap(), None);
    assert_eq!(item.creator().unwrap(), Some(b"aapl".to_vec()));
    assert_eq!(item.item_type().unwrap(), None);
    assert_eq!(item.label().unwrap(), Some("github.com (alice)".to_string()));
    assert_eq!(item.account().unwrap(), Some("alice".to_string()));
    assert_eq!(item.service().unwrap(), None);
    assert_eq!(item.value().unwrap(), None);
    assert_eq!(item.security_domain().unwrap(), Some(String::new()));
    assert_eq!(item.server().unwrap(), Some("github.com".to_string()));
    assert_eq!(item.authentication_type().unwrap(), Some(b"form".to_vec()));
    assert_eq!(item.port().unwrap(), Some(443));
    assert_eq!(item.path().unwrap(), Some("/login".to_string()));
    assert_eq!(item.protocol().unwrap(), Some(b"ttps".to_vec()));
    assert_eq!(item.secret().unwrap().expose(), b"correct horse battery staple");
}

#[test]
fn test_every_attribute_absent_is_null() {
    let item = item(MemoryItem::new());

    for spec in ATTRIBUTES {
        assert_eq!(item.decoded(spec).unwrap(), DecodedValue::Absent, "{}", spec.name);
    }
    assert!(item.secret().unwrap().is_empty());
}

#[test]
fn test_code_byte_order() {
    let item = item(
        MemoryItem::new()
            .with_attribute(AttributeTag::TYPE, vec![0x61, 0x70, 0x70, 0x6c])
            .with_attribute(AttributeTag::PROTOCOL, vec![0x61, 0x70, 0x70, 0x6c])
            .with_attribute(AttributeTag::AUTHENTICATION_TYPE, vec![0x68, 0x74, 0x74, 0x70]),
    );

    assert_eq!(item.item_type().unwrap(), Some(vec![0x6c, 0x70, 0x70, 0x61]));
    assert_eq!(item.protocol().unwrap(), Some(vec![0x6c, 0x70, 0x70, 0x61]));
    assert_eq!(
        item.authentication_type().unwrap(),
        Some(vec![0x68, 0x74, 0x74, 0x70])
    );
}

#[test]
fn test_zero_codes_are_null() {
    let item = item(
        MemoryItem::new()
            .with_attribute(AttributeTag::TYPE, vec![0; 4])
            .with_attribute(AttributeTag::PROTOCOL, vec![0; 4])
            .with_attribute(AttributeTag::AUTHENTICATION_TYPE, vec![0; 4]),
    );

    assert_eq!(item.item_type().unwrap(), None);
    assert_eq!(item.protocol().unwrap(), None);
    assert_eq!(item.authentication_type().unwrap(), None);
}

#[test]
fn test_port_decoding() {
    let with_port = item(MemoryItem::new().with_attribute(AttributeTag::PORT, b"8080".to_vec()));
    assert_eq!(with_port.port().unwrap(), Some(8080));

    let empty_port = item(MemoryItem::new().with_attribute(AttributeTag::PORT, Vec::new()));
    assert_eq!(empty_port.port().unwrap(), None);

    let bad_port = item(MemoryItem::new().with_attribute(AttributeTag::PORT, b"eighty".to_vec()));
    assert!(matches!(
        bad_port.port(),
        Err(KeychainError::DecodeFailed { attribute: "port", .. })
    ));
}

#[test]
fn test_snapshot_has_fixed_keys() {
    for native in [MemoryItem::new(), internet_password()] {
        let snapshot = item(native).snapshot().unwrap();
        let keys: Vec<&str> = snapshot.keys().collect();
        assert_eq!(keys, EXPORT_KEYS.to_vec());
    }
}

#[test]
fn test_snapshot_values() {
    let snapshot = item(internet_password()).snapshot().unwrap();

    assert_eq!(snapshot.get("comment"), Some(&DecodedValue::Absent));
    assert_eq!(snapshot.get("type"), Some(&DecodedValue::Absent));
    assert_eq!(snapshot.get("port"), Some(&DecodedValue::Integer(443)));
    assert_eq!(
        snapshot.get("protocol"),
        Some(&DecodedValue::Binary(b"ttps".to_vec()))
    );
    match snapshot.get("password") {
        Some(DecodedValue::Secret(secret)) => {
            assert_eq!(secret.expose(), b"correct horse battery staple")
        }
        other => panic!("unexpected password entry: {:?}", other),
    }
}

#[test]
fn test_snapshot_is_repeatable() {
    let native = internet_password();
    let probe = native.probe();
    let item = item(native);

    let first = item.snapshot().unwrap();
    let second = item.snapshot().unwrap();

    assert_eq!(first, second);
    assert_eq!(probe.attribute_copies(), 2 * ATTRIBUTES.len());
    assert_eq!(probe.secret_copies(), 2);
    assert_eq!(probe.outstanding_buffers(), 0);
}

#[test]
fn test_native_failure_propagates() {
    let item = item(
        internet_password()
            .failing_attribute(AttributeTag::ACCOUNT, ERR_SEC_INTERACTION_NOT_ALLOWED),
    );

    let err = item.account().unwrap_err();
    assert_eq!(err.status_code(), Some(ERR_SEC_INTERACTION_NOT_ALLOWED));
    assert!(item.snapshot().is_err());
    assert_eq!(item.server().unwrap(), Some("github.com".to_string()));
}

#[test]
fn test_secret_failure_fails_snapshot() {
    let item = item(internet_password().failing_secret(ERR_SEC_AUTH_FAILED));

    let err = item.snapshot().unwrap_err();
    assert_eq!(err.status_code(), Some(ERR_SEC_AUTH_FAILED));
}

#[test]
fn test_access_after_delete_is_invalid_state() {
    let native = internet_password();
    let probe = native.probe();
    let mut item = item(native);

    item.delete().unwrap();
    assert_eq!(item.state(), HandleState::Deleted);
    assert_eq!(probe.deletions(), 1);
    assert_eq!(probe.releases(), 1);

    for spec in ATTRIBUTES {
        assert!(matches!(
            item.decoded(spec),
            Err(KeychainError::InvalidState(_))
        ));
    }
    assert!(matches!(item.label(), Err(KeychainError::InvalidState(_))));
    assert!(matches!(item.port(), Err(KeychainError::InvalidState(_))));
    assert!(matches!(item.secret(), Err(KeychainError::InvalidState(_))));
    assert!(matches!(item.snapshot(), Err(KeychainError::InvalidState(_))));
    assert!(matches!(item.describe(), Err(KeychainError::InvalidState(_))));
    assert_eq!(probe.attribute_copies(), 0);
    assert_eq!(probe.secret_copies(), 0);
}

#[test]
fn test_delete_twice_touches_native_once() {
    let native = MemoryItem::new();
    let probe = native.probe();
    let mut item = item(native);

    item.delete().unwrap();
    item.delete().unwrap();
    drop(item);

    assert_eq!(probe.deletions(), 1);
    assert_eq!(probe.releases(), 1);
}

#[test]
fn test_failed_delete_keeps_item_readable() {
    let native = internet_password().failing_delete(ERR_SEC_INVALID_ITEM_REF);
    let probe = native.probe();
    let mut item = item(native);

    let err = item.delete().unwrap_err();
    assert_eq!(err.status_code(), Some(ERR_SEC_INVALID_ITEM_REF));
    assert_eq!(item.state(), HandleState::Live);
    assert_eq!(item.account().unwrap(), Some("alice".to_string()));

    drop(item);
    assert_eq!(probe.releases(), 1);
}

#[test]
fn test_drop_releases_native_reference() {
    let native = internet_password();
    let probe = native.probe();

    let item = item(native);
    item.label().unwrap();
    drop(item);

    assert_eq!(probe.releases(), 1);
    assert_eq!(probe.deletions(), 0);
}

#[test]
fn test_json_export() {
    let item = item(internet_password());
    let settings = RenderSettings {
        binary_encoding: BinaryEncoding::Utf8Lossy,
        ..RenderSettings::default()
    };

    let json: serde_json::Value = serde_json::from_str(&item.to_json(&settings).unwrap()).unwrap();
    assert_eq!(json["label"], "github.com (alice)");
    assert_eq!(json["port"], 443);
    assert_eq!(json["protocol"], "ttps");
    assert_eq!(json["creation_date"], "2013-01-02T03:04:05+00:00");
    assert!(json["comment"].is_null());
    assert_eq!(json["password"], "correct horse battery staple");
    assert_eq!(json.as_object().unwrap().len(), 17);
}

#[test]
fn test_yaml_export_without_password() {
    let item = item(internet_password());
    let settings = RenderSettings {
        include_password: false,
        ..RenderSettings::default()
    };

    let yaml = item.to_yaml(&settings).unwrap();
    assert!(yaml.contains("password: null"));
    assert!(yaml.contains("account: alice"));
    assert!(!yaml.contains("correct horse"));
}
