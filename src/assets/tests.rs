//! Tests for asset classification

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

#[test]
fn test_classify_host_envelope() {
    let raw = json!({
        "host_v1": {
            "resource": {
                "ip": "192.0.2.10",
                "services": [{"port": 22, "protocol": "SSH", "transport_protocol": "tcp"}],
                "autonomous_system": {"asn": 64500, "name": "EXAMPLE-AS"},
                "location": {"country": "Netherlands"},
                "last_updated_at": "2026-01-02T03:04:05Z"
            }
        }
    });

    let asset = AssetClassifier::new().classify(&raw).unwrap();
    let Asset::Host(host) = &asset else {
        panic!("expected host, got {asset:?}");
    };
    assert_eq!(host.ip, "192.0.2.10");
    assert_eq!(host.services[0].port, 22);
    assert_eq!(host.autonomous_system.as_ref().unwrap().asn, 64500);
    assert!(host.last_updated_at.is_some());
    assert_eq!(asset.id(), "192.0.2.10");
    assert_eq!(asset.summary(), "192.0.2.10  ports=22  AS64500");
}

#[test]
fn test_classify_certificate_envelope() {
    let raw = json!({
        "certificate_v1": {
            "resource": {
                "fingerprint_sha256": "ab12",
                "names": ["example.com", "www.example.com"],
                "not_after": "2027-01-01T00:00:00Z"
            }
        }
    });

    let asset = AssetClassifier::new().classify(&raw).unwrap();
    assert_eq!(asset.asset_type(), AssetType::Certificate);
    assert_eq!(asset.summary(), "ab12  example.com");
}

#[test]
fn test_classify_web_property_envelope() {
    let raw = json!({
        "webproperty_v1": {"resource": {"hostname": "example.com", "port": 443}}
    });

    let asset = AssetClassifier::new().classify(&raw).unwrap();
    assert_eq!(
        asset,
        Asset::WebProperty(WebProperty {
            hostname: "example.com".to_string(),
            port: 443,
            software: vec![],
            last_updated_at: None,
        })
    );
    assert_eq!(asset.id(), "example.com:443");
}

#[test]
fn test_classify_bare_resources() {
    let classifier = AssetClassifier::new();

    let host = classifier.classify(&json!({"ip": "198.51.100.1"})).unwrap();
    assert_eq!(host.asset_type(), AssetType::Host);

    let cert = classifier
        .classify(&json!({"resource": {"fingerprint_sha256": "ff00"}}))
        .unwrap();
    assert_eq!(cert.asset_type(), AssetType::Certificate);
}

#[test]
fn test_web_property_wins_over_host_shape() {
    let raw = json!({"hostname": "example.org", "port": 8443, "ip": "203.0.113.5"});
    let asset = AssetClassifier::new().classify(&raw).unwrap();
    assert_eq!(asset.asset_type(), AssetType::WebProperty);
}

#[test]
fn test_unknown_records_are_dropped() {
    let classifier = AssetClassifier::new();
    assert!(classifier.classify(&json!({"domain": "example.com"})).is_none());
    assert!(classifier.classify(&json!("192.0.2.1")).is_none());
    assert!(classifier.classify(&json!({"host_v1": {"resource": {"ports": []}}})).is_none());
}

#[test]
fn test_bad_timestamp_keeps_record() {
    let raw = json!({"ip": "192.0.2.7", "last_updated_at": "yesterday"});
    let Some(Asset::Host(host)) = AssetClassifier::new().classify(&raw) else {
        panic!("expected host");
    };
    assert!(host.last_updated_at.is_none());
}

#[test]
fn test_only_restricts_kinds() {
    let classifier = AssetClassifier::only(AssetType::Certificate);
    assert_eq!(classifier.kinds(), &[AssetType::Certificate]);
    assert!(classifier.classify(&json!({"ip": "192.0.2.1"})).is_none());
    assert!(classifier
        .classify(&json!({"fingerprint_sha256": "aa"}))
        .is_some());
}

#[test]
fn test_asset_serializes_with_type_tag() {
    let asset = AssetClassifier::new()
        .classify(&json!({"ip": "192.0.2.1"}))
        .unwrap();
    let value = serde_json::to_value(&asset).unwrap();
    assert_eq!(value, json!({"asset_type": "host", "ip": "192.0.2.1"}));
}

#[test_case("host", AssetType::Host)]
#[test_case("cert", AssetType::Certificate)]
#[test_case("Certificates", AssetType::Certificate)]
#[test_case("web-property", AssetType::WebProperty)]
#[test_case("webproperty", AssetType::WebProperty)]
fn test_asset_type_from_str(input: &str, expected: AssetType) {
    assert_eq!(input.parse::<AssetType>().unwrap(), expected);
}

#[test]
fn test_asset_type_from_str_rejects_unknown() {
    let err = "domain".parse::<AssetType>().unwrap_err();
    assert!(err.to_string().contains("unknown asset type 'domain'"));
}

#[test]
fn test_asset_type_paths() {
    assert_eq!(AssetType::Host.api_path(), "host");
    assert_eq!(AssetType::WebProperty.api_path(), "webproperty");
    assert_eq!(AssetType::Certificate.envelope_key(), "certificate_v1");
}
