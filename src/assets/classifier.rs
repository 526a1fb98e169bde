//! Raw record classification
//!
//! Records come in two shapes:
//! - search hits wrapped in a typed envelope: `{"host_v1": {"resource": {..}}}`
//! - bare resources, optionally under `"resource"`, recognized by their key fields

use super::types::{Asset, AssetType};
use crate::types::{JsonObject, JsonValue};
use serde::de::DeserializeOwned;

/// Maps one raw record to one asset, or drops it
pub trait Classifier: Send + Sync {
    /// Classify a raw record; `None` means the record is dropped
    fn classify(&self, raw: &JsonValue) -> Option<Asset>;
}

type Extractor = fn(&JsonValue) -> Option<Asset>;

/// Extraction order. Web properties go first because their records can
/// also carry an `ip`.
const CHAIN: [(AssetType, Extractor); 3] = [
    (AssetType::WebProperty, extract_web_property),
    (AssetType::Certificate, extract_certificate),
    (AssetType::Host, extract_host),
];

/// The default classifier: an ordered chain of type-testing extractors
#[derive(Debug, Clone)]
pub struct AssetClassifier {
    kinds: Vec<AssetType>,
}

impl AssetClassifier {
    /// Classifier accepting every asset kind
    pub fn new() -> Self {
        Self {
            kinds: CHAIN.iter().map(|(kind, _)| *kind).collect(),
        }
    }

    /// Classifier accepting a single asset kind
    pub fn only(kind: AssetType) -> Self {
        Self { kinds: vec![kind] }
    }

    /// Asset kinds this classifier accepts, in extraction order
    pub fn kinds(&self) -> &[AssetType] {
        &self.kinds
    }
}

impl Default for AssetClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for AssetClassifier {
    fn classify(&self, raw: &JsonValue) -> Option<Asset> {
        CHAIN
            .iter()
            .filter(|(kind, _)| self.kinds.contains(kind))
            .find_map(|(_, extract)| extract(raw))
    }
}

fn extract_host(raw: &JsonValue) -> Option<Asset> {
    resource_for(raw, AssetType::Host, |obj| obj.contains_key("ip"))
        .and_then(parse)
        .map(Asset::Host)
}

fn extract_certificate(raw: &JsonValue) -> Option<Asset> {
    resource_for(raw, AssetType::Certificate, |obj| {
        obj.contains_key("fingerprint_sha256")
    })
    .and_then(parse)
    .map(Asset::Certificate)
}

fn extract_web_property(raw: &JsonValue) -> Option<Asset> {
    resource_for(raw, AssetType::WebProperty, |obj| {
        obj.contains_key("hostname") && obj.contains_key("port")
    })
    .and_then(parse)
    .map(Asset::WebProperty)
}

/// Locate the resource object for `kind`: the typed envelope wins, then a
/// bare resource whose shape matches.
fn resource_for(
    raw: &JsonValue,
    kind: AssetType,
    shape: fn(&JsonObject) -> bool,
) -> Option<&JsonValue> {
    let obj = raw.as_object()?;

    if let Some(envelope) = obj.get(kind.envelope_key()) {
        return Some(envelope.get("resource").unwrap_or(envelope));
    }

    let bare = obj.get("resource").unwrap_or(raw);
    bare.as_object().filter(|o| shape(o)).map(|_| bare)
}

fn parse<T: DeserializeOwned>(resource: &JsonValue) -> Option<T> {
    T::deserialize(resource).ok()
}
