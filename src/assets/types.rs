//! Asset types
//!
//! Only the fields the CLI renders are typed; everything else in a record
//! is ignored. Identity fields are required, the rest is optional because
//! field projections can strip them.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Asset kinds the platform serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    /// IP host
    Host,
    /// X.509 certificate
    Certificate,
    /// Hostname + port pair
    WebProperty,
}

impl AssetType {
    /// Path segment of the lookup endpoint
    pub fn api_path(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Certificate => "certificate",
            Self::WebProperty => "webproperty",
        }
    }

    /// Key of the typed envelope search hits are wrapped in
    pub fn envelope_key(self) -> &'static str {
        match self {
            Self::Host => "host_v1",
            Self::Certificate => "certificate_v1",
            Self::WebProperty => "webproperty_v1",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Host => "host",
            Self::Certificate => "certificate",
            Self::WebProperty => "web_property",
        };
        f.pad(name)
    }
}

impl FromStr for AssetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "host" | "hosts" => Ok(Self::Host),
            "cert" | "certs" | "certificate" | "certificates" => Ok(Self::Certificate),
            "webproperty" | "web_property" | "web-property" | "webproperties" => {
                Ok(Self::WebProperty)
            }
            other => Err(Error::invalid_argument(
                "asset type",
                format!("unknown asset type '{other}' (expected host, certificate or webproperty)"),
            )),
        }
    }
}

/// One service observed on a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Port number
    pub port: u16,
    /// Application protocol (e.g. "SSH")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Transport protocol (e.g. "tcp")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_protocol: Option<String>,
}

/// Routing information for a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutonomousSystem {
    /// AS number
    pub asn: u32,
    /// AS name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Coarse geolocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Country name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// City name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// An IP host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    /// IP address
    pub ip: String,
    /// Observed services
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Service>,
    /// Routing information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autonomous_system: Option<AutonomousSystem>,
    /// Geolocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
    /// Reverse and forward DNS names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_names: Vec<String>,
    /// Last time the platform refreshed this record
    #[serde(
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// An X.509 certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// SHA-256 fingerprint, hex
    pub fingerprint_sha256: String,
    /// Names the certificate covers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    /// Subject distinguished name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_dn: Option<String>,
    /// Issuer distinguished name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_dn: Option<String>,
    /// Start of validity
    #[serde(
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub not_before: Option<DateTime<Utc>>,
    /// End of validity
    #[serde(
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub not_after: Option<DateTime<Utc>>,
}

/// A web property (hostname served on a port)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebProperty {
    /// Hostname or IP the property is served under
    pub hostname: String,
    /// Port
    pub port: u16,
    /// Software identified on the property
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub software: Vec<String>,
    /// Last time the platform refreshed this record
    #[serde(
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// A typed search or lookup result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "asset_type", rename_all = "snake_case")]
pub enum Asset {
    /// Host result
    Host(Host),
    /// Certificate result
    Certificate(Certificate),
    /// Web property result
    WebProperty(WebProperty),
}

impl Asset {
    /// The asset kind
    pub fn asset_type(&self) -> AssetType {
        match self {
            Self::Host(_) => AssetType::Host,
            Self::Certificate(_) => AssetType::Certificate,
            Self::WebProperty(_) => AssetType::WebProperty,
        }
    }

    /// The identifier the platform uses for this asset
    pub fn id(&self) -> String {
        match self {
            Self::Host(host) => host.ip.clone(),
            Self::Certificate(cert) => cert.fingerprint_sha256.clone(),
            Self::WebProperty(prop) => format!("{}:{}", prop.hostname, prop.port),
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        match self {
            Self::Host(host) => {
                let ports: Vec<String> = host.services.iter().map(|s| s.port.to_string()).collect();
                let mut line = host.ip.clone();
                if !ports.is_empty() {
                    line.push_str(&format!("  ports={}", ports.join(",")));
                }
                if let Some(asys) = &host.autonomous_system {
                    line.push_str(&format!("  AS{}", asys.asn));
                }
                line
            }
            Self::Certificate(cert) => match cert.names.first() {
                Some(name) => format!("{}  {name}", cert.fingerprint_sha256),
                None => cert.fingerprint_sha256.clone(),
            },
            Self::WebProperty(prop) => format!("{}:{}", prop.hostname, prop.port),
        }
    }
}

// Timestamps the platform cannot format must not drop the whole record.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}
