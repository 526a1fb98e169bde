//! Asset module
//!
//! Typed domain items returned by the platform and the classifier that maps
//! raw hit records onto them.
//!
//! # Overview
//!
//! Every raw record maps to exactly one [`Asset`] variant or is dropped.
//! Classification is an ordered chain of extractors: the first extractor
//! that recognizes the record wins.

mod classifier;
mod types;

pub use classifier::{AssetClassifier, Classifier};
pub use types::{
    Asset, AssetType, AutonomousSystem, Certificate, GeoLocation, Host, Service, WebProperty,
};

#[cfg(test)]
mod tests;
