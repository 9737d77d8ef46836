//! Host feature flag record.
//!
//! The host exposes an open-ended set of named flags where each flag is
//! either a boolean or a string. They are kept as an explicit map so every
//! flag can be enumerated without knowing its name ahead of time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value of a single host feature flag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::Text(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        FlagValue::Text(value)
    }
}

/// Feature flags keyed by flag name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeMap<String, FlagValue>);

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`FeatureFlags::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    /// Iterate over every flag in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FeatureFlags
where
    K: Into<String>,
    V: Into<FlagValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
