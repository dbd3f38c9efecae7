//! Appliance configuration loading and translation.
//!
//! Reads the appliance configuration JSON, validates the mandatory
//! `cloudConnect` field, and maps recognized keys onto guest properties.
//! Sequence values are flattened to comma-separated strings before
//! injection into the VM.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{DeployError, DeployResult};
use crate::properties::guest_property;

/// A configuration value as it appears in the document.
///
/// Anything that is neither a string nor a list of strings fails to
/// deserialize; for recognized keys that is a fatal validation error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum PropertyValue {
    Scalar(String),
    List(Vec<String>),
}

impl PropertyValue {
    fn is_empty(&self) -> bool {
        match self {
            PropertyValue::Scalar(value) => value.is_empty(),
            PropertyValue::List(items) => items.is_empty(),
        }
    }

    /// Flatten to the single string injected as a guest property.
    fn flatten(self) -> String {
        match self {
            PropertyValue::Scalar(value) => value,
            PropertyValue::List(items) => items.join(","),
        }
    }
}

/// Why a configuration key was dropped during translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Key is not in the guest property table
    Unknown,
    /// Value is an empty string or an empty sequence
    Empty,
}

/// A configuration key dropped during translation, surfaced as a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Ignored {
    pub key: String,
    pub reason: IgnoreReason,
}

impl Ignored {
    /// Human-readable warning line for this dropped key.
    pub fn message(&self) -> String {
        match self.reason {
            IgnoreReason::Unknown => format!("Ignoring unknown property '{}'", self.key),
            IgnoreReason::Empty => format!("Ignoring empty property '{}'", self.key),
        }
    }
}

/// Result of translating an appliance configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatedConfig {
    /// Guest property identifier to value, ready for --extraConfig injection
    pub properties: BTreeMap<String, String>,
    /// Keys dropped during translation (non-fatal)
    pub ignored: Vec<Ignored>,
}

/// Load and translate an appliance configuration file.
pub fn load_config(path: &Path) -> DeployResult<TranslatedConfig> {
    let content = fs::read_to_string(path)?;
    let document: BTreeMap<String, Value> =
        serde_json::from_str(&content).map_err(|source| DeployError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    translate(document)
}

/// Translate a parsed configuration document into guest properties.
///
/// `cloudConnect` is the single mandatory field; everything else is
/// optional. Unknown and empty keys are dropped with a warning rather
/// than failing the deployment.
pub fn translate(document: BTreeMap<String, Value>) -> DeployResult<TranslatedConfig> {
    match document.get("cloudConnect") {
        None => return Err(DeployError::MissingCloudConnect),
        Some(value) => {
            let parsed = parse_value("cloudConnect", value.clone())?;
            if parsed.is_empty() {
                return Err(DeployError::MissingCloudConnect);
            }
        }
    }

    let mut translated = TranslatedConfig::default();
    for (key, value) in document {
        let Some(identifier) = guest_property(&key) else {
            translated.ignored.push(Ignored {
                key,
                reason: IgnoreReason::Unknown,
            });
            continue;
        };

        let parsed = parse_value(&key, value)?;
        if parsed.is_empty() {
            translated.ignored.push(Ignored {
                key,
                reason: IgnoreReason::Empty,
            });
            continue;
        }

        translated
            .properties
            .insert(identifier.to_string(), parsed.flatten());
    }

    Ok(translated)
}

fn parse_value(key: &str, value: Value) -> DeployResult<PropertyValue> {
    serde_json::from_value(value).map_err(|_| DeployError::InvalidValue {
        key: key.to_string(),
    })
}
