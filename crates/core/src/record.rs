//! Raw input records as they appear in the loader's JSON file.

use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::asset::NewAsset;
use crate::constants::DEFAULT_CATEGORY;
use crate::error::CoreError;
use crate::geo::GeoPoint;

/// One element of the input array. Every field is optional and scalar
/// fields accept numbers or booleans, which are stringified. The original
/// JSON object is kept untouched for `metadata`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(skip)]
    raw: Map<String, Value>,
}

fn scalar_to_string(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(format!("expected a string, found {}", json_kind(&other))),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    scalar_to_string(Value::deserialize(d)?).map_err(D::Error::custom)
}

/// `null` means no tags, a lone string is one tag, array elements are
/// stringified and `null` elements skipped.
fn lenient_tags<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| scalar_to_string(v).transpose())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| D::Error::custom(format!("tags: {e}"))),
        other => Ok(scalar_to_string(other)
            .map_err(|e| D::Error::custom(format!("tags: {e}")))?
            .filter(|s| !s.trim().is_empty())
            .into_iter()
            .collect()),
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl AssetRecord {
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Address to geocode, `None` when missing or blank.
    #[must_use]
    pub fn geocodable_address(&self) -> Option<&str> {
        non_blank(self.address.as_deref())
    }

    /// Category with the `general` fallback applied.
    #[must_use]
    pub fn category(&self) -> &str {
        non_blank(self.category.as_deref()).unwrap_or(DEFAULT_CATEGORY)
    }

    /// Text fed to the embedding model: `"{name}. {description}"`.
    #[must_use]
    pub fn embedding_text(&self) -> String {
        format!("{}. {}", self.name(), self.description.as_deref().unwrap_or(""))
    }

    /// Converts one element of the input array. Non-objects and fields of
    /// the wrong shape (arrays or objects where a scalar belongs) fail this
    /// record only.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        let raw = match value {
            Value::Object(raw) => raw,
            other => {
                return Err(CoreError::InvalidInput(format!(
                    "record must be a JSON object, found {}",
                    json_kind(&other)
                )));
            },
        };
        let mut record: Self = serde_json::from_value(Value::Object(raw.clone()))?;
        record.raw = raw;
        Ok(record)
    }

    /// The record exactly as it appeared in the input file.
    #[must_use]
    pub fn metadata(&self) -> Value {
        Value::Object(self.raw.clone())
    }

    #[must_use]
    pub fn to_new_asset(&self, location: Option<GeoPoint>, embedding: Vec<f32>) -> NewAsset {
        NewAsset {
            name: self.name().to_owned(),
            description: self.description.clone(),
            address: self.address.clone(),
            district: non_blank(self.district.as_deref()).map(str::to_owned),
            province: non_blank(self.province.as_deref()).map(str::to_owned),
            location_type: self.category().to_owned(),
            location,
            embedding,
            metadata: self.metadata(),
            tags: self.tags.clone(),
        }
    }
}

/// Parses the loader's input document into its raw elements. The top level
/// must be a JSON array; each element is converted later with
/// [`AssetRecord::from_value`] so one bad element does not sink the file.
pub fn parse_records(json: &str) -> Result<Vec<Value>, CoreError> {
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Array(items) => Ok(items),
        other => Err(CoreError::InvalidInput(format!(
            "expected a JSON array of records, found {}",
            json_kind(&other)
        ))),
    }
}

const fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
