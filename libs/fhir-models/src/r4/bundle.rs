//! FHIR R4 Bundle model

use super::resource::Resource;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;

/// FHIR Bundle resource
///
/// A container for a collection of resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Resource type - always "Bundle"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Indicates the purpose of this bundle - how it was intended to be used
    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    /// When the bundle was assembled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// If search, the total number of matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    /// Entry in the bundle - will have a resource or information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Vec<BundleEntry>>,

    /// Additional content beyond core fields (link, signature, meta)
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Bundle".to_string()
}

/// Type of Bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
    History,
    Searchset,
    Collection,
}

/// Entry in the bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    /// URI for resource (Absolute URL server address or URI for UUID/OID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    /// A resource in this bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,

    /// Additional transaction/batch request information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,

    /// Results of execution (transaction/batch/history)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,

    /// Search related information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<Value>,

    /// Additional content beyond core fields
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl BundleEntry {
    pub fn new(full_url: Option<String>, resource: Resource) -> Self {
        Self {
            full_url,
            resource: Some(resource),
            ..Default::default()
        }
    }
}

impl Bundle {
    /// Create a new Bundle with minimal required fields
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            id: None,
            bundle_type,
            timestamp: None,
            total: None,
            entry: None,
            extensions: HashMap::new(),
        }
    }

    /// Parse from JSON Value
    pub fn from_value(value: Value) -> Result<Self> {
        ensure_bundle(&value)?;
        serde_json::from_value(value).map_err(Error::from)
    }

    /// Parse from a JSON string
    pub fn from_json_str(input: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(input)?)
    }

    /// Parse from any reader producing JSON
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    /// Convert to JSON Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }

    /// Get the number of entries in the bundle
    pub fn entry_count(&self) -> usize {
        self.entry.as_ref().map(|e| e.len()).unwrap_or(0)
    }

    /// Get entries as a slice
    pub fn entries(&self) -> &[BundleEntry] {
        self.entry.as_deref().unwrap_or(&[])
    }

    /// Resources of all entries that carry one, in bundle order
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entries().iter().filter_map(|e| e.resource.as_ref())
    }

    /// Add an entry to the bundle
    pub fn add_entry(&mut self, entry: BundleEntry) {
        self.entry.get_or_insert_with(Vec::new).push(entry);
    }
}

fn ensure_bundle(value: &Value) -> Result<()> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::InvalidResource("expected a JSON object".to_string()))?;
    match obj.get("resourceType").and_then(Value::as_str) {
        Some("Bundle") => Ok(()),
        Some(other) => Err(Error::InvalidResource(format!(
            "expected resourceType Bundle, got {other}"
        ))),
        None => Err(Error::MissingField("resourceType".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_bundle() {
        let json = json!({
            "resourceType": "Bundle",
            "id": "example-bundle",
            "type": "collection",
            "entry": [
                {
                    "fullUrl": "urn:uuid:123",
                    "resource": {
                        "resourceType": "Patient",
                        "id": "123"
                    }
                },
                {
                    "fullUrl": "urn:uuid:org",
                    "resource": {
                        "resourceType": "Organization",
                        "id": "org"
                    }
                },
                {
                    "request": {"method": "DELETE", "url": "Patient/9"}
                }
            ]
        });

        let bundle = Bundle::from_value(json).unwrap();
        assert_eq!(bundle.id, Some("example-bundle".to_string()));
        assert_eq!(bundle.bundle_type, BundleType::Collection);
        assert_eq!(bundle.entry_count(), 3);
        assert_eq!(bundle.resources().count(), 2);
        assert!(bundle.entries()[0]
            .resource
            .as_ref()
            .and_then(Resource::as_patient)
            .is_some());
    }

    #[test]
    fn test_large_decimal_does_not_fail_bundle() {
        let bundle = Bundle::from_json_str(
            r#"{
                "resourceType": "Bundle",
                "type": "collection",
                "entry": [{"resource": {
                    "resourceType": "Observation",
                    "id": "big",
                    "valueQuantity": {"value": 1e30, "unit": "1/L"}
                }}]
            }"#,
        )
        .unwrap();

        let observation = bundle.entries()[0]
            .resource
            .as_ref()
            .and_then(Resource::as_observation)
            .unwrap();
        let quantity = observation.value_quantity.as_ref().unwrap();
        assert_eq!(quantity.value_string(), Some(format!("1{}", "0".repeat(30))));
    }

    #[test]
    fn test_serialize_bundle() {
        let bundle = Bundle::new(BundleType::Transaction);
        let json = bundle.to_value().unwrap();
        assert_eq!(json["resourceType"], "Bundle");
        assert_eq!(json["type"], "transaction");
    }

    #[test]
    fn test_rejects_non_bundle() {
        let err = Bundle::from_json_str(r#"{"resourceType": "Patient", "id": "1"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidResource(_)));

        let err = Bundle::from_json_str(r#"{"type": "collection"}"#).unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));

        let err = Bundle::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::InvalidResource(_)));
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let err = Bundle::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::SerializationError(_)));
    }

    #[test]
    fn test_add_entry() {
        let mut bundle = Bundle::new(BundleType::Collection);
        bundle.add_entry(BundleEntry::new(
            Some("urn:uuid:abc".to_string()),
            Resource::Other(json!({"resourceType": "Location", "id": "abc"})),
        ));
        assert_eq!(bundle.entry_count(), 1);
        assert_eq!(bundle.resources().next().unwrap().resource_type(), "Location");
    }
}
