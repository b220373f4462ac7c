//! FHIR R4 Specimen resource

use super::datatypes::CodeableConcept;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Sample for analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Specimen {
    /// Resource type - always "Specimen"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Kind of material that forms the specimen
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Specimen".to_string()
}

impl Default for Specimen {
    fn default() -> Self {
        Self {
            resource_type: default_resource_type(),
            id: None,
            type_: None,
            other: HashMap::new(),
        }
    }
}
