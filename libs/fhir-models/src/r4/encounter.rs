//! FHIR R4 Encounter resource

use super::datatypes::{CodeableConcept, Period, Reference};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// An interaction during which services are provided to the patient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    /// Resource type - always "Encounter"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// List of locations where the patient has been
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec<EncounterLocation>>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Encounter".to_string()
}

impl Default for Encounter {
    fn default() -> Self {
        Self {
            resource_type: default_resource_type(),
            id: None,
            location: None,
            other: HashMap::new(),
        }
    }
}

impl Encounter {
    pub fn locations(&self) -> &[EncounterLocation] {
        self.location.as_deref().unwrap_or(&[])
    }
}

/// A location where the patient has been during the encounter
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EncounterLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_type: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}
