//! FHIR R4 Observation resource

use super::datatypes::{CodeableConcept, Quantity, Reference};
use super::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Measurements and simple assertions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Resource type - always "Observation"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Contained, inline resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contained: Option<Vec<Resource>>,

    /// Fulfills plan, proposal or order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<Vec<Reference>>,

    /// registered | preliminary | final | amended +
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Classification of type of observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,

    /// Type of observation (code / type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    /// Healthcare event during which this observation is made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<String>,

    /// Date/Time this version was made available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,

    /// Who is responsible for the observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_integer: Option<i64>,

    /// High, low, normal, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Vec<CodeableConcept>>,

    /// Specimen used for this observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen: Option<Reference>,

    /// Provides guide for interpretation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<Vec<ObservationReferenceRange>>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Observation".to_string()
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            resource_type: default_resource_type(),
            id: None,
            contained: None,
            based_on: None,
            status: None,
            category: None,
            code: None,
            subject: None,
            encounter: None,
            effective_date_time: None,
            issued: None,
            performer: None,
            value_quantity: None,
            value_codeable_concept: None,
            value_string: None,
            value_boolean: None,
            value_integer: None,
            interpretation: None,
            specimen: None,
            reference_range: None,
            other: HashMap::new(),
        }
    }
}

impl Observation {
    pub fn categories(&self) -> &[CodeableConcept] {
        self.category.as_deref().unwrap_or(&[])
    }

    pub fn contained_resources(&self) -> &[Resource] {
        self.contained.as_deref().unwrap_or(&[])
    }

    pub fn based_on_references(&self) -> &[Reference] {
        self.based_on.as_deref().unwrap_or(&[])
    }

    pub fn performers(&self) -> &[Reference] {
        self.performer.as_deref().unwrap_or(&[])
    }

    pub fn interpretations(&self) -> &[CodeableConcept] {
        self.interpretation.as_deref().unwrap_or(&[])
    }

    pub fn reference_ranges(&self) -> &[ObservationReferenceRange] {
        self.reference_range.as_deref().unwrap_or(&[])
    }

    pub fn has_value(&self) -> bool {
        self.value_quantity.is_some()
            || self.value_codeable_concept.is_some()
            || self.value_string.is_some()
            || self.value_boolean.is_some()
            || self.value_integer.is_some()
            || self.untyped_value_element().is_some()
    }

    /// Name of a `value[x]` element that has no typed field (e.g. `valueRange`)
    pub fn untyped_value_element(&self) -> Option<&str> {
        self.other
            .keys()
            .map(String::as_str)
            .find(|key| key.starts_with("value"))
    }
}

/// Provides guide for interpretation of the observation value
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationReferenceRange {
    /// Low Range, if relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Quantity>,

    /// High Range, if relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Quantity>,

    /// Reference range qualifier
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,

    /// Text based reference range in an observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_lab_observation() {
        let observation: Observation = serde_json::from_value(json!({
            "resourceType": "Observation",
            "id": "hgb",
            "status": "final",
            "category": [{
                "coding": [{
                    "system": "http://terminology.hl7.org/CodeSystem/observation-category",
                    "code": "laboratory"
                }]
            }],
            "code": {"coding": [{"system": "http://loinc.org", "code": "718-7"}]},
            "valueQuantity": {"value": 13.2, "unit": "g/dL"},
            "referenceRange": [{"low": {"value": 12}, "high": {"value": 16}, "text": "12-16"}]
        }))
        .unwrap();

        assert_eq!(observation.categories().len(), 1);
        assert!(observation.categories()[0].has_code("laboratory"));
        assert!(observation.has_value());
        assert_eq!(observation.reference_ranges()[0].text.as_deref(), Some("12-16"));
        assert!(observation.untyped_value_element().is_none());
    }

    #[test]
    fn test_untyped_value_element() {
        let observation: Observation = serde_json::from_value(json!({
            "resourceType": "Observation",
            "valueRange": {"low": {"value": 1}}
        }))
        .unwrap();

        assert_eq!(observation.untyped_value_element(), Some("valueRange"));
        assert!(observation.has_value());
    }
}
