//! Observation result and reference range values

use crate::attribute::{PiqiCodeableConcept, SimpleAttribute};
use serde::{Deserialize, Serialize};

/// Result value of an observation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<SimpleAttribute>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<SimpleAttribute>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub codeable_concept: Option<PiqiCodeableConcept>,
}

impl ObservationValue {
    pub fn is_empty(&self) -> bool {
        self.number.is_none() && self.text.is_none() && self.codeable_concept.is_none()
    }
}

/// Reference range of an observation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeValue {
    pub low_value: SimpleAttribute,
    pub high_value: SimpleAttribute,
    pub text: SimpleAttribute,
}
