//! PIQI patient demographics

use crate::attribute::{PiqiCodeableConcept, SimpleAttribute};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiqiDemographics {
    /// Date of birth, `yyyy-MM-dd`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<SimpleAttribute>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_sex: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<SimpleAttribute>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_identity: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_language: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<PiqiCodeableConcept>,
}
