//! FHIR R4 Patient resource

use super::datatypes::{find_extension, CodeableConcept, Extension};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const ADMINISTRATIVE_GENDER_SYSTEM: &str = "http://hl7.org/fhir/administrative-gender";

/// Demographics and other administrative information about an individual
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Resource type - always "Patient"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Additional content defined by implementations (US Core race, ethnicity, birth sex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// male | female | other | unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<AdministrativeGender>,

    /// The date of birth for the individual
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_boolean: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_date_time: Option<String>,

    /// Marital (civil) status of a patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<CodeableConcept>,

    /// Languages which may be used to communicate with the patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<Vec<PatientCommunication>>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Patient".to_string()
}

impl Default for Patient {
    fn default() -> Self {
        Self {
            resource_type: default_resource_type(),
            id: None,
            extension: None,
            gender: None,
            birth_date: None,
            deceased_boolean: None,
            deceased_date_time: None,
            marital_status: None,
            communication: None,
            other: HashMap::new(),
        }
    }
}

impl Patient {
    pub fn extensions(&self) -> &[Extension] {
        self.extension.as_deref().unwrap_or(&[])
    }

    pub fn extension_by_url(&self, url: &str) -> Option<&Extension> {
        find_extension(self.extensions(), url)
    }

    pub fn communications(&self) -> &[PatientCommunication] {
        self.communication.as_deref().unwrap_or(&[])
    }

    pub fn has_deceased(&self) -> bool {
        self.deceased_boolean.is_some() || self.deceased_date_time.is_some()
    }
}

/// A language which may be used to communicate with the patient
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientCommunication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<CodeableConcept>,

    /// Language preference indicator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred: Option<bool>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl PatientCommunication {
    pub fn is_preferred(&self) -> bool {
        self.preferred.unwrap_or(false)
    }
}

/// The gender of a person used for administrative purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    Unknown,
}

impl AdministrativeGender {
    pub fn system(&self) -> &'static str {
        ADMINISTRATIVE_GENDER_SYSTEM
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
            Self::Unknown => "unknown",
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }

    /// Definition text from the administrative-gender code system
    pub fn definition(&self) -> &'static str {
        match self {
            Self::Male => "Male.",
            Self::Female => "Female.",
            Self::Other => "Other.",
            Self::Unknown => "Unknown.",
        }
    }
}
