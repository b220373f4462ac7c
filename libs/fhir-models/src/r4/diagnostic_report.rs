//! FHIR R4 DiagnosticReport resource

use super::datatypes::{CodeableConcept, Reference};
use super::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const DIAGNOSTIC_REPORT_STATUS_SYSTEM: &str = "http://hl7.org/fhir/diagnostic-report-status";

/// A Diagnostic report - a combination of request information, atomic results,
/// images, interpretation, as well as formatted reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    /// Resource type - always "DiagnosticReport"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Contained, inline resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contained: Option<Vec<Resource>>,

    /// What was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DiagnosticReportStatus>,

    /// Service category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,

    /// Name/Code for this diagnostic report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<String>,

    /// DateTime this version was made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,

    /// Responsible Diagnostic Service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<Vec<Reference>>,

    /// Observations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<Reference>>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "DiagnosticReport".to_string()
}

impl Default for DiagnosticReport {
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
            result: None,
            other: HashMap::new(),
        }
    }
}

impl DiagnosticReport {
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

    pub fn results(&self) -> &[Reference] {
        self.result.as_deref().unwrap_or(&[])
    }
}

/// The status of the diagnostic report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticReportStatus {
    Registered,
    Partial,
    Preliminary,
    Final,
    Amended,
    Corrected,
    Appended,
    Cancelled,
    EnteredInError,
    Unknown,
}

impl DiagnosticReportStatus {
    pub fn system(&self) -> &'static str {
        DIAGNOSTIC_REPORT_STATUS_SYSTEM
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Partial => "partial",
            Self::Preliminary => "preliminary",
            Self::Final => "final",
            Self::Amended => "amended",
            Self::Corrected => "corrected",
            Self::Appended => "appended",
            Self::Cancelled => "cancelled",
            Self::EnteredInError => "entered-in-error",
            Self::Unknown => "unknown",
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Self::Registered => "Registered",
            Self::Partial => "Partial",
            Self::Preliminary => "Preliminary",
            Self::Final => "Final",
            Self::Amended => "Amended",
            Self::Corrected => "Corrected",
            Self::Appended => "Appended",
            Self::Cancelled => "Cancelled",
            Self::EnteredInError => "Entered in Error",
            Self::Unknown => "Unknown",
        }
    }

    /// Upper-case constant name of the status (e.g. `ENTEREDINERROR`)
    pub fn constant_name(&self) -> String {
        self.code().replace('-', "").to_uppercase()
    }
}
