//! FHIR R4 ServiceRequest resource

use super::datatypes::CodeableConcept;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A request for a service to be performed (the lab order)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    /// Resource type - always "ServiceRequest"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    /// What is being requested/ordered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    /// Additional order information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_detail: Option<Vec<CodeableConcept>>,

    /// Date request signed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authored_on: Option<String>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "ServiceRequest".to_string()
}

impl Default for ServiceRequest {
    fn default() -> Self {
        Self {
            resource_type: default_resource_type(),
            id: None,
            status: None,
            intent: None,
            code: None,
            order_detail: None,
            authored_on: None,
            other: HashMap::new(),
        }
    }
}

impl ServiceRequest {
    pub fn order_details(&self) -> &[CodeableConcept] {
        self.order_detail.as_deref().unwrap_or(&[])
    }
}
