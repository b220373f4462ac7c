//! PIQI laboratory result

use crate::attribute::{PiqiCodeableConcept, SimpleAttribute};
use crate::values::{ObservationValue, RangeValue};
use serde::{Deserialize, Serialize};

/// One resulted lab test, flattened from an observation and its report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiqiLabResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_value: Option<ObservationValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_unit: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<RangeValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen_type: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_status: Option<PiqiCodeableConcept>,

    /// `yyyyMMddHHmmss`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_date_time: Option<SimpleAttribute>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_site: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<PiqiCodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<SimpleAttribute>,
}
