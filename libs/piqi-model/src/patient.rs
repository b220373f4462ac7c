//! PIQI patient aggregate

use crate::demographics::PiqiDemographics;
use crate::lab_result::PiqiLabResult;
use serde::{Deserialize, Serialize};

/// Everything mapped for one patient
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiqiPatient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demographics: Option<PiqiDemographics>,

    #[serde(default)]
    pub lab_results: Vec<PiqiLabResult>,
}

impl PiqiPatient {
    pub fn is_empty(&self) -> bool {
        self.demographics.is_none() && self.lab_results.is_empty()
    }
}
