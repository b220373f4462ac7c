//! Mapper abstraction
//!
//! A mapper translates one part of the PIQI model (its [`MappingTarget`])
//! from bundles of one FHIR release. The [`crate::MapperRegistry`] selects
//! mappers by release and target.

use crate::version::FhirVersion;
use piqi_fhir::r4::Bundle;
use piqi_model::{PiqiDemographics, PiqiLabResult};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingTarget {
    Demographics,
    LabResults,
}

impl fmt::Display for MappingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Demographics => write!(f, "demographics"),
            Self::LabResults => write!(f, "lab-results"),
        }
    }
}

/// Output of a single mapper
#[derive(Debug, Clone, PartialEq)]
pub enum MappedData {
    Demographics(Option<PiqiDemographics>),
    LabResults(Vec<PiqiLabResult>),
}

impl MappedData {
    pub fn target(&self) -> MappingTarget {
        match self {
            Self::Demographics(_) => MappingTarget::Demographics,
            Self::LabResults(_) => MappingTarget::LabResults,
        }
    }
}

pub trait PiqiMapper: Send + Sync {
    /// Release of the bundles this mapper reads
    fn fhir_version(&self) -> FhirVersion;

    /// Part of the PIQI model this mapper produces
    fn mapping_target(&self) -> MappingTarget;

    fn is_fhir_version(&self, version: Option<FhirVersion>) -> bool {
        version == Some(self.fhir_version())
    }

    fn is_mapping_target(&self, target: MappingTarget) -> bool {
        target == self.mapping_target()
    }

    fn map_bundle(&self, bundle: &Bundle) -> MappedData;
}
