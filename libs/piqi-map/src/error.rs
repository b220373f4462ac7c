//! Error types for PIQI mapping

use crate::mapper::MappingTarget;
use crate::version::FhirVersion;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("FHIR model error: {0}")]
    Fhir(#[from] piqi_fhir::Error),

    #[error("No {target} mapper registered for FHIR {version}")]
    NoMapper {
        version: FhirVersion,
        target: MappingTarget,
    },

    #[error("Unsupported FHIR version: {0}")]
    UnsupportedVersion(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
