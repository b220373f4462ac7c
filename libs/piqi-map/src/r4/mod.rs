//! Mappers for FHIR R4 bundles

pub mod demographics;
pub mod helper;
pub mod lab_results;

pub use demographics::DemographicsR4Mapper;
pub use lab_results::LabResultsR4Mapper;
