//! FHIR → PIQI mapping
//!
//! Mappers turn a FHIR Bundle into parts of a [`piqi_model::PiqiPatient`].
//! Each mapper handles one FHIR release and one [`MappingTarget`]; the
//! [`MapperRegistry`] picks the right ones and assembles the patient.
//!
//! # Example
//!
//! ```rust
//! use piqi_fhir::r4::Bundle;
//! use piqi_map::{FhirVersion, MapperRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundle = Bundle::from_json_str(
//!     r#"{
//!         "resourceType": "Bundle",
//!         "type": "collection",
//!         "entry": [{"resource": {"resourceType": "Patient", "birthDate": "2018-12-01"}}]
//!     }"#,
//! )?;
//!
//! let version: FhirVersion = "4.0.1".parse()?;
//! let patient = MapperRegistry::with_r4_defaults().map_patient(version, &bundle)?;
//! let demographics = patient.demographics.expect("bundle has a Patient");
//! assert_eq!(demographics.birth_date.unwrap().value(), Some("2018-12-01"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod mapper;
pub mod r4;
pub mod registry;
pub mod version;

pub use error::{MapError, Result};
pub use mapper::{MappedData, MappingTarget, PiqiMapper};
pub use registry::MapperRegistry;
pub use version::FhirVersion;
