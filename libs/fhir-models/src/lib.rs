//! FHIR data models
//!
//! This crate provides strongly-typed Rust structures for the FHIR R4
//! resources read when mapping a bundle into the PIQI model.
//!
//! # Module Organization
//!
//! - `r4`: Bundle, Patient, Observation, DiagnosticReport, Specimen,
//!   ServiceRequest, Encounter and the shared datatypes
//! - `r4::index`: reference resolution within a bundle
//!
//! # Design Philosophy
//!
//! - **Partial**: only the elements the mappers read are typed
//! - **Lossless**: every other element is kept in a flattened `other` map
//! - **Tolerant**: resource types that are not modelled parse as `Resource::Other`
//!
//! # Example
//!
//! ```rust
//! use piqi_fhir::r4::{Bundle, BundleIndex, Reference};
//! use serde_json::json;
//!
//! let bundle = Bundle::from_value(json!({
//!     "resourceType": "Bundle",
//!     "type": "collection",
//!     "entry": [{
//!         "fullUrl": "urn:uuid:9f1c",
//!         "resource": {"resourceType": "Patient", "id": "9f1c", "gender": "male"}
//!     }]
//! }))
//! .unwrap();
//!
//! let index = BundleIndex::new(&bundle);
//! let patient = index.resolve(&Reference::to("Patient/9f1c")).unwrap();
//! assert_eq!(patient.resource_type(), "Patient");
//! ```

pub mod error;
pub mod r4;

pub use error::{Error, Result};
