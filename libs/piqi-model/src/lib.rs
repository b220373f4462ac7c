//! PIQI data model
//!
//! Patient Information Quality Improvement (PIQI) represents patient data as
//! a flat, assessment-oriented model: every leaf is a [`SimpleAttribute`] and
//! every coded element is a [`PiqiCodeableConcept`] with text and codings.
//!
//! The [`validation`] module checks mapped data for format and consistency
//! problems before it is handed to an assessment.

pub mod attribute;
pub mod demographics;
pub mod lab_result;
pub mod patient;
pub mod validation;
pub mod values;

pub use attribute::{PiqiCodeableConcept, PiqiCoding, SimpleAttribute};
pub use demographics::PiqiDemographics;
pub use lab_result::PiqiLabResult;
pub use patient::PiqiPatient;
pub use validation::{IssueCode, IssueSeverity, Validate, ValidationIssue, ValidationOutcome};
pub use values::{ObservationValue, RangeValue};
