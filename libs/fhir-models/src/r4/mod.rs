//! FHIR R4 models
//!
//! Typed subset of R4 used by the PIQI mappers

pub mod bundle;
pub mod datatypes;
pub mod diagnostic_report;
pub mod encounter;
pub mod index;
pub mod observation;
pub mod patient;
pub mod resource;
pub mod service_request;
pub mod specimen;

// Re-export commonly used types
pub use bundle::*;
pub use datatypes::*;
pub use diagnostic_report::*;
pub use encounter::*;
pub use index::BundleIndex;
pub use observation::*;
pub use patient::*;
pub use resource::Resource;
pub use service_request::*;
pub use specimen::*;
