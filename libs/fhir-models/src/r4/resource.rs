//! Polymorphic R4 resource
//!
//! Dispatches on `resourceType`. Resource types the mapper does not read are
//! kept verbatim as [`Resource::Other`] instead of failing the whole bundle.

use super::diagnostic_report::DiagnosticReport;
use super::encounter::Encounter;
use super::observation::Observation;
use super::patient::Patient;
use super::service_request::ServiceRequest;
use super::specimen::Specimen;
use crate::error::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Patient(Patient),
    Observation(Observation),
    DiagnosticReport(DiagnosticReport),
    Specimen(Specimen),
    ServiceRequest(ServiceRequest),
    Encounter(Encounter),
    Other(Value),
}

impl Resource {
    /// Parse from a JSON Value, dispatching on `resourceType`
    pub fn from_value(value: Value) -> Result<Self> {
        let resource_type = value
            .get("resourceType")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingField("resourceType".to_string()))?;

        let resource = match resource_type {
            "Patient" => Resource::Patient(serde_json::from_value(value)?),
            "Observation" => Resource::Observation(serde_json::from_value(value)?),
            "DiagnosticReport" => Resource::DiagnosticReport(serde_json::from_value(value)?),
            "Specimen" => Resource::Specimen(serde_json::from_value(value)?),
            "ServiceRequest" => Resource::ServiceRequest(serde_json::from_value(value)?),
            "Encounter" => Resource::Encounter(serde_json::from_value(value)?),
            _ => Resource::Other(value),
        };
        Ok(resource)
    }

    /// Convert to JSON Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }

    pub fn resource_type(&self) -> &str {
        match self {
            Resource::Patient(r) => &r.resource_type,
            Resource::Observation(r) => &r.resource_type,
            Resource::DiagnosticReport(r) => &r.resource_type,
            Resource::Specimen(r) => &r.resource_type,
            Resource::ServiceRequest(r) => &r.resource_type,
            Resource::Encounter(r) => &r.resource_type,
            Resource::Other(v) => v
                .get("resourceType")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Resource::Patient(r) => r.id.as_deref(),
            Resource::Observation(r) => r.id.as_deref(),
            Resource::DiagnosticReport(r) => r.id.as_deref(),
            Resource::Specimen(r) => r.id.as_deref(),
            Resource::ServiceRequest(r) => r.id.as_deref(),
            Resource::Encounter(r) => r.id.as_deref(),
            Resource::Other(v) => v.get("id").and_then(Value::as_str),
        }
    }

    pub fn as_patient(&self) -> Option<&Patient> {
        match self {
            Resource::Patient(patient) => Some(patient),
            _ => None,
        }
    }

    pub fn as_observation(&self) -> Option<&Observation> {
        match self {
            Resource::Observation(observation) => Some(observation),
            _ => None,
        }
    }

    pub fn as_diagnostic_report(&self) -> Option<&DiagnosticReport> {
        match self {
            Resource::DiagnosticReport(report) => Some(report),
            _ => None,
        }
    }

    pub fn as_specimen(&self) -> Option<&Specimen> {
        match self {
            Resource::Specimen(specimen) => Some(specimen),
            _ => None,
        }
    }

    pub fn as_service_request(&self) -> Option<&ServiceRequest> {
        match self {
            Resource::ServiceRequest(request) => Some(request),
            _ => None,
        }
    }

    pub fn as_encounter(&self) -> Option<&Encounter> {
        match self {
            Resource::Encounter(encounter) => Some(encounter),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Resource::from_value(value).map_err(|err| match err {
            Error::SerializationError(inner) => D::Error::custom(inner),
            other => D::Error::custom(other),
        })
    }
}

impl Serialize for Resource {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Resource::Patient(r) => r.serialize(serializer),
            Resource::Observation(r) => r.serialize(serializer),
            Resource::DiagnosticReport(r) => r.serialize(serializer),
            Resource::Specimen(r) => r.serialize(serializer),
            Resource::ServiceRequest(r) => r.serialize(serializer),
            Resource::Encounter(r) => r.serialize(serializer),
            Resource::Other(v) => v.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_on_resource_type() {
        let resource: Resource =
            serde_json::from_value(json!({"resourceType": "Specimen", "id": "s1"})).unwrap();
        assert!(resource.as_specimen().is_some());
        assert_eq!(resource.resource_type(), "Specimen");
        assert_eq!(resource.id(), Some("s1"));
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let json = json!({"resourceType": "Organization", "id": "org1", "name": "Lab"});
        let resource: Resource = serde_json::from_value(json.clone()).unwrap();

        assert!(matches!(resource, Resource::Other(_)));
        assert_eq!(resource.resource_type(), "Organization");
        assert_eq!(resource.id(), Some("org1"));
        assert_eq!(resource.to_value().unwrap(), json);
    }

    #[test]
    fn test_missing_resource_type_is_rejected() {
        let err = serde_json::from_value::<Resource>(json!({"id": "x"})).unwrap_err();
        assert!(err.to_string().contains("resourceType"));
    }

    #[test]
    fn test_nested_error_is_not_wrapped_twice() {
        let json = json!({
            "resourceType": "Bundle",
            "type": "collection",
            "entry": [{"resource": {"resourceType": "Observation", "status": 7}}]
        });
        let err = crate::r4::Bundle::from_value(json).unwrap_err();
        let message = err.to_string();

        assert!(message.starts_with("Serialization error: invalid type"), "{message}");
        assert_eq!(message.matches("Serialization error").count(), 1);
    }

    #[test]
    fn test_serialize_keeps_resource_type() {
        let resource = Resource::Patient(Patient::default());
        let json = resource.to_value().unwrap();
        assert_eq!(json["resourceType"], "Patient");
    }
}
