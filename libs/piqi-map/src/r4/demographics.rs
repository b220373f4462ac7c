//! Patient → PIQI demographics

use super::helper::{date_attribute, map_codeable_concept, map_coding, yes_no_concept};
use crate::mapper::{MappedData, MappingTarget, PiqiMapper};
use crate::version::FhirVersion;
use piqi_fhir::r4::{Bundle, Extension, Patient, Resource};
use piqi_model::{PiqiCodeableConcept, PiqiCoding, PiqiDemographics, SimpleAttribute};

pub const BIRTH_SEX_URL: &str = "http://hl7.org/fhir/us/core/StructureDefinition/us-core-birthsex";
pub const ETHNICITY_URL: &str = "http://hl7.org/fhir/us/core/StructureDefinition/us-core-ethnicity";
pub const RACE_URL: &str = "http://hl7.org/fhir/us/core/StructureDefinition/us-core-race";

#[derive(Debug, Clone, Copy, Default)]
pub struct DemographicsR4Mapper;

impl DemographicsR4Mapper {
    pub fn new() -> Self {
        Self
    }

    /// Map the first Patient of the bundle; `None` when the bundle has no Patient
    pub fn map_demographics(&self, bundle: &Bundle) -> Option<PiqiDemographics> {
        let patient = bundle.resources().find_map(Resource::as_patient)?;
        Some(self.map_patient(patient))
    }

    pub fn map_patient(&self, patient: &Patient) -> PiqiDemographics {
        let mut demographics = PiqiDemographics {
            birth_date: patient.birth_date.as_deref().map(date_attribute),
            birth_sex: map_birth_sex(patient),
            ethnicity: patient
                .extension_by_url(ETHNICITY_URL)
                .and_then(map_omb_extension),
            gender_identity: patient.gender.map(|gender| {
                let mut concept = PiqiCodeableConcept::with_text(gender.definition());
                concept.push_coding(PiqiCoding::new(
                    gender.code(),
                    gender.display(),
                    gender.system(),
                ));
                concept
            }),
            marital_status: patient.marital_status.as_ref().map(map_codeable_concept),
            primary_language: map_primary_language(patient),
            race: patient.extension_by_url(RACE_URL).and_then(map_omb_extension),
            ..Default::default()
        };
        map_deceased(&mut demographics, patient);
        demographics
    }
}

impl PiqiMapper for DemographicsR4Mapper {
    fn fhir_version(&self) -> FhirVersion {
        FhirVersion::R4
    }

    fn mapping_target(&self) -> MappingTarget {
        MappingTarget::Demographics
    }

    fn map_bundle(&self, bundle: &Bundle) -> MappedData {
        MappedData::Demographics(self.map_demographics(bundle))
    }
}

fn map_birth_sex(patient: &Patient) -> Option<PiqiCodeableConcept> {
    let extension = patient
        .extension_by_url(BIRTH_SEX_URL)
        .filter(|ext| ext.has_value())?;

    if let Some(code) = extension.value_code.as_deref() {
        let mut concept = PiqiCodeableConcept::with_text(SimpleAttribute::empty());
        concept.push_coding(PiqiCoding::new(code, None::<&str>, BIRTH_SEX_URL));
        return Some(concept);
    }

    let coding = extension.value_coding.as_ref()?;
    let mut mapped = map_coding(coding);
    if !mapped.system.is_valued() {
        mapped.system = SimpleAttribute::new(BIRTH_SEX_URL);
    }
    let mut concept = PiqiCodeableConcept::with_text(coding.display.as_deref());
    concept.push_coding(mapped);
    Some(concept)
}

fn map_deceased(demographics: &mut PiqiDemographics, patient: &Patient) {
    match (patient.deceased_boolean, patient.deceased_date_time.as_deref()) {
        (Some(deceased), _) => {
            demographics.deceased = Some(yes_no_concept(deceased));
        }
        (None, Some(date_time)) => {
            demographics.deceased = Some(yes_no_concept(true));
            demographics.death_date = Some(SimpleAttribute::new(date_time));
        }
        (None, None) => {
            demographics.deceased = Some(yes_no_concept(false));
        }
    }
}

/// US Core race/ethnicity: `text` becomes the concept text and each
/// `ombCategory` a coding. `detailed` entries are not mapped.
fn map_omb_extension(extension: &Extension) -> Option<PiqiCodeableConcept> {
    if !extension.has_extension() {
        return None;
    }
    let mut concept = PiqiCodeableConcept::default();
    for nested in extension.extensions() {
        match nested.url.as_str() {
            "text" => concept.text = nested.value_string.as_deref().into(),
            "ombCategory" => {
                if let Some(coding) = &nested.value_coding {
                    concept.push_coding(map_coding(coding));
                }
            }
            _ => {}
        }
    }
    Some(concept)
}

/// The preferred communication language, otherwise the last one listed
fn map_primary_language(patient: &Patient) -> Option<PiqiCodeableConcept> {
    let mut language = None;
    for communication in patient.communications() {
        if let Some(concept) = &communication.language {
            language = Some(map_codeable_concept(concept));
        }
        if communication.is_preferred() {
            break;
        }
    }
    language
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patient(value: serde_json::Value) -> Patient {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_mapper_identity() {
        let mapper = DemographicsR4Mapper::new();
        assert!(mapper.is_fhir_version(Some(FhirVersion::R4)));
        assert!(!mapper.is_fhir_version(Some(FhirVersion::R5)));
        assert!(!mapper.is_fhir_version(None));
        assert!(mapper.is_mapping_target(MappingTarget::Demographics));
        assert!(!mapper.is_mapping_target(MappingTarget::LabResults));
    }

    #[test]
    fn test_birth_sex_value_code() {
        let demographics = DemographicsR4Mapper::new().map_patient(&patient(json!({
            "resourceType": "Patient",
            "extension": [{"url": BIRTH_SEX_URL, "valueCode": "F"}]
        })));

        let birth_sex = demographics.birth_sex.unwrap();
        assert_eq!(birth_sex.text.value(), None);
        assert_eq!(birth_sex.codings.len(), 1);
        assert_eq!(birth_sex.codings[0].code.value(), Some("F"));
        assert_eq!(birth_sex.codings[0].display.value(), None);
        assert_eq!(birth_sex.codings[0].system.value(), Some(BIRTH_SEX_URL));
    }

    #[test]
    fn test_birth_sex_value_coding_keeps_system() {
        let demographics = DemographicsR4Mapper::new().map_patient(&patient(json!({
            "resourceType": "Patient",
            "extension": [{
                "url": BIRTH_SEX_URL,
                "valueCoding": {
                    "system": "http://terminology.hl7.org/CodeSystem/v3-AdministrativeGender",
                    "code": "M",
                    "display": "Male"
                }
            }]
        })));

        let birth_sex = demographics.birth_sex.unwrap();
        assert_eq!(birth_sex.text.value(), Some("Male"));
        assert_eq!(
            birth_sex.codings[0].system.value(),
            Some("http://terminology.hl7.org/CodeSystem/v3-AdministrativeGender")
        );
    }

    #[test]
    fn test_empty_birth_sex_is_skipped() {
        let demographics = DemographicsR4Mapper::new().map_patient(&patient(json!({
            "resourceType": "Patient",
            "extension": [{"url": BIRTH_SEX_URL, "valueCode": ""}]
        })));
        assert!(demographics.birth_sex.is_none());
    }

    #[test]
    fn test_deceased_variants() {
        let mapper = DemographicsR4Mapper::new();

        let alive = mapper.map_patient(&patient(json!({"resourceType": "Patient"})));
        assert_eq!(alive.deceased.unwrap().codings[0].code.value(), Some("N"));
        assert!(alive.death_date.is_none());

        let flagged = mapper.map_patient(&patient(json!({
            "resourceType": "Patient",
            "deceasedBoolean": true
        })));
        assert_eq!(flagged.deceased.unwrap().text.value(), Some("Yes"));
        assert!(flagged.death_date.is_none());

        let dated = mapper.map_patient(&patient(json!({
            "resourceType": "Patient",
            "deceasedDateTime": "2021-06-01T12:30:00-04:00"
        })));
        assert_eq!(dated.deceased.unwrap().codings[0].code.value(), Some("Y"));
        assert_eq!(
            dated.death_date.unwrap().value(),
            Some("2021-06-01T12:30:00-04:00")
        );
    }

    #[test]
    fn test_race_ignores_detailed() {
        let demographics = DemographicsR4Mapper::new().map_patient(&patient(json!({
            "resourceType": "Patient",
            "extension": [{
                "url": RACE_URL,
                "extension": [
                    {
                        "url": "ombCategory",
                        "valueCoding": {
                            "system": "urn:oid:2.16.840.1.113883.6.238",
                            "code": "2028-9",
                            "display": "Asian"
                        }
                    },
                    {
                        "url": "detailed",
                        "valueCoding": {
                            "system": "urn:oid:2.16.840.1.113883.6.238",
                            "code": "2039-6",
                            "display": "Japanese"
                        }
                    },
                    {"url": "text", "valueString": "Asian"}
                ]
            }]
        })));

        let race = demographics.race.unwrap();
        assert_eq!(race.text.value(), Some("Asian"));
        assert_eq!(race.codings.len(), 1);
        assert_eq!(race.codings[0].code.value(), Some("2028-9"));
        assert!(demographics.ethnicity.is_none());
    }

    #[test]
    fn test_ethnicity_without_nested_extensions_is_skipped() {
        let demographics = DemographicsR4Mapper::new().map_patient(&patient(json!({
            "resourceType": "Patient",
            "extension": [{"url": ETHNICITY_URL, "valueString": "unexpected"}]
        })));
        assert!(demographics.ethnicity.is_none());
    }

    #[test]
    fn test_primary_language_prefers_preferred() {
        let mapper = DemographicsR4Mapper::new();

        let preferred = mapper.map_patient(&patient(json!({
            "resourceType": "Patient",
            "communication": [
                {"language": {"text": "German"}},
                {"language": {"text": "French"}, "preferred": true},
                {"language": {"text": "Dutch"}}
            ]
        })));
        assert_eq!(preferred.primary_language.unwrap().text.value(), Some("French"));

        let last = mapper.map_patient(&patient(json!({
            "resourceType": "Patient",
            "communication": [
                {"language": {"text": "German"}},
                {"language": {"text": "Dutch"}}
            ]
        })));
        assert_eq!(last.primary_language.unwrap().text.value(), Some("Dutch"));
    }

    #[test]
    fn test_gender_identity() {
        let demographics = DemographicsR4Mapper::new().map_patient(&patient(json!({
            "resourceType": "Patient",
            "gender": "female"
        })));

        let gender = demographics.gender_identity.unwrap();
        assert_eq!(gender.text.value(), Some("Female."));
        assert_eq!(gender.codings[0].code.value(), Some("female"));
        assert_eq!(gender.codings[0].display.value(), Some("Female"));
        assert_eq!(
            gender.codings[0].system.value(),
            Some("http://hl7.org/fhir/administrative-gender")
        );
    }

    #[test]
    fn test_bundle_without_patient() {
        let bundle = Bundle::from_value(json!({
            "resourceType": "Bundle",
            "type": "collection",
            "entry": [{"resource": {"resourceType": "Observation", "id": "o1"}}]
        }))
        .unwrap();

        let mapper = DemographicsR4Mapper::new();
        assert!(mapper.map_demographics(&bundle).is_none());
        assert_eq!(mapper.map_bundle(&bundle), MappedData::Demographics(None));
    }
}
