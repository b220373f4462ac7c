//! DiagnosticReport/Observation → PIQI lab results

use super::helper::{
    date_attribute, date_time_attribute, is_lab_observation, is_lab_report,
    map_codeable_concept, status_concept,
};
use crate::mapper::{MappedData, MappingTarget, PiqiMapper};
use crate::version::FhirVersion;
use piqi_fhir::r4::{
    Bundle, BundleIndex, DiagnosticReport, Observation, ObservationReferenceRange, Quantity,
    Reference, Resource,
};
use piqi_model::{
    ObservationValue, PiqiCodeableConcept, PiqiCoding, PiqiLabResult, RangeValue,
    SimpleAttribute,
};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, Default)]
pub struct LabResultsR4Mapper;

impl LabResultsR4Mapper {
    pub fn new() -> Self {
        Self
    }

    /// Map the results of every lab DiagnosticReport, in bundle order
    pub fn map_lab_results(&self, bundle: &Bundle) -> Vec<PiqiLabResult> {
        let index = BundleIndex::new(bundle);
        bundle
            .resources()
            .filter_map(Resource::as_diagnostic_report)
            .flat_map(|report| self.map_report(report, &index))
            .collect()
    }

    /// One lab result per resolvable lab Observation in `report.result`
    pub fn map_report(&self, report: &DiagnosticReport, index: &BundleIndex<'_>) -> Vec<PiqiLabResult> {
        if !is_lab_report(report) {
            debug!(report = report.id.as_deref(), "Skipping non-lab DiagnosticReport");
            return Vec::new();
        }

        let mut results = Vec::new();
        for reference in report.results() {
            let observation = index.resolve_typed_from(
                reference,
                report.contained_resources(),
                Resource::as_observation,
            );
            let Some(observation) = observation else {
                debug!(
                    report = report.id.as_deref(),
                    reference = reference.reference.as_deref(),
                    "Result does not resolve to an Observation"
                );
                continue;
            };
            if !is_lab_observation(observation) {
                debug!(
                    observation = observation.id.as_deref(),
                    "Skipping non-laboratory Observation"
                );
                continue;
            }
            results.push(map_observation(report, observation, index));
        }
        results
    }
}

impl PiqiMapper for LabResultsR4Mapper {
    fn fhir_version(&self) -> FhirVersion {
        FhirVersion::R4
    }

    fn mapping_target(&self) -> MappingTarget {
        MappingTarget::LabResults
    }

    fn map_bundle(&self, bundle: &Bundle) -> MappedData {
        MappedData::LabResults(self.map_lab_results(bundle))
    }
}

fn map_observation(
    report: &DiagnosticReport,
    observation: &Observation,
    index: &BundleIndex<'_>,
) -> PiqiLabResult {
    let performed = report
        .issued
        .as_deref()
        .or(observation.effective_date_time.as_deref());

    let mut result = PiqiLabResult {
        test: observation.code.as_ref().map(map_codeable_concept),
        interpretation: observation.interpretations().first().map(map_codeable_concept),
        reference_range: observation.reference_ranges().first().map(map_reference_range),
        specimen_type: map_specimen_type(observation, index),
        result_status: Some(status_concept(report.status)),
        performed_date_time: performed.map(date_time_attribute),
        performed_site: map_performed_site(report, observation, index),
        ..Default::default()
    };
    map_value(&mut result, observation);
    map_order(&mut result, report, observation, index);
    result
}

fn map_value(result: &mut PiqiLabResult, observation: &Observation) {
    if let Some(quantity) = &observation.value_quantity {
        let (value, unit) = map_quantity(quantity);
        result.result_value = Some(value);
        result.result_unit = Some(unit);
    } else if let Some(concept) = &observation.value_codeable_concept {
        result.result_value = Some(ObservationValue {
            text: concept.text.as_deref().map(SimpleAttribute::new),
            codeable_concept: Some(map_codeable_concept(concept)),
            ..Default::default()
        });
    } else if let Some(text) = &observation.value_string {
        result.result_value = Some(ObservationValue {
            text: Some(SimpleAttribute::new(text.as_str())),
            ..Default::default()
        });
    } else if let Some(number) = observation.value_integer {
        result.result_value = Some(ObservationValue {
            number: Some(SimpleAttribute::new(number.to_string())),
            ..Default::default()
        });
    } else if let Some(flag) = observation.value_boolean {
        result.result_value = Some(ObservationValue {
            text: Some(SimpleAttribute::new(flag.to_string())),
            ..Default::default()
        });
    } else if let Some(element) = observation.untyped_value_element() {
        debug!(
            observation = observation.id.as_deref(),
            element, "Observation value type is not mapped"
        );
    }
}

/// Number and unit concept; the unit concept's text is the number and its
/// coding display is the unit
fn map_quantity(quantity: &Quantity) -> (ObservationValue, PiqiCodeableConcept) {
    let number = quantity.value_string();
    let value = ObservationValue {
        number: Some(number.clone().into()),
        ..Default::default()
    };

    let mut unit = PiqiCodeableConcept::with_text(number);
    unit.push_coding(PiqiCoding::new(
        quantity.code.as_deref(),
        quantity.unit.as_deref(),
        quantity.system.as_deref(),
    ));
    (value, unit)
}

fn map_reference_range(range: &ObservationReferenceRange) -> RangeValue {
    RangeValue {
        low_value: range.low.as_ref().and_then(Quantity::value_string).into(),
        high_value: range.high.as_ref().and_then(Quantity::value_string).into(),
        text: range.text.as_deref().into(),
    }
}

/// Specimen.type of the referenced specimen, else the reference display
fn map_specimen_type(observation: &Observation, index: &BundleIndex<'_>) -> Option<PiqiCodeableConcept> {
    let reference = observation.specimen.as_ref()?;
    let specimen_type = index
        .resolve_typed_from(reference, observation.contained_resources(), Resource::as_specimen)
        .and_then(|specimen| specimen.type_.as_ref());

    match specimen_type {
        Some(concept) => Some(map_codeable_concept(concept)),
        None => reference
            .display
            .as_deref()
            .map(|display| PiqiCodeableConcept::with_text(display)),
    }
}

/// Report performer display when the observation names no performer,
/// otherwise the physical type of the encounter location
fn map_performed_site(
    report: &DiagnosticReport,
    observation: &Observation,
    index: &BundleIndex<'_>,
) -> Option<PiqiCodeableConcept> {
    if observation.performers().is_empty() {
        let performer = report.performers().iter().find(|p| p.has_reference());
        if let Some(performer) = performer {
            return Some(PiqiCodeableConcept::with_text(performer.display.as_deref()));
        }
    }
    encounter_physical_type(observation, index)
}

fn encounter_physical_type(
    observation: &Observation,
    index: &BundleIndex<'_>,
) -> Option<PiqiCodeableConcept> {
    let reference = observation.encounter.as_ref()?;
    let Some(encounter) = index
        .resolve_typed_from(reference, observation.contained_resources(), Resource::as_encounter)
    else {
        trace!(
            encounter = reference.reference.as_deref(),
            "Encounter not in bundle"
        );
        return None;
    };
    encounter
        .locations()
        .iter()
        .find_map(|location| location.physical_type.as_ref())
        .map(map_codeable_concept)
}

fn map_order(
    result: &mut PiqiLabResult,
    report: &DiagnosticReport,
    observation: &Observation,
    index: &BundleIndex<'_>,
) {
    let (based_on, contained): (&[Reference], &[Resource]) =
        if observation.based_on_references().is_empty() {
            (report.based_on_references(), report.contained_resources())
        } else {
            (observation.based_on_references(), observation.contained_resources())
        };

    let Some(reference) = based_on.first() else {
        result.order = report.code.as_ref().map(map_codeable_concept);
        result.order_date = report.issued.as_deref().map(date_attribute);
        return;
    };

    let Some(request) = index
        .resolve_typed_from(reference, contained, Resource::as_service_request)
    else {
        debug!(
            reference = reference.reference.as_deref(),
            "basedOn does not resolve to a ServiceRequest, order left empty"
        );
        return;
    };

    result.order = request
        .order_details()
        .first()
        .or(request.code.as_ref())
        .map(map_codeable_concept);
    result.order_date = request.authored_on.as_deref().map(SimpleAttribute::new);
}
