//! Mapper selection by FHIR release and mapping target

use crate::error::{MapError, Result};
use crate::mapper::{MappedData, MappingTarget, PiqiMapper};
use crate::r4::{DemographicsR4Mapper, LabResultsR4Mapper};
use crate::version::FhirVersion;
use piqi_fhir::r4::Bundle;
use piqi_model::PiqiPatient;
use tracing::debug;

/// Registered mappers, searched in registration order
#[derive(Default)]
pub struct MapperRegistry {
    mappers: Vec<Box<dyn PiqiMapper>>,
}

impl MapperRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the R4 demographics and lab-results mappers
    pub fn with_r4_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DemographicsR4Mapper::new());
        registry.register(LabResultsR4Mapper::new());
        registry
    }

    pub fn register(&mut self, mapper: impl PiqiMapper + 'static) {
        self.mappers.push(Box::new(mapper));
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// First mapper registered for `version` and `target`
    pub fn find(&self, version: FhirVersion, target: MappingTarget) -> Option<&dyn PiqiMapper> {
        self.mappers
            .iter()
            .map(|mapper| &**mapper)
            .find(|m| m.is_fhir_version(Some(version)) && m.is_mapping_target(target))
    }

    /// Run a single mapper
    pub fn map(
        &self,
        version: FhirVersion,
        target: MappingTarget,
        bundle: &Bundle,
    ) -> Result<MappedData> {
        let mapper = self
            .find(version, target)
            .ok_or(MapError::NoMapper { version, target })?;
        Ok(mapper.map_bundle(bundle))
    }

    /// Map a bundle into a patient using every target available for `version`
    ///
    /// Fails when no mapper at all is registered for `version`. A missing
    /// mapper for a single target leaves that part of the patient empty.
    pub fn map_patient(&self, version: FhirVersion, bundle: &Bundle) -> Result<PiqiPatient> {
        let mut patient = PiqiPatient::default();
        let mut mapped_any = false;

        for target in [MappingTarget::Demographics, MappingTarget::LabResults] {
            let Some(mapper) = self.find(version, target) else {
                debug!(%version, %target, "No mapper registered");
                continue;
            };
            mapped_any = true;
            match mapper.map_bundle(bundle) {
                MappedData::Demographics(demographics) => patient.demographics = demographics,
                MappedData::LabResults(results) => patient.lab_results = results,
            }
        }

        if !mapped_any {
            return Err(MapError::NoMapper {
                version,
                target: MappingTarget::Demographics,
            });
        }

        debug!(
            %version,
            has_demographics = patient.demographics.is_some(),
            lab_results = patient.lab_results.len(),
            "Mapped bundle"
        );
        Ok(patient)
    }
}

impl std::fmt::Debug for MapperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mappers: Vec<String> = self
            .mappers
            .iter()
            .map(|m| format!("{}/{}", m.fhir_version(), m.mapping_target()))
            .collect();
        f.debug_struct("MapperRegistry").field("mappers", &mappers).finish()
    }
}
