//! Reference resolution within a Bundle
//!
//! Entries are indexed under their `fullUrl` and their `Type/id`; the first
//! entry wins when those keys collide. Bare ids are shared between resource
//! types, so every entry with a given id is kept and the typed lookups pick
//! the candidate of the wanted type.

use super::bundle::Bundle;
use super::datatypes::Reference;
use super::encounter::Encounter;
use super::observation::Observation;
use super::resource::Resource;
use super::service_request::ServiceRequest;
use super::specimen::Specimen;
use std::collections::HashMap;

const URN_UUID_PREFIX: &str = "urn:uuid:";

#[derive(Debug, Default)]
pub struct BundleIndex<'a> {
    by_key: HashMap<String, &'a Resource>,
    by_id: HashMap<String, Vec<&'a Resource>>,
}

impl<'a> BundleIndex<'a> {
    pub fn new(bundle: &'a Bundle) -> Self {
        let mut by_key = HashMap::new();
        let mut by_id: HashMap<String, Vec<&'a Resource>> = HashMap::new();
        for entry in bundle.entries() {
            let Some(resource) = entry.resource.as_ref() else {
                continue;
            };
            if let Some(full_url) = entry.full_url.as_deref() {
                by_key.entry(full_url.to_string()).or_insert(resource);
            }
            if let Some(id) = resource.id() {
                by_key
                    .entry(format!("{}/{}", resource.resource_type(), id))
                    .or_insert(resource);
                by_id.entry(id.to_string()).or_default().push(resource);
            }
        }
        Self { by_key, by_id }
    }

    /// Number of distinct lookup keys
    pub fn len(&self) -> usize {
        self.by_key.len() + self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty() && self.by_id.is_empty()
    }

    /// Resolve a literal reference against the bundle
    ///
    /// A bare id shared by several resources resolves to the first of them;
    /// use the typed `resolve_*` methods to select by resource type.
    pub fn resolve(&self, reference: &Reference) -> Option<&'a Resource> {
        let target = reference.reference.as_deref().filter(|r| !r.is_empty())?;
        self.candidates(target).first().copied()
    }

    /// Resolve a reference, trying the referencing resource's contained
    /// resources first for `#id` references
    pub fn resolve_from<'b>(
        &self,
        reference: &Reference,
        contained: &'b [Resource],
    ) -> Option<&'b Resource>
    where
        'a: 'b,
    {
        if let Some(local_id) = reference.contained_id() {
            return contained.iter().find(|r| r.id() == Some(local_id));
        }
        self.resolve(reference)
    }

    /// Like [`resolve_from`](Self::resolve_from), keeping only the candidate
    /// that `pick` accepts
    pub fn resolve_typed_from<'b, T: 'b>(
        &self,
        reference: &Reference,
        contained: &'b [Resource],
        pick: impl Fn(&'b Resource) -> Option<&'b T>,
    ) -> Option<&'b T>
    where
        'a: 'b,
    {
        if let Some(local_id) = reference.contained_id() {
            return contained
                .iter()
                .filter(|r| r.id() == Some(local_id))
                .find_map(pick);
        }
        let target = reference.reference.as_deref().filter(|r| !r.is_empty())?;
        let candidates: Vec<&'b Resource> = self.candidates(target);
        candidates.into_iter().find_map(pick)
    }

    pub fn resolve_observation(&self, reference: &Reference) -> Option<&'a Observation> {
        self.resolve_typed_from(reference, &[], Resource::as_observation)
    }

    pub fn resolve_specimen(&self, reference: &Reference) -> Option<&'a Specimen> {
        self.resolve_typed_from(reference, &[], Resource::as_specimen)
    }

    pub fn resolve_service_request(&self, reference: &Reference) -> Option<&'a ServiceRequest> {
        self.resolve_typed_from(reference, &[], Resource::as_service_request)
    }

    pub fn resolve_encounter(&self, reference: &Reference) -> Option<&'a Encounter> {
        self.resolve_typed_from(reference, &[], Resource::as_encounter)
    }

    /// Resources a reference target may denote, best match first
    fn candidates(&self, target: &str) -> Vec<&'a Resource> {
        if let Some(resource) = self.by_key.get(target).copied() {
            return vec![resource];
        }
        if let Some(uuid) = target.strip_prefix(URN_UUID_PREFIX) {
            return self.by_id.get(uuid).cloned().unwrap_or_default();
        }
        if !target.contains('/') {
            return self.by_id.get(target).cloned().unwrap_or_default();
        }
        let without_history = match target.find("/_history/") {
            Some(pos) => &target[..pos],
            None => target,
        };
        let mut segments = without_history.rsplit('/');
        match (segments.next(), segments.next()) {
            (Some(id), Some(resource_type)) => self
                .by_key
                .get(&format!("{resource_type}/{id}"))
                .copied()
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle() -> Bundle {
        Bundle::from_value(json!({
            "resourceType": "Bundle",
            "type": "collection",
            "entry": [
                {
                    "fullUrl": "urn:uuid:obs-1",
                    "resource": {"resourceType": "Observation", "id": "obs-1"}
                },
                {
                    "fullUrl": "http://example.org/fhir/Specimen/spec-1",
                    "resource": {"resourceType": "Specimen", "id": "spec-1"}
                },
                {
                    "resource": {"resourceType": "ServiceRequest", "id": "order-1"}
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_resolve_by_full_url() {
        let bundle = bundle();
        let index = BundleIndex::new(&bundle);
        let obs = index.resolve_observation(&Reference::to("urn:uuid:obs-1"));
        assert_eq!(obs.and_then(|o| o.id.as_deref()), Some("obs-1"));
    }

    #[test]
    fn test_resolve_relative_and_versioned() {
        let bundle = bundle();
        let index = BundleIndex::new(&bundle);
        assert!(index
            .resolve_specimen(&Reference::to("Specimen/spec-1"))
            .is_some());
        assert!(index
            .resolve_specimen(&Reference::to("Specimen/spec-1/_history/3"))
            .is_some());
        assert!(index
            .resolve_service_request(&Reference::to("http://other.org/fhir/ServiceRequest/order-1"))
            .is_some());
    }

    #[test]
    fn test_resolve_urn_uuid_without_full_url() {
        let bundle = bundle();
        let index = BundleIndex::new(&bundle);
        assert!(index
            .resolve_service_request(&Reference::to("urn:uuid:order-1"))
            .is_some());
    }

    #[test]
    fn test_type_mismatch_and_missing() {
        let bundle = bundle();
        let index = BundleIndex::new(&bundle);
        assert!(index.resolve_specimen(&Reference::to("urn:uuid:obs-1")).is_none());
        assert!(index.resolve(&Reference::to("Observation/nope")).is_none());
        assert!(index.resolve(&Reference::default()).is_none());
        assert!(index.resolve_encounter(&Reference::to("")).is_none());
    }

    #[test]
    fn test_shared_bare_id_resolves_by_type() {
        let bundle = Bundle::from_value(json!({
            "resourceType": "Bundle",
            "type": "collection",
            "entry": [
                {"resource": {"resourceType": "Observation", "id": "1"}},
                {"resource": {"resourceType": "Specimen", "id": "1"}}
            ]
        }))
        .unwrap();
        let index = BundleIndex::new(&bundle);
        let reference = Reference::to("urn:uuid:1");

        assert_eq!(index.resolve(&reference).map(Resource::resource_type), Some("Observation"));
        assert!(index.resolve_observation(&reference).is_some());
        assert!(index.resolve_specimen(&reference).is_some());
        assert!(index.resolve_specimen(&Reference::to("1")).is_some());
        assert!(index.resolve_encounter(&reference).is_none());
        assert!(index
            .resolve_typed_from(&reference, &[], Resource::as_specimen)
            .is_some());
    }

    #[test]
    fn test_resolve_contained() {
        let bundle = bundle();
        let index = BundleIndex::new(&bundle);
        let contained = vec![Resource::Specimen(Specimen {
            id: Some("local".to_string()),
            ..Default::default()
        })];
        let found = index.resolve_from(&Reference::to("#local"), &contained);
        assert!(found.and_then(Resource::as_specimen).is_some());
        assert!(index.resolve_from(&Reference::to("#other"), &contained).is_none());
        assert!(index
            .resolve_from(&Reference::to("urn:uuid:obs-1"), &contained)
            .is_some());
    }
}
