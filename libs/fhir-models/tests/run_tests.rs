use piqi_fhir::r4::{
    AdministrativeGender, Bundle, BundleIndex, BundleType, DiagnosticReportStatus, Reference,
    Resource,
};
use std::{fs::File, path::PathBuf};

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../piqi-map/tests/fixtures")
}

fn load_bundle(relative: &str) -> Bundle {
    let path = fixtures_root().join(relative);
    assert!(path.exists(), "fixture missing at {:?}", path);

    let file = File::open(&path).expect("failed to open fixture");
    Bundle::from_reader(file).expect("failed to deserialize fixture")
}

#[test]
fn parse_lab_bundle() {
    let bundle = load_bundle("lab-bundle.json");

    assert_eq!(bundle.resource_type, "Bundle");
    assert_eq!(bundle.bundle_type, BundleType::Collection);
    assert_eq!(bundle.entry_count(), 14);

    let types: Vec<&str> = bundle.resources().map(Resource::resource_type).collect();
    assert_eq!(types[0], "Patient");
    assert_eq!(types.iter().filter(|t| **t == "Observation").count(), 5);
    assert_eq!(types.iter().filter(|t| **t == "DiagnosticReport").count(), 3);

    // Location and Organization are not modelled but survive as raw JSON
    let other = bundle
        .resources()
        .filter(|r| matches!(r, Resource::Other(_)))
        .count();
    assert_eq!(other, 2);
}

#[test]
fn parse_patient_elements() {
    let bundle = load_bundle("lab-bundle.json");
    let patient = bundle
        .resources()
        .find_map(Resource::as_patient)
        .expect("patient should be present");

    assert_eq!(patient.gender, Some(AdministrativeGender::Male));
    assert_eq!(patient.birth_date.as_deref(), Some("2018-12-01"));
    assert_eq!(patient.extensions().len(), 3);
    assert_eq!(patient.communications().len(), 1);
    assert!(!patient.has_deceased());

    assert!(patient.other.contains_key("identifier"));
    assert!(patient.other.contains_key("name"));
}

#[test]
fn parse_report_with_contained_observation() {
    let bundle = load_bundle("lab-bundle.json");
    let report = bundle
        .resources()
        .filter_map(Resource::as_diagnostic_report)
        .find(|r| r.id.as_deref() == Some("dr-bmp"))
        .expect("dr-bmp should be present");

    assert_eq!(report.status, Some(DiagnosticReportStatus::Preliminary));
    assert_eq!(report.results().len(), 2);

    let contained = report.contained_resources();
    assert_eq!(contained.len(), 1);
    let glucose = contained[0].as_observation().expect("contained observation");
    assert_eq!(
        glucose
            .value_quantity
            .as_ref()
            .and_then(|q| q.value_string())
            .as_deref(),
        Some("95")
    );
}

#[test]
fn resolve_references_across_bundle() {
    let bundle = load_bundle("lab-bundle.json");
    let index = BundleIndex::new(&bundle);

    let wbc = index
        .resolve_observation(&Reference::to("urn:uuid:0b9c4a1e-6d2f-4e8a-b3c5-7a1f2e3d4c5b"))
        .expect("urn:uuid reference should resolve");
    assert_eq!(wbc.id.as_deref(), Some("0b9c4a1e-6d2f-4e8a-b3c5-7a1f2e3d4c5b"));

    let abo = index.resolve_observation(&Reference::to("http://example.org/fhir/Observation/abo"));
    assert!(abo.is_some());

    let request = index
        .resolve_service_request(&Reference::to("ServiceRequest/sr-1/_history/2"))
        .expect("versioned reference should resolve");
    assert_eq!(request.authored_on.as_deref(), Some("2019-03-08T09:00:00-05:00"));

    let specimen = index
        .resolve_specimen(&Reference::to("Specimen/spec-1"))
        .expect("specimen should resolve");
    assert!(specimen.type_.is_some());

    let encounter = index
        .resolve_encounter(&Reference::to("Encounter/enc-1"))
        .expect("encounter should resolve");
    assert_eq!(encounter.locations().len(), 1);

    assert!(index.resolve(&Reference::to("Observation/not-in-bundle")).is_none());
    assert!(index.resolve_observation(&Reference::to("Specimen/spec-1")).is_none());
}

#[test]
fn round_trip_keeps_unmodelled_content() {
    let bundle = load_bundle("lab-bundle.json");
    let value = bundle.to_value().expect("bundle should serialize");

    let encounter = &value["entry"][1]["resource"];
    assert_eq!(encounter["class"]["code"], "AMB");
    assert_eq!(value["entry"][2]["resource"]["name"], "Outpatient Lab");

    let reparsed = Bundle::from_value(value).expect("serialized bundle should parse");
    assert_eq!(reparsed, bundle);
}
