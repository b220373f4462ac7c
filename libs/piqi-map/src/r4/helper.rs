//! Shared R4 → PIQI conversions

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use piqi_fhir::r4::{CodeableConcept, Coding, DiagnosticReport, DiagnosticReportStatus, Observation};
use piqi_model::validation::{DATE_FORMAT, DATE_TIME_FORMAT};
use piqi_model::{PiqiCodeableConcept, PiqiCoding, SimpleAttribute};

pub const V2_0136_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v2-0136";

const LAB_REPORT_CATEGORY: &str = "LAB";
const LAB_OBSERVATION_CATEGORY: &str = "laboratory";

/// True when any coding of any category carries exactly `code`
pub fn is_category_match(categories: &[CodeableConcept], code: &str) -> bool {
    categories.iter().any(|category| category.has_code(code))
}

pub fn is_lab_report(report: &DiagnosticReport) -> bool {
    is_category_match(report.categories(), LAB_REPORT_CATEGORY)
}

pub fn is_lab_observation(observation: &Observation) -> bool {
    is_category_match(observation.categories(), LAB_OBSERVATION_CATEGORY)
}

pub fn map_coding(coding: &Coding) -> PiqiCoding {
    PiqiCoding::new(
        coding.code.as_deref(),
        coding.display.as_deref(),
        coding.system.as_deref(),
    )
}

pub fn map_codeable_concept(concept: &CodeableConcept) -> PiqiCodeableConcept {
    PiqiCodeableConcept {
        text: concept.text.as_deref().into(),
        codings: concept.codings().iter().map(map_coding).collect(),
    }
}

/// v2-0136 Yes/No concept
pub fn yes_no_concept(yes: bool) -> PiqiCodeableConcept {
    let (code, display) = if yes { ("Y", "Yes") } else { ("N", "No") };
    let mut concept = PiqiCodeableConcept::with_text(display);
    concept.push_coding(PiqiCoding::new(code, display, V2_0136_SYSTEM));
    concept
}

/// Report status concept; an absent status yields an empty concept
pub fn status_concept(status: Option<DiagnosticReportStatus>) -> PiqiCodeableConcept {
    match status {
        Some(status) => {
            let mut concept = PiqiCodeableConcept::with_text(status.constant_name().as_str());
            concept.push_coding(PiqiCoding::new(
                status.code(),
                status.display(),
                status.system(),
            ));
            concept
        }
        None => PiqiCodeableConcept::default(),
    }
}

/// Parse a FHIR `date`, partial date, `dateTime` or `instant` into its calendar date
///
/// Partial dates are completed with the first month/day. For values with a
/// time component the date as written (in the value's own offset) is kept.
pub fn parse_fhir_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    parse_partial_date(value).or_else(|| parse_fhir_date_time(value).map(|dt| dt.date()))
}

/// Parse a FHIR `dateTime`/`instant` into the wall-clock time of its own offset
///
/// Date-only values resolve to midnight.
pub fn parse_fhir_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    parse_partial_date(value).and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
fn parse_partial_date(value: &str) -> Option<NaiveDate> {
    match value.len() {
        4 => value
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
        7 => NaiveDate::parse_from_str(&format!("{value}-01"), DATE_FORMAT).ok(),
        10 => NaiveDate::parse_from_str(value, DATE_FORMAT).ok(),
        _ => None,
    }
}

/// `yyyy-MM-dd` attribute; unparsable input yields an empty attribute
pub fn date_attribute(value: &str) -> SimpleAttribute {
    match parse_fhir_date(value) {
        Some(date) => SimpleAttribute::new(date.format(DATE_FORMAT).to_string()),
        None => {
            tracing::warn!(value, "Unparsable FHIR date, leaving attribute empty");
            SimpleAttribute::empty()
        }
    }
}

/// `yyyyMMddHHmmss` attribute; unparsable input yields an empty attribute
pub fn date_time_attribute(value: &str) -> SimpleAttribute {
    match parse_fhir_date_time(value) {
        Some(dt) => SimpleAttribute::new(dt.format(DATE_TIME_FORMAT).to_string()),
        None => {
            tracing::warn!(value, "Unparsable FHIR dateTime, leaving attribute empty");
            SimpleAttribute::empty()
        }
    }
}
