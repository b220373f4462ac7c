//! Structural validation of mapped PIQI data
//!
//! Checks are local to the PIQI model: value formats, required elements and
//! simple cross-field invariants. Terminology is not checked.

use crate::attribute::{PiqiCodeableConcept, PiqiCoding, SimpleAttribute};
use crate::demographics::PiqiDemographics;
use crate::lab_result::PiqiLabResult;
use crate::patient::PiqiPatient;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

pub trait Validate {
    /// Append the issues found under `path` to `issues`
    fn validate_into(&self, path: &str, issues: &mut Vec<ValidationIssue>);

    fn validate(&self) -> ValidationOutcome {
        let mut issues = Vec::new();
        self.validate_into("", &mut issues);
        ValidationOutcome::from_issues(issues)
    }
}

/// Validation result for a mapped value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let valid = !issues.iter().any(|i| i.severity == IssueSeverity::Error);
        Self { valid, issues }
    }

    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    pub fn error_count(&self) -> usize {
        self.count(IssueSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(IssueSeverity::Warning)
    }

    fn count(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Individual validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub location: String,
    pub diagnostics: String,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, location: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            location: location.into(),
            diagnostics: diagnostics.into(),
        }
    }

    pub fn warning(code: IssueCode, location: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            location: location.into(),
            diagnostics: diagnostics.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.code, self.location, self.diagnostics
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCode {
    /// A required element is missing or empty
    Required,
    /// A value does not have the expected format
    Value,
    /// Values are individually valid but inconsistent
    Invariant,
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Required => "required",
            Self::Value => "value",
            Self::Invariant => "invariant",
        };
        write!(f, "{}", s)
    }
}

fn child(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

fn validate_concept_field(
    concept: Option<&PiqiCodeableConcept>,
    path: &str,
    field: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(concept) = concept {
        concept.validate_into(&child(path, field), issues);
    }
}

/// Plain decimal notation: optional minus, digits, optional fraction
fn is_plain_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int_part) && frac_part.map_or(true, all_digits)
}

/// Leading `YYYY-MM-DD` of a date or dateTime string
fn leading_date(value: &str) -> Option<NaiveDate> {
    let prefix = value.get(..10)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

impl Validate for PiqiCoding {
    fn validate_into(&self, path: &str, issues: &mut Vec<ValidationIssue>) {
        if !self.code.is_valued() && !self.display.is_valued() {
            issues.push(ValidationIssue::warning(
                IssueCode::Required,
                path,
                "coding has neither a code nor a display",
            ));
        }
    }
}

impl Validate for PiqiCodeableConcept {
    fn validate_into(&self, path: &str, issues: &mut Vec<ValidationIssue>) {
        if !self.text.is_valued() && self.codings.is_empty() {
            issues.push(ValidationIssue::warning(
                IssueCode::Required,
                path,
                "concept has neither text nor codings",
            ));
        }
        for (i, coding) in self.codings.iter().enumerate() {
            coding.validate_into(&format!("{}[{i}]", child(path, "codings")), issues);
        }
    }
}

impl Validate for PiqiDemographics {
    fn validate_into(&self, path: &str, issues: &mut Vec<ValidationIssue>) {
        let birth_date = self.birth_date.as_ref().and_then(SimpleAttribute::value);
        let birth = match birth_date {
            Some(value) => match NaiveDate::parse_from_str(value, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    issues.push(ValidationIssue::error(
                        IssueCode::Value,
                        child(path, "birthDate"),
                        format!("'{value}' is not a yyyy-MM-dd date"),
                    ));
                    None
                }
            },
            None => None,
        };

        let death_date = self.death_date.as_ref().and_then(SimpleAttribute::value);
        if let Some(value) = death_date {
            match leading_date(value) {
                Some(death) => {
                    if birth.is_some_and(|birth| death < birth) {
                        issues.push(ValidationIssue::error(
                            IssueCode::Invariant,
                            child(path, "deathDate"),
                            format!("death date {value} is before the birth date"),
                        ));
                    }
                }
                None => issues.push(ValidationIssue::warning(
                    IssueCode::Value,
                    child(path, "deathDate"),
                    format!("'{value}' does not start with a yyyy-MM-dd date"),
                )),
            }
        }

        validate_concept_field(self.birth_sex.as_ref(), path, "birthSex", issues);
        validate_concept_field(self.deceased.as_ref(), path, "deceased", issues);
        validate_concept_field(self.ethnicity.as_ref(), path, "ethnicity", issues);
        validate_concept_field(self.gender_identity.as_ref(), path, "genderIdentity", issues);
        validate_concept_field(self.marital_status.as_ref(), path, "maritalStatus", issues);
        validate_concept_field(self.primary_language.as_ref(), path, "primaryLanguage", issues);
        validate_concept_field(self.race.as_ref(), path, "race", issues);
    }
}

impl Validate for PiqiLabResult {
    fn validate_into(&self, path: &str, issues: &mut Vec<ValidationIssue>) {
        match &self.test {
            Some(test) => test.validate_into(&child(path, "test"), issues),
            None => issues.push(ValidationIssue::error(
                IssueCode::Required,
                child(path, "test"),
                "lab result has no test",
            )),
        }

        if let Some(number) = self
            .result_value
            .as_ref()
            .and_then(|v| v.number.as_ref())
            .and_then(SimpleAttribute::value)
        {
            if !is_plain_decimal(number) {
                issues.push(ValidationIssue::error(
                    IssueCode::Value,
                    child(path, "resultValue.number"),
                    format!("'{number}' is not a decimal number"),
                ));
            }
        }
        if let Some(concept) = self
            .result_value
            .as_ref()
            .and_then(|v| v.codeable_concept.as_ref())
        {
            concept.validate_into(&child(path, "resultValue.codeableConcept"), issues);
        }

        if let Some(value) = self
            .performed_date_time
            .as_ref()
            .and_then(SimpleAttribute::value)
        {
            if NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).is_err() {
                issues.push(ValidationIssue::error(
                    IssueCode::Value,
                    child(path, "performedDateTime"),
                    format!("'{value}' is not a yyyyMMddHHmmss timestamp"),
                ));
            }
        }

        validate_concept_field(self.result_unit.as_ref(), path, "resultUnit", issues);
        validate_concept_field(self.interpretation.as_ref(), path, "interpretation", issues);
        validate_concept_field(self.specimen_type.as_ref(), path, "specimenType", issues);
        validate_concept_field(self.result_status.as_ref(), path, "resultStatus", issues);
        validate_concept_field(self.performed_site.as_ref(), path, "performedSite", issues);
        validate_concept_field(self.order.as_ref(), path, "order", issues);
    }
}

impl Validate for PiqiPatient {
    fn validate_into(&self, path: &str, issues: &mut Vec<ValidationIssue>) {
        if let Some(demographics) = &self.demographics {
            demographics.validate_into(&child(path, "demographics"), issues);
        }
        for (i, lab_result) in self.lab_results.iter().enumerate() {
            lab_result.validate_into(&format!("{}[{i}]", child(path, "labResults")), issues);
        }
    }
}
