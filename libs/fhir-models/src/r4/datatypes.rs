//! FHIR R4 general-purpose datatypes
//!
//! Only the elements read during PIQI mapping are modelled as fields; any
//! other content is retained in the flattened `other` map of each type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A reference to a code defined by a terminology system
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    /// Identity of the terminology system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Version of the system - if relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Symbol in syntax defined by the system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Representation defined by the system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// If this coding was chosen directly by the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_selected: Option<bool>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl Coding {
    pub fn new(
        system: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            display: Some(display.into()),
            ..Default::default()
        }
    }
}

/// Concept - reference to a terminology or just text
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeableConcept {
    /// Code defined by a terminology system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding: Option<Vec<Coding>>,

    /// Plain text representation of the concept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl CodeableConcept {
    pub fn codings(&self) -> &[Coding] {
        self.coding.as_deref().unwrap_or(&[])
    }

    pub fn has_coding(&self) -> bool {
        !self.codings().is_empty()
    }

    /// True when any coding carries exactly `code`
    pub fn has_code(&self, code: &str) -> bool {
        self.codings()
            .iter()
            .any(|coding| coding.code.as_deref() == Some(code))
    }

    pub fn first_coding(&self) -> Option<&Coding> {
        self.codings().first()
    }
}

/// Optional extension element
///
/// Carries either nested extensions (complex extension) or a single
/// `value[x]`. Only the value types used by the US Core demographic
/// extensions are typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    /// Identifies the meaning of the extension
    #[serde(default)]
    pub url: String,

    /// Nested extensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_coding: Option<Coding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl Extension {
    pub fn extensions(&self) -> &[Extension] {
        self.extension.as_deref().unwrap_or(&[])
    }

    pub fn has_extension(&self) -> bool {
        !self.extensions().is_empty()
    }

    /// First nested extension with the given url
    pub fn find_extension(&self, url: &str) -> Option<&Extension> {
        find_extension(self.extensions(), url)
    }

    /// True when one of the typed `value[x]` elements is present and non-empty
    pub fn has_value(&self) -> bool {
        self.value_code.as_deref().is_some_and(|v| !v.is_empty())
            || self.value_string.as_deref().is_some_and(|v| !v.is_empty())
            || self.value_boolean.is_some()
            || self.value_coding.is_some()
            || self.value_codeable_concept.is_some()
    }
}

/// First extension in `extensions` whose url equals `url`
pub fn find_extension<'a>(extensions: &'a [Extension], url: &str) -> Option<&'a Extension> {
    extensions.iter().find(|ext| ext.url == url)
}

/// An identifier intended for computation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

/// A reference from one resource to another
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Literal reference, relative, internal or absolute URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Type the reference refers to (e.g. "Patient")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// Logical reference, when literal reference is not known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,

    /// Text alternative for the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl Reference {
    pub fn to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Default::default()
        }
    }

    /// True when a non-empty literal reference is present
    pub fn has_reference(&self) -> bool {
        self.reference.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// Local id of a contained resource (`#id`)
    pub fn contained_id(&self) -> Option<&str> {
        self.reference.as_deref()?.strip_prefix('#')
    }
}

/// A measured or measurable amount
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    /// Numerical value (with implicit precision)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FhirDecimal>,

    /// < | <= | >= | > - how to understand the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,

    /// Unit representation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// System that defines coded unit form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Coded form of the unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Additional content beyond the mapped elements
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

impl Quantity {
    /// Value as a plain decimal string (no exponent)
    pub fn value_string(&self) -> Option<String> {
        self.value.as_ref().map(FhirDecimal::to_plain_string)
    }
}

/// FHIR `decimal` kept exactly as written
///
/// The JSON number text is retained, so precision (`1.50`) survives and
/// values beyond the range of [`Decimal`] (`1e30`) still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FhirDecimal(Number);

impl FhirDecimal {
    /// The number text as it appeared in the source
    pub fn as_number(&self) -> &Number {
        &self.0
    }

    /// Plain notation, expanding any exponent while keeping the scale
    pub fn to_plain_string(&self) -> String {
        plain_notation(&self.0.to_string())
    }

    /// Exact decimal, `None` when outside the range of [`Decimal`]
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::from_str_exact(&self.to_plain_string()).ok()
    }
}

impl fmt::Display for FhirDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FhirDecimal {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Number::from_str(s).map(Self)
    }
}

impl From<Number> for FhirDecimal {
    fn from(number: Number) -> Self {
        Self(number)
    }
}

/// Rewrite `1.5e2` style numbers without the exponent (`150`)
fn plain_notation(text: &str) -> String {
    let Some(split) = text.find(['e', 'E']) else {
        return text.to_string();
    };
    let (mantissa, exponent) = (&text[..split], &text[split + 1..]);
    let Ok(exponent) = exponent.parse::<i64>() else {
        return text.to_string();
    };

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int_part}{frac_part}");
    let point = int_part.len() as i64 + exponent;

    let plain = if point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else if point as usize >= digits.len() {
        format!("{digits}{}", "0".repeat(point as usize - digits.len()))
    } else {
        let (int_digits, frac_digits) = digits.split_at(point as usize);
        format!("{int_digits}.{frac_digits}")
    };

    let trimmed = match plain.split_once('.') {
        Some((int_digits, frac_digits)) => {
            let int_digits = int_digits.trim_start_matches('0');
            let int_digits = if int_digits.is_empty() { "0" } else { int_digits };
            format!("{int_digits}.{frac_digits}")
        }
        None => {
            let int_digits = plain.trim_start_matches('0');
            if int_digits.is_empty() { "0".to_string() } else { int_digits.to_string() }
        }
    };
    format!("{sign}{trimmed}")
}

/// Set of values bounded by low and high
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Quantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Quantity>,
}

/// Time range defined by start and end date/time
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_codeable_concept_has_code() {
        let concept: CodeableConcept = serde_json::from_value(json!({
            "coding": [
                {"system": "http://terminology.hl7.org/CodeSystem/v2-0074", "code": "LAB"}
            ],
            "text": "Laboratory"
        }))
        .unwrap();

        assert!(concept.has_code("LAB"));
        assert!(!concept.has_code("lab"));
        assert_eq!(concept.text.as_deref(), Some("Laboratory"));
    }

    #[test]
    fn test_coding_without_code_never_matches() {
        let concept: CodeableConcept =
            serde_json::from_value(json!({"coding": [{"display": "No code"}]})).unwrap();
        assert!(!concept.has_code(""));
        assert!(concept.has_coding());
    }

    #[test]
    fn test_nested_extension_lookup() {
        let ext: Extension = serde_json::from_value(json!({
            "url": "http://hl7.org/fhir/us/core/StructureDefinition/us-core-race",
            "extension": [
                {
                    "url": "ombCategory",
                    "valueCoding": {
                        "system": "urn:oid:2.16.840.1.113883.6.238",
                        "code": "2106-3",
                        "display": "White"
                    }
                },
                {"url": "text", "valueString": "White"}
            ]
        }))
        .unwrap();

        assert!(ext.has_extension());
        assert!(!ext.has_value());
        let text = ext.find_extension("text").unwrap();
        assert_eq!(text.value_string.as_deref(), Some("White"));
        assert!(ext.find_extension("detailed").is_none());
    }

    #[test]
    fn test_unmapped_elements_are_retained() {
        let coding: Coding = serde_json::from_value(json!({
            "code": "M",
            "extension": [{"url": "http://example.org/x", "valueString": "y"}]
        }))
        .unwrap();

        assert!(coding.other.contains_key("extension"));
        let back = serde_json::to_value(&coding).unwrap();
        assert_eq!(back["extension"][0]["valueString"], "y");
    }

    #[test]
    fn test_quantity_value_string() {
        let quantity: Quantity = serde_json::from_value(json!({
            "value": 13.7,
            "unit": "g/dL",
            "system": "http://unitsofmeasure.org",
            "code": "g/dL"
        }))
        .unwrap();

        assert_eq!(quantity.value_string().as_deref(), Some("13.7"));
    }

    #[test]
    fn test_quantity_keeps_written_precision() {
        for (text, expected) in [("1.50", "1.50"), ("7.0", "7.0"), ("0.10", "0.10"), ("95", "95")] {
            let quantity: Quantity =
                serde_json::from_str(&format!(r#"{{"value": {text}, "unit": "mg/dL"}}"#)).unwrap();
            assert_eq!(quantity.value_string().as_deref(), Some(expected), "input {text}");
        }
    }

    #[test]
    fn test_quantity_beyond_decimal_range() {
        let quantity: Quantity = serde_json::from_str(r#"{"value": 1e30}"#).unwrap();
        let value = quantity.value.as_ref().unwrap();

        assert_eq!(value.to_plain_string(), format!("1{}", "0".repeat(30)));
        assert!(value.to_decimal().is_none());

        let back: Quantity =
            serde_json::from_str(&serde_json::to_string(&quantity).unwrap()).unwrap();
        assert_eq!(back, quantity);
    }

    #[test]
    fn test_plain_notation() {
        assert_eq!(plain_notation("1.50e1"), "15.0");
        assert_eq!(plain_notation("1.5E+2"), "150");
        assert_eq!(plain_notation("-2.5e-3"), "-0.0025");
        assert_eq!(plain_notation("12.5e-1"), "1.25");
        assert_eq!(plain_notation("0.10"), "0.10");
    }

    #[test]
    fn test_fhir_decimal_to_decimal() {
        let value: FhirDecimal = "4.20".parse().unwrap();
        let decimal = value.to_decimal().unwrap();
        assert_eq!(decimal.scale(), 2);
        assert_eq!(decimal.to_string(), "4.20");
    }

    #[test]
    fn test_reference_helpers() {
        assert_eq!(Reference::to("#spec1").contained_id(), Some("spec1"));
        assert_eq!(Reference::to("Specimen/spec1").contained_id(), None);
        assert!(!Reference::to("").has_reference());
        assert!(!Reference::default().has_reference());
    }
}
