//! PIQI leaf values: simple attributes, codings and codeable concepts

use serde::{Deserialize, Serialize};

/// A single PIQI value
///
/// The attribute may exist without a value; assessments distinguish an
/// element that was mapped but empty from one that was never mapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAttribute {
    pub value: Option<String>,
}

impl SimpleAttribute {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn empty() -> Self {
        Self { value: None }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// True when a non-blank value is present
    pub fn is_valued(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}

impl From<Option<String>> for SimpleAttribute {
    fn from(value: Option<String>) -> Self {
        Self { value }
    }
}

impl From<Option<&str>> for SimpleAttribute {
    fn from(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
        }
    }
}

impl From<&str> for SimpleAttribute {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiqiCoding {
    pub code: SimpleAttribute,
    pub display: SimpleAttribute,
    pub system: SimpleAttribute,
}

impl PiqiCoding {
    pub fn new(
        code: impl Into<SimpleAttribute>,
        display: impl Into<SimpleAttribute>,
        system: impl Into<SimpleAttribute>,
    ) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
            system: system.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiqiCodeableConcept {
    pub text: SimpleAttribute,
    #[serde(default)]
    pub codings: Vec<PiqiCoding>,
}

impl PiqiCodeableConcept {
    pub fn with_text(text: impl Into<SimpleAttribute>) -> Self {
        Self {
            text: text.into(),
            codings: Vec::new(),
        }
    }

    pub fn push_coding(&mut self, coding: PiqiCoding) {
        self.codings.push(coding);
    }

    pub fn first_coding(&self) -> Option<&PiqiCoding> {
        self.codings.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_attribute_serializes_null_value() {
        let concept = PiqiCodeableConcept::with_text(SimpleAttribute::empty());
        assert_eq!(
            serde_json::to_value(&concept).unwrap(),
            json!({"text": {"value": null}, "codings": []})
        );
    }

    #[test]
    fn test_coding_from_options() {
        let coding = PiqiCoding::new("M", None::<&str>, "http://example.org");
        assert_eq!(coding.code.value(), Some("M"));
        assert_eq!(coding.display.value(), None);
        assert!(coding.system.is_valued());
    }

    #[test]
    fn test_blank_attribute_is_not_valued() {
        assert!(!SimpleAttribute::new("  ").is_valued());
        assert!(!SimpleAttribute::empty().is_valued());
        assert!(SimpleAttribute::new("x").is_valued());
    }
}
