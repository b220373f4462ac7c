//! FHIR release identifiers

use crate::error::MapError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FhirVersion {
    Dstu2,
    Dstu3,
    R4,
    R4B,
    R5,
}

impl FhirVersion {
    /// Published version number of the release
    pub fn version_number(&self) -> &'static str {
        match self {
            Self::Dstu2 => "1.0.2",
            Self::Dstu3 => "3.0.2",
            Self::R4 => "4.0.1",
            Self::R4B => "4.3.0",
            Self::R5 => "5.0.0",
        }
    }
}

impl fmt::Display for FhirVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Dstu2 => "DSTU2",
            Self::Dstu3 => "DSTU3",
            Self::R4 => "R4",
            Self::R4B => "R4B",
            Self::R5 => "R5",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for FhirVersion {
    type Err = MapError;

    /// Accepts release names (`R4`, `stu3`) and version numbers (`4.0.1`, `4.0`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let version = match normalized.as_str() {
            "DSTU2" | "1.0" | "1.0.2" => Self::Dstu2,
            "DSTU3" | "STU3" | "3.0" | "3.0.1" | "3.0.2" => Self::Dstu3,
            "R4" | "4.0" | "4.0.0" | "4.0.1" => Self::R4,
            "R4B" | "4.3" | "4.3.0" => Self::R4B,
            "R5" | "5.0" | "5.0.0" => Self::R5,
            _ => return Err(MapError::UnsupportedVersion(s.to_string())),
        };
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_numbers() {
        assert_eq!("R4".parse::<FhirVersion>().unwrap(), FhirVersion::R4);
        assert_eq!(" r4b ".parse::<FhirVersion>().unwrap(), FhirVersion::R4B);
        assert_eq!("4.0.1".parse::<FhirVersion>().unwrap(), FhirVersion::R4);
        assert_eq!("stu3".parse::<FhirVersion>().unwrap(), FhirVersion::Dstu3);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "R6".parse::<FhirVersion>().unwrap_err();
        assert!(matches!(err, MapError::UnsupportedVersion(v) if v == "R6"));
    }

    #[test]
    fn test_display_round_trips() {
        for version in [
            FhirVersion::Dstu2,
            FhirVersion::Dstu3,
            FhirVersion::R4,
            FhirVersion::R4B,
            FhirVersion::R5,
        ] {
            assert_eq!(version.to_string().parse::<FhirVersion>().unwrap(), version);
        }
        assert_eq!(FhirVersion::R4.version_number(), "4.0.1");
    }
}
