//! Command-line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use piqi_map::{FhirVersion, MappingTarget};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "piqi-map",
    version,
    about = "Map FHIR bundles into the PIQI data model"
)]
pub struct Cli {
    /// Configuration file (TOML); `piqi-map.toml` is used when present
    #[arg(long, global = true, env = "PIQI_MAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Map a bundle and write the PIQI patient as JSON
    Map(MapArgs),
    /// Map a bundle and report validation issues of the result
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Bundle file; stdin when omitted or `-`
    pub input: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,

    /// Validate the mapped patient and log the issues found
    #[arg(long)]
    pub validate: bool,

    /// FHIR release of the input (e.g. R4, 4.0.1)
    #[arg(long)]
    pub fhir_version: Option<FhirVersion>,

    /// Map a single part of the patient
    #[arg(long, value_enum)]
    pub only: Option<Only>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Bundle file; stdin when omitted or `-`
    pub input: Option<PathBuf>,

    /// FHIR release of the input (e.g. R4, 4.0.1)
    #[arg(long)]
    pub fhir_version: Option<FhirVersion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Only {
    Demographics,
    LabResults,
}

impl From<Only> for MappingTarget {
    fn from(only: Only) -> Self {
        match only {
            Only::Demographics => MappingTarget::Demographics,
            Only::LabResults => MappingTarget::LabResults,
        }
    }
}
