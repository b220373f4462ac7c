//! piqi-map - FHIR Bundle to PIQI command-line mapper
//!
//! Reads a FHIR Bundle (file or stdin), maps it into a PIQI patient and
//! writes the result as JSON. `validate` reports structural issues of the
//! mapped data instead.

mod cli;
mod config;
mod logging;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, MapArgs, Only, ValidateArgs};
use crate::config::AppConfig;
use piqi_fhir::r4::Bundle;
use piqi_map::{FhirVersion, MappedData, MapperRegistry};
use piqi_model::{PiqiPatient, Validate, ValidationOutcome};
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    // .env may set PIQI_MAP_CONFIG, so it is loaded before parsing arguments
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.log_json {
        config.logging.json = true;
    }
    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Command::Map(args) => run_map(args, &config),
        Command::Validate(args) => run_validate(args, &config),
    }
}

fn run_map(args: MapArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let version = resolve_version(args.fhir_version, config)?;
    let bundle = read_bundle(args.input.as_deref())?;
    let patient = map_bundle(&MapperRegistry::with_r4_defaults(), version, args.only, &bundle)?;

    tracing::info!(
        fhir_version = %version,
        has_demographics = patient.demographics.is_some(),
        lab_results = patient.lab_results.len(),
        "Bundle mapped"
    );

    if args.validate || config.validate {
        log_issues(&patient.validate());
    }

    let json = render(&patient, args.pretty || config.pretty)?;
    write_output(args.output.as_deref(), &json)?;
    Ok(ExitCode::SUCCESS)
}

fn run_validate(args: ValidateArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let version = resolve_version(args.fhir_version, config)?;
    let bundle = read_bundle(args.input.as_deref())?;
    let patient = MapperRegistry::with_r4_defaults()
        .map_patient(version, &bundle)
        .context("Failed to map bundle")?;
    let outcome = patient.validate();

    let mut stdout = io::stdout().lock();
    for issue in &outcome.issues {
        writeln!(stdout, "{issue}")?;
    }
    writeln!(
        stdout,
        "{} error(s), {} warning(s)",
        outcome.error_count(),
        outcome.warning_count()
    )?;

    if outcome.has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn resolve_version(flag: Option<FhirVersion>, config: &AppConfig) -> anyhow::Result<FhirVersion> {
    match flag {
        Some(version) => Ok(version),
        None => config.fhir_version(),
    }
}

/// Read a bundle from `input`, or from stdin for `None` and `-`
fn read_bundle(input: Option<&Path>) -> anyhow::Result<Bundle> {
    match input {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Bundle::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse bundle {}", path.display()))
        }
        _ => Bundle::from_reader(io::stdin().lock()).context("Failed to parse bundle from stdin"),
    }
}

fn map_bundle(
    registry: &MapperRegistry,
    version: FhirVersion,
    only: Option<Only>,
    bundle: &Bundle,
) -> anyhow::Result<PiqiPatient> {
    let Some(only) = only else {
        return registry
            .map_patient(version, bundle)
            .context("Failed to map bundle");
    };

    let mapped = registry
        .map(version, only.into(), bundle)
        .context("Failed to map bundle")?;
    let patient = match mapped {
        MappedData::Demographics(demographics) => PiqiPatient {
            demographics,
            ..Default::default()
        },
        MappedData::LabResults(lab_results) => PiqiPatient {
            lab_results,
            ..Default::default()
        },
    };
    Ok(patient)
}

fn log_issues(outcome: &ValidationOutcome) {
    for issue in &outcome.issues {
        tracing::warn!(
            severity = %issue.severity,
            code = %issue.code,
            location = %issue.location,
            "{}",
            issue.diagnostics
        );
    }
    tracing::info!(
        valid = outcome.valid,
        errors = outcome.error_count(),
        warnings = outcome.warning_count(),
        "Validation finished"
    );
}

fn render(patient: &PiqiPatient, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(patient)
    } else {
        serde_json::to_string(patient)
    };
    json.context("Failed to serialize PIQI patient")
}

fn write_output(output: Option<&Path>, json: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{json}\n"))
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write to stdout")
        }
    }
}
