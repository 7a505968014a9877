//! fitpc command line front end
//!
//! Usage:
//!   fitpc check --parent <PART> --candidates <PARTS> [--catalog]
//!   fitpc compose <BUILD>
//!   fitpc snapshot <BUILD>
//!
//! Parts are catalog product JSON (one object for `--parent`, an array for
//! `--candidates`); builds are saved-build JSON. Results go to stdout as JSON.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use fitpc_core::{
    AnchorType, CatalogError, CompatibleType, ConfigError, Part, PlacementConfig, SavedBuild,
    WorldTransform, catalog_matches, compose, resolve, selection_from_parts,
};

#[derive(Parser)]
#[command(name = "fitpc")]
#[command(about = "Check part compatibility and compose PC builds from anchor data")]
struct Cli {
    /// Placement config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check candidate parts against an already selected parent part
    Check {
        /// Parent product JSON
        #[arg(short, long)]
        parent: PathBuf,
        /// Candidate products (JSON array)
        #[arg(short = 'n', long)]
        candidates: PathBuf,
        /// List only admissible candidates instead of a verdict per candidate
        #[arg(long)]
        catalog: bool,
    },
    /// Print the world transform of every part in a saved build
    Compose {
        /// Saved build JSON
        build: PathBuf,
    },
    /// Normalize a saved build's quantities and total price
    Snapshot {
        /// Saved build JSON
        build: PathBuf,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Catalog listing as printed by `check --catalog`.
#[derive(Serialize)]
struct MatchesOutput<'a> {
    parts: Vec<u64>,
    anchor_compatibility: &'a BTreeMap<AnchorType, BTreeSet<CompatibleType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(path: Option<&Path>) -> Result<PlacementConfig, CliError> {
    match path {
        Some(path) => Ok(PlacementConfig::load(path)?),
        None => Ok(PlacementConfig::default()),
    }
}

fn check(parent: &Path, candidates: &Path, catalog: bool) -> Result<String, CliError> {
    let parent = Part::from_json(&read(parent)?)?;
    let candidates = Part::list_from_json(&read(candidates)?)?;

    if catalog {
        let matches = catalog_matches(&parent, &candidates);
        let output = MatchesOutput {
            parts: matches.parts.iter().map(|p| p.id).collect(),
            anchor_compatibility: &matches.anchor_compatibility,
            message: matches.message,
        };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    let verdicts = resolve(&parent, &candidates);
    let flagged = verdicts.iter().filter(|v| !v.verdict.compatible).count();
    log::info!("{} of {} candidates flagged", flagged, verdicts.len());
    Ok(serde_json::to_string_pretty(&verdicts)?)
}

fn compose_build(build: &Path, config: &PlacementConfig) -> Result<String, CliError> {
    let saved = SavedBuild::from_json(&read(build)?)?;
    let parts = saved.parts()?;
    let selection = selection_from_parts(&parts);

    let placements: BTreeMap<String, WorldTransform> = compose(&selection, config)
        .into_iter()
        .map(|(key, transform)| (key.to_string(), transform))
        .collect();
    Ok(serde_json::to_string_pretty(&placements)?)
}

fn snapshot(build: &Path) -> Result<String, CliError> {
    let mut saved = SavedBuild::from_json(&read(build)?)?;
    saved.normalize();
    Ok(saved.to_json()?)
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Command::Check {
            parent,
            candidates,
            catalog,
        } => check(parent, candidates, *catalog),
        Command::Compose { build } => compose_build(build, &config),
        Command::Snapshot { build } => snapshot(build),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BUILD: &str = r#"{
        "name": "Test Build",
        "components": [
            {"id": 1, "name": "Case", "category": "case", "price": 100,
             "anchor_points": [{"name": "psu_bay", "label": "PSU Bay", "position": {"x": 0, "y": -10, "z": 0}}]},
            {"id": 2, "name": "PSU", "category": "psu", "price": 80},
            {"id": 3, "name": "RAM", "category": "ram", "price": 40, "quantity": 2}
        ]
    }"#;

    fn temp_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_compose_prints_every_instance() {
        let build = temp_json(BUILD);
        let output = compose_build(build.path(), &PlacementConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["case", "psu", "ram[0]", "ram[1]"]);
        assert_eq!(value["psu"]["position"][1].as_f64(), Some(-1.0));
    }

    #[test]
    fn test_snapshot_totals() {
        let build = temp_json(BUILD);
        let output = snapshot(build.path()).unwrap();
        let saved = SavedBuild::from_json(&output).unwrap();
        assert_eq!(saved.total_price, 260.0);
        assert_eq!(saved.components[0].quantity, 1);
    }

    #[test]
    fn test_check_catalog_without_anchors() {
        let parent = temp_json(r#"{"id": 1, "name": "Case", "category": "case"}"#);
        let candidates = temp_json(r#"[{"id": 2, "name": "Board", "category": "motherboard"}]"#);
        let output = check(parent.path(), candidates.path(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["parts"], serde_json::json!([]));
        assert_eq!(value["message"], "No anchor points defined for this part");
    }

    #[test]
    fn test_check_catalog_with_tokens() {
        let parent = temp_json(
            r#"{"id": 1, "name": "Test Motherboard", "category": "motherboard",
                "technical_specs": {"socket": "LGA1700"},
                "anchor_points": [{"name": "cpu_socket", "label": "CPU Socket",
                                   "compatible_types": ["cpu", "LGA1700"]}]}"#,
        );
        let candidates = temp_json(
            r#"[{"id": 2, "name": "i7", "category": "CPU", "technical_specs": {"socket": "LGA1700"}},
                {"id": 3, "name": "Ryzen", "category": "cpu", "technical_specs": {"socket": "AM5"}}]"#,
        );
        let output = check(parent.path(), candidates.path(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["parts"], serde_json::json!([2]));
        assert_eq!(value["anchor_compatibility"]["cpu_socket"], serde_json::json!(["LGA1700", "cpu"]));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = snapshot(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_cli_parses_global_config() {
        let cli = Cli::try_parse_from(["fitpc", "compose", "build.json", "--config", "fitpc.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("fitpc.json")));
        assert!(matches!(cli.command, Command::Compose { .. }));
    }
}
