//! Definiciones de línea de comandos.
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use proc_core::ReleaseManifest;

#[derive(Parser, Debug)]
#[command(name = "procflow")]
#[command(about = "Process-definition repository", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Admit a bundle of process resources as a deployment
    Deploy(DeployArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Deployment name
    #[arg(long)]
    pub name: String,

    /// Tenant the deployment belongs to
    #[arg(long)]
    pub tenant: Option<String>,

    /// Directory whose files form the bundle
    #[arg(long, conflicts_with = "file")]
    pub dir: Option<PathBuf>,

    /// Individual resource files
    #[arg(long, num_args = 1..)]
    pub file: Vec<PathBuf>,

    /// Return the latest matching deployment instead of deploying a duplicate
    #[arg(long)]
    pub duplicate_filter: bool,

    /// Caller-authoritative deployment version
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..))]
    pub enforced_version: Option<i32>,

    /// Release manifest as NAME:VERSION
    #[arg(long, value_parser = parse_manifest)]
    pub manifest: Option<ReleaseManifest>,

    /// Keep definitions suspended until this RFC 3339 instant
    #[arg(long, value_parser = parse_instant)]
    pub activate_at: Option<DateTime<Utc>>,

    /// Skip BPMN 2.0 schema validation
    #[arg(long)]
    pub no_schema_validation: bool,

    /// Skip process validation
    #[arg(long)]
    pub no_process_validation: bool,
}

pub fn parse_manifest(raw: &str) -> Result<ReleaseManifest, String> {
    match raw.split_once(':') {
        Some((name, version)) if !name.trim().is_empty() && !version.trim().is_empty() => {
            Ok(ReleaseManifest::new(name.trim(), version.trim()))
        }
        _ => Err(format!("expected NAME:VERSION, got '{raw}'")),
    }
}

pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc))
                                     .map_err(|e| format!("invalid RFC 3339 timestamp '{raw}': {e}"))
}
