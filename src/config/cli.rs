//! Command-line argument definitions for poddiff.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use crate::resources::ResourceKind;

/// Command-line interface for poddiff.
#[derive(Debug, Parser)]
#[command(name = "poddiff")]
#[command(
    author,
    version,
    about = "Decide whether Podman resources match their declared state"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Podman version to compare against.
    #[arg(long, global = true)]
    pub engine_version: Option<String>,

    /// Report every difference instead of stopping at the first one.
    #[arg(long, global = true)]
    pub full: bool,

    /// Compare container images by ID.
    #[arg(long, global = true)]
    pub image_strict: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decide whether a resource must be created, recreated or left alone.
    Plan(PlanArgs),

    /// Print the create command for a desired state.
    Command(CommandArgs),

    /// List the parameters a resource kind understands.
    Params(ParamsArgs),
}

/// Arguments for the `plan` subcommand.
#[derive(Debug, Parser)]
pub struct PlanArgs {
    /// Resource kind.
    #[arg(long, value_enum)]
    pub kind: ResourceKind,

    /// JSON file holding the desired parameters.
    #[arg(long)]
    pub desired: Utf8PathBuf,

    /// Saved `podman <kind> inspect` output. Without it the resource is
    /// treated as missing.
    #[arg(long)]
    pub inspect: Option<Utf8PathBuf>,

    /// Saved `podman image inspect` output for the container image.
    #[arg(long)]
    pub image: Option<Utf8PathBuf>,

    /// Saved `podman container inspect` output for the pod infra container.
    #[arg(long)]
    pub infra: Option<Utf8PathBuf>,
}

/// Arguments for the `command` subcommand.
#[derive(Debug, Parser)]
pub struct CommandArgs {
    /// Resource kind.
    #[arg(long, value_enum)]
    pub kind: ResourceKind,

    /// JSON file holding the desired parameters.
    #[arg(long)]
    pub desired: Utf8PathBuf,
}

/// Arguments for the `params` subcommand.
#[derive(Debug, Parser)]
pub struct ParamsArgs {
    /// Resource kind.
    #[arg(long, value_enum)]
    pub kind: ResourceKind,
}
