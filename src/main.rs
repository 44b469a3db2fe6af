//! `poddiff` application entry point.
//!
//! This binary decides whether Podman resources match a declared state, using
//! saved inspection documents. It uses `eyre` for opaque error handling at the
//! application boundary, converting domain-specific errors into human-readable
//! reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/poddiff/config.toml` or path from `PODDIFF_CONFIG_PATH`)
//! 3. Environment variables (`PODDIFF_*`)
//! 4. Command-line arguments

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use poddiff::config::{AppConfig, Cli, CommandArgs, Commands, ParamsArgs, PlanArgs, load_config};
use poddiff::diff::{Idempotency, ParamSpec, build_create_command};
use poddiff::error::{ConfigError, Result as PoddiffResult};
use poddiff::reconcile::{Plan, Reconciler, StaticInspection};
use poddiff::state::{DesiredState, load_json_document};
use poddiff::version::EngineVersion;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Installs logging, loads configuration with layered precedence, then
/// dispatches to the subcommand handler.
fn main() -> EyreResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("poddiff=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).map_err(Report::from)
}

/// Execute the CLI command, returning domain-specific errors.
fn run(cli: &Cli, config: &AppConfig) -> PoddiffResult<()> {
    match &cli.command {
        Commands::Plan(args) => plan(config, args),
        Commands::Command(args) => command(config, args),
        Commands::Params(args) => {
            list_params(args);
            Ok(())
        }
    }
}

/// The configured engine version, which every subcommand but `params` needs.
fn configured_version(config: &AppConfig) -> PoddiffResult<String> {
    config.engine_version.clone().ok_or_else(|| {
        ConfigError::MissingRequired {
            field: String::from("engine_version"),
        }
        .into()
    })
}

fn load_desired(path: &camino::Utf8Path) -> PoddiffResult<DesiredState> {
    let document = load_json_document(path)?;
    Ok(DesiredState::from_json(&document)?)
}

/// Plan one resource against saved inspection documents.
fn plan(config: &AppConfig, args: &PlanArgs) -> PoddiffResult<()> {
    let desired = load_desired(&args.desired)?;
    let mut source = StaticInspection::new(configured_version(config)?);
    if let Some(ref path) = args.inspect {
        source = source.with_resource(load_json_document(path)?);
    }
    if let Some(ref path) = args.image {
        source = source.with_image(load_json_document(path)?);
    }
    if let Some(ref path) = args.infra {
        source = source.with_infra(load_json_document(path)?);
    }

    let outcome = Reconciler::new(&source)
        .with_mode(config.diff_mode())
        .with_options(config.compare_options())
        .plan(args.kind, &desired)?;
    print_plan(&outcome);
    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_plan(outcome: &Plan) {
    println!("action: {}", outcome.action);
    if outcome.diff.is_different() {
        let rendered = outcome.diff.render();
        print!("--- before\n{}", rendered.before);
        print!("+++ after\n{}", rendered.after);
    }
    if let Some(ref argv) = outcome.command {
        println!("command: podman {}", argv.join(" "));
    }
}

/// Print the create command for a desired state.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn command(config: &AppConfig, args: &CommandArgs) -> PoddiffResult<()> {
    let desired = load_desired(&args.desired)?;
    let version = EngineVersion::from_version_output(&configured_version(config)?)?;
    let argv = build_create_command(&args.kind.catalog(), &desired, &version)?;
    println!("podman {}", argv.join(" "));
    Ok(())
}

const fn idempotency_label(spec: &ParamSpec) -> &'static str {
    match spec.idempotency() {
        Idempotency::Compared => "compared",
        Idempotency::Excluded => "excluded",
        Idempotency::NonIdempotent => "not verifiable",
    }
}

/// List the parameters of a kind's catalog.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn list_params(args: &ParamsArgs) {
    for spec in args.kind.catalog().specs() {
        let gate = spec.version_gate().to_string();
        println!(
            "{:<24} {:<28} {:<16} {}",
            spec.name(),
            spec.flag_name().unwrap_or("-"),
            gate,
            idempotency_label(spec)
        );
    }
}
