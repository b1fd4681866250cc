//! opdev - ephemeral dev clusters for the opflow operator.
//!
//! `opdev` (or `opdev up`) provisions a disposable kind cluster, builds the
//! operator, reloader, and webhook images from the working tree, loads them
//! into the cluster, and applies the released bundle with its image tags
//! rewritten to the freshly built tag. `opdev teardown` deletes the cluster
//! and does nothing else.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use opdev_core::config::DEFAULT_CONTEXT;
use opdev_core::{ClusterContext, Verbosity};
use opdev_pipeline::{probe, resolver, Pipeline, RunOptions, RunOutcome};
use opdev_tools::{DockerBuilder, GitRevision, KindProvisioner, KubectlClient};

/// Ephemeral dev clusters for the opflow operator
#[derive(Parser)]
#[command(name = "opdev")]
#[command(about = "Build, load and deploy the opflow operator into a disposable kind cluster", long_about = None)]
struct Cli {
    /// Working tree root (defaults to the operator source directory)
    #[arg(short = 'w', long, overrides_with = "workdir")]
    workdir: Option<PathBuf>,

    /// Cluster context name
    #[arg(short = 'c', long, global = true, default_value = DEFAULT_CONTEXT, overrides_with = "context")]
    context: String,

    /// Multi-node cluster topology config passed to the provisioner
    #[arg(long, overrides_with = "cluster_config")]
    cluster_config: Option<PathBuf>,

    /// Deploy even if an opflow instance is already running
    #[arg(long)]
    skip_conflict_check: bool,

    /// Logging verbosity
    #[arg(short = 'v', long, value_enum, default_value = "default", overrides_with = "verbosity")]
    verbosity: VerbosityArg,

    /// Output format for the run summary
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full deployment pipeline (the default)
    Up,

    /// Delete the cluster and exit
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VerbosityArg {
    /// Warnings and the outcome line only
    Default,
    /// Stage-by-stage progress
    Info,
}

impl From<VerbosityArg> for Verbosity {
    fn from(arg: VerbosityArg) -> Self {
        match arg {
            VerbosityArg::Default => Verbosity::Default,
            VerbosityArg::Info => Verbosity::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One human-readable summary line
    Text,
    /// One JSON summary line
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let output = cli.output;
    let outcome = match cli.command {
        Some(Commands::Teardown) => tear_down(&cli.context).await,
        Some(Commands::Up) | None => run_up(cli).await,
    };

    report(&outcome, output);
    std::process::exit(outcome.exit_code());
}

/// Initialize tracing on stderr; RUST_LOG overrides the verbosity flag.
fn init_tracing(verbosity: VerbosityArg) {
    let default_directive = match verbosity {
        VerbosityArg::Default => "warn",
        VerbosityArg::Info => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The full pipeline: probe, resolve, then the staged deployment run.
async fn run_up(cli: Cli) -> RunOutcome {
    if let Err(error) = probe::check_dependencies().await {
        return RunOutcome::from_error(error);
    }

    let options = RunOptions {
        workdir: cli.workdir,
        context: cli.context,
        topology_config: cli.cluster_config,
        verbosity: cli.verbosity.into(),
        skip_conflict_check: cli.skip_conflict_check,
    };

    let revision = GitRevision::default();
    let config = match resolver::resolve(options, &revision).await {
        Ok(config) => config,
        Err(error) => return RunOutcome::from_error(error),
    };

    info!(cluster = %config.context, tag = %config.tag, "Starting deployment run");

    let pipeline = Pipeline::new(
        config,
        Arc::new(DockerBuilder::default()),
        Arc::new(KindProvisioner::default()),
        Arc::new(KubectlClient::default()),
    );
    pipeline.run().await
}

/// The teardown path bypasses resolution beyond the context name.
async fn tear_down(context: &str) -> RunOutcome {
    let provisioner = KindProvisioner::default();
    opdev_pipeline::tear_down(&provisioner, &ClusterContext::new(context)).await
}

/// Print the run summary to stdout.
fn report(outcome: &RunOutcome, output: OutputFormat) {
    match output {
        OutputFormat::Text => println!("{}", outcome.summary()),
        OutputFormat::Json => {
            let line = serde_json::json!({
                "outcome": outcome_name(outcome),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "summary": outcome.summary(),
                "exit_code": outcome.exit_code(),
            });
            println!("{}", line);
        }
    }
}

fn outcome_name(outcome: &RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Deployed { .. } => "deployed",
        RunOutcome::AbortedConflict { .. } => "aborted_conflict",
        RunOutcome::Failed { .. } => "failed",
        RunOutcome::TornDown { .. } => "torn_down",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_invocation_parses() {
        let cli = Cli::try_parse_from(["opdev"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.context, DEFAULT_CONTEXT);
        assert_eq!(cli.verbosity, VerbosityArg::Default);
        assert!(!cli.skip_conflict_check);
    }

    #[test]
    fn test_teardown_subcommand_parses() {
        let cli = Cli::try_parse_from(["opdev", "teardown", "--context", "scratch"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Teardown)));
        assert_eq!(cli.context, "scratch");
    }

    #[test]
    fn test_last_flag_wins() {
        let cli =
            Cli::try_parse_from(["opdev", "--context", "first", "--context", "second"]).unwrap();
        assert_eq!(cli.context, "second");
    }

    #[test]
    fn test_missing_value_is_rejected() {
        assert!(Cli::try_parse_from(["opdev", "--context"]).is_err());
    }

    #[test]
    fn test_flag_like_value_is_rejected() {
        assert!(Cli::try_parse_from(["opdev", "--context", "--skip-conflict-check"]).is_err());
    }

    #[test]
    fn test_verbosity_values() {
        let cli = Cli::try_parse_from(["opdev", "--verbosity", "info"]).unwrap();
        assert_eq!(cli.verbosity, VerbosityArg::Info);
        assert!(Cli::try_parse_from(["opdev", "--verbosity", "loud"]).is_err());
    }
}
