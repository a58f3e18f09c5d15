//! Main CLI application structure

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{check, logging, resolve};
use crate::domain::{ResolutionError, ResolverOptions};
use crate::storage::{Config, ConfigError};

/// Exit status for configuration, loading and I/O errors
pub const EXIT_FAILURE: u8 = 1;

/// Exit status for cycles, unknown references and other graph-shape errors
pub const EXIT_STRUCTURAL: u8 = 2;

#[derive(Parser)]
#[command(name = "leveler")]
#[command(author, version, about = "Group dependent tasks into parallel execution levels")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project config file (defaults to the nearest leveler.toml)
    #[arg(long, global = true, env = "LEVELER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print tasks grouped into execution levels
    Resolve {
        #[command(flatten)]
        resolver: ResolverArgs,

        /// Print each task as it is placed
        #[arg(long)]
        trace: bool,
    },

    /// Validate a task file without printing the order
    Check {
        #[command(flatten)]
        resolver: ResolverArgs,
    },
}

/// Input and resolver flags shared by all commands
#[derive(Args, Debug, Default)]
pub struct ResolverArgs {
    /// Task file, or `-` for stdin (defaults to the configured input)
    pub file: Option<PathBuf>,

    /// Fail if any task lands at or past this level
    #[arg(long)]
    pub max_levels: Option<usize>,

    /// Do not reject undeclared dependencies up front; they surface as cycles
    #[arg(long)]
    pub lenient: bool,
}

impl ResolverArgs {
    /// Layers the flags over the configured resolver settings
    fn options(&self, config: &Config) -> Result<ResolverOptions> {
        let mut options = config.project.resolver.to_options();

        if let Some(max_levels) = self.max_levels {
            if max_levels == 0 {
                return Err(
                    ConfigError::Invalid("--max-levels must be at least 1".to_string()).into(),
                );
            }
            options.max_levels = Some(max_levels);
        }
        if self.lenient {
            options.check_references = false;
        }

        Ok(options)
    }

    fn input(&self, config: &Config) -> PathBuf {
        self.file.clone().unwrap_or_else(|| config.input_path())
    }
}

/// Main entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };

    let format = cli.format.unwrap_or_else(|| match &config {
        Ok(config) => config.global.default_format.into(),
        Err(_) => OutputFormat::default(),
    });
    let output = Output::new(format);

    let result = config.and_then(|config| execute(cli.command, &config, &output));

    match result {
        Ok(()) => {
            tracing::debug!("command completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&output, &e);
            ExitCode::from(exit_status(&e))
        }
    }
}

fn execute(command: Commands, config: &Config, output: &Output) -> Result<()> {
    if let Some(root) = &config.project_root {
        tracing::debug!(root = %root.display(), "using project config");
    }

    match command {
        Commands::Resolve { resolver, trace } => {
            let input = resolver.input(config);
            resolve::run(output, &input, resolver.options(config)?, trace)
        }
        Commands::Check { resolver } => {
            let input = resolver.input(config);
            check::run(output, &input, resolver.options(config)?)
        }
    }
}

/// Prints an error, with cycle details for structural failures
fn report(output: &Output, error: &anyhow::Error) {
    let structural = error.downcast_ref::<ResolutionError>();
    let details = structural.and_then(|e| serde_json::to_value(e).ok());

    output.error(&format!("{:#}", error), details);

    if let Some(ResolutionError::CyclicDependency { cycles, .. }) = structural {
        for cycle in cycles {
            output.note(&describe_cycle(cycle));
        }
    }
}

/// One diagnostic line per cycle. Members are a set in input order, not a path.
fn describe_cycle(cycle: &[String]) -> String {
    format!("  tasks in cycle: {}", cycle.join(", "))
}

/// Maps an error to the process exit status
pub fn exit_status(error: &anyhow::Error) -> u8 {
    if error.downcast_ref::<ResolutionError>().is_some() {
        EXIT_STRUCTURAL
    } else {
        EXIT_FAILURE
    }
}
