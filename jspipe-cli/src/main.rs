//! jspipe CLI - layered JavaScript optimizer
//!
//! Pipes a source file through Babel, Terser and esbuild (each optional, always
//! in that order) and writes the combined result.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jspipe_core::{InvocationOptions, NodePipeline, ToolOverrides, UsageError};

mod reporter;

use reporter::ConsoleReporter;

/// Stage toggles are on unless given a value other than the literal `true`.
fn parse_toggle(s: &str) -> Result<bool, String> {
    Ok(s == "true")
}

/// Transpile, minify and bundle a JavaScript file in one pass.
#[derive(Parser, Debug)]
#[command(name = "jspipe")]
#[command(author, version)]
#[command(args_override_self = true)]
#[command(about = "Transpile, minify and bundle a JavaScript file in one pass")]
#[command(after_help = "Examples:
  jspipe app.js                       Babel + Terser + esbuild -> app.bundle.min.js
  jspipe app.js --terser false        Skip minification (esbuild does not minify either)
  jspipe app.js --output dist/app.js  Write to an explicit path")]
pub struct Cli {
    /// JavaScript file to optimize (the first positional wins)
    #[arg(value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Output file (default: <input basename without .js>.bundle.min.js)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Transpile with Babel (@babel/preset-env)
    #[arg(long, value_name = "BOOL", action = ArgAction::Set, num_args = 0..=1,
          default_value = "true", default_missing_value = "false", value_parser = parse_toggle)]
    babel: bool,

    /// Minify with Terser (also enables esbuild's own minification)
    #[arg(long, value_name = "BOOL", action = ArgAction::Set, num_args = 0..=1,
          default_value = "true", default_missing_value = "false", value_parser = parse_toggle)]
    terser: bool,

    /// Bundle with esbuild
    #[arg(long, value_name = "BOOL", action = ArgAction::Set, num_args = 0..=1,
          default_value = "true", default_missing_value = "false", value_parser = parse_toggle)]
    esbuild: bool,

    /// Babel executable (default: node_modules/.bin/babel, then PATH)
    #[arg(long, value_name = "PATH")]
    babel_bin: Option<PathBuf>,

    /// Terser executable (default: node_modules/.bin/terser, then PATH)
    #[arg(long, value_name = "PATH")]
    terser_bin: Option<PathBuf>,

    /// esbuild executable (default: node_modules/.bin/esbuild, then PATH)
    #[arg(long, value_name = "PATH")]
    esbuild_bin: Option<PathBuf>,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Build the run options; fails when no input file was named.
    fn invocation_options(&self) -> Result<InvocationOptions, UsageError> {
        let input = self.inputs.first().cloned();
        Ok(InvocationOptions::try_new(input)?
            .with_output(self.output.clone())
            .with_stages(self.babel, self.terser, self.esbuild))
    }

    fn tool_overrides(&self) -> ToolOverrides {
        ToolOverrides {
            babel: self.babel_bin.clone(),
            terser: self.terser_bin.clone(),
            esbuild: self.esbuild_bin.clone(),
        }
    }
}

fn setup_logging(verbose: bool, quiet: bool) -> anyhow::Result<()> {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .try_init()
        .context("failed to install log subscriber")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet)?;

    let options = match cli.invocation_options() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{} {}", "Error:".red().bold(), err);
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::debug!("Invocation options: {:?}", options);

    let pipeline = NodePipeline::for_options(&options, cli.tool_overrides());
    let reporter = ConsoleReporter::new(cli.quiet);

    match pipeline.run(&options, &reporter).await {
        Ok(summary) => {
            reporter.summary(&summary);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            reporter.error(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}
