mod checks;
mod commands;
mod core;
mod engine;
mod logging;
mod naming;
mod ui;

use clap::{Parser, Subcommand};
use crate::core::error::{ShiftError, print_error};
use std::path::PathBuf;

/// Generate environment-specific configuration files from a base file plus
/// per-configuration transforms
#[derive(Parser)]
#[command(name = "cfgshift")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Setup & Inspection
  // ============================================================================
  /// Initialize cfgshift configuration for a project
  Init {
    /// Overwrite an existing cfgshift.toml
    #[arg(long)]
    force: bool,
  },

  /// Run health checks and diagnostics
  Doctor {
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show transform coverage for configured entries
  Status {
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },

  /// List the transform files of a base document
  Resolve {
    /// Base file to resolve transforms for
    file: PathBuf,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Transformation
  // ============================================================================
  /// Generate skeleton transform files for a base document
  Create {
    /// Base file to create transforms for
    source: PathBuf,
    /// Configuration to create a transform for (repeatable; default: all configured)
    #[arg(short, long = "configuration")]
    configurations: Vec<String>,
    /// Overwrite existing transform files
    #[arg(long)]
    overwrite: bool,
  },

  /// Apply transformations
  Apply {
    /// Name of the transform entry to apply (default: all entries)
    entry: Option<String>,
    /// Apply this configuration
    #[arg(short, long)]
    configuration: Option<String>,
    /// Apply every configured configuration
    #[arg(long)]
    all: bool,
    /// Explicit source file (one-shot mode, requires --transform and --destination)
    #[arg(long)]
    source: Option<PathBuf>,
    /// Explicit transform file (one-shot mode)
    #[arg(long)]
    transform: Option<PathBuf>,
    /// Explicit destination file (one-shot mode)
    #[arg(long)]
    destination: Option<PathBuf>,
    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
    /// Show low-importance engine messages
    #[arg(short, long)]
    verbose: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let project_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(err) => {
      eprintln!("Error: Failed to get current directory: {}", err);
      std::process::exit(1);
    }
  };

  // Build the project context once (locates and validates cfgshift.toml).
  // init and doctor must be able to run against a broken or missing config,
  // so they fall back to a config-less context instead of dying here.
  let ctx = match crate::core::context::ProjectContext::build(&project_root) {
    Ok(ctx) => ctx,
    Err(err) => {
      if matches!(cli.command, Commands::Init { .. } | Commands::Doctor { .. }) {
        crate::core::context::ProjectContext {
          root: project_root.clone(),
          config: None,
        }
      } else {
        handle_error(err);
      }
    }
  };

  let result = match cli.command {
    Commands::Init { force } => commands::run_init(&project_root, force),
    Commands::Doctor { json } => commands::run_doctor(&ctx, json),
    Commands::Status { json } => commands::run_status(&ctx, json),
    Commands::Resolve { file, json } => commands::run_resolve(&ctx, &file, json),
    Commands::Create {
      source,
      configurations,
      overwrite,
    } => commands::run_create(&ctx, &source, configurations, overwrite),
    Commands::Apply {
      entry,
      configuration,
      all,
      source,
      transform,
      destination,
      report,
      verbose,
    } => match (source, transform, destination) {
      (None, None, None) => commands::run_apply(&ctx, entry, configuration, all, report, verbose),
      (Some(source), Some(transform), Some(destination)) => {
        commands::run_apply_explicit(&source, &transform, &destination, verbose)
      }
      _ => Err(ShiftError::with_help(
        "one-shot mode needs all of --source, --transform and --destination",
        "Or drop all three to apply configured entries",
      )),
    },
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShiftError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
