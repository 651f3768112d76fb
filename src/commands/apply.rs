//! `cfgshift apply` - apply transformations
//!
//! Two forms:
//!
//! - **Explicit**: `--source X --transform Y --destination Z` applies one
//!   transformation with no cfgshift.toml involved.
//! - **Configured**: `cfgshift apply [entry] --configuration Debug` (or
//!   `--all` for every configuration) resolves transform files by the naming
//!   convention and applies every selected entry, in parallel. Entries whose
//!   transform file is absent are skipped with a warning; a skipped entry is
//!   not a failure.
//!
//! `--report <path>` writes a timestamped JSON run report.

use crate::core::context::ProjectContext;
use crate::core::error::{ShiftError, ShiftResult, TransformError};
use crate::engine::{self, TransformOutcome};
use crate::logging::{ConsoleLogger, TransformLogger};
use crate::ui::progress::MultiProgress;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// How one transformation job ended
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
  /// Destination written
  Applied,
  /// Engine reported a failure (details on stderr)
  Failed,
  /// Transform file absent; nothing to do
  Skipped,
  /// I/O or format error before the engine ran
  Error,
}

/// One transformation in a batch run
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
  pub entry: String,
  pub configuration: String,
  pub source: PathBuf,
  pub transform: PathBuf,
  pub destination: PathBuf,
  pub status: JobStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

/// JSON run report written by --report
#[derive(Debug, Serialize)]
pub struct ApplyReport {
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  pub results: Vec<JobResult>,
}

struct Job {
  entry: String,
  configuration: String,
  source: PathBuf,
  transform: PathBuf,
  destination: PathBuf,
}

/// Run the explicit one-shot form
pub fn run_apply_explicit(source: &Path, transform: &Path, destination: &Path, verbose: bool) -> ShiftResult<()> {
  let logger = ConsoleLogger::new(verbose);
  let transformer = engine::get_transformer(source, &logger, verbose)?;
  match transformer.transform(source, transform, destination)? {
    TransformOutcome::Applied => {
      println!("✅ {} -> {}", source.display(), destination.display());
      Ok(())
    }
    TransformOutcome::Failed => Err(ShiftError::message(format!(
      "transformation of {} failed; see the messages above",
      source.display()
    ))),
  }
}

/// Run the configured batch form
pub fn run_apply(
  ctx: &ProjectContext,
  entry_name: Option<String>,
  configuration: Option<String>,
  all: bool,
  report: Option<PathBuf>,
  verbose: bool,
) -> ShiftResult<()> {
  let config = ctx.require_config()?;
  let started_at = Utc::now();

  let selected_configurations: Vec<String> = match (&configuration, all) {
    (Some(_), true) => {
      return Err(ShiftError::message("--configuration and --all are mutually exclusive"));
    }
    (Some(name), false) => {
      // Per-entry overrides may declare configurations the project list lacks
      let known = config
        .project
        .configurations
        .iter()
        .chain(config.transforms.iter().filter_map(|entry| entry.configurations.as_ref()).flatten())
        .find(|candidate| candidate.eq_ignore_ascii_case(name));
      match known {
        Some(found) => vec![found.clone()],
        None => {
          return Err(ShiftError::with_help(
            format!("unknown configuration '{}'", name),
            format!("Configured: {}", config.project.configurations.join(", ")),
          ));
        }
      }
    }
    (None, true) => config.project.configurations.clone(),
    (None, false) => {
      return Err(ShiftError::with_help(
        "no configuration selected",
        "Pass --configuration <name> or --all",
      ));
    }
  };

  let entries: Vec<_> = match &entry_name {
    Some(name) => {
      let matched: Vec<_> = config
        .transforms
        .iter()
        .filter(|entry| entry.display_name().eq_ignore_ascii_case(name))
        .collect();
      if matched.is_empty() {
        return Err(ShiftError::message(format!("no transform entry named '{}'", name)));
      }
      matched
    }
    None => config.transforms.iter().collect(),
  };
  if entries.is_empty() {
    return Err(ShiftError::with_help(
      "no transform entries configured",
      "Add [[transforms]] entries to cfgshift.toml",
    ));
  }

  // Build the job list up front; skipped entries are recorded, not dropped
  let logger = ConsoleLogger::new(verbose);
  let mut jobs = Vec::new();
  let mut results = Vec::new();
  let mut destinations = HashSet::new();

  for entry in &entries {
    let entry_configurations = config.configurations_for(entry);
    for configuration in &selected_configurations {
      if !entry_configurations.iter().any(|known| known.eq_ignore_ascii_case(configuration)) {
        continue;
      }
      let source = ctx.root.join(&entry.source);
      let transform = ctx.root.join(entry.transform_path_for(configuration));
      let destination = ctx.root.join(entry.destination_for(configuration));

      if !destinations.insert(destination.clone()) {
        return Err(ShiftError::message(format!(
          "two transformations would write {}; fix the destination patterns in cfgshift.toml",
          destination.display()
        )));
      }

      if !transform.exists() {
        logger.log_warning(&format!(
          "{}: no {} transform ({}), skipped",
          entry.display_name(),
          configuration,
          transform.display()
        ));
        results.push(JobResult {
          entry: entry.display_name(),
          configuration: configuration.clone(),
          source,
          transform,
          destination,
          status: JobStatus::Skipped,
          message: None,
        });
        continue;
      }

      jobs.push(Job {
        entry: entry.display_name(),
        configuration: configuration.clone(),
        source,
        transform,
        destination,
      });
    }
  }

  if jobs.is_empty() && results.is_empty() {
    return Err(ShiftError::message("nothing to apply for the selected configuration(s)"));
  }

  let progress = MultiProgress::new();
  let bar = progress.add_bar(jobs.len(), "applying transforms".to_string());

  let mut parallel_results: Vec<JobResult> = jobs
    .par_iter()
    .map(|job| {
      let result = execute_job(job, &logger, verbose);
      progress.inc(&bar);
      result
    })
    .collect();
  results.append(&mut parallel_results);

  let applied = results.iter().filter(|result| result.status == JobStatus::Applied).count();
  let skipped = results.iter().filter(|result| result.status == JobStatus::Skipped).count();
  let failed = results.len() - applied - skipped;

  println!("\n{} applied, {} skipped, {} failed", applied, skipped, failed);

  if let Some(report_path) = report {
    let report = ApplyReport {
      started_at,
      finished_at: Utc::now(),
      results: results.clone(),
    };
    let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
    fs::write(&report_path, json)?;
    println!("Report written to {}", report_path.display());
  }

  if failed > 0 {
    return Err(ShiftError::message(format!("{} transformation(s) failed", failed)));
  }
  Ok(())
}

fn execute_job(job: &Job, logger: &dyn TransformLogger, verbose: bool) -> JobResult {
  let mut result = JobResult {
    entry: job.entry.clone(),
    configuration: job.configuration.clone(),
    source: job.source.clone(),
    transform: job.transform.clone(),
    destination: job.destination.clone(),
    status: JobStatus::Error,
    message: None,
  };

  if let Some(parent) = job.destination.parent()
    && let Err(err) = fs::create_dir_all(parent)
  {
    logger.log_error(&format!("cannot create {}: {}", parent.display(), err));
    result.message = Some(err.to_string());
    return result;
  }

  let outcome = engine::get_transformer(&job.source, logger, verbose)
    .and_then(|transformer| transformer.transform(&job.source, &job.transform, &job.destination));

  match outcome {
    Ok(TransformOutcome::Applied) => result.status = JobStatus::Applied,
    Ok(TransformOutcome::Failed) => result.status = JobStatus::Failed,
    Err(err) => {
      logger.log_error(&format!("{} ({}): {}", job.entry, job.configuration, err));
      result.message = Some(err.to_string());
      if matches!(
        err,
        ShiftError::Transform(TransformError::TransformNotFound { .. })
      ) {
        // Raced with a concurrent delete; report it the same as a pre-checked skip
        result.status = JobStatus::Skipped;
      }
    }
  }
  result
}
