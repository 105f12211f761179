use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::options::VisualEditOptions;
use crate::config::runtime_config::RuntimeConfig;
use crate::inject::{BuildMode, inject_runtime};
use crate::replay::console::format_console_report;
use crate::replay::replay_model::ReplayScript;
use crate::replay::runner::{ReplayError, ReplayRunner};
use crate::tagger::tagger::{Tagger, tag_source};
use crate::trace::logger::TraceLogger;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),
}

fn read(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_string(),
        source: e,
    })
}

fn emit(output: Option<&str>, content: &str) -> Result<(), CliError> {
    match output {
        Some(path) => std::fs::write(path, content).map_err(|e| CliError::Io {
            path: path.to_string(),
            source: e,
        }),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

// ============================================================================
// tag subcommand
// ============================================================================

/// Tag one tree. A tree that cannot be tagged is written back unchanged.
pub fn cmd_tag(
    options: &VisualEditOptions,
    input: &str,
    path: &str,
    output: Option<&str>,
) -> Result<(), CliError> {
    let source = read(input)?;
    let tagger = Tagger::from_options(options);
    let tagged = tag_source(&source, path, &tagger);
    info!(path = %path, changed = tagged != source, "tag finished");
    emit(output, &tagged)
}

// ============================================================================
// inject subcommand
// ============================================================================

pub fn cmd_inject(
    options: &VisualEditOptions,
    html: &str,
    mode: &str,
    command: &str,
    output: Option<&str>,
) -> Result<(), CliError> {
    let document = read(html)?;
    let config = RuntimeConfig::from_options(options);
    let mode = BuildMode::detect(mode, command);
    emit(output, &inject_runtime(&document, &config, mode))
}

// ============================================================================
// config subcommand
// ============================================================================

pub fn cmd_config(options: &VisualEditOptions) -> Result<(), CliError> {
    let config = RuntimeConfig::from_options(options);
    let json = serde_json::to_string_pretty(&config)?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// replay subcommand
// ============================================================================

/// Run replay scripts and return whether all passed.
pub fn cmd_replay(script_path: &str, trace: Option<&str>) -> Result<bool, CliError> {
    let scripts = load_scripts(script_path)?;

    if scripts.is_empty() {
        eprintln!("No replay scripts found at: {}", script_path);
        return Ok(true);
    }

    let tracer = match trace {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let results: Vec<_> = scripts
        .iter()
        .map(|script| {
            info!(script = %script.name, "replaying");
            ReplayRunner::run(script, &tracer)
        })
        .collect();

    let all_passed = results.iter().all(|r| r.passed);
    print!("{}", format_console_report(&results));
    Ok(all_passed)
}

/// Load scripts from a single file or a directory of YAML/JSON files.
pub fn load_scripts(path: &str) -> Result<Vec<ReplayScript>, CliError> {
    let metadata = std::fs::metadata(path).map_err(|e| CliError::Io {
        path: path.to_string(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Ok(vec![ReplayRunner::load(path)?]);
    }

    let entries = std::fs::read_dir(path).map_err(|e| CliError::Io {
        path: path.to_string(),
        source: e,
    })?;

    let mut scripts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CliError::Io {
            path: path.to_string(),
            source: e,
        })?;
        let p = entry.path();
        if is_script(&p) {
            scripts.push(ReplayRunner::load(&p.to_string_lossy())?);
        }
    }
    // Sort by name for deterministic order
    scripts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(scripts)
}

fn is_script(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e == "yaml" || e == "yml" || e == "json")
}
