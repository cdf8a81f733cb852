//! CLI command implementations
//!
//! Boot sequence shared by `serve` and `validate`:
//! 1. Load and validate configuration
//! 2. Load the seed file and check it against the forest invariants
//! 3. Open (serve) or verify (validate) the audit journal
//!
//! `serve` then builds the engine and runs the HTTP server on a tokio runtime.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hierarchy::RoleTransitionEngine;
use crate::http_server::{HttpServer, HttpServerConfig, SenapotiState};
use crate::observability::{
    log_event_with_fields, read_journal, AuditJournal, Event, FileAuditJournal, Logger, Severity,
};
use crate::store::DirectorySeed;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub http: HttpServerConfig,

    /// JSON seed of devotee nodes; empty directory when absent
    #[serde(default)]
    pub seed_path: Option<PathBuf>,

    /// Append-only history journal; in-memory history only when absent
    #[serde(default)]
    pub audit_journal_path: Option<PathBuf>,

    /// Minimum log severity (default "INFO")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        self.severity()?;

        self.http.validate().map_err(CliError::config_error)?;

        for (name, path) in [
            ("seed_path", &self.seed_path),
            ("audit_journal_path", &self.audit_journal_path),
        ] {
            if matches!(path, Some(p) if p.as_os_str().is_empty()) {
                return Err(CliError::config_error(format!("{} must not be empty", name)));
            }
        }

        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    fn load_seed(&self) -> CliResult<DirectorySeed> {
        match &self.seed_path {
            Some(path) => Ok(DirectorySeed::load(path)?),
            None => Ok(DirectorySeed::default()),
        }
    }
}

/// Result of `namhatta validate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub devotees: usize,
    pub leaders: usize,
    pub top_level_leaders: usize,
    pub journal_records: usize,
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Validate { config } => {
            let summary = validate(&config)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

/// Build the engine-backed HTTP state from a loaded configuration.
pub fn boot(config: &Config) -> CliResult<Arc<SenapotiState>> {
    Logger::set_min_severity(config.severity()?);
    log_event_with_fields(Event::BootStart, &[]);

    let journal: Option<Arc<dyn AuditJournal>> = match &config.audit_journal_path {
        Some(path) => {
            let journal = FileAuditJournal::open(path).map_err(|e| {
                CliError::journal_error(format!("Failed to open {}: {}", path.display(), e))
            })?;
            let shown = path.display().to_string();
            log_event_with_fields(Event::JournalOpened, &[("path", shown.as_str())]);
            Some(Arc::new(journal))
        }
        None => None,
    };

    let seed = config.load_seed()?;
    let directory = seed.into_directory(journal)?;
    let devotees = directory.len().to_string();
    log_event_with_fields(Event::SeedLoaded, &[("devotees", devotees.as_str())]);

    let engine = RoleTransitionEngine::new(Arc::new(directory));
    Ok(Arc::new(SenapotiState::new(engine)))
}

/// Boot and serve the HTTP API until the listener fails.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    let shown = config_path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("config", shown.as_str())]);

    if let Some(port) = port {
        config.http.port = port;
    }

    let state = boot(&config).map_err(|e| {
        let message = e.to_string();
        Logger::fatal(Event::BootFailed.as_str(), &[("error", message.as_str())]);
        e
    })?;
    let server = HttpServer::with_config(config.http.clone(), state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Check configuration, seed, and journal checksums.
pub fn validate(config_path: &Path) -> CliResult<ValidationSummary> {
    let config = Config::load(config_path)?;

    let seed = config.load_seed()?;
    seed.validate()?;

    let journal_records = match &config.audit_journal_path {
        Some(path) => read_journal(path)
            .map_err(|e| CliError::journal_error(format!("{}: {}", path.display(), e)))?
            .len(),
        None => 0,
    };

    let leaders = seed.devotees.iter().filter(|n| n.is_leader()).count();
    let top_level_leaders = seed
        .devotees
        .iter()
        .filter(|n| n.is_leader() && n.reporting_to.is_none())
        .count();

    Ok(ValidationSummary {
        devotees: seed.devotees.len(),
        leaders,
        top_level_leaders,
        journal_records,
    })
}
