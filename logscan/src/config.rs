use chrono::NaiveDate;
use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{ScanError, ScanResult};

/// Configuration for a scan run.
///
/// Loadable from YAML, with locations layered in order of precedence:
/// 1. Custom config file passed explicitly (the CLI's `--config` flag)
/// 2. Local `.logscan.yaml` in the current directory
/// 3. Global `$CONFIG_DIR/logscan/config.yaml`
///
/// CLI arguments take precedence over all file values; the merging behavior
/// lives in [`ScanConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory of log files to scan (non-recursive)
    pub root_dir: PathBuf,

    /// Literal substring to look for; case-sensitive, unanchored
    pub keyword: String,

    /// Only scan files whose base name starts with this prefix
    #[serde(default)]
    pub file_prefix: Option<String>,

    /// Where to write the result file; overwritten every run
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Number of worker threads
    /// Defaults to the number of CPU cores
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("results.txt")
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ScanConfig {
    /// Creates a config for `root_dir`/`keyword` with every other field at
    /// its default.
    pub fn new(root_dir: impl Into<PathBuf>, keyword: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            keyword: keyword.into(),
            file_prefix: None,
            output_path: default_output_path(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("logscan/config.yaml")),
            // Local config
            Some(PathBuf::from(".logscan.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: ScanConfig) -> Self {
        // CLI values take precedence over config file values
        if cli_config.root_dir != Path::new(".") {
            self.root_dir = cli_config.root_dir;
        }
        if !cli_config.keyword.is_empty() {
            self.keyword = cli_config.keyword;
        }
        if cli_config.file_prefix.is_some() {
            self.file_prefix = cli_config.file_prefix;
        }
        if cli_config.output_path != default_output_path() {
            self.output_path = cli_config.output_path;
        }
        // Always use CLI thread count if specified
        self.thread_count = cli_config.thread_count;
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }

    /// Rejects empty root path or empty keyword before any I/O happens.
    pub fn validate(&self) -> ScanResult<()> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(ScanError::invalid_input("root directory must not be empty"));
        }
        if self.keyword.is_empty() {
            return Err(ScanError::invalid_input("keyword must not be empty"));
        }
        Ok(())
    }
}

/// Parameters for the synthetic log generator.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Directory the log files are written into; created if missing
    pub dir: PathBuf,
    /// Number of files to produce, one per calendar day
    pub file_count: usize,
    /// Lines written to each file
    pub lines_per_file: usize,
    /// Date of the first file; file `i` is dated `start_date + i` days
    pub start_date: NaiveDate,
    /// Keyword seeded into roughly one line in a thousand
    pub keyword: String,
    /// Number of writer threads
    pub thread_count: NonZeroUsize,
}

impl GenerateConfig {
    pub fn new(dir: impl Into<PathBuf>, file_count: usize, lines_per_file: usize) -> Self {
        Self {
            dir: dir.into(),
            file_count,
            lines_per_file,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            keyword: "login by 99".to_string(),
            thread_count: default_thread_count(),
        }
    }
}
