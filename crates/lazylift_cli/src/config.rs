//! Global flags and the resolved runtime configuration.

use clap::Args;
use lazylift_core::LoggingOptions;
use std::path::PathBuf;

const LOG_DIR_NAME: &str = "lazylift";

/// Flags accepted before or after any subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LAZYLIFT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true, env = "LAZYLIFT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print every SQL statement to stderr
    #[arg(long, global = true)]
    pub echo_sql: bool,
}

/// Configuration after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: PathBuf,
    pub echo_sql: bool,
}

impl AppConfig {
    pub fn resolve(args: &GlobalArgs) -> Self {
        let requested = args
            .log_level
            .clone()
            .unwrap_or_else(|| lazylift_core::default_log_level().to_string());
        // Echoed statements are logged at info and would be filtered otherwise.
        let log_level = if args.echo_sql && is_quieter_than_info(&requested) {
            "info".to_string()
        } else {
            requested
        };

        let log_dir = args.log_dir.clone().unwrap_or_else(default_log_dir);
        let log_dir = if log_dir.is_absolute() {
            log_dir
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&log_dir))
                .unwrap_or(log_dir)
        };

        Self {
            log_level,
            log_dir,
            echo_sql: args.echo_sql,
        }
    }

    pub fn logging_options(&self) -> LoggingOptions {
        LoggingOptions {
            level: self.log_level.clone(),
            log_dir: self.log_dir.to_string_lossy().into_owned(),
            mirror_to_stderr: self.echo_sql,
        }
    }
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join(LOG_DIR_NAME).join("logs")
}

fn is_quieter_than_info(level: &str) -> bool {
    matches!(
        level.trim().to_ascii_lowercase().as_str(),
        "warn" | "warning" | "error"
    )
}
