//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for arbiter-quorum
#[derive(Parser, Debug)]
#[command(name = "arbiter-quorum")]
#[command(author, version, about = "Weighted multi-model arbitration server")]
#[command(long_about = r#"
Arbiter Quorum asks a weighted panel of LLMs to score the possible outcomes
of a dispute and serves the consolidated verdict over HTTP.

Endpoints:
  GET  /health             Liveness check
  GET  /models             Models of every configured provider
  POST /rank-and-justify   Run a panel on an inline query
  POST /evaluate           Oracle adapter: evidence CIDs, commit/reveal

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./arbiter.toml      Project-level config
3. ~/.config/arbiter-quorum/config.toml   Global config

ARBITER_* environment variables (e.g. ARBITER_COMMITMENTS__BACKEND=file)
and JUSTIFIER_MODEL=provider:model override file settings.

Example:
  arbiter-quorum --port 8080
  arbiter-quorum -vv --config ./deploy/arbiter.toml --log-dir ./logs
"#)]
pub struct Cli {
    /// Address to listen on, e.g. 0.0.0.0:8080 (overrides [server].bind)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Port to listen on (replaces the port of the bind address)
    #[arg(short, long, value_name = "PORT", env = "PORT")]
    pub port: Option<u16>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Listen address after applying `--bind` and `--port` to `configured`
    pub fn bind_address(&self, configured: &str) -> String {
        let base = self.bind.as_deref().unwrap_or(configured);
        match self.port {
            Some(port) => {
                let host = base.rsplit_once(':').map_or(base, |(host, _)| host);
                format!("{}:{}", host, port)
            }
            None => base.to_string(),
        }
    }

    /// Default tracing filter for the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
