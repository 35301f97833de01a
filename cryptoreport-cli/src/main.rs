//! cryptoreport CLI: fetch the configured coins once and write the report.
//!
//! Exit codes:
//! - `0` the run finished and every artifact was written
//! - `1` the run failed (the failure is recorded in the run log)
//! - `2` the configuration or arguments were rejected

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cryptoreport_core::{
    Clock, CoinGeckoProvider, ConfigError, ExportVariant, ReportConfig, RunLog, SystemClock,
};
use cryptoreport_runner::Pipeline;

#[derive(Parser, Debug)]
#[command(
    name = "cryptoreport",
    about = "Fetch crypto market data and export CSV, JSON, HTML, PDF and PNG reports"
)]
struct Cli {
    /// Path to a TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Coin ids to fetch, comma-separated (e.g. bitcoin,ethereum).
    #[arg(long, value_delimiter = ',')]
    coins: Option<Vec<String>>,

    /// Quote currency (e.g. usd, eur).
    #[arg(long)]
    currency: Option<String>,

    /// Directory for report artifacts. Defaults to ./outputs.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Directory holding run.log. Defaults to ./logs.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Artifact set: basic (CSV, JSON, HTML) or extended (adds PDF and PNGs).
    #[arg(long)]
    variant: Option<ExportVariant>,

    /// Do not echo run log lines to stdout.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

impl Cli {
    /// Load the config file (or defaults) and apply flag overrides.
    fn resolve_config(&self) -> Result<ReportConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)?,
            None => ReportConfig::default(),
        };
        if let Some(coins) = &self.coins {
            config.coins = coins.iter().map(|c| c.trim().to_string()).collect();
        }
        if let Some(currency) = &self.currency {
            config.vs_currency = currency.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if self.quiet {
            config.echo_log = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_pipeline(config: ReportConfig) -> Result<Pipeline> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let log = RunLog::open(&config.log_dir, clock.clone())
        .with_context(|| format!("cannot open run log in {}", config.log_dir.display()))?
        .with_echo(config.echo_log);
    let provider = CoinGeckoProvider::from_config(&config).context("cannot build HTTP client")?;
    Ok(Pipeline::new(config, Box::new(provider), clock, Arc::new(log)))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::from(2);
        }
    };
    tracing::info!(
        coins = config.coins.len(),
        currency = %config.vs_currency,
        variant = ?config.variant,
        "starting report run"
    );

    let pipeline = match build_pipeline(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match pipeline.run() {
        Ok(summary) => {
            tracing::info!(
                rows = summary.row_count,
                artifacts = summary.artifacts.len(),
                "report run complete"
            );
            ExitCode::SUCCESS
        }
        // Already written to the run log by the pipeline.
        Err(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cryptoreport").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let config = parse(&[]).resolve_config().unwrap();
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--coins",
            "bitcoin, cardano",
            "--currency",
            "eur",
            "--timeout-secs",
            "3",
            "--variant",
            "basic",
            "--quiet",
        ])
        .resolve_config()
        .unwrap();
        assert_eq!(config.coins, vec!["bitcoin", "cardano"]);
        assert_eq!(config.vs_currency, "eur");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.variant, ExportVariant::Basic);
        assert!(!config.echo_log);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.toml");
        std::fs::write(&path, "vs_currency = \"gbp\"\ntimeout_secs = 30\n").unwrap();
        let path = path.to_str().unwrap();

        let config = parse(&["--config", path, "--timeout-secs", "5"])
            .resolve_config()
            .unwrap();
        assert_eq!(config.vs_currency, "gbp");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert!(parse(&["--timeout-secs", "0"]).resolve_config().is_err());
        assert!(Cli::try_parse_from(["cryptoreport", "--variant", "fancy"]).is_err());
        assert!(parse(&["--config", "/nonexistent/report.toml"])
            .resolve_config()
            .is_err());
    }
}
