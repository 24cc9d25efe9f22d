//! Scan command implementation.
//!
//! Resolves settings, builds the [`ScanConfig`], runs it, and hands the
//! result to the output layer.

use super::{Cli, OutputFormat};
use crate::config::AppSettings;
use crate::error::CliResult;
use crate::output::{self, ScanReport};
use crate::scanner::{run_scan, ScanConfig, StrategyKind};
use crate::types::PortRange;
use std::time::Duration;
use tracing::debug;

impl Cli {
    /// Load the settings file named by `--config`, or the default one.
    pub fn load_settings(&self) -> CliResult<AppSettings> {
        let settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load()?,
        };
        Ok(settings)
    }

    /// Strategy chosen by `--mode`, `--strategy`, or the settings default.
    pub fn strategy_kind(&self, settings: &AppSettings) -> CliResult<StrategyKind> {
        let kind = match (self.mode, &self.strategy) {
            (Some(mode), _) => StrategyKind::from_mode(mode)?,
            (None, Some(name)) => name.parse()?,
            (None, None) => settings.strategy()?,
        };
        Ok(kind)
    }

    /// Build the scan configuration. Flags win over settings, settings over presets.
    pub fn scan_config(&self, settings: &AppSettings) -> CliResult<ScanConfig> {
        let range: PortRange = match &self.range {
            Some(spec) => spec.parse()?,
            None => settings.range()?,
        };
        let strategy = self.strategy_kind(settings)?;

        let mut config = ScanConfig::new(self.target.clone(), range, strategy);

        if let Some(timeout) = self.timeout.map(Duration::from_millis).or(settings.timeout()) {
            config = config.with_timeout(timeout);
        }
        if let Some(concurrency) = self.concurrency.or(settings.concurrency) {
            config = config.with_concurrency(concurrency);
        }
        if let Some(delay) = self.delay.map(Duration::from_millis).or(settings.delay()) {
            config = config.with_delay(delay);
        }
        if (self.verbose || settings.verbose) && !self.quiet {
            config = config.with_progress();
        }

        debug!(?config, "resolved scan configuration");
        Ok(config)
    }

    /// Execute the scan command.
    pub async fn execute(&self) -> CliResult<()> {
        let settings = self.load_settings()?;
        let config = self.scan_config(&settings)?;

        let plain = self.format == OutputFormat::Plain;
        if !self.quiet && plain {
            output::print_scan_header(
                config.target.trim(),
                config.strategy.name(),
                &config.range.to_string(),
                config.range.len(),
            );
        }

        let outcome = run_scan(config.clone()).await?;
        let report = ScanReport::new(&config, &outcome);

        if self.quiet && plain {
            println!("{}", report.summary());
        } else if let Err(e) = output::print_report(&report, self.format) {
            output::print_warning(&format!("failed to print results: {}", e));
        }

        if let Some(path) = &self.output {
            output::save_or_print(&report, path);
        }

        Ok(())
    }
}
