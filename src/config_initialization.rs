//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::Settings;
use crate::cli::{Cli, Commands};

/// Settings together with where they came from.
///
/// Settings are resolved before the subscriber exists, so the summary is
/// logged separately once logging is up.
#[derive(Debug)]
pub struct InitializedSettings {
    pub settings: Settings,
    pub source: Option<PathBuf>,
    pub env_overrides: usize,
    pub cli_overrides: usize,
}

impl InitializedSettings {
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.source {
            Some(path) => lines.push(format!("Loaded configuration from {}", path.display())),
            None => lines.push("No configuration file, using defaults".to_string()),
        }
        if self.env_overrides > 0 {
            lines.push(format!(
                "Applied {} environment variable overrides",
                self.env_overrides
            ));
        }
        if self.cli_overrides > 0 {
            lines.push(format!(
                "Applied {} CLI configuration overrides",
                self.cli_overrides
            ));
        }
        lines
    }

    pub fn log_summary(&self) {
        for line in self.summary() {
            info!("{}", line);
        }
    }
}

/// Build settings following precedence: CLI > Env > File > Defaults
pub fn initialize_settings(cli: &Cli) -> Result<InitializedSettings> {
    let source = Settings::config_path(cli.config.as_deref());
    let mut settings = match &source {
        Some(path) => Settings::from_file(path).context("Failed to load configuration")?,
        None => Settings::default(),
    };

    let env_overrides = settings
        .apply_env(|key| std::env::var(key).ok())
        .context("Failed to load configuration from environment")?;
    let cli_overrides = apply_cli_overrides(&mut settings, cli);
    settings.validate().context("Invalid configuration")?;

    Ok(InitializedSettings {
        settings,
        source,
        env_overrides,
        cli_overrides,
    })
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) -> usize {
    let mut overrides = 0;

    if let Some(level) = &cli.log_level {
        settings.logging.level = level.clone();
        overrides += 1;
    }

    if let Commands::Generate(args) = &cli.command {
        if let Some(out) = &args.out {
            settings.output.directory = out.clone();
            overrides += 1;
        }
        if let Some(ffmpeg) = &args.ffmpeg {
            settings.engine.ffmpeg_path = ffmpeg.clone();
            overrides += 1;
        }
    }

    overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_cli_overrides_win() {
        let cli = Cli::parse_from([
            "combo-batch",
            "--log-level",
            "debug",
            "generate",
            "--hook",
            "h.mp4",
            "--body",
            "b.mp4",
            "--cta",
            "c.mp4",
            "--out",
            "renders",
            "--ffmpeg",
            "/usr/local/bin/ffmpeg",
        ]);

        let mut settings = Settings::default();
        assert_eq!(apply_cli_overrides(&mut settings, &cli), 3);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.output.directory, PathBuf::from("renders"));
        assert_eq!(settings.engine.ffmpeg_path, "/usr/local/bin/ffmpeg");
    }

    #[test]
    fn test_explicit_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("renders.toml");
        std::fs::write(&path, "[packaging]\nstagger_ms = 75\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let cli = Cli::parse_from([
            "combo-batch",
            "--config",
            path_arg.as_str(),
            "--log-level",
            "warn",
            "plan",
            "--hook",
            "h.mp4",
            "--body",
            "b.mp4",
            "--cta",
            "c.mp4",
        ]);
        let initialized = initialize_settings(&cli).unwrap();

        assert_eq!(initialized.source.as_deref(), Some(path.as_path()));
        assert_eq!(initialized.settings.packaging.stagger_ms, 75);
        assert_eq!(initialized.settings.logging.level, "warn");
        assert_eq!(initialized.cli_overrides, 1);

        let summary = initialized.summary();
        assert_eq!(summary[0], format!("Loaded configuration from {}", path.display()));
        assert_eq!(
            summary.last().map(String::as_str),
            Some("Applied 1 CLI configuration overrides")
        );
    }

    #[test]
    fn test_plan_has_no_output_overrides() {
        let cli = Cli::parse_from([
            "combo-batch", "plan", "--hook", "h.mp4", "--body", "b.mp4", "--cta", "c.mp4",
        ]);
        let mut settings = Settings::default();
        assert_eq!(apply_cli_overrides(&mut settings, &cli), 0);
        assert_eq!(settings, Settings::default());
    }
}
