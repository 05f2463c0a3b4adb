// TOML config adapter - Layered settings: defaults, file, environment

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ComboError, ComboResult};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "combo-batch.toml";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    pub output: OutputSettings,
    pub packaging: PackagingSettings,
    pub logging: LoggingSettings,
}

/// Encoding engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// ffmpeg binary name or path
    pub ffmpeg_path: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

/// Where finished downloads are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// Result packaging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingSettings {
    /// Delay between individual downloads when archiving fails (milliseconds)
    pub stagger_ms: u64,
}

impl Default for PackagingSettings {
    fn default() -> Self {
        Self { stagger_ms: 200 }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> ComboResult<Self> {
        let settings: Settings = toml::from_str(content).map_err(|e| ComboError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file
    pub fn from_file(path: &Path) -> ComboResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ComboError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Config file to read: `path` when given, else `combo-batch.toml` if it exists
    pub fn config_path(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                default.exists().then(|| default.to_path_buf())
            }
        }
    }

    /// Apply `COMBO_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> ComboResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = 0;

        if let Some(value) = lookup("COMBO_FFMPEG_PATH") {
            self.engine.ffmpeg_path = value;
            overrides += 1;
        }
        if let Some(value) = lookup("COMBO_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(value);
            overrides += 1;
        }
        if let Some(value) = lookup("COMBO_LOG_LEVEL") {
            self.logging.level = value;
            overrides += 1;
        }
        if let Some(value) = lookup("COMBO_STAGGER_MS") {
            self.packaging.stagger_ms = value.parse().map_err(|e| ComboError::Config {
                message: format!("Invalid COMBO_STAGGER_MS '{}': {}", value, e),
            })?;
            overrides += 1;
        }

        self.validate()?;
        Ok(overrides)
    }

    /// Validate configuration
    pub fn validate(&self) -> ComboResult<()> {
        if self.engine.ffmpeg_path.trim().is_empty() {
            return Err(ComboError::Config {
                message: "engine.ffmpeg_path must not be empty".to_string(),
            });
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ComboError::Config {
                message: format!(
                    "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                    other
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.engine.ffmpeg_path, "ffmpeg");
        assert_eq!(settings.output.directory, PathBuf::from("."));
        assert_eq!(settings.packaging.stagger_ms, 200);
        assert_eq!(settings.logging.level, "info");
        assert!(!settings.logging.json);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [engine]
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"

            [logging]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(settings.engine.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
        assert!(settings.logging.json);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.packaging.stagger_ms, 200);
    }

    #[test]
    fn test_invalid_toml_and_level() {
        assert!(Settings::from_toml_str("engine = [").is_err());
        assert!(Settings::from_toml_str("[logging]\nlevel = \"loud\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("COMBO_OUTPUT_DIR", "/tmp/renders"),
            ("COMBO_STAGGER_MS", "50"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        let applied = settings
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(applied, 2);
        assert_eq!(settings.output.directory, PathBuf::from("/tmp/renders"));
        assert_eq!(settings.packaging.stagger_ms, 50);
    }

    #[test]
    fn test_env_rejects_bad_number() {
        let mut settings = Settings::default();
        let result = settings.apply_env(|key| {
            (key == "COMBO_STAGGER_MS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("combo-batch.toml");
        std::fs::write(&path, "[packaging]\nstagger_ms = 0\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.packaging.stagger_ms, 0);
    }
}
