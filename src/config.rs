use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use anyhow::{Result, Context};
use log::warn;

/// Main configuration structure for assistant_generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Defaults baked into generated programs
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Where generated files are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Default temperature of the generated `ask` method
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default system prompt of the generated `ask` method
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Maximum number of API key characters shown in generated code
    #[serde(default = "default_credential_preview_chars")]
    pub credential_preview_chars: usize,

    /// Size limit (bytes) enforced by the file handling feature
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// History file used by the memory feature
    #[serde(default = "default_history_file")]
    pub history_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for generated artifacts
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,

    /// Keep a manifest.json next to the generated files
    #[serde(default = "default_write_manifest")]
    pub write_manifest: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable to silence all log output
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,
}

// Default value functions
fn default_temperature() -> f32 { 0.7 }
fn default_system_prompt() -> String { "You are a helpful assistant.".to_string() }
fn default_credential_preview_chars() -> usize { 4 }
fn default_max_file_size() -> u64 { 100_000 }
fn default_history_file() -> String { "chat_history.json".to_string() }
fn default_artifact_dir() -> String { "./generated".to_string() }
fn default_write_manifest() -> bool { true }
fn default_logging_enabled() -> bool { true }

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            default_temperature: default_temperature(),
            system_prompt: default_system_prompt(),
            credential_preview_chars: default_credential_preview_chars(),
            max_file_size: default_max_file_size(),
            history_file: default_history_file(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            artifact_dir: default_artifact_dir(),
            write_manifest: default_write_manifest(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            enabled: default_logging_enabled(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    /// Load configuration from command line argument or default locations
    pub fn load(config_path: &Option<String>) -> Result<Self> {
        if let Some(path) = config_path {
            let expanded_path = shellexpand::tilde(path);
            return Self::from_file(expanded_path.as_ref());
        }

        // Try loading from default locations
        let default_paths = vec![
            "assistant_generator.toml",
            ".assistant_generator.toml",
            "~/.config/assistant_generator/config.toml",
        ];

        for path in default_paths {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                match Self::from_file(expanded_path.as_ref()) {
                    Ok(config) => return Ok(config),
                    Err(e) => warn!("Failed to load config from {}: {}", path, e),
                }
            }
        }

        // Return default config if no file found
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        fs::write(path.as_ref(), contents)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Merge with command-line arguments (CLI args take precedence)
    pub fn merge_with_args(&mut self, output_dir: Option<&str>) {
        if let Some(dir) = output_dir {
            self.output.artifact_dir = dir.to_string();
        }
    }
}
