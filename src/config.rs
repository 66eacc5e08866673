use crate::cli::output::OutputFormat;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Rule table to load when none is given on the command line.
    pub rules: Option<PathBuf>,
    pub max_flag_tokens: usize,
    pub format: OutputFormat,
    pub color: bool,
}

/// One config file layer. Fields left out of the file keep the value of
/// the layer below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub rules: Option<PathBuf>,
    pub max_flag_tokens: Option<usize>,
    pub format: Option<OutputFormat>,
    pub color: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: None,
            max_flag_tokens: 256,
            format: OutputFormat::Text,
            color: true,
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(
        rules: Option<PathBuf>,
        max_flag_tokens: Option<usize>,
        format: Option<OutputFormat>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        let local_path = PathBuf::from(".affixgen.toml");
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        if let Some(rules) = rules {
            config.rules = Some(rules);
        }
        if let Some(limit) = max_flag_tokens {
            config.max_flag_tokens = limit;
        }
        if let Some(format) = format {
            config.format = format;
        }

        if config.rules.is_none() {
            config.rules = Self::default_rules_path().filter(|path| path.exists());
        }

        Ok(config)
    }

    /// The rule table path, or an error telling the user how to provide one.
    pub fn rules_path(&self) -> Result<&Path> {
        self.rules.as_deref().context(
            "No rule table configured. Pass --rules or set `rules` in .affixgen.toml",
        )
    }

    fn from_file(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, layer: ConfigFile) -> Self {
        if let Some(rules) = layer.rules {
            self.rules = Some(rules);
        }
        if let Some(limit) = layer.max_flag_tokens {
            self.max_flag_tokens = limit;
        }
        if let Some(format) = layer.format {
            self.format = format;
        }
        if let Some(color) = layer.color {
            self.color = color;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "affixgen").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_rules_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "affixgen").map(|dirs| dirs.data_dir().join("rules.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(contents: &str) -> ConfigFile {
        toml::from_str(contents).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.rules.is_none());
        assert_eq!(config.max_flag_tokens, 256);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.color);
    }

    #[test]
    fn test_merge_configs() {
        let merged = Config::default().merge(layer("rules = \"en.toml\"\nmax_flag_tokens = 16"));
        assert_eq!(merged.rules, Some(PathBuf::from("en.toml")));
        assert_eq!(merged.max_flag_tokens, 16);
        assert_eq!(merged.format, OutputFormat::Text);
        assert!(merged.color);
    }

    #[test]
    fn test_local_layer_over_global() {
        let global = layer("color = false\nformat = \"json\"\nmax_flag_tokens = 16");
        let local = layer("format = \"text\"\nmax_flag_tokens = 256");

        let merged = Config::default().merge(global).merge(local);

        // untouched by the local file
        assert!(!merged.color);
        // set back to their defaults by the local file
        assert_eq!(merged.format, OutputFormat::Text);
        assert_eq!(merged.max_flag_tokens, 256);
    }

    #[test]
    fn test_empty_layer_changes_nothing() {
        let global = Config::default().merge(layer("color = false\nformat = \"json\""));
        let merged = global.clone().merge(layer(""));

        assert_eq!(merged.color, global.color);
        assert_eq!(merged.format, global.format);
        assert_eq!(merged.max_flag_tokens, global.max_flag_tokens);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(toml::from_str::<ConfigFile>("colour = false").is_err());
    }

    #[test]
    fn test_missing_rules_path() {
        let config = Config::default();
        assert!(config.rules_path().is_err());
    }
}
