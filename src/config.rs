use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::srs::scheduler::SchedulerOptions;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EcueConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub scheduler: SchedulerConfig,
    pub journal: JournalConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
}

/// Content and state files. Relative names resolve against `data_dir`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub cards_file: String,
    pub learn_state_file: String,
    pub emotions_file: String,
    pub feelings_wheel_file: String,
    pub practice_state_file: String,
    pub entries_dir: String,
    pub metadata_file: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Serve random cards once nothing is due, new, or upcoming.
    pub endless_practice: bool,
    /// Fixed seed for the new-card shuffle and question randomness.
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct JournalConfig {
    pub min_words_for_streak: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_ecue_dir().to_string_lossy().into_owned(),
            cards_file: "cards.json".into(),
            learn_state_file: "learn_state.json".into(),
            emotions_file: "emotions.json".into(),
            feelings_wheel_file: "feelings_wheel.json".into(),
            practice_state_file: "practice_state.json".into(),
            entries_dir: "entries".into(),
            metadata_file: "metadata.json".into(),
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            min_words_for_streak: 750,
        }
    }
}

/// Returns `~/.ecue/`
pub fn default_ecue_dir() -> PathBuf {
    home_dir().join(".ecue")
}

/// Returns the default config file path: `~/.ecue/config.toml`
pub fn default_config_path() -> PathBuf {
    default_ecue_dir().join("config.toml")
}

impl EcueConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            EcueConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (ECUE_DATA_DIR, ECUE_LOG_LEVEL, ECUE_ENDLESS).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ECUE_DATA_DIR") {
            self.storage.data_dir = val;
        }
        if let Ok(val) = std::env::var("ECUE_LOG_LEVEL") {
            self.logging.log_level = val;
        }
        if let Ok(val) = std::env::var("ECUE_ENDLESS") {
            self.scheduler.endless_practice = matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.data_dir)
    }

    /// Resolve a configured file name against the data directory.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = expand_tilde(name);
        if path.is_absolute() {
            path
        } else {
            self.data_dir().join(path)
        }
    }

    pub fn cards_path(&self) -> PathBuf {
        self.resolve(&self.storage.cards_file)
    }

    pub fn learn_state_path(&self) -> PathBuf {
        self.resolve(&self.storage.learn_state_file)
    }

    pub fn emotions_path(&self) -> PathBuf {
        self.resolve(&self.storage.emotions_file)
    }

    pub fn feelings_wheel_path(&self) -> PathBuf {
        self.resolve(&self.storage.feelings_wheel_file)
    }

    pub fn practice_state_path(&self) -> PathBuf {
        self.resolve(&self.storage.practice_state_file)
    }

    pub fn entries_dir(&self) -> PathBuf {
        self.resolve(&self.storage.entries_dir)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.resolve(&self.storage.metadata_file)
    }

    pub fn scheduler_options(&self) -> SchedulerOptions {
        SchedulerOptions {
            endless_practice: self.scheduler.endless_practice,
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EcueConfig::default();
        assert_eq!(config.logging.log_level, "info");
        assert_eq!(config.storage.cards_file, "cards.json");
        assert_eq!(config.journal.min_words_for_streak, 750);
        assert!(!config.scheduler.endless_practice);
        assert!(config.scheduler.seed.is_none());
        assert!(config.storage.data_dir.ends_with(".ecue"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[logging]
log_level = "debug"

[storage]
data_dir = "/tmp/ecue"
practice_state_file = "/var/lib/ecue/practice.json"

[scheduler]
endless_practice = true
seed = 7
"#;
        let config: EcueConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.log_level, "debug");
        assert!(config.scheduler.endless_practice);
        assert_eq!(config.scheduler.seed, Some(7));
        // defaults still apply for unset fields
        assert_eq!(config.storage.emotions_file, "emotions.json");
        assert_eq!(config.journal.min_words_for_streak, 750);

        assert_eq!(config.cards_path(), PathBuf::from("/tmp/ecue/cards.json"));
        assert_eq!(
            config.practice_state_path(),
            PathBuf::from("/var/lib/ecue/practice.json")
        );
    }

    #[test]
    fn tilde_expands_to_home() {
        let expanded = expand_tilde("~/notes/cards.json");
        assert!(expanded.ends_with("notes/cards.json"));
        assert!(!expanded.starts_with("~"));
        assert_eq!(expand_tilde("plain.json"), PathBuf::from("plain.json"));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = EcueConfig::default();
        std::env::set_var("ECUE_DATA_DIR", "/tmp/override");
        std::env::set_var("ECUE_LOG_LEVEL", "trace");
        std::env::set_var("ECUE_ENDLESS", "1");

        config.apply_env_overrides();

        assert_eq!(config.storage.data_dir, "/tmp/override");
        assert_eq!(config.logging.log_level, "trace");
        assert!(config.scheduler.endless_practice);
        assert_eq!(config.metadata_path(), PathBuf::from("/tmp/override/metadata.json"));

        // Clean up
        std::env::remove_var("ECUE_DATA_DIR");
        std::env::remove_var("ECUE_LOG_LEVEL");
        std::env::remove_var("ECUE_ENDLESS");
    }
}
