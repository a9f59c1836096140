use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use hoslabel_parse::lexicon::SYNTHETIC_TAG;
use hoslabel_parse::Lexicon;
use serde::{Deserialize, Serialize};

use crate::error::LabelError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Worker threads for batch resolution; 0 means pick automatically.
    pub workers: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default)]
    pub phrase_rewrites: Vec<PhraseRewrite>,
    #[serde(default)]
    pub subname_rules: Vec<SubnameRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRewrite {
    pub from: String,
    pub to: String,
}

/// A campus phrase rewritten into a branch qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnameRule {
    pub phrase: String,
    pub qualifier: String,
}

impl AppConfig {
    /// Load config from the user config file, or built-in defaults if absent.
    pub fn load() -> Result<Self, LabelError> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, or built-in defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, LabelError> {
        if !path.exists() {
            return toml::from_str(DEFAULT_CONFIG).map_err(|e| LabelError::Config(e.to_string()));
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| LabelError::Config(e.to_string()))?;
        toml::from_str(&content).map_err(|e| LabelError::Config(e.to_string()))
    }

    /// Save config to the user config file.
    pub fn save(&self) -> Result<PathBuf, LabelError> {
        let path = Self::config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), LabelError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| LabelError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "hoslabel")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Parser tables: built-in rules plus the configured extras.
    ///
    /// A rule whose replacement contains its own pattern would rewrite the
    /// same text on every pass, so it is rejected.
    pub fn lexicon(&self) -> Result<Lexicon, LabelError> {
        let normalize = &self.normalize;
        if let Some(r) = normalize.phrase_rewrites.iter().find(|r| reapplies(&r.from, &r.to)) {
            return Err(LabelError::Config(format!(
                "phrase rewrite {:?} -> {:?} re-creates its own pattern",
                r.from, r.to
            )));
        }
        if let Some(r) = normalize
            .subname_rules
            .iter()
            .find(|r| reapplies(&r.phrase, &format!("{}{SYNTHETIC_TAG}", r.qualifier)))
        {
            return Err(LabelError::Config(format!(
                "subname rule {:?} -> {:?} re-creates its own pattern",
                r.phrase, r.qualifier
            )));
        }

        Ok(Lexicon::with_rules(
            normalize
                .subname_rules
                .iter()
                .map(|r| (r.phrase.clone(), r.qualifier.clone())),
            normalize
                .phrase_rewrites
                .iter()
                .map(|r| (r.from.clone(), r.to.clone())),
        ))
    }

    /// Configured worker count, or max(logical CPUs - 1, 1) when unset.
    pub fn worker_count(&self) -> usize {
        if self.general.workers > 0 {
            return self.general.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1).max(1))
            .unwrap_or(1)
    }
}

fn reapplies(from: &str, to: &str) -> bool {
    !from.is_empty() && to.contains(from)
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
