use crate::llm::{Credentials, DEFAULT_BASE_URL};
use crate::prompts::PromptTemplate;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API key for the completion service
    pub api_key: Option<String>,

    /// Organization id sent with every request
    pub organization: Option<String>,

    /// Project id sent with every request
    pub project: Option<String>,

    /// Completion API root
    pub base_url: String,

    /// Origin the resource-listing URLs are built from
    pub origin: String,

    /// Replacement bootstrap prompt template
    pub prompt_template: Option<PathBuf>,

    pub models: ModelConfig,

    pub ui: UiConfig,
}

/// Model identifiers for the two call sites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Used once for the bootstrap call
    pub primary: String,
    /// Used for every per-turn send
    pub fast: String,
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub picker_columns: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            organization: None,
            project: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            origin: "http://localhost:3000".to_string(),
            prompt_template: None,
            models: ModelConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            primary: "gpt-o1".to_string(),
            fast: "gpt-4o-mini".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { picker_columns: 8 }
    }
}

impl Config {
    /// Load configuration from `path` (or the default location) and apply
    /// environment overrides. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a single TOML file without consulting the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Write configuration as TOML, creating the parent directory
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Write the default configuration to `path`.
    ///
    /// An existing file is left alone unless `force` is set.
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(anyhow!(
                "Config file {} already exists (use --force to overwrite)",
                path.display()
            ));
        }
        Config::default().save(path)
    }

    /// `<config dir>/worldchat/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("worldchat").join("config.toml"))
    }

    /// Override fields from environment variables looked up through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(organization) = non_empty("OPENAI_ORG_ID") {
            self.organization = Some(organization);
        }
        if let Some(project) = non_empty("OPENAI_PROJECT_ID") {
            self.project = Some(project);
        }
        if let Some(origin) = non_empty("WORLDCHAT_ORIGIN") {
            self.origin = origin;
        }
    }

    /// Credentials for the completion client; fails without an API key
    pub fn credentials(&self) -> Result<Credentials> {
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!("No API key configured. Set OPENAI_API_KEY or api_key in the config file.")
            })?;

        Ok(Credentials {
            api_key,
            organization: self.organization.clone(),
            project: self.project.clone(),
        })
    }

    /// Bootstrap template, either the configured file or the built-in one
    pub fn prompt_template(&self) -> Result<PromptTemplate> {
        match &self.prompt_template {
            Some(path) => PromptTemplate::from_file(path),
            None => Ok(PromptTemplate::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.models.primary, "gpt-o1");
        assert_eq!(config.models.fast, "gpt-4o-mini");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "origin = \"https://world.example\"\n\n[models]\nfast = \"gpt-4.1-mini\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.origin, "https://world.example");
        assert_eq!(config.models.fast, "gpt-4.1-mini");
        assert_eq!(config.models.primary, "gpt-o1");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ui.picker_columns, 8);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "origin = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.organization = Some("org-9".to_string());
        config.save(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn write_default_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worldchat").join("config.toml");

        Config::write_default(&path, false).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        fs::write(&path, "origin = \"http://kept.example\"\n").unwrap();
        assert!(Config::write_default(&path, false).is_err());
        assert_eq!(Config::load_from(&path).unwrap().origin, "http://kept.example");

        Config::write_default(&path, true).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_ORG_ID", "org-env"),
            ("OPENAI_PROJECT_ID", ""),
            ("WORLDCHAT_ORIGIN", "http://env.example"),
        ]
        .into_iter()
        .collect();

        let mut config = Config {
            project: Some("proj-file".to_string()),
            ..Config::default()
        };
        config.apply_env(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.organization.as_deref(), Some("org-env"));
        assert_eq!(config.project.as_deref(), Some("proj-file"));
        assert_eq!(config.origin, "http://env.example");
    }

    #[test]
    fn credentials_require_api_key() {
        let mut config = Config::default();
        assert!(config.credentials().is_err());

        config.api_key = Some("sk-1".to_string());
        config.project = Some("proj".to_string());
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.api_key, "sk-1");
        assert_eq!(credentials.organization, None);
        assert_eq!(credentials.project.as_deref(), Some("proj"));
    }
}
