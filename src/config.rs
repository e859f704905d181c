use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::auth::Password;

const FILE_STEM: &str = "jenkins-service";

/// Configuration file structure for jenkins-service.
///
/// Holds the connection parameters so they do not have to be passed on every
/// invocation. Command-line flags and environment variables take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub jenkins: JenkinsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JenkinsConfig {
    /// Jenkins server URL, including any context path
    #[serde(default = "default_url")]
    pub url: String,

    /// User for basic authentication
    pub username: Option<String>,

    /// Password or API token for basic authentication
    pub password: Option<Password>,
}

impl Default for JenkinsConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
        }
    }
}

fn default_url() -> String {
    "http://localhost:8080".to_string()
}

impl JenkinsConfig {
    /// Overrides file values with whatever was given on the command line.
    pub fn merge(
        mut self,
        url: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        if let Some(url) = url {
            self.url = url;
        }
        if username.is_some() {
            self.username = username;
        }
        if let Some(password) = password {
            self.password = Some(Password::from(password));
        }
        self
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./jenkins-service.toml
    /// 3. ./jenkins-service.json
    /// 4. ./jenkins-service.yaml
    /// 5. ./jenkins-service.yml
    /// 6. `<config dir>/jenkins-service/config.toml`
    ///
    /// Returns default configuration if no file is found. An explicitly
    /// specified path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = ["toml", "json", "yaml", "yml"]
            .iter()
            .map(|ext| PathBuf::from(format!("{FILE_STEM}.{ext}")))
            .chain(dirs::config_dir().map(|dir| dir.join(FILE_STEM).join("config.toml")));

        for candidate in candidates {
            if candidate.exists() {
                log::debug!("Using config file {}", candidate.display());
                return Self::load_from_path(&candidate);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }
}
