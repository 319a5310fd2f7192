use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::paths::AppPaths;
use crate::metrics::PricingTable;

/// Typed application settings.
///
/// Values come from `config.yml` when one exists (user data dir first,
/// then project root), with environment variables taking precedence for
/// the deploy-sensitive fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub pricing: PricingTable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub name: String,
    pub base_url: String,
    pub api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            model: ModelSettings::default(),
            pricing: PricingTable::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: "gemini-flash-lite-latest".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
        }
    }
}

impl Settings {
    pub fn load(paths: &AppPaths) -> Self {
        let mut settings = config_path(paths)
            .and_then(|path| load_yaml_file(&path))
            .unwrap_or_default();
        settings.apply_env_overrides();
        settings
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(port) = env::var("PORT").ok().and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Ok(key) = env::var("GOOGLE_API_KEY") {
            if !key.trim().is_empty() {
                self.model.api_key = key.trim().to_string();
            }
        }
        if let Ok(model) = env::var("RETIRA_MODEL") {
            if !model.trim().is_empty() {
                self.model.name = model.trim().to_string();
            }
        }
    }
}

fn config_path(paths: &AppPaths) -> Option<PathBuf> {
    if let Ok(path) = env::var("RETIRA_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }

    let user_config = paths.user_data_dir.join("config.yml");
    if user_config.exists() {
        return Some(user_config);
    }

    let project_config = paths.project_root.join("config.yml");
    if project_config.exists() {
        return Some(project_config);
    }

    None
}

fn load_yaml_file(path: &Path) -> Option<Settings> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), err);
            return None;
        }
    };

    match serde_yaml::from_str::<Settings>(&contents) {
        Ok(settings) => Some(settings),
        Err(err) => {
            tracing::warn!(
                "Invalid config file {}: {}; using defaults",
                path.display(),
                err
            );
            None
        }
    }
}
