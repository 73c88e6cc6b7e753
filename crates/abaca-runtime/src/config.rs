use crate::auth::{AuthContext, Role};
use crate::{Error, Result};
use abaca_types::{EntityKind, ViewConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const TOKEN_ENV: &str = "ABACA_TOKEN";
pub const ROLE_ENV: &str = "ABACA_ROLE";

/// Resolve the workspace directory holding `config.toml`:
/// 1. Explicit path (with tilde expansion)
/// 2. ABACA_PATH environment variable (with tilde expansion)
/// 3. XDG config directory
/// 4. ~/.abaca (fallback for systems without XDG)
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("ABACA_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("abaca"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".abaca"));
    }

    Err(Error::Config(
        "Could not determine workspace path: no HOME directory or XDG config directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            token: None,
            role: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    /// Per-entity view overrides, keyed by entity name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub views: BTreeMap<String, ViewConfig>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_workspace_path(None)?.join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        for (name, view) in &self.views {
            let entity: EntityKind = name
                .parse()
                .map_err(|e: String| Error::Config(format!("[views.{}]: {}", name, e)))?;
            view.validate()
                .map_err(|e| Error::Config(format!("[views.{}]: {}", entity, e)))?;
        }
        Ok(())
    }

    /// Configured override for the entity, or the built-in view
    pub fn view_config(&self, entity: EntityKind) -> ViewConfig {
        self.views
            .iter()
            .find(|(name, _)| name.parse::<EntityKind>() == Ok(entity))
            .map(|(_, view)| view.clone())
            .unwrap_or_else(|| abaca_engine::catalog::view_config(entity).clone())
    }

    pub fn set_view(&mut self, entity: EntityKind, view: ViewConfig) {
        self.views.insert(entity.as_str().to_string(), view);
    }

    /// Auth capability: `ABACA_TOKEN` and `ABACA_ROLE` win over `[api]`
    pub fn auth(&self) -> AuthContext {
        self.auth_with(std::env::var(TOKEN_ENV).ok(), std::env::var(ROLE_ENV).ok())
    }

    fn auth_with(&self, env_token: Option<String>, env_role: Option<String>) -> AuthContext {
        let token = env_token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api.token.clone());

        let env_role = env_role
            .filter(|r| !r.trim().is_empty())
            .and_then(|r| match r.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!("ignoring {}: {}", ROLE_ENV, e);
                    None
                }
            });

        AuthContext::new(token).with_role(env_role.or(self.api.role))
    }
}
