use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Environment variable prefix; nested keys are separated by `__`,
/// e.g. `PROPLINE_DETECTION__TOP_N=10`.
pub const ENV_PREFIX: &str = "PROPLINE_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from `config/Config.toml` layered over the
    /// built-in tables, then environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads configuration from a specific TOML or JSON file.
    ///
    /// A missing file is not an error: the built-in defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment overrides cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let figment = Figment::from(Serialized::defaults(AppConfig::default()));

        let figment = if path.extension().is_some_and(|ext| ext == "json") {
            figment.merge(Json::file(path))
        } else {
            figment.merge(Toml::file(path))
        };

        let config: AppConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            trusted_sportsbook = %config.trusted_sportsbook,
            team_aliases = config.normalizer.team_aliases.len(),
            prop_aliases = config.normalizer.prop_aliases.len(),
            "Configuration loaded"
        );

        Ok(config)
    }
}
