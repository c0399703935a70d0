//! Settings loader with multi-source merging

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use super::{ConfigLoadError, ProxySettings};

const APP_DIR: &str = "toolsearch-proxy";
const PROJECT_FILE: &str = "toolsearch.toml";
const ENV_PREFIX: &str = "TOOLSEARCH_";

/// Loader that handles settings file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `TOOLSEARCH_BACKENDS_PATH`, `TOOLSEARCH_SEARCH__REGION`, ...
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./toolsearch.toml`
    /// 4. Global: `~/.config/toolsearch-proxy/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<ProxySettings, ConfigLoadError> {
        let settings: ProxySettings = Self::figment(config_path)
            .extract()
            .map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(ProxySettings::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// `$XDG_CONFIG_HOME/toolsearch-proxy/config.toml` or the platform equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Project-level settings file, if present in the working directory
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_FILE);
        path.exists().then_some(path)
    }

    /// Describe the settings sources in priority order (for `--show-config`)
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mark = |found: bool| if found { "[FOUND]" } else { "[     ]" };
        let mut lines = Vec::new();

        lines.push(format!("  [     ] Env:      {}*", ENV_PREFIX));
        if let Some(path) = config_path {
            lines.push(format!("  {} Explicit: {}", mark(path.exists()), path.display()));
        }
        lines.push(format!(
            "  {} Project:  ./{}",
            mark(Self::project_config_path().is_some()),
            PROJECT_FILE
        ));
        if let Some(path) = Self::global_config_path() {
            lines.push(format!("  {} Global:   {}", mark(path.exists()), path.display()));
        }
        lines.push("  [     ] Default:  built-in defaults".to_string());
        lines
    }
}
