//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration. Command line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Spaces per work package tree level.
    pub indent: usize,

    /// Filter list used when `-f` is not given.
    pub filter: String,

    /// Show day comments in balance output.
    pub comments: bool,

    /// Show activities in work package output.
    pub activities: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: 4,
            filter: "all".to_string(),
            comments: false,
            activities: false,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: built-in defaults, `config.toml` in the user config
    /// directory, the given file, then `TIMEFLIES_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TIMEFLIES_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for timeflies.
///
/// On Linux: `~/.config/timeflies`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timeflies"))
}
