//! Global configuration.
//!
//! Loaded from `ripl.toml` in the current working directory, if one exists.
//! Every setting has a default, so the file and any of its sections can be omitted.
//!
//! ```toml
//! [general]
//! cache_templates = true
//!
//! [templates]
//! base_path = "/static/templates/"
//! extension = "html"
//!
//! [transport]
//! origin = "http://localhost:8000"
//! timeout = 5
//! ```
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::env::var;
use std::fs::read_to_string;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::http::TemplateUrl;

static CONFIG: OnceCell<Config> = OnceCell::new();

const CONFIG_FILES: [&str; 2] = ["ripl.toml", "Ripl.toml"];

#[derive(Error, Debug)]
pub enum Error {
    #[error("config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is already loaded")]
    ConfigLoaded,

    #[error("config not found")]
    NoConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    path: Option<PathBuf>,
    pub general: General,
    pub templates: Templates,
    pub transport: Transport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct General {
    /// Keep compiled templates in memory. When disabled, every request
    /// fetches and compiles the template again.
    pub cache_templates: bool,
    /// Log with colors.
    #[serde(skip, default = "General::default_tty")]
    pub tty: bool,
}

impl Default for General {
    fn default() -> Self {
        Self {
            cache_templates: true,
            tty: General::default_tty(),
        }
    }
}

impl General {
    fn default_tty() -> bool {
        std::io::stderr().is_terminal()
    }
}

/// Template URL scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Templates {
    pub base_path: String,
    pub extension: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            base_path: "/static/templates/".into(),
            extension: "html".into(),
        }
    }
}

impl Templates {
    pub fn url(&self) -> TemplateUrl {
        TemplateUrl::new(&self.base_path, &self.extension)
    }
}

/// Where templates are fetched from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Transport {
    /// Web server serving the templates.
    pub origin: Option<Url>,
    /// Local folder serving the templates. Used when no origin is set.
    pub root: Option<PathBuf>,
    /// URL prefix removed before looking up files in the root folder.
    pub prefix: String,
    /// HTTP request timeout, in seconds.
    #[serde(rename = "timeout")]
    pub timeout_secs: u64,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            origin: None,
            root: None,
            prefix: "/".into(),
            timeout_secs: 5,
        }
    }
}

impl Transport {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from `ripl.toml` in the current working directory.
    pub fn load() -> Result<Config, Error> {
        Config::load_in(Path::new(""))
    }

    /// Load configuration from `ripl.toml` in the given folder.
    pub fn load_in(dir: &Path) -> Result<Config, Error> {
        let path = CONFIG_FILES
            .iter()
            .map(|file| dir.join(file))
            .find(|path| path.exists())
            .ok_or(Error::NoConfig)?;

        Config::from_file(&path)
    }

    /// Load configuration from the current working directory, using defaults
    /// if there is no config file. A config file that can't be read or parsed is an error.
    pub fn load_or_default() -> Result<Config, Error> {
        Config::load_or_default_in(Path::new(""))
    }

    pub fn load_or_default_in(dir: &Path) -> Result<Config, Error> {
        match Config::load_in(dir) {
            Err(Error::NoConfig) => Ok(Config::default().env()),
            result => result,
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, Error> {
        let text = read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&text)?;
        config.path = Some(path.as_ref().to_owned());

        Ok(config.env())
    }

    /// Apply `RIPL_ORIGIN` and `RIPL_TEMPLATE_ROOT` overrides.
    pub fn env(mut self) -> Self {
        if let Ok(origin) = var("RIPL_ORIGIN") {
            match Url::parse(&origin) {
                Ok(origin) => self.transport.origin = Some(origin),
                Err(err) => warn!("ignoring RIPL_ORIGIN=\"{}\": {}", origin, err),
            }
        }

        if let Ok(root) = var("RIPL_TEMPLATE_ROOT") {
            self.transport.root = Some(PathBuf::from(root));
        }

        self
    }

    /// Set the global configuration. Fails if it's already been set or loaded.
    pub fn set(config: Config) -> Result<(), Error> {
        CONFIG.set(config).map_err(|_| Error::ConfigLoaded)
    }

    pub fn get() -> &'static Config {
        get_config()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn log_info(&self) {
        match self.path {
            Some(ref path) => info!("Configuration loaded from \"{}\"", path.display()),
            None => info!("Configuration file not found, using defaults"),
        }

        if !self.general.cache_templates {
            info!("Template cache is disabled");
        }
    }
}

/// Global configuration, loaded on first use.
///
/// Falls back to defaults if the config file is missing, or can't be loaded. Use
/// [`Config::load_or_default`] and [`Config::set`] to handle a broken config file instead.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| match Config::load_or_default() {
        Ok(config) => config,
        Err(err) => {
            warn!("{}, using defaults", err);
            Config::default().env()
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").expect("empty config");

        assert!(config.general.cache_templates);
        assert_eq!(
            config.templates.url().url("header"),
            "/static/templates/header.html"
        );
        assert!(config.transport.origin.is_none());
        assert_eq!(config.transport.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_file() -> Result<(), Error> {
        let dir = TempDir::new("ripl-config")?;
        let path = dir.path().join("ripl.toml");

        std::fs::write(
            &path,
            r#"
[general]
cache_templates = false

[templates]
base_path = "views"
extension = ".hbs"

[transport]
origin = "http://localhost:8000"
timeout = 1
"#,
        )?;

        let config = Config::from_file(&path)?;

        assert_eq!(config.path(), Some(path.as_path()));
        assert!(!config.general.cache_templates);
        assert_eq!(config.templates.url().url("index"), "/views/index.hbs");
        assert_eq!(config.transport.timeout(), Duration::from_secs(1));

        Ok(())
    }

    #[test]
    fn test_load_or_default() -> Result<(), Error> {
        let dir = TempDir::new("ripl-config")?;

        // No file.
        let config = Config::load_or_default_in(dir.path())?;
        assert!(config.path().is_none());
        assert!(config.general.cache_templates);

        std::fs::write(dir.path().join("ripl.toml"), "[general]\ncache_templates = false\n")?;
        let config = Config::load_or_default_in(dir.path())?;
        assert_eq!(config.path(), Some(dir.path().join("ripl.toml").as_path()));
        assert!(!config.general.cache_templates);

        Ok(())
    }

    #[test]
    fn test_malformed_file_is_reported() -> Result<(), Error> {
        for text in [
            "[general]\ncache_templates = \"yes\"\n",
            "[transport]\norigin = \"nope\"\n",
            "[general\n",
        ] {
            let dir = TempDir::new("ripl-config")?;
            std::fs::write(dir.path().join("ripl.toml"), text)?;

            assert!(matches!(
                Config::load_or_default_in(dir.path()),
                Err(Error::Toml(_))
            ));
        }

        Ok(())
    }

    #[test]
    fn test_bad_file() {
        assert!(matches!(
            toml::from_str::<Config>("[general]\ncache_templates = \"yes\""),
            Err(_)
        ));
        assert!(matches!(
            Config::from_file("/definitely/not/here/ripl.toml"),
            Err(Error::Io(_))
        ));
    }
}
