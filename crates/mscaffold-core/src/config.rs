//! Configuration management for mscaffold.
//!
//! This module defines the `Config` struct holding the settings that are not
//! passed on every invocation: template overrides, merge policy, docblock
//! defaults and the websites used for vhost generation. The configuration can
//! be loaded from a YAML or TOML file, or created programmatically. Values
//! given on the command line take precedence.
//!
//! # Examples
//!
//! ```
//! use mscaffold_core::config::Config;
//! use mscaffold_core::xml::ExtendMode;
//!
//! let config: Config = serde_yaml::from_str(r#"
//! extend_mode: upsert
//! author_name: Jane Doe
//! websites:
//!   - code: base
//!     base_url: http://shop.example.test/
//! "#).unwrap();
//!
//! assert_eq!(config.extend_mode, ExtendMode::Upsert);
//! assert_eq!(config.websites[0].host_name(), Some("shop.example.test"));
//! ```

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::xml::ExtendMode;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use url::Url;

/// File names looked up in the application root, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["mscaffold.yaml", "mscaffold.yml", "mscaffold.toml"];

/// Configuration for mscaffold commands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Optional path to a template directory overriding the built-in templates
    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    /// How widget entries are merged into an existing descriptor
    #[serde(default)]
    pub extend_mode: ExtendMode,

    /// Report existing block/template artifacts as skipped instead of failing
    #[serde(default)]
    pub skip_existing: bool,

    /// Default author for docblock comments
    #[serde(default)]
    pub author_name: Option<String>,

    /// Default author email for docblock comments
    #[serde(default)]
    pub author_email: Option<String>,

    /// Websites served by the application, used for vhost generation
    #[serde(default)]
    pub websites: Vec<WebsiteConfig>,
}

/// A website and its unsecure base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteConfig {
    /// Website code, e.g. `base` or `admin`
    pub code: String,

    /// Base URL the website is served from
    pub base_url: Url,
}

impl WebsiteConfig {
    pub fn new(code: impl Into<String>, base_url: Url) -> Self {
        Self {
            code: code.into(),
            base_url,
        }
    }

    /// Host part of the base URL
    pub fn host_name(&self) -> Option<&str> {
        self.base_url.host_str()
    }
}

impl Config {
    /// Load configuration from a YAML or TOML file, chosen by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref).map_err(|e| Error::file_io(path_ref, e))?;
        let config = if path_ref.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        log::debug!("Loaded configuration from {}", path_ref.display());
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_ref = path.as_ref();
        let content = if path_ref.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize configuration: {e}")))?
        } else {
            serde_yaml::to_string(self)?
        };
        std::fs::write(path_ref, content).map_err(|e| Error::file_io(path_ref, e))?;
        Ok(())
    }

    /// Load the first configuration file found in `root`, or the defaults
    pub fn discover(root: &Path) -> Result<Self> {
        for name in CONFIG_FILE_NAMES {
            let candidate = root.join(name);
            if candidate.is_file() {
                return Self::from_file(candidate);
            }
        }
        Ok(Self::default())
    }
}
