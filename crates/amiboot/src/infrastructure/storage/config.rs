//! TOML-based settings for amiboot.
//!
//! Settings are looked up in this order, first existing file wins:
//!
//! 1. the path given with `--config` / `AMIBOOT_CONFIG` (must exist);
//! 2. `$XDG_CONFIG_HOME/amiboot/config.toml` or `~/.config/amiboot/config.toml`;
//! 3. `/etc/amiboot/config.toml`.
//!
//! When none exists the built-in defaults are used; they are the paths of a
//! stock DietPi Amiberry install:
//!
//! ```toml
//! language = "en"
//! log_level = "warn"
//!
//! [target]
//! kind = "service"
//! service_file = "/etc/systemd/system/amiberry.service"
//! directive = "ExecStart"
//! script_file = "/mnt/dietpi_userdata/agplus/amiberry.sh"
//! binary = "amiberry/amiberry"
//!
//! [configs]
//! directory = "/mnt/dietpi_userdata/amiberry/conf"
//! extension = "uae"
//! relative_dir = "./conf/"
//!
//! [launch]
//! param_style = "legacy"
//! write_mode = "direct"
//! ```
//!
//! # Why a settings file?
//!
//! The paths above are what a stock DietPi image uses, and most users never
//! need anything else.  A settings file exists for the rest: a custom image
//! that keeps Amiberry under `/opt`, a launcher script instead of a unit, or
//! an Amiberry new enough to want the `modern` parameter syntax.  Writing it
//! down once saves repeating the same flags on every run.
//!
//! # Serde default values
//!
//! Every field is annotated with `#[serde(default = ...)]`, so a settings file
//! only needs the keys that differ from the defaults.  An empty file is valid.

use std::io;
use std::path::{Path, PathBuf};

use amiboot_core::target::{DEFAULT_BINARY, DEFAULT_DIRECTIVE};
use amiboot_core::template::{DEFAULT_EXTENSION, DEFAULT_RELATIVE_DIR};
use amiboot_core::{
    CurrentConfigPattern, Language, ParamStyle, ParameterTemplate, TargetDescriptor, TargetKind,
    TemplateError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::application::SessionSettings;
use crate::infrastructure::catalog::DirectoryCatalog;
use crate::infrastructure::target_file::WriteMode;

/// Name of the settings file inside each settings directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// System-wide settings file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/amiboot/config.toml";

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The parameter template or configuration extension is invalid.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Language of all printed messages.
    #[serde(default)]
    pub language: Language,
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub configs: ConfigsConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
}

/// Which file holds the launch line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    /// `"service"` edits `service_file`, `"script"` edits `script_file`.
    #[serde(default)]
    pub kind: TargetKind,
    #[serde(default = "default_service_file")]
    pub service_file: PathBuf,
    /// Directive whose value is the launch command.
    #[serde(default = "default_directive")]
    pub directive: String,
    #[serde(default = "default_script_file")]
    pub script_file: PathBuf,
    /// Path suffix identifying the emulator binary in the script.
    #[serde(default = "default_binary")]
    pub binary: String,
}

/// Where the selectable configuration files live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigsConfig {
    /// Directory scanned for configuration files.
    #[serde(default = "default_configs_dir")]
    pub directory: PathBuf,
    /// Extension without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Directory prefix used for the file inside the launch parameters.
    #[serde(default = "default_relative_dir")]
    pub relative_dir: String,
}

/// How the launch line is rewritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaunchConfig {
    /// Built-in parameter syntax, ignored when `template` is set.
    #[serde(default)]
    pub param_style: ParamStyle,
    /// Custom parameter template with one `{}` placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default)]
    pub write_mode: WriteMode,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "warn".to_string()
}
fn default_service_file() -> PathBuf {
    PathBuf::from("/etc/systemd/system/amiberry.service")
}
fn default_directive() -> String {
    DEFAULT_DIRECTIVE.to_string()
}
fn default_script_file() -> PathBuf {
    PathBuf::from("/mnt/dietpi_userdata/agplus/amiberry.sh")
}
fn default_binary() -> String {
    DEFAULT_BINARY.to_string()
}
fn default_configs_dir() -> PathBuf {
    PathBuf::from("/mnt/dietpi_userdata/amiberry/conf")
}
fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}
fn default_relative_dir() -> String {
    DEFAULT_RELATIVE_DIR.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            log_level: default_log_level(),
            target: TargetConfig::default(),
            configs: ConfigsConfig::default(),
            launch: LaunchConfig::default(),
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            kind: TargetKind::default(),
            service_file: default_service_file(),
            directive: default_directive(),
            script_file: default_script_file(),
            binary: default_binary(),
        }
    }
}

impl Default for ConfigsConfig {
    fn default() -> Self {
        Self {
            directory: default_configs_dir(),
            extension: default_extension(),
            relative_dir: default_relative_dir(),
        }
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            param_style: ParamStyle::default(),
            template: None,
            write_mode: WriteMode::default(),
        }
    }
}

// ── Conversion to runtime settings ────────────────────────────────────────────

impl AppConfig {
    /// The file that will be edited, according to `target.kind`.
    pub fn target_path(&self) -> &Path {
        match self.target.kind {
            TargetKind::Service => &self.target.service_file,
            TargetKind::Script => &self.target.script_file,
        }
    }

    /// Builds the descriptor for the configured target.
    pub fn target_descriptor(&self) -> TargetDescriptor {
        match self.target.kind {
            TargetKind::Service => {
                TargetDescriptor::service_unit(&self.target.service_file, &self.target.directive)
            }
            TargetKind::Script => {
                TargetDescriptor::launcher_script(&self.target.script_file, &self.target.binary)
            }
        }
    }

    /// The parameter template: the custom one if set, else the style's.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] if the custom template is invalid.
    pub fn parameter_template(&self) -> Result<ParameterTemplate, ConfigError> {
        match &self.launch.template {
            Some(text) => Ok(ParameterTemplate::new(text.as_str())?),
            None => Ok(self.launch.param_style.template()),
        }
    }

    /// Catalog over the configured directory and extension.
    pub fn catalog(&self) -> DirectoryCatalog {
        DirectoryCatalog::new(&self.configs.directory, &self.configs.extension)
    }

    /// Validates the settings and converts them for the session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] for an invalid template or extension.
    pub fn session_settings(&self, dry_run: bool) -> Result<SessionSettings, ConfigError> {
        Ok(SessionSettings {
            target: self.target_descriptor(),
            template: self.parameter_template()?,
            current_pattern: CurrentConfigPattern::new(
                &self.configs.relative_dir,
                &self.configs.extension,
            )?,
            language: self.language,
            write_mode: self.launch.write_mode,
            dry_run,
        })
    }

    /// Renders the settings as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Settings loading ──────────────────────────────────────────────────────────

/// Loads settings from `explicit` if given, else from the first existing
/// default location, else returns [`AppConfig::default()`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if `explicit` is missing or any existing file
/// cannot be read, and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_settings(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        return parse_config(path, &content);
    }

    for path in default_config_paths() {
        match std::fs::read_to_string(&path) {
            Ok(content) => return parse_config(&path, &content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(source) => return Err(ConfigError::Io { path, source }),
        }
    }

    debug!("no settings file found; using defaults");
    Ok(AppConfig::default())
}

fn parse_config(path: &Path, content: &str) -> Result<AppConfig, ConfigError> {
    let cfg = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded settings");
    Ok(cfg)
}

/// Default settings locations, most specific first.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = user_config_dir() {
        paths.push(dir.join("amiboot").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(SYSTEM_CONFIG_PATH));
    paths
}

/// `XDG_CONFIG_HOME`, or `~/.config`.
fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
