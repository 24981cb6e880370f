//! Reload configuration
//!
//! Resolves where the project lives and which environment-manager
//! conventions to follow. Precedence, highest first: command-line flag,
//! environment variable (both handled by clap), config file, built-in default.
//!
//! Config file format:
//! ```text
//! [Reload]
//! Directory=~/src/myproject
//! Tool=direnv
//! ForceVariable=_nix_direnv_force_reload
//! ForceValue=1
//! NoopCommand=true
//! MarkerFile=.envrc
//! CacheDirectory=.direnv
//! CacheSuffix=.rc
//! ```

mod parser;

pub use parser::{parse_config_file, parse_file, ParseError, ParsedFile};

use std::path::{Path, PathBuf};

use parser::last_value;

pub const DEFAULT_TOOL: &str = "direnv";
pub const DEFAULT_FORCE_VARIABLE: &str = "_nix_direnv_force_reload";
pub const DEFAULT_FORCE_VALUE: &str = "1";
pub const DEFAULT_NOOP_COMMAND: &str = "true";
pub const DEFAULT_MARKER_FILE: &str = ".envrc";
pub const DEFAULT_CACHE_DIR: &str = ".direnv";
pub const DEFAULT_CACHE_SUFFIX: &str = ".rc";

const SECTION: &str = "[Reload]";

/// Config file location under the user config dir (`~/.config/envreload/config`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("envreload").join("config"))
}

/// Values that take precedence over the config file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub project_dir: Option<PathBuf>,
    pub tool: Option<String>,
    /// Explicit config file; unlike the default location it must exist
    pub config_path: Option<PathBuf>,
}

/// Fully resolved settings for one reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadConfig {
    /// Project root holding the marker file
    pub project_dir: PathBuf,
    /// Environment manager command line (shell-quoted, may carry a wrapper)
    pub tool: String,
    /// Variable that makes the tool discard its cache
    pub force_variable: String,
    pub force_value: String,
    /// Command run inside the managed environment to trigger the rebuild
    pub noop_command: String,
    pub marker_file: String,
    /// Cache directory, relative to `project_dir` unless absolute
    pub cache_dir: PathBuf,
    pub cache_suffix: String,
}

impl ReloadConfig {
    /// Built-in conventions for a project directory
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            tool: DEFAULT_TOOL.to_string(),
            force_variable: DEFAULT_FORCE_VARIABLE.to_string(),
            force_value: DEFAULT_FORCE_VALUE.to_string(),
            noop_command: DEFAULT_NOOP_COMMAND.to_string(),
            marker_file: DEFAULT_MARKER_FILE.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache_suffix: DEFAULT_CACHE_SUFFIX.to_string(),
        }
    }

    /// Resolve the effective configuration from overrides, config file and defaults
    pub fn resolve(overrides: &Overrides) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        let mut config = Self::new(cwd);

        match &overrides.config_path {
            Some(path) => config.load_file(path)?,
            None => {
                if let Some(path) = default_config_path().filter(|p| p.is_file()) {
                    config.load_file(&path)?;
                } else {
                    log::debug!("No config file found, using defaults");
                }
            }
        }

        if let Some(dir) = &overrides.project_dir {
            config.project_dir = dir.clone();
        }
        if let Some(tool) = &overrides.tool {
            config.tool = tool.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply settings from a config file on disk
    pub fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let parsed = parse_config_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loaded config from {}", path.display());
        self.apply(&parsed, path.parent());
        Ok(())
    }

    /// Apply the `[Reload]` section of a parsed config file
    ///
    /// A relative `Directory=` is taken relative to `base` (the config file's
    /// directory) when given.
    pub fn apply(&mut self, parsed: &ParsedFile, base: Option<&Path>) {
        let Some(section) = parsed.get(SECTION) else {
            log::debug!("Config has no {} section", SECTION);
            return;
        };

        for key in section.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                log::warn!("Ignoring unknown config key {}", key);
            }
        }

        if let Some(dir) = last_value(section, "DIRECTORY") {
            let dir = expand_home(dir);
            self.project_dir = match base {
                Some(base) if dir.is_relative() => base.join(dir),
                _ => dir,
            };
        }
        if let Some(v) = last_value(section, "TOOL") {
            self.tool = v.to_string();
        }
        if let Some(v) = last_value(section, "FORCEVARIABLE") {
            self.force_variable = v.to_string();
        }
        if let Some(v) = last_value(section, "FORCEVALUE") {
            self.force_value = v.to_string();
        }
        if let Some(v) = last_value(section, "NOOPCOMMAND") {
            self.noop_command = v.to_string();
        }
        if let Some(v) = last_value(section, "MARKERFILE") {
            self.marker_file = v.to_string();
        }
        if let Some(v) = last_value(section, "CACHEDIRECTORY") {
            self.cache_dir = expand_home(v);
        }
        if let Some(v) = last_value(section, "CACHESUFFIX") {
            self.cache_suffix = v.to_string();
        }
    }

    /// Reject settings that cannot produce a working reload
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tool_command()?;
        self.noop_argv()?;

        let var = &self.force_variable;
        if var.is_empty() || var.contains('=') || var.contains('\0') {
            return Err(invalid("ForceVariable", var, "must be a non-empty name without '=' or NUL"));
        }
        if self.force_value.contains('\0') {
            return Err(invalid("ForceValue", &self.force_value, "must not contain NUL"));
        }
        if self.marker_file.is_empty() {
            return Err(invalid("MarkerFile", &self.marker_file, "must not be empty"));
        }
        if self.cache_suffix.is_empty() {
            return Err(invalid("CacheSuffix", &self.cache_suffix, "must not be empty"));
        }

        Ok(())
    }

    /// Tool program and leading arguments
    pub fn tool_command(&self) -> Result<Vec<String>, ConfigError> {
        split_command("Tool", &self.tool)
    }

    /// No-op command run inside the managed environment
    pub fn noop_argv(&self) -> Result<Vec<String>, ConfigError> {
        split_command("NoopCommand", &self.noop_command)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.project_dir.join(&self.marker_file)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.project_dir.join(&self.cache_dir)
    }
}

const KNOWN_KEYS: &[&str] = &[
    "DIRECTORY",
    "TOOL",
    "FORCEVARIABLE",
    "FORCEVALUE",
    "NOOPCOMMAND",
    "MARKERFILE",
    "CACHEDIRECTORY",
    "CACHESUFFIX",
];

fn split_command(key: &'static str, raw: &str) -> Result<Vec<String>, ConfigError> {
    let parts = shlex::split(raw).ok_or_else(|| invalid(key, raw, "invalid shell quoting"))?;
    if parts.is_empty() {
        return Err(invalid(key, raw, "must not be empty"));
    }
    Ok(parts)
}

/// Expand a leading `~` to the home directory
fn expand_home(value: &str) -> PathBuf {
    if value == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = value.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(value)
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: ParseError },

    #[error("Invalid {key} {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}
