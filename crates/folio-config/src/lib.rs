//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `content.source_dir`
//! - `cache.dir`

mod expand;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override cache directory.
    pub cache_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    content: ContentConfigRaw,
    cache: CacheConfigRaw,
    /// Extensions claimed by each interpreter kind.
    pub interpreters: InterpretersConfig,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    control_file: Option<String>,
    index_name: Option<String>,
}

/// Content tree settings with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Root of the content tree.
    pub source_dir: PathBuf,
    /// Per-folder control file name.
    pub control_file: String,
    /// Base name of folder index pages.
    pub index_name: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
}

/// Folder cache settings.
#[derive(Debug, Default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Where on-disk entries live.
    pub dir: PathBuf,
}

/// Extensions for each interpreter kind, without the leading dot.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InterpretersConfig {
    pub static_extensions: Vec<String>,
    pub markup_extensions: Vec<String>,
    pub script_extensions: Vec<String>,
}

impl Default for InterpretersConfig {
    fn default() -> Self {
        Self {
            static_extensions: vec!["html".to_owned(), "txt".to_owned()],
            markup_extensions: vec!["md".to_owned(), "markdown".to_owned()],
            script_extensions: vec!["page".to_owned()],
        }
    }
}

impl InterpretersConfig {
    /// Validate that every extension is usable and claimed by one kind only.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` on an empty extension, one containing
    /// a separator, or one listed under two kinds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut owners: HashMap<String, &str> = HashMap::new();
        let groups = [
            ("interpreters.static_extensions", &self.static_extensions),
            ("interpreters.markup_extensions", &self.markup_extensions),
            ("interpreters.script_extensions", &self.script_extensions),
        ];

        for (field, extensions) in groups {
            for extension in extensions {
                let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
                require_file_name(&normalized, field)?;
                if normalized.contains('.') {
                    return Err(ConfigError::Validation(format!(
                        "{field}: extension '{extension}' cannot contain '.'"
                    )));
                }
                if let Some(owner) = owners.insert(normalized, field)
                    && owner != field
                {
                    return Err(ConfigError::Validation(format!(
                        "extension '{extension}' listed in both {owner} and {field}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`content.source_dir`").
        field: String,
        /// Error message (e.g., "${`CONTENT_DIR`} not set").
        message: String,
    },
}

/// Require a value usable as a single file name.
fn require_file_name(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    if value.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "{field} cannot contain a path separator"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, so they take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else {
            let cwd = std::env::current_dir()?;
            match discover_config(&cwd) {
                Some(discovered) => Self::load_from_file(&discovered)?,
                None => Self::default_with_base(&cwd),
            }
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = enabled;
        }
        if let Some(dir) = &settings.cache_dir {
            self.cache_resolved.dir.clone_from(dir);
        }
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            content: ContentConfigRaw::default(),
            cache: CacheConfigRaw::default(),
            interpreters: InterpretersConfig::default(),
            content_resolved: ContentConfig::default(),
            cache_resolved: CacheConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_file_name(&self.content_resolved.control_file, "content.control_file")?;
        require_file_name(&self.content_resolved.index_name, "content.index_name")?;
        self.interpreters.validate()
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.content.source_dir {
            self.content.source_dir = Some(expand::expand_env(dir, "content.source_dir")?);
        }
        if let Some(ref dir) = self.cache.dir {
            self.cache.dir = Some(expand::expand_env(dir, "cache.dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory and fill defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.content_resolved = ContentConfig {
            source_dir: resolve(self.content.source_dir.as_deref(), "content"),
            control_file: self
                .content
                .control_file
                .clone()
                .unwrap_or_else(|| "_folder.yaml".to_owned()),
            index_name: self
                .content
                .index_name
                .clone()
                .unwrap_or_else(|| "index".to_owned()),
        };
        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir: resolve(self.cache.dir.as_deref(), ".folio/cache"),
        };
    }
}

/// Search for the config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
