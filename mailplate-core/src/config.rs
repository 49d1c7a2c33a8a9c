//! Engine configuration persisted at `<home>/.mailplate/config.yaml`.
//!
//! # API pattern
//!
//! Functions take an explicit `home: &Path` (`fn_at`), so tests can point them
//! at a `TempDir`. [`home`] resolves the real one from `dirs::home_dir()`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TemplateError};
use crate::store::{DirectoryStore, DEFAULT_EXTENSION};
use crate::types::Placeholder;

/// How the service façade locates the template an update replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateLookup {
    /// Require an existing template named like the *incoming* template.
    #[default]
    IncomingName,
    /// Require an existing template named like the route parameter.
    RouteName,
}

/// `fromName` / `fromEmail` attached to every composed email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderIdentity {
    pub name: String,
    pub email: String,
}

impl Default for SenderIdentity {
    fn default() -> Self {
        Self {
            name: "Mailplate".to_string(),
            email: "no-reply@localhost.localdomain".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailplateConfig {
    /// Defaults to `<home>/.mailplate/templates` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    pub template_extension: String,
    /// Placeholders that must receive a non-blank value when present.
    pub required_placeholders: Vec<Placeholder>,
    pub update_lookup: UpdateLookup,
    pub sender: SenderIdentity,
}

impl Default for MailplateConfig {
    fn default() -> Self {
        Self {
            templates_dir: None,
            template_extension: DEFAULT_EXTENSION.to_string(),
            required_placeholders: vec![Placeholder::Body],
            update_lookup: UpdateLookup::default(),
            sender: SenderIdentity::default(),
        }
    }
}

impl MailplateConfig {
    /// Resolved templates directory for `home`.
    pub fn templates_dir_at(&self, home: &Path) -> PathBuf {
        self.templates_dir
            .clone()
            .unwrap_or_else(|| root_at(home).join("templates"))
    }

    /// Open the directory store this config points at.
    pub fn open_store_at(&self, home: &Path) -> Result<DirectoryStore, TemplateError> {
        DirectoryStore::open_with_extension(self.templates_dir_at(home), &self.template_extension)
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.mailplate/`
pub fn root_at(home: &Path) -> PathBuf {
    home.join(".mailplate")
}

/// `<home>/.mailplate/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    root_at(home).join("config.yaml")
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load the config, falling back to defaults when the file is absent.
///
/// Returns `ConfigError::Parse` (with path) if the YAML is malformed.
pub fn load_at(home: &Path) -> Result<MailplateConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(MailplateConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// Atomically save the config: serialize → `.yaml.tmp` → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, config: &MailplateConfig) -> Result<(), ConfigError> {
    let root = root_at(home);
    std::fs::create_dir_all(&root).map_err(|e| io_err(&root, e))?;

    let path = config_path_at(home);
    let tmp = path.with_file_name("config.yaml.tmp");
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// Write the default config unless one already exists. Returns the effective config.
pub fn init_at(home: &Path) -> Result<MailplateConfig, ConfigError> {
    if config_path_at(home).exists() {
        return load_at(home);
    }
    let config = MailplateConfig::default();
    save_at(home, &config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
