//! Error types for mailplate-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::Placeholder;

/// Every reason a render, lookup, or template mutation can fail.
///
/// Each validation rule maps to exactly one variant. Callers decide how to
/// react by matching on the variant (or on [`TemplateError::kind`]), never on
/// the rendered message.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Recipient or title missing, or recipient malformed.
    #[error("invalid email request: {field} {reason}")]
    BadEmailModel { field: String, reason: String },

    /// A mandatory placeholder is present in the template but its fragment is blank.
    #[error("template requires a value for {field}")]
    TemplateRequiredFieldNotSet { field: Placeholder },

    /// A fragment value still contains a raw placeholder token.
    #[error("{field} contains the unexpanded placeholder {token}")]
    EmailStringContainsPlaceholder { field: String, token: String },

    /// No template with this name exists.
    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    /// A template with this name already exists.
    #[error("a template named '{name}' already exists")]
    DuplicateTemplateName { name: String },

    /// Attempt to modify or delete the protected template.
    #[error("the '{name}' template cannot be {action}")]
    Unauthorized { name: String, action: Action },

    /// The name is empty or cannot be stored on the backing medium.
    #[error("invalid template name '{name}': {reason}")]
    InvalidTemplateName { name: String, reason: String },

    /// The backing medium could not be read or written.
    #[error("template storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Mutating operation refused on a protected template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Updated,
    Deleted,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Updated => write!(f, "updated"),
            Action::Deleted => write!(f, "deleted"),
        }
    }
}

/// Fieldless discriminant of [`TemplateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadEmailModel,
    TemplateRequiredFieldNotSet,
    EmailStringContainsPlaceholder,
    TemplateNotFound,
    DuplicateTemplateName,
    Unauthorized,
    InvalidTemplateName,
    Internal,
}

impl ErrorKind {
    /// HTTP-style status an outer boundary should answer with.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::BadEmailModel
            | ErrorKind::TemplateRequiredFieldNotSet
            | ErrorKind::EmailStringContainsPlaceholder
            | ErrorKind::DuplicateTemplateName
            | ErrorKind::InvalidTemplateName => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::TemplateNotFound => 404,
            ErrorKind::Internal => 500,
        }
    }
}

impl TemplateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TemplateError::BadEmailModel { .. } => ErrorKind::BadEmailModel,
            TemplateError::TemplateRequiredFieldNotSet { .. } => {
                ErrorKind::TemplateRequiredFieldNotSet
            }
            TemplateError::EmailStringContainsPlaceholder { .. } => {
                ErrorKind::EmailStringContainsPlaceholder
            }
            TemplateError::TemplateNotFound { .. } => ErrorKind::TemplateNotFound,
            TemplateError::DuplicateTemplateName { .. } => ErrorKind::DuplicateTemplateName,
            TemplateError::Unauthorized { .. } => ErrorKind::Unauthorized,
            TemplateError::InvalidTemplateName { .. } => ErrorKind::InvalidTemplateName,
            TemplateError::Storage { .. } => ErrorKind::Internal,
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        TemplateError::TemplateNotFound { name: name.into() }
    }

    pub fn bad_model(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TemplateError::BadEmailModel {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading or saving `config.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed config on load, with the file path.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TemplateError {
    TemplateError::Storage {
        path: path.into(),
        source,
    }
}
