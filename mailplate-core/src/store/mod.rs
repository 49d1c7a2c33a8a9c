//! Keyed template storage.
//!
//! [`TemplateStore`] is the seam between the validation/rendering logic and
//! whatever medium holds the documents. Two backings ship here:
//!
//! - [`DirectoryStore`] — one file per template, refreshed from disk whenever
//!   the directory changes underneath it
//! - [`MemoryStore`] — process-local map
//!
//! Stores accept blind writes. Uniqueness and the protected-name rule are
//! enforced one level up, by the service façade.

mod directory;
mod memory;

pub use directory::{DirectoryStore, DEFAULT_EXTENSION};
pub use memory::MemoryStore;

use crate::error::TemplateError;
use crate::types::{Template, DEFAULT_TEMPLATE};

/// Document used when seeding the protected template.
pub const DEFAULT_TEMPLATE_HTML: &str = "%%EMAIL_BODY%%";

/// Durable, name-keyed template storage.
pub trait TemplateStore: Send + Sync {
    /// All known templates, sorted by name.
    fn list(&self) -> Result<Vec<Template>, TemplateError>;

    /// Fails with [`TemplateError::TemplateNotFound`] if absent.
    fn get(&self, name: &str) -> Result<Template, TemplateError>;

    /// Write `template` under its own name, replacing any existing entry.
    fn create(&self, template: Template) -> Result<Template, TemplateError>;

    /// Replace the entry stored under `name` with `template`.
    ///
    /// When `template.name` differs from `name` the old entry is removed.
    fn update(&self, name: &str, template: Template) -> Result<Template, TemplateError>;

    /// Remove and return the entry stored under `name`.
    fn delete(&self, name: &str) -> Result<Template, TemplateError>;

    fn exists(&self, name: &str) -> Result<bool, TemplateError> {
        match self.get(name) {
            Ok(_) => Ok(true),
            Err(TemplateError::TemplateNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Reject names that are blank or unsafe to use as a file stem.
pub fn validate_name(name: &str) -> Result<(), TemplateError> {
    let reason = if name.trim().is_empty() {
        Some("name must not be blank")
    } else if name.contains(['/', '\\', '\0']) {
        Some("name must not contain path separators")
    } else if name.starts_with('.') {
        Some("name must not start with '.'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(TemplateError::InvalidTemplateName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Create the protected template if it is missing.
///
/// Returns the seeded template, or `None` when one already existed.
pub fn seed_default(store: &dyn TemplateStore) -> Result<Option<Template>, TemplateError> {
    if store.exists(DEFAULT_TEMPLATE)? {
        return Ok(None);
    }
    let created = store.create(Template::new(DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_HTML))?;
    tracing::info!(template = DEFAULT_TEMPLATE, "seeded protected template");
    Ok(Some(created))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_name_rejects_unsafe_names() {
        for bad in ["", "   ", "a/b", "a\\b", ".hidden", "nul\0"] {
            let err = validate_name(bad).unwrap_err();
            assert!(
                matches!(err, TemplateError::InvalidTemplateName { .. }),
                "expected InvalidTemplateName for {bad:?}, got {err}"
            );
        }
        validate_name("Welcome Email").expect("plain names are valid");
        validate_name("Default").expect("Default is a valid name");
    }

    #[test]
    fn seed_default_is_idempotent() {
        let store = MemoryStore::new();
        let seeded = seed_default(&store).expect("seed");
        assert_eq!(seeded.map(|t| t.html_format), Some(DEFAULT_TEMPLATE_HTML.to_string()));
        assert!(seed_default(&store).expect("reseed").is_none());
        assert_eq!(store.list().expect("list").len(), 1);
    }
}
