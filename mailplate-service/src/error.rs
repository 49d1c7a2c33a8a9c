//! Error types for mailplate-service.

use thiserror::Error;

use mailplate_core::{ConfigError, TemplateError};

/// Errors raised while wiring the service together from configuration.
///
/// Per-request failures stay [`TemplateError`]s; this wrapper only exists for
/// the setup path, where configuration can fail too.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An error loading or saving `config.yaml`.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An error from the template store or render pipeline.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}
