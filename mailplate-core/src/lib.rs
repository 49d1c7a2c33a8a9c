//! Mailplate core library — template entity, placeholder substitution,
//! error taxonomy, storage, and configuration.
//!
//! - [`types`] — [`Template`], [`Fragments`], [`Placeholder`]
//! - [`substitution`] — single-pass token replacement
//! - [`error`] — [`TemplateError`], [`ConfigError`]
//! - [`store`] — [`TemplateStore`] and its backings
//! - [`config`] — load / save / init of `config.yaml`

pub mod config;
pub mod error;
pub mod store;
pub mod substitution;
pub mod types;

pub use config::{MailplateConfig, SenderIdentity, UpdateLookup};
pub use error::{Action, ConfigError, ErrorKind, TemplateError};
pub use store::{DirectoryStore, MemoryStore, TemplateStore};
pub use types::{Fragments, Placeholder, Template, DEFAULT_TEMPLATE};
