//! # mailplate-service
//!
//! Façades over the store and render engine.
//!
//! - [`TemplateService`] — template CRUD with duplicate-name and
//!   protected-template rules
//! - [`Mailer`] — render a request into an [`OutboundEmail`] envelope
//! - [`response`] — status code / JSON body for an HTTP boundary
//! - [`Mailplate`] — everything above, opened from `config.yaml`

pub mod error;
pub mod mailer;
pub mod response;
pub mod service;

use std::path::Path;
use std::sync::Arc;

use mailplate_core::{config, store, MailplateConfig, TemplateStore};
use mailplate_renderer::RenderEngine;

pub use error::ServiceError;
pub use mailer::{Mailer, OutboundEmail};
pub use response::{ErrorBody, ErrorResponse};
pub use service::TemplateService;

/// Configured template service and mailer sharing one store.
pub struct Mailplate {
    pub config: MailplateConfig,
    pub templates: TemplateService,
    pub mailer: Mailer,
}

impl Mailplate {
    /// Build from an explicit config over the directory store it names.
    pub fn from_config_at(home: &Path, config: MailplateConfig) -> Result<Self, ServiceError> {
        let store: Arc<dyn TemplateStore> = Arc::new(config.open_store_at(home)?);
        Ok(Self::with_store(config, store))
    }

    /// Load `config.yaml` under `home` and open its store.
    pub fn open_at(home: &Path) -> Result<Self, ServiceError> {
        let config = config::load_at(home)?;
        Self::from_config_at(home, config)
    }

    /// `open_at` convenience wrapper.
    pub fn open() -> Result<Self, ServiceError> {
        Self::open_at(&config::home()?)
    }

    /// Build over any store backing.
    pub fn with_store(config: MailplateConfig, store: Arc<dyn TemplateStore>) -> Self {
        let templates =
            TemplateService::new(Arc::clone(&store)).with_update_lookup(config.update_lookup);
        let mailer = Mailer::new(store, RenderEngine::from_config(&config), config.sender.clone());
        Self {
            config,
            templates,
            mailer,
        }
    }

    /// Write default config, create the templates directory, and seed the
    /// protected template. Safe to re-run.
    pub fn init_at(home: &Path) -> Result<Self, ServiceError> {
        let config = config::init_at(home)?;
        let app = Self::from_config_at(home, config)?;
        store::seed_default(app.templates.store())?;
        Ok(app)
    }
}
