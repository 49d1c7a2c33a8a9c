//! Template CRUD façade.
//!
//! Rules a single store write cannot see on its own:
//! - names are unique across the collection
//! - the `Default` template is never updated or deleted
//! - an update must target a template that already exists

use std::sync::Arc;

use mailplate_core::{
    store::validate_name, Action, Template, TemplateError, TemplateStore, UpdateLookup,
    DEFAULT_TEMPLATE,
};

pub struct TemplateService {
    store: Arc<dyn TemplateStore>,
    update_lookup: UpdateLookup,
}

impl TemplateService {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self {
            store,
            update_lookup: UpdateLookup::default(),
        }
    }

    pub fn with_update_lookup(mut self, update_lookup: UpdateLookup) -> Self {
        self.update_lookup = update_lookup;
        self
    }

    pub fn store(&self) -> &dyn TemplateStore {
        self.store.as_ref()
    }

    /// Names of all templates, each exactly once.
    pub fn list_names(&self) -> Result<Vec<String>, TemplateError> {
        Ok(self.store.list()?.into_iter().map(|t| t.name).collect())
    }

    pub fn list(&self) -> Result<Vec<Template>, TemplateError> {
        self.store.list()
    }

    #[tracing::instrument(name = "templates.get", skip(self))]
    pub fn get_by_name(&self, name: &str) -> Result<Template, TemplateError> {
        self.store.get(name)
    }

    /// Store a template under a name not yet in use.
    ///
    /// The uniqueness check and the write are two separate store calls with
    /// no lock held in between; two concurrent creates of the same name can
    /// both pass the check, and the later write wins.
    #[tracing::instrument(name = "templates.create", skip(self, template), fields(template = %template.name))]
    pub fn create(&self, template: Template) -> Result<Template, TemplateError> {
        validate_name(&template.name)?;
        if self.exists(&template.name)? {
            return Err(TemplateError::DuplicateTemplateName {
                name: template.name,
            });
        }
        let created = self.store.create(template)?;
        tracing::info!("template created");
        Ok(created)
    }

    /// Replace a template.
    ///
    /// Which existing template must be present depends on [`UpdateLookup`]:
    /// `IncomingName` looks for `template.name` (the route name is only checked
    /// against the protected name), `RouteName` looks for `name` and treats a
    /// differing `template.name` as a rename.
    #[tracing::instrument(
        name = "templates.update",
        skip(self, template),
        fields(incoming = %template.name, lookup = ?self.update_lookup)
    )]
    pub fn update(&self, name: &str, template: Template) -> Result<Template, TemplateError> {
        protect(name, Action::Updated)?;
        validate_name(&template.name)?;

        let target = match self.update_lookup {
            UpdateLookup::IncomingName => template.name.clone(),
            UpdateLookup::RouteName => name.to_string(),
        };
        protect(&target, Action::Updated)?;

        if !self.exists(&target)? {
            return Err(TemplateError::not_found(target));
        }
        if self.update_lookup == UpdateLookup::RouteName
            && template.name != target
            && self.exists(&template.name)?
        {
            return Err(TemplateError::DuplicateTemplateName {
                name: template.name,
            });
        }

        let updated = self.store.update(&target, template)?;
        tracing::info!(replaced = %target, "template updated");
        Ok(updated)
    }

    #[tracing::instrument(name = "templates.delete", skip(self))]
    pub fn delete(&self, name: &str) -> Result<Template, TemplateError> {
        protect(name, Action::Deleted)?;
        if !self.exists(name)? {
            return Err(TemplateError::not_found(name));
        }
        let removed = self.store.delete(name)?;
        tracing::info!("template deleted");
        Ok(removed)
    }

    /// Exact-name presence. A document present but unreadable is a
    /// `Storage` error, not absent.
    fn exists(&self, name: &str) -> Result<bool, TemplateError> {
        self.store.exists(name)
    }
}

fn protect(name: &str, action: Action) -> Result<(), TemplateError> {
    if name == DEFAULT_TEMPLATE {
        return Err(TemplateError::Unauthorized {
            name: name.to_string(),
            action,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
