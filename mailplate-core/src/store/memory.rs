use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::TemplateError;
use crate::store::TemplateStore;
use crate::types::Template;

/// In-memory template storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    templates: RwLock<BTreeMap<String, Template>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `templates`.
    pub fn with_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let map = templates
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();
        Self {
            templates: RwLock::new(map),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Template>> {
        self.templates.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Template>> {
        self.templates.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl TemplateStore for MemoryStore {
    fn list(&self) -> Result<Vec<Template>, TemplateError> {
        Ok(self.read().values().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Template, TemplateError> {
        self.read()
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::not_found(name))
    }

    fn create(&self, template: Template) -> Result<Template, TemplateError> {
        self.write().insert(template.name.clone(), template.clone());
        Ok(template)
    }

    fn update(&self, name: &str, template: Template) -> Result<Template, TemplateError> {
        let mut templates = self.write();
        if templates.remove(name).is_none() {
            return Err(TemplateError::not_found(name));
        }
        templates.insert(template.name.clone(), template.clone());
        Ok(template)
    }

    fn delete(&self, name: &str) -> Result<Template, TemplateError> {
        self.write()
            .remove(name)
            .ok_or_else(|| TemplateError::not_found(name))
    }
}
