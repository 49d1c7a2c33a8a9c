//! Directory-backed template store.
//!
//! # Storage layout
//!
//! ```text
//! <dir>/
//!   Default.html        (file stem = template name, content = html_format)
//!   Welcome.html
//!   Welcome.html.tmp    (transient, ignored)
//! ```
//!
//! The directory is the source of truth. Each operation takes the index lock,
//! compares the directory's current [`MediumSignal`] with the one seen at the
//! last load, reloads everything when they differ, and only then serves. Files
//! dropped in by another process become visible on the next call.
//!
//! A document that cannot be read (permissions, non-UTF-8 bytes) is left out
//! of the index and logged. Only operations naming that template fail; the
//! rest of the directory keeps being served.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use crate::error::{io_err, TemplateError};
use crate::store::{validate_name, TemplateStore};
use crate::types::Template;

pub const DEFAULT_EXTENSION: &str = "html";

/// Cheap fingerprint of the directory contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MediumSignal {
    count: usize,
    latest_modified: Option<SystemTime>,
}

/// Read failure recorded for one document at the last load.
#[derive(Debug, Clone)]
struct Unreadable {
    path: PathBuf,
    kind: std::io::ErrorKind,
    message: String,
}

impl Unreadable {
    fn to_error(&self) -> TemplateError {
        io_err(&self.path, std::io::Error::new(self.kind, self.message.clone()))
    }
}

#[derive(Debug, Default)]
struct Index {
    templates: BTreeMap<String, Template>,
    unreadable: BTreeMap<String, Unreadable>,
    signal: Option<MediumSignal>,
}

impl Index {
    /// Clone out `name`, or the error explaining why it is unavailable.
    fn lookup(&self, name: &str) -> Result<Template, TemplateError> {
        if let Some(template) = self.templates.get(name) {
            return Ok(template.clone());
        }
        match self.unreadable.get(name) {
            Some(failure) => Err(failure.to_error()),
            None => Err(TemplateError::not_found(name)),
        }
    }
}

/// File-per-template store rooted at a directory.
#[derive(Debug)]
pub struct DirectoryStore {
    dir: PathBuf,
    extension: String,
    index: Mutex<Index>,
}

impl DirectoryStore {
    /// Open (creating if needed) a store over `dir` using `.html` files.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        Self::open_with_extension(dir, DEFAULT_EXTENSION)
    }

    pub fn open_with_extension(
        dir: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let dir = dir.into();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        }
        Ok(Self {
            dir,
            extension: extension.into(),
            index: Mutex::new(Index::default()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<name>.<ext>` — pure, no I/O.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{}", self.extension))
    }

    fn lock(&self) -> MutexGuard<'_, Index> {
        self.index.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reload `index` if the directory changed since the last load.
    fn refresh(&self, index: &mut Index) -> Result<(), TemplateError> {
        let (entries, signal) = self.scan()?;
        if index.signal == Some(signal) {
            tracing::debug!(dir = %self.dir.display(), "template index current");
            return Ok(());
        }
        self.load(index, entries, signal)
    }

    /// Unconditional reload, used after this store writes.
    fn reload(&self, index: &mut Index) -> Result<(), TemplateError> {
        let (entries, signal) = self.scan()?;
        self.load(index, entries, signal)
    }

    fn load(
        &self,
        index: &mut Index,
        entries: Vec<(String, PathBuf)>,
        signal: MediumSignal,
    ) -> Result<(), TemplateError> {
        let mut templates = BTreeMap::new();
        let mut unreadable = BTreeMap::new();
        for (name, path) in entries {
            match std::fs::read_to_string(&path) {
                Ok(html_format) => {
                    templates.insert(name.clone(), Template { name, html_format });
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable template");
                    unreadable.insert(
                        name,
                        Unreadable {
                            path,
                            kind: e.kind(),
                            message: e.to_string(),
                        },
                    );
                }
            }
        }
        tracing::debug!(
            dir = %self.dir.display(),
            count = templates.len(),
            skipped = unreadable.len(),
            "reloaded template index"
        );
        index.templates = templates;
        index.unreadable = unreadable;
        index.signal = Some(signal);
        Ok(())
    }

    /// List template files and fingerprint the directory.
    fn scan(&self) -> Result<(Vec<(String, PathBuf)>, MediumSignal), TemplateError> {
        let dir_meta = std::fs::metadata(&self.dir).map_err(|e| io_err(&self.dir, e))?;
        let mut latest_modified = dir_meta.modified().ok();

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(|e| io_err(&self.dir, e))? {
            let entry = entry.map_err(|e| io_err(&self.dir, e))?;
            let path = entry.path();
            let Some(name) = self.template_name(&path) else {
                continue;
            };
            let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
            if !meta.is_file() {
                continue;
            }
            if let Ok(modified) = meta.modified() {
                latest_modified = latest_modified.max(Some(modified));
            }
            entries.push((name, path));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let signal = MediumSignal {
            count: entries.len(),
            latest_modified,
        };
        Ok((entries, signal))
    }

    /// File stem if `path` looks like one of our documents.
    fn template_name(&self, path: &Path) -> Option<String> {
        if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        if stem.is_empty() || stem.starts_with('.') {
            return None;
        }
        Some(stem.to_string())
    }

    /// Write flow: content → `<name>.<ext>.tmp` sibling → `rename`.
    fn write_atomic(&self, template: &Template) -> Result<(), TemplateError> {
        validate_name(&template.name)?;
        let path = self.path_for(&template.name);
        let tmp = self.dir.join(format!("{}.{}.tmp", template.name, self.extension));
        std::fs::write(&tmp, &template.html_format).map_err(|e| io_err(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
        tracing::info!(template = %template.name, path = %path.display(), "wrote template");
        Ok(())
    }

    fn remove_file(&self, name: &str) -> Result<(), TemplateError> {
        let path = self.path_for(name);
        std::fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
        tracing::info!(template = name, path = %path.display(), "removed template");
        Ok(())
    }
}

impl TemplateStore for DirectoryStore {
    fn list(&self) -> Result<Vec<Template>, TemplateError> {
        let mut index = self.lock();
        self.refresh(&mut index)?;
        Ok(index.templates.values().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Template, TemplateError> {
        let mut index = self.lock();
        self.refresh(&mut index)?;
        index.lookup(name)
    }

    fn create(&self, template: Template) -> Result<Template, TemplateError> {
        let mut index = self.lock();
        self.write_atomic(&template)?;
        self.reload(&mut index)?;
        Ok(template)
    }

    fn update(&self, name: &str, template: Template) -> Result<Template, TemplateError> {
        let mut index = self.lock();
        self.refresh(&mut index)?;
        index.lookup(name)?;
        self.write_atomic(&template)?;
        if template.name != name {
            self.remove_file(name)?;
        }
        self.reload(&mut index)?;
        Ok(template)
    }

    fn delete(&self, name: &str) -> Result<Template, TemplateError> {
        let mut index = self.lock();
        self.refresh(&mut index)?;
        let existing = index.lookup(name)?;
        self.remove_file(name)?;
        self.reload(&mut index)?;
        Ok(existing)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(tmp: &TempDir) -> DirectoryStore {
        DirectoryStore::open(tmp.path().join("templates")).expect("open")
    }

    #[test]
    fn open_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        assert!(store.dir().is_dir());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn path_for_uses_extension() {
        let tmp = TempDir::new().unwrap();
        let store = DirectoryStore::open_with_extension(tmp.path(), "htm").unwrap();
        assert!(store.path_for("Welcome").ends_with("Welcome.htm"));
    }

    #[test]
    fn create_writes_file_and_cleans_up_tmp() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        store.create(Template::new("Welcome", "<p>%%EMAIL_BODY%%</p>")).unwrap();

        let path = store.path_for("Welcome");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>%%EMAIL_BODY%%</p>");
        assert!(!path.with_file_name("Welcome.html.tmp").exists());
    }

    #[test]
    fn get_sees_file_added_by_another_process() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        assert!(store.list().unwrap().is_empty());

        std::fs::write(store.dir().join("Outside.html"), "external").unwrap();

        let t = store.get("Outside").expect("external file must become visible");
        assert_eq!(t.html_format, "external");
    }

    #[test]
    fn get_sees_file_removed_by_another_process() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        store.create(Template::new("Gone", "x")).unwrap();
        std::fs::remove_file(store.path_for("Gone")).unwrap();

        assert!(matches!(store.get("Gone"), Err(TemplateError::TemplateNotFound { .. })));
    }

    #[test]
    fn scan_ignores_foreign_files() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        let dir = store.dir();
        std::fs::write(dir.join("notes.txt"), "x").unwrap();
        std::fs::write(dir.join("Half.html.tmp"), "x").unwrap();
        std::fs::write(dir.join(".hidden.html"), "x").unwrap();
        std::fs::create_dir(dir.join("nested.html")).unwrap();
        std::fs::write(dir.join("Real.html"), "x").unwrap();

        let names: Vec<_> = store.list().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Real"]);
    }

    #[test]
    fn update_rename_removes_old_file() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        store.create(Template::new("Old", "x")).unwrap();
        store.update("Old", Template::new("New", "y")).unwrap();

        assert!(!store.path_for("Old").exists());
        assert_eq!(store.get("New").unwrap().html_format, "y");
    }

    #[test]
    fn delete_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        let err = store.delete("nope").unwrap_err();
        assert!(matches!(err, TemplateError::TemplateNotFound { name } if name == "nope"));
    }

    #[test]
    fn create_rejects_path_traversal() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp);
        let err = store.create(Template::new("../escape", "x")).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidTemplateName { .. }));
    }
}
