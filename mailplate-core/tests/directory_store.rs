//! Directory store integration tests: external changes, concurrent readers,
//! and error surfaces.

use std::sync::Arc;
use std::thread;

use assert_fs::prelude::*;
use mailplate_core::{
    store::{seed_default, DirectoryStore, TemplateStore},
    Template, TemplateError,
};
use predicates::prelude::predicate;
use rstest::rstest;

// ---------------------------------------------------------------------------
// 1. Backing medium is the source of truth
// ---------------------------------------------------------------------------

#[test]
fn create_persists_document_named_after_template() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let store = DirectoryStore::open(dir.path()).expect("open");

    store
        .create(Template::new("Receipt", "<b>%%EMAIL_BODY%%</b>"))
        .expect("create");

    dir.child("Receipt.html")
        .assert(predicate::str::contains("%%EMAIL_BODY%%"));
}

#[test]
fn reopened_store_sees_previous_writes() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    {
        let store = DirectoryStore::open(dir.path()).expect("open");
        store.create(Template::new("Kept", "kept")).expect("create");
    }
    let store = DirectoryStore::open(dir.path()).expect("reopen");
    assert_eq!(store.get("Kept").expect("get").html_format, "kept");
}

#[test]
fn external_edit_with_new_file_triggers_full_reload() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let store = DirectoryStore::open(dir.path()).expect("open");
    store.create(Template::new("A", "a")).expect("create");
    assert_eq!(store.list().expect("list").len(), 1);

    dir.child("B.html").write_str("b").expect("write");
    dir.child("C.html").write_str("c").expect("write");

    let names: Vec<_> = store
        .list()
        .expect("list")
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn names_are_case_sensitive() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let store = DirectoryStore::open(dir.path()).expect("open");
    store.create(Template::new("Welcome", "w")).expect("create");

    let err = store.get("welcome").unwrap_err();
    assert!(matches!(err, TemplateError::TemplateNotFound { .. }), "got: {err}");
}

#[test]
fn custom_extension_only_indexes_matching_files() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("One.tpl").write_str("1").expect("write");
    dir.child("Two.html").write_str("2").expect("write");

    let store = DirectoryStore::open_with_extension(dir.path(), "tpl").expect("open");
    let names: Vec<_> = store.list().unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["One"]);
}

#[test]
fn seed_default_writes_protected_template_once() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let store = DirectoryStore::open(dir.path()).expect("open");

    assert!(seed_default(&store).expect("seed").is_some());
    dir.child("Default.html").assert("%%EMAIL_BODY%%");

    dir.child("Default.html").write_str("custom").expect("overwrite");
    assert!(seed_default(&store).expect("reseed").is_none());
    dir.child("Default.html").assert("custom");
}

// ---------------------------------------------------------------------------
// 2. Error surfaces
// ---------------------------------------------------------------------------

#[rstest]
#[case::update("update")]
#[case::delete("delete")]
#[case::get("get")]
fn missing_name_is_not_found(#[case] op: &str) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let store = DirectoryStore::open(dir.path()).expect("open");

    let err = match op {
        "update" => store.update("ghost", Template::new("ghost", "")).unwrap_err(),
        "delete" => store.delete("ghost").unwrap_err(),
        _ => store.get("ghost").unwrap_err(),
    };
    assert!(
        matches!(&err, TemplateError::TemplateNotFound { name } if name == "ghost"),
        "got: {err}"
    );
}

#[test]
fn non_utf8_document_only_fails_its_own_name() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let store = DirectoryStore::open(dir.path()).expect("open");
    seed_default(&store).expect("seed");
    dir.child("Legacy.html")
        .write_binary(&[0x3c, 0x70, 0xe9, 0x3e])
        .expect("write latin-1");

    let names: Vec<_> = store.list().expect("list").into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["Default"]);
    assert_eq!(store.get("Default").expect("get").html_format, "%%EMAIL_BODY%%");

    let err = store.get("Legacy").unwrap_err();
    assert!(matches!(err, TemplateError::Storage { .. }), "got: {err}");
    assert_eq!(err.kind().status_code(), 500);
    assert!(err.to_string().contains("Legacy.html"));

    assert!(matches!(store.delete("Legacy"), Err(TemplateError::Storage { .. })));
    assert!(matches!(
        store.update("Legacy", Template::new("Legacy", "fixed")),
        Err(TemplateError::Storage { .. })
    ));
    assert!(matches!(store.exists("Legacy"), Err(TemplateError::Storage { .. })));
    dir.child("Legacy.html").assert(predicate::path::exists());
}

#[test]
fn repaired_document_is_served_again() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let store = DirectoryStore::open(dir.path()).expect("open");
    dir.child("Legacy.html")
        .write_binary(&[0x3c, 0x70, 0xe9, 0x3e])
        .expect("write latin-1");
    assert!(store.get("Legacy").is_err());

    dir.child("Legacy.html").write_str("<p>ok</p>").expect("rewrite");
    bump_mtime(&dir.child("Legacy.html"), 60);

    assert_eq!(store.get("Legacy").expect("get").html_format, "<p>ok</p>");
}

#[cfg(unix)]
#[test]
fn unreadable_document_surfaces_storage_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("Open.html").write_str("open").expect("write");
    let file = dir.child("Locked.html");
    file.write_str("secret").expect("write");
    std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o000)).expect("chmod");

    // Root ignores permission bits; nothing to assert in that case.
    if std::fs::read_to_string(file.path()).is_ok() {
        return;
    }

    let store = DirectoryStore::open(dir.path()).expect("open");
    assert_eq!(store.list().expect("list").len(), 1);
    assert_eq!(store.get("Open").expect("get").html_format, "open");

    let err = store.get("Locked").unwrap_err();
    assert!(matches!(err, TemplateError::Storage { .. }), "got: {err}");
    assert!(err.to_string().contains("Locked.html"));
}

// ---------------------------------------------------------------------------
// 3. In-place edits
// ---------------------------------------------------------------------------

fn bump_mtime(file: &assert_fs::fixture::ChildPath, secs: i64) {
    let meta = std::fs::metadata(file.path()).expect("metadata");
    let current = filetime::FileTime::from_last_modification_time(&meta);
    let later = filetime::FileTime::from_unix_time(current.unix_seconds() + secs, 0);
    filetime::set_file_mtime(file.path(), later).expect("set mtime");
}

#[test]
fn external_in_place_edit_is_served() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let store = DirectoryStore::open(dir.path()).expect("open");
    store.create(Template::new("Receipt", "v1 %%EMAIL_BODY%%")).expect("create");
    store.create(Template::new("Other", "o")).expect("create");
    assert_eq!(store.get("Receipt").expect("get").html_format, "v1 %%EMAIL_BODY%%");

    let file = dir.child("Receipt.html");
    file.write_str("v2 %%EMAIL_BODY%%").expect("rewrite");
    bump_mtime(&file, 60);

    assert_eq!(store.get("Receipt").expect("get").html_format, "v2 %%EMAIL_BODY%%");
    assert_eq!(store.list().expect("list").len(), 2);
}

#[test]
fn seeded_default_edited_externally_is_served() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let store = DirectoryStore::open(dir.path()).expect("open");
    seed_default(&store).expect("seed");
    assert_eq!(store.get("Default").expect("get").html_format, "%%EMAIL_BODY%%");

    let file = dir.child("Default.html");
    file.write_str("<main>%%EMAIL_BODY%%</main>").expect("rewrite");
    bump_mtime(&file, 120);

    assert_eq!(
        store.get("Default").expect("get").html_format,
        "<main>%%EMAIL_BODY%%</main>"
    );
}

// ---------------------------------------------------------------------------
// 4. Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_readers_never_observe_partial_index() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let store = Arc::new(DirectoryStore::open(dir.path()).expect("open"));
    for i in 0..5 {
        store
            .create(Template::new(format!("base-{i}"), "x"))
            .expect("create");
    }

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..20 {
                store
                    .create(Template::new(format!("extra-{i:02}"), "y"))
                    .expect("create");
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut last = 0;
                for _ in 0..50 {
                    let templates = store.list().expect("list");
                    assert!(templates.len() >= 5, "base templates must always be present");
                    assert!(templates.len() >= last, "index must never shrink");
                    assert!(templates.iter().all(|t| !t.html_format.is_empty()));
                    last = templates.len();
                }
            })
        })
        .collect();

    writer.join().expect("writer");
    for r in readers {
        r.join().expect("reader");
    }
    assert_eq!(store.list().expect("list").len(), 25);
}
