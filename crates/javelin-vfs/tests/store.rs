use std::fs;
use std::path::{Path, PathBuf};

use javelin_core::{Position, Range};
use javelin_vfs::{ContentChange, FileStore};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, text: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, text).unwrap();
    path
}

fn store_over(root: &Path) -> FileStore {
    let mut store = FileStore::new();
    store
        .set_workspace_roots([root.to_path_buf()])
        .expect("walk succeeds");
    store
}

#[test]
fn walk_indexes_sources_and_skips_module_descriptors() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "src/com/example/A.java", "package com.example;\nclass A {}\n");
    let b = write(dir.path(), "src/B.java", "class B {}\n");
    write(dir.path(), "src/module-info.java", "module m {}\n");
    write(dir.path(), "src/notes.txt", "not java");

    let store = store_over(dir.path());

    assert!(store.contains(&a));
    assert!(store.contains(&b));
    assert!(!store.contains(&dir.path().join("src/module-info.java")));
    assert_eq!(store.all().count(), 2);
}

#[cfg(unix)]
#[test]
fn walk_skips_symlink_subtrees() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "real/Real.java", "class Real {}\n");
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("linked")).unwrap();

    let store = store_over(dir.path());

    assert!(store.contains(&dir.path().join("real/Real.java")));
    assert!(!store.contains(&dir.path().join("linked/Real.java")));
    assert_eq!(store.all().count(), 1);
}

#[test]
fn removed_roots_drop_their_entries() {
    let dir = TempDir::new().unwrap();
    let kept = write(dir.path(), "a/Kept.java", "class Kept {}\n");
    let dropped = write(dir.path(), "b/Dropped.java", "class Dropped {}\n");

    let mut store = FileStore::new();
    store
        .set_workspace_roots([dir.path().join("a"), dir.path().join("b")])
        .unwrap();
    assert!(store.contains(&kept));
    assert!(store.contains(&dropped));

    store.set_workspace_roots([dir.path().join("a")]).unwrap();
    assert!(store.contains(&kept));
    assert!(!store.contains(&dropped));
}

#[test]
fn lists_files_by_package() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "src/com/example/A.java", "package com.example;\nclass A {}\n");
    write(dir.path(), "src/other/B.java", "package other;\nclass B {}\n");

    let store = store_over(dir.path());
    let listed = store.list("com.example");
    assert_eq!(listed, vec![a.as_path()]);
}

#[test]
fn source_roots_strip_packages_and_silently_drop_mismatches() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/com/example/A.java", "package com.example;\nclass A {}\n");
    // Declared package does not match the directory chain.
    write(dir.path(), "stray/B.java", "package com.example;\nclass B {}\n");

    let store = store_over(dir.path());
    let roots = store.source_roots();
    assert!(roots.contains(&dir.path().join("src")));
    assert_eq!(roots.len(), 1);
}

#[test]
fn package_name_reads_through_for_unknown_files() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "src/p/C.java", "package p;\nclass C {}\n");

    let mut store = FileStore::new();
    assert!(!store.contains(&file));
    assert_eq!(store.package_name(&file).unwrap(), "p");
    assert!(store.contains(&file));
}

#[test]
fn suggested_package_name_follows_siblings() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/com/example/Existing.java", "package com.example;\nclass Existing {}\n");

    let store = store_over(dir.path());
    let fresh = dir.path().join("src/com/example/util/New.java");
    assert_eq!(store.suggested_package_name(&fresh), "com.example.util");
}

#[test]
fn suggested_package_name_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/com/example/Existing.java", "package com.example;\nclass Existing {}\n");

    let mut store = store_over(dir.path());
    let fresh = dir.path().join("src/com/example/New.java");
    let suggestion = store.suggested_package_name(&fresh);
    assert_eq!(suggestion, "com.example");

    // Writing the suggestion into the file does not change the answer.
    write(dir.path(), "src/com/example/New.java", "package com.example;\nclass New {}\n");
    store.external_create(&fresh).unwrap();
    assert_eq!(store.suggested_package_name(&fresh), suggestion);
}

#[test]
fn no_suggestion_when_all_siblings_use_the_default_package() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/Existing.java", "class Existing {}\n");

    let store = store_over(dir.path());
    assert_eq!(store.suggested_package_name(&dir.path().join("src/New.java")), "");
}

#[test]
fn contents_prefer_open_documents_and_fall_back_to_disk() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "src/Doc.java", "class Doc {}\n");

    let mut store = store_over(dir.path());
    assert_eq!(store.contents(&file).unwrap(), "class Doc {}\n");

    store.open(&file, "class Doc { int edited; }\n", 1);
    assert_eq!(store.contents(&file).unwrap(), "class Doc { int edited; }\n");

    store.close(&file);
    assert_eq!(store.contents(&file).unwrap(), "class Doc {}\n");
}

#[test]
fn reader_serves_the_same_bytes_as_contents() {
    use std::io::Read;

    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "src/Read.java", "class Read {}\n");

    let mut store = store_over(dir.path());
    store.open(&file, "class Read { int n; }\n", 1);

    let mut text = String::new();
    store.reader(&file).unwrap().read_to_string(&mut text).unwrap();
    assert_eq!(text, store.contents(&file).unwrap());

    assert!(store.reader(&dir.path().join("src/notes.txt")).is_err());
}

#[test]
fn change_applies_edits_in_version_order() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "src/Edit.java", "class Edit {}\n");

    let mut store = store_over(dir.path());
    store.open(&file, "class Edit {}\n", 1);

    let range = Range::new(Position::new(0, 6), Position::new(0, 10));
    store.change(&file, 2, &[ContentChange::replace(range, "Renamed")]);
    assert_eq!(store.contents(&file).unwrap(), "class Renamed {}\n");
    assert_eq!(store.version(&file), Some(2));
}

#[test]
fn stale_versions_are_dropped_without_applying() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "src/Stale.java", "class Stale {}\n");

    let mut store = store_over(dir.path());
    store.open(&file, "class Stale {}\n", 5);

    store.change(&file, 5, &[ContentChange::full("clobbered")]);
    store.change(&file, 4, &[ContentChange::full("clobbered")]);
    assert_eq!(store.contents(&file).unwrap(), "class Stale {}\n");
    assert_eq!(store.version(&file), Some(5));

    store.change(&file, 6, &[ContentChange::full("class Fresh {}\n")]);
    assert_eq!(store.contents(&file).unwrap(), "class Fresh {}\n");
}

#[test]
fn external_events_mutate_the_index() {
    let dir = TempDir::new().unwrap();
    let store_root = dir.path().to_path_buf();
    let mut store = store_over(&store_root);

    let file = write(dir.path(), "src/Late.java", "package late;\nclass Late {}\n");
    assert!(!store.contains(&file));

    store.external_create(&file).unwrap();
    assert!(store.contains(&file));
    assert_eq!(store.package_name(&file).unwrap(), "late");

    write(dir.path(), "src/Late.java", "package moved;\nclass Late {}\n");
    store.external_change(&file).unwrap();
    assert_eq!(store.package_name(&file).unwrap(), "moved");

    store.external_delete(&file);
    assert!(!store.contains(&file));
}

#[test]
fn finds_declaring_file_by_name_and_by_scan() {
    let dir = TempDir::new().unwrap();
    let named = write(dir.path(), "src/p/Widget.java", "package p;\nclass Widget {}\n");
    let hidden = write(
        dir.path(),
        "src/p/Extras.java",
        "package p;\nclass Extras {}\nclass Companion {}\n",
    );

    let store = store_over(dir.path());
    assert_eq!(store.find_declaring_file("p.Widget"), Some(named));
    assert_eq!(store.find_declaring_file("p.Companion"), Some(hidden));
    assert_eq!(store.find_declaring_file("p.Missing"), None);
}

#[test]
fn modified_tracks_open_documents() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "src/Time.java", "class Time {}\n");

    let mut store = store_over(dir.path());
    let on_disk = store.modified(&file).unwrap();

    store.open(&file, "class Time {}\n", 1);
    let in_memory = store.modified(&file).unwrap();
    assert!(in_memory >= on_disk);
}
