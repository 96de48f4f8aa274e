//! Integration tests for renamr
//!
//! These tests build real folder trees in temporary directories and drive
//! the complete collect, filter, rename and export workflow.

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use renamr::archive::{ArchiveLayout, ExportOptions, write_archive};
use renamr::rename::RenameOp;
use renamr::walker::WalkOptions;
use renamr::{RenamrError, Session};
use tempfile::TempDir;
use zip::ZipArchive;

/// Helper function to create a file (and its parents) under `root`
fn create_test_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// Helper function to collect a single folder into a fresh session
fn collect(dir: &Path) -> Session {
    let mut session = Session::new();
    session
        .add_paths(&[dir.to_path_buf()], &WalkOptions {
            sort_by_name: true,
            ..WalkOptions::default()
        })
        .unwrap();
    session
}

fn display_names(session: &Session) -> Vec<String> {
    session.records().iter().map(|r| r.display_name.clone()).collect()
}

/// Entry names and contents of an archive, in archive order
fn read_zip(bytes: Vec<u8>) -> Vec<(String, String)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            (entry.name().to_string(), content)
        })
        .collect()
}

#[test]
fn test_dropped_folder_paths_are_relative_to_it() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("drop");
    create_test_file(&root, "a.txt", "A");
    create_test_file(&root, "sub/b.txt", "B");

    let session = collect(&root);

    let paths: Vec<_> = session.records().iter().map(|r| r.relative_path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "sub/b.txt"]);
    assert_eq!(session.selection().len(), 2);
    assert_eq!(session.records()[1].mime_type.as_deref(), Some("text/plain"));
    assert_eq!(session.records()[1].size_bytes, 1);
}

#[test]
fn test_uppercase_keeps_original_names() {
    let tmp = TempDir::new().unwrap();
    create_test_file(tmp.path(), "a.txt", "A");
    create_test_file(tmp.path(), "sub/b.txt", "B");

    let mut session = collect(tmp.path());
    session.select_all();
    let plan = session.apply(&RenameOp::Uppercase).unwrap();

    assert_eq!(plan.changes.len(), 2);
    assert_eq!(display_names(&session), vec!["A.TXT", "B.TXT"]);
    let originals: Vec<_> = session.records().iter().map(|r| r.original_name.as_str()).collect();
    assert_eq!(originals, vec!["a.txt", "b.txt"]);
}

#[test]
fn test_filtered_find_replace_only_touches_matches() {
    let tmp = TempDir::new().unwrap();
    create_test_file(tmp.path(), "banana.txt", "1");
    create_test_file(tmp.path(), "cherry.txt", "2");
    create_test_file(tmp.path(), "date.md", "3");

    let mut session = collect(tmp.path());
    session.set_filter("a");
    session
        .apply(&RenameOp::FindReplace {
            find: "a".into(),
            replace: "X".into(),
        })
        .unwrap();

    assert_eq!(display_names(&session), vec!["bXnXnX.txt", "cherry.txt", "dXte.md"]);
}

#[test]
fn test_find_without_match_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    create_test_file(tmp.path(), "one.txt", "1");
    create_test_file(tmp.path(), "two.txt", "2");

    let mut session = collect(tmp.path());
    let plan = session
        .apply(&RenameOp::FindReplace {
            find: "Z".into(),
            replace: "Q".into(),
        })
        .unwrap();

    assert!(plan.is_empty());
    assert_eq!(plan.unchanged, 2);
    assert!(session.records().iter().all(|r| !r.is_renamed()));
}

#[test]
fn test_colliding_names_keep_last_entry() {
    let tmp = TempDir::new().unwrap();
    create_test_file(tmp.path(), "x/dup.txt", "first");
    create_test_file(tmp.path(), "y/dup.txt", "second");

    let session = collect(tmp.path());
    let entries = read_zip(session.export(&ExportOptions::default()).unwrap());
    assert_eq!(entries, vec![("dup.txt".to_string(), "second".to_string())]);

    let nested = ExportOptions {
        layout: ArchiveLayout::Nested,
        ..ExportOptions::default()
    };
    let entries = read_zip(session.export(&nested).unwrap());
    let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["x/dup.txt", "y/dup.txt"]);
}

#[test]
fn test_renamed_after_rename_collide_too() {
    let tmp = TempDir::new().unwrap();
    create_test_file(tmp.path(), "Dup.txt", "upper");
    create_test_file(tmp.path(), "dup.txt", "lower");

    let mut session = collect(tmp.path());
    session.apply(&RenameOp::Lowercase).unwrap();
    assert_eq!(display_names(&session), vec!["dup.txt", "dup.txt"]);

    let entries = read_zip(session.export(&ExportOptions::default()).unwrap());
    assert_eq!(entries, vec![("dup.txt".to_string(), "lower".to_string())]);
}

#[test]
fn test_export_preserves_content_under_new_names() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    create_test_file(&src, "Report.TXT", "quarterly numbers");
    create_test_file(&src, "photo.JPG", "not really a jpeg");

    let mut session = collect(&src);
    session.set_filter("report");
    session.apply(&RenameOp::Lowercase).unwrap();
    session.set_filter("");

    let out = tmp.path().join("out").join("renamed-files.zip");
    fs::create_dir_all(out.parent().unwrap()).unwrap();
    write_archive(&session.export(&ExportOptions::default()).unwrap(), &out).unwrap();

    let entries = read_zip(fs::read(&out).unwrap());
    assert_eq!(
        entries,
        vec![
            ("report.txt".to_string(), "quarterly numbers".to_string()),
            ("photo.JPG".to_string(), "not really a jpeg".to_string()),
        ]
    );
}

#[test]
fn test_deselected_records_are_not_renamed() {
    let tmp = TempDir::new().unwrap();
    create_test_file(tmp.path(), "keep.txt", "k");
    create_test_file(tmp.path(), "move.txt", "m");

    let mut session = collect(tmp.path());
    let keep = session.records()[0].id;
    assert!(!session.toggle(keep).unwrap());
    session.apply(&RenameOp::Uppercase).unwrap();

    assert_eq!(display_names(&session), vec!["keep.txt", "MOVE.TXT"]);
}

#[test]
fn test_adding_twice_keeps_both_batches() {
    let tmp = TempDir::new().unwrap();
    create_test_file(tmp.path(), "a.txt", "a");

    let mut session = collect(tmp.path());
    session
        .add_paths(&[tmp.path().join("a.txt")], &WalkOptions::default())
        .unwrap();

    assert_eq!(session.records().len(), 2);
    assert_ne!(session.records()[0].id, session.records()[1].id);
}

#[test]
fn test_missing_path_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let mut session = Session::new();
    let result = session.add_paths(&[tmp.path().join("nope")], &WalkOptions::default());

    assert!(matches!(result, Err(RenamrError::Walk(_))));
    assert!(session.records().is_empty());
}

#[test]
fn test_invalid_regex_leaves_store_untouched() {
    let tmp = TempDir::new().unwrap();
    create_test_file(tmp.path(), "a.txt", "a");

    let mut session = collect(tmp.path());
    let result = session.apply(&RenameOp::RegexReplace {
        pattern: "[".into(),
        replacement: String::new(),
    });

    assert!(matches!(result, Err(RenamrError::Rename(_))));
    assert_eq!(display_names(&session), vec!["a.txt"]);
}

#[test]
fn test_select_all_then_export_carries_every_visible_record() {
    let tmp = TempDir::new().unwrap();
    create_test_file(tmp.path(), "alpha.txt", "first bytes");
    create_test_file(tmp.path(), "beta.md", "second bytes");
    create_test_file(tmp.path(), "notes/gamma.txt", "third bytes");

    let mut session = collect(tmp.path());
    session.set_filter("txt");
    session.select_all();
    assert_eq!(session.selection().len(), 2);
    session.apply(&RenameOp::Uppercase).unwrap();

    let entries = read_zip(session.export(&ExportOptions::default()).unwrap());
    for record in session.visible() {
        let bytes = fs::read_to_string(record.content.disk_path().unwrap()).unwrap();
        assert!(
            entries.contains(&(record.display_name.clone(), bytes)),
            "missing {} in {entries:?}",
            record.display_name
        );
    }
    let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["ALPHA.TXT", "beta.md", "GAMMA.TXT"]);
}
