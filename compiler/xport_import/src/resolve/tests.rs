use std::fs;

use pretty_assertions::assert_eq;

use super::*;
use crate::context::{FoundObject, SearchPath};

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create {}: {e}", parent.display()));
    }
    fs::write(path, b"").unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
}

fn no_context(path: &str, _: &Path) -> Option<FoundObject> {
    panic!("build context consulted for {path:?}")
}

#[test]
fn empty_path_has_no_identity() {
    let resolution = find_package(&no_context, "", Path::new("/src"));
    assert_eq!(resolution.id, "");
    assert_eq!(resolution.location, None);
}

#[test]
fn local_import_joins_source_dir() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    touch(&dir.path().join("x.a"));

    let resolution = find_package(&no_context, "./x", dir.path());

    let stem = dir.path().join("x");
    assert_eq!(resolution.id, stem.to_string_lossy());
    assert_eq!(resolution.location, Some(dir.path().join("x.a")));
}

#[test]
fn local_parent_import_is_cleaned() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    touch(&dir.path().join("util.o"));
    let src = dir.path().join("cmd").join("tool");

    let resolution = find_package(&no_context, "../../util", &src);

    assert_eq!(resolution.id, dir.path().join("util").to_string_lossy());
    assert_eq!(resolution.location, Some(dir.path().join("util.o")));
}

#[test]
fn local_import_without_artifact_keeps_identity() {
    let resolution = find_package(&no_context, "./missing", Path::new("/nonexistent/src"));
    assert_eq!(resolution.id, "/nonexistent/src/missing");
    assert_eq!(resolution.location, None);
}

#[test]
fn absolute_path_is_its_own_identity() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    touch(&dir.path().join("abs.a"));
    let path = dir.path().join("abs");
    let path = path.to_string_lossy();

    let resolution = find_package(&no_context, &path, Path::new("/elsewhere"));

    assert_eq!(resolution.id, path);
    assert_eq!(resolution.location, Some(dir.path().join("abs.a")));
}

#[test]
fn archive_is_preferred_over_object() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    touch(&dir.path().join("x.o"));
    touch(&dir.path().join("x.a"));
    let ctx = SearchPath::new([dir.path()]);

    let resolution = find_package(&ctx, "x", Path::new(""));

    assert_eq!(resolution.id, "x");
    assert_eq!(resolution.location, Some(dir.path().join("x.a")));
}

#[test]
fn object_is_used_when_no_archive() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    touch(&dir.path().join("net").join("http.o"));
    let ctx = SearchPath::new([dir.path()]);

    let resolution = find_package(&ctx, "net/http", Path::new(""));

    assert_eq!(resolution.id, "net/http");
    assert_eq!(resolution.location, Some(dir.path().join("net").join("http.o")));
}

#[test]
fn directory_candidates_are_skipped() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    fs::create_dir_all(dir.path().join("x.a"))
        .unwrap_or_else(|e| panic!("failed to create dir: {e}"));
    touch(&dir.path().join("x.o"));

    let resolution = find_package(&no_context, "./x", dir.path());

    assert_eq!(resolution.location, Some(dir.path().join("x.o")));
}

#[test]
fn missing_object_reports_original_path() {
    let nothing = |_: &str, _: &Path| -> Option<FoundObject> { None };

    let resolution = find_package(&nothing, "example.com/gone", Path::new("/src"));

    assert_eq!(resolution.id, "example.com/gone");
    assert_eq!(resolution.location, None);
}

#[test]
fn context_import_path_becomes_identity() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    let object = dir.path().join("vendor").join("lib.a");
    touch(&object);
    let vendored = {
        let object = object.clone();
        move |_: &str, _: &Path| -> Option<FoundObject> {
            Some(FoundObject {
                import_path: "app/vendor/lib".to_owned(),
                object: object.clone(),
            })
        }
    };

    let resolution = find_package(&vendored, "lib", Path::new("/src"));

    assert_eq!(resolution.id, "app/vendor/lib");
    assert_eq!(resolution.location, Some(object));
}

#[test]
fn context_object_without_file_is_not_found() {
    let phantom = |path: &str, _: &Path| -> Option<FoundObject> {
        Some(FoundObject {
            import_path: path.to_owned(),
            object: PathBuf::from("/nonexistent/pkg").join(format!("{path}.a")),
        })
    };

    let resolution = find_package(&phantom, "fmt", Path::new(""));

    assert_eq!(resolution.id, "fmt");
    assert_eq!(resolution.location, None);
}

#[test]
fn search_path_source_dir_is_made_absolute() {
    let seen = |_: &str, src_dir: &Path| -> Option<FoundObject> {
        assert!(src_dir.is_absolute(), "{} is relative", src_dir.display());
        None
    };

    find_package(&seen, "fmt", Path::new("relative/dir"));
}

#[test]
fn append_extension_keeps_existing_dots() {
    assert_eq!(
        append_extension(Path::new("/pkg/lib.v2"), "a"),
        PathBuf::from("/pkg/lib.v2.a")
    );
}

#[test]
fn local_import_shapes() {
    assert!(is_local_import("."));
    assert!(is_local_import(".."));
    assert!(is_local_import("./x"));
    assert!(is_local_import("../x"));
    assert!(!is_local_import(".x"));
    assert!(!is_local_import("x/./y"));
}
