//! Address classification against a working directory with clashing names.
//!
//! These tests change the process working directory, so they live in their
//! own test binary and take a lock to run one at a time.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use schema_fetch::{FetchingSchemaStore, SchemaStore, Source};
use tempfile::TempDir;

static CWD: Mutex<()> = Mutex::new(());

/// Run `f` with the working directory set to a fresh temp dir.
fn in_temp_cwd(f: impl FnOnce(&Path)) {
    let _guard = CWD.lock().unwrap_or_else(|e| e.into_inner());
    let dir = TempDir::new().unwrap();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    f(dir.path());
    std::env::set_current_dir(previous).unwrap();
}

#[test]
fn dash_is_stdin_even_when_a_file_named_dash_exists() {
    in_temp_cwd(|dir| {
        fs::write(dir.join("-"), r#"{"type":"string"}"#).unwrap();
        assert!(Path::new("-").exists());

        assert_eq!(Source::classify("-").unwrap(), Source::Stdin);
    });
}

#[test]
fn url_shape_wins_over_existing_relative_path() {
    in_temp_cwd(|dir| {
        fs::create_dir_all(dir.join("http:").join("host")).unwrap();
        fs::write(dir.join("http:").join("host").join("x"), "{}").unwrap();
        assert!(Path::new("http://host/x").exists());

        let source = Source::classify("http://host/x").unwrap();
        assert!(matches!(source, Source::Url(url) if url.host_str() == Some("host")));
    });
}

#[test]
fn relative_file_fetched_from_working_directory() {
    in_temp_cwd(|dir| {
        fs::write(dir.join("local.json"), r#"{"type":"null"}"#).unwrap();

        let schema = FetchingSchemaStore::new().fetch("local.json").unwrap();
        assert_eq!(schema["type"], "null");
    });
}
