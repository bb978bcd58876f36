/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use doctran::file_utils::{FileManager, InputPath};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "a.xml", common::sample_xml())?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that directory walks keep only XML and JSON files, sorted
#[test]
fn test_find_documents_withMixedDirectory_shouldReturnSupportedFilesSorted() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.json", common::sample_json())?;
    common::create_test_file(dir, "a.xml", common::sample_xml())?;
    common::create_test_file(dir, "notes.txt", "ignore me")?;
    common::create_test_file(dir, "nested/c.XML", common::sample_xml())?;

    let found = FileManager::find_documents(dir)?;

    let names: Vec<_> = found
        .iter()
        .map(|p| p.strip_prefix(dir).map(|p| p.to_string_lossy().replace('\\', "/")))
        .collect::<Result<_, _>>()?;
    assert_eq!(names, vec!["a.xml", "b.json", "nested/c.XML"]);
    Ok(())
}

/// Test that explicitly named files are kept whatever their type
#[test]
fn test_collect_input_paths_withExplicitFiles_shouldKeepThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let binary = common::create_test_file(dir, "c.bin", "\u{0}\u{1}")?;
    let docs = dir.join("docs");
    common::create_test_file(&docs, "a.xml", common::sample_xml())?;
    common::create_test_file(&docs, "readme.md", "# docs")?;

    let paths = FileManager::collect_input_paths(&[binary.clone(), docs.clone()])?;

    let found: Vec<_> = paths.iter().map(|input| input.path.clone()).collect();
    assert_eq!(found, vec![binary, docs.join("a.xml")]);
    assert!(paths.iter().all(|input| input.relative_dir.as_os_str().is_empty()));
    Ok(())
}

/// Test that files found in subdirectories remember where they sit below the walked root
#[test]
fn test_collect_input_paths_withNestedDirectory_shouldKeepRelativeDir() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let docs = temp_dir.path().join("docs");
    common::create_test_file(&docs, "x/a.xml", common::sample_xml())?;
    common::create_test_file(&docs, "y/deeper/a.xml", common::sample_xml())?;

    let paths = FileManager::collect_input_paths(&[docs.clone()])?;

    let relative: Vec<_> = paths.iter().map(|input| input.relative_dir.clone()).collect();
    assert_eq!(relative, vec![PathBuf::from("x"), Path::new("y").join("deeper")]);
    Ok(())
}

/// Test where outputs go with and without an output directory
#[test]
fn test_input_path_output_path_shouldFollowInputLayout() {
    let input = InputPath {
        path: Path::new("docs").join("x").join("a.xml"),
        relative_dir: PathBuf::from("x"),
    };

    assert_eq!(
        input.output_path(None, "fi"),
        Some(Path::new("docs").join("x").join("a_fi.xml"))
    );
    assert_eq!(
        input.output_path(Some(Path::new("out")), "fi"),
        Some(Path::new("out").join("x").join("a_fi.xml"))
    );
}

/// Test that a missing input path is an error
#[test]
fn test_collect_input_paths_withMissingPath_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.xml");

    let err = FileManager::collect_input_paths(&[missing]).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    Ok(())
}

/// Test that loading a file keeps its name, size and bytes
#[test]
fn test_load_input_file_shouldReadNameAndContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "b.json", common::sample_json())?;

    let file = FileManager::load_input_file(&path)?;

    assert_eq!(file.name, "b.json");
    assert_eq!(file.size, common::sample_json().len() as u64);
    assert_eq!(file.content.as_ref(), common::sample_json().as_bytes());
    Ok(())
}

/// Test that writes create missing parent directories
#[test]
fn test_write_bytes_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("a_fi.xml");

    FileManager::write_bytes(&path, b"<a>Hei</a>")?;

    assert_eq!(fs::read(&path)?, b"<a>Hei</a>");
    Ok(())
}

/// Test that log entries are appended with a timestamp
#[test]
fn test_append_to_log_file_shouldAppendTimestampedLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("issues.log");

    FileManager::append_to_log_file(&path, "first")?;
    FileManager::append_to_log_file(&path, "second")?;

    let content = fs::read_to_string(&path)?;
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('[') && lines[0].ends_with("] first"));
    assert!(lines[1].ends_with("] second"));
    Ok(())
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.is_dir());
    Ok(())
}
