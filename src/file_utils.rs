use anyhow::{Result, Context, anyhow};
use chrono::Local;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::file_classifier;
use crate::job::InputFile;
use crate::naming;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

/// A file to translate, as found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPath {
    pub path: PathBuf,
    /// Directory below the walked root; empty for files named directly
    pub relative_dir: PathBuf,
}

impl InputPath {
    pub fn file_name(&self) -> Option<String> {
        self.path.file_name().map(|n| n.to_string_lossy().to_string())
    }

    /// Where the translation goes: under `output_dir` keeping the walked
    /// layout, or next to the input when no output directory is given
    pub fn output_path(&self, output_dir: Option<&Path>, target_language: &str) -> Option<PathBuf> {
        let name = self.file_name()?;
        let dir = match output_dir {
            Some(dir) => dir.join(&self.relative_dir),
            None => self.path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        Some(dir.join(naming::output_name(&name, target_language)))
    }
}

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Expand the user's paths into the files to submit.
    ///
    /// Files named explicitly are kept whatever their extension, so the job
    /// reports them as skipped. Directories are walked and only XML/JSON
    /// documents are picked up, sorted by path, each remembering its
    /// directory relative to the walked root.
    pub fn collect_input_paths(paths: &[PathBuf]) -> Result<Vec<InputPath>> {
        let mut result = Vec::new();

        for path in paths {
            if path.is_file() {
                result.push(InputPath { path: path.clone(), relative_dir: PathBuf::new() });
            } else if path.is_dir() {
                for document in Self::find_documents(path)? {
                    let relative_dir = document.parent()
                        .and_then(|parent| parent.strip_prefix(path).ok())
                        .map(Path::to_path_buf)
                        .unwrap_or_default();
                    result.push(InputPath { path: document, relative_dir });
                }
            } else {
                return Err(anyhow!("Input path does not exist: {:?}", path));
            }
        }

        Ok(result)
    }

    /// Find supported documents below a directory
    pub fn find_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                if file_classifier::classify(&name).is_supported() {
                    result.push(path.to_path_buf());
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file into an `InputFile` named after its file name
    pub fn load_input_file<P: AsRef<Path>>(path: P) -> Result<InputFile> {
        let path = path.as_ref();
        let name = path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Not a file path: {:?}", path))?;
        let content = fs::read(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;

        Ok(InputFile::new(name, content))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        Self::write_bytes(path, content.as_bytes())
    }

    /// Write raw bytes to a file, creating parent directories
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
