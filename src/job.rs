/*!
 * Job data model.
 *
 * A `TranslationJob` is what a caller submits; the orchestrator turns each of
 * its files into a `FileTask`, drives the task to a terminal state and folds
 * the terminal tasks into a `BatchResult`. Nothing here is persisted: a job
 * lives for exactly one run.
 */

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::app_config::Engine;
use crate::errors::{InvalidJob, TaskStateError};
use crate::file_classifier::{self, DocumentKind};

/// One file submitted for translation
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Original file name, used for classification and output naming
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Raw file content
    pub content: Bytes,
}

impl InputFile {
    /// Create an input file, deriving the size from the content
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
        }
    }
}

/// A batch of files to translate into one language with one engine
#[derive(Debug, Clone)]
pub struct TranslationJob {
    /// Files in processing order
    pub files: Vec<InputFile>,
    /// Target language code
    pub target_language: String,
    /// Engine the backend should use
    pub engine: Engine,
}

impl TranslationJob {
    /// Create a job for a known engine
    pub fn new(files: Vec<InputFile>, target_language: impl Into<String>, engine: Engine) -> Self {
        Self {
            files,
            target_language: target_language.into().trim().to_string(),
            engine,
        }
    }

    /// Create a job from a raw engine identifier, using the default engine when it is absent
    pub fn from_request(
        files: Vec<InputFile>,
        target_language: impl Into<String>,
        engine_id: Option<&str>,
    ) -> Result<Self, InvalidJob> {
        let engine = Engine::parse_or_default(engine_id)?;
        Ok(Self::new(files, target_language, engine))
    }

    /// Check the invariants a job must hold before any work starts
    pub fn validate(&self) -> Result<(), InvalidJob> {
        if self.files.is_empty() {
            return Err(InvalidJob::NoFiles);
        }
        if self.target_language.trim().is_empty() {
            return Err(InvalidJob::MissingTargetLanguage);
        }
        Ok(())
    }
}

/// Retrievable handle on translated content returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactReference {
    /// Unique id of this artifact
    pub id: Uuid,
    /// MIME type reported by the backend, if any
    pub media_type: Option<String>,
    /// Translated bytes
    #[serde(skip)]
    content: Bytes,
}

impl ArtifactReference {
    /// Wrap translated content in a fresh reference
    pub fn new(content: impl Into<Bytes>, media_type: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            media_type,
            content: content.into(),
        }
    }

    /// The translated content
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Why a file did not produce a translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The file name does not end in a supported extension
    UnsupportedType { extension: Option<String> },
    /// The file exceeds the configured upload limit
    FileTooLarge { size: u64, limit: u64 },
    /// The backend call failed
    TranslationBackendError { message: String },
}

impl FailureReason {
    /// Skip reasons are decided before the file is sent anywhere
    pub fn is_skip(&self) -> bool {
        !matches!(self, Self::TranslationBackendError { .. })
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType { extension: Some(ext) } => {
                write!(f, "Unsupported file type: .{} (only XML and JSON files are supported)", ext)
            }
            Self::UnsupportedType { extension: None } => {
                write!(f, "Unsupported file type (only XML and JSON files are supported)")
            }
            Self::FileTooLarge { size, limit } => {
                write!(f, "File too large: {} bytes (limit {} bytes)", size, limit)
            }
            Self::TranslationBackendError { message } => write!(f, "Translation failed: {}", message),
        }
    }
}

/// Translated output of a succeeded task
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub reference: ArtifactReference,
    pub output_name: String,
}

/// Lifecycle of a single file within a job
#[derive(Debug, Clone, PartialEq)]
pub enum TaskState {
    Pending,
    InProgress,
    Succeeded(Artifact),
    Failed(FailureReason),
    Skipped(FailureReason),
}

impl TaskState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
            Self::Skipped(_) => "skipped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_) | Self::Skipped(_))
    }
}

/// Terminal outcome reported with each progress tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutcome {
    Succeeded,
    Failed,
    Skipped,
}

/// Per-file processing record
#[derive(Debug, Clone)]
pub struct FileTask {
    /// Position of the file in the job
    pub index: usize,
    pub source_name: String,
    pub size: u64,
    /// Derived once from the name
    pub kind: DocumentKind,
    state: TaskState,
    completed_at: Option<DateTime<Utc>>,
}

impl FileTask {
    /// Create a pending task and classify its file
    pub fn new(index: usize, file: &InputFile) -> Self {
        Self {
            index,
            source_name: file.name.clone(),
            size: file.size,
            kind: file_classifier::classify(&file.name),
            state: TaskState::Pending,
            completed_at: None,
        }
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Pending -> InProgress
    pub fn start(&mut self) -> Result<(), TaskStateError> {
        match self.state {
            TaskState::Pending => {
                self.state = TaskState::InProgress;
                Ok(())
            }
            _ => Err(self.illegal("in_progress")),
        }
    }

    /// InProgress -> Succeeded
    pub fn succeed(&mut self, artifact: Artifact) -> Result<(), TaskStateError> {
        match self.state {
            TaskState::InProgress => self.finish(TaskState::Succeeded(artifact)),
            _ => Err(self.illegal("succeeded")),
        }
    }

    /// InProgress -> Failed
    pub fn fail(&mut self, reason: FailureReason) -> Result<(), TaskStateError> {
        match self.state {
            TaskState::InProgress => self.finish(TaskState::Failed(reason)),
            _ => Err(self.illegal("failed")),
        }
    }

    /// Pending -> Skipped
    pub fn skip(&mut self, reason: FailureReason) -> Result<(), TaskStateError> {
        match self.state {
            TaskState::Pending => self.finish(TaskState::Skipped(reason)),
            _ => Err(self.illegal("skipped")),
        }
    }

    /// Outcome of a terminal task, `None` while it is still open
    pub fn outcome(&self) -> Option<FileOutcome> {
        match self.state {
            TaskState::Succeeded(_) => Some(FileOutcome::Succeeded),
            TaskState::Failed(_) => Some(FileOutcome::Failed),
            TaskState::Skipped(_) => Some(FileOutcome::Skipped),
            TaskState::Pending | TaskState::InProgress => None,
        }
    }

    fn finish(&mut self, state: TaskState) -> Result<(), TaskStateError> {
        self.state = state;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn illegal(&self, to: &'static str) -> TaskStateError {
        TaskStateError {
            file: self.source_name.clone(),
            from: self.state.name(),
            to,
        }
    }
}

/// Aggregate progress after a file reached a terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub completed_count: usize,
    pub total_count: usize,
    /// The file that just finished
    pub current_file_name: String,
    pub outcome: FileOutcome,
}

impl ProgressSnapshot {
    /// Completion in whole percent
    pub fn percent(&self) -> u8 {
        if self.total_count == 0 {
            return 100;
        }
        ((self.completed_count as f64 / self.total_count as f64) * 100.0).round() as u8
    }

    pub fn is_final(&self) -> bool {
        self.completed_count == self.total_count
    }
}

/// A successfully translated file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedFile {
    /// Position of the file in the job
    pub index: usize,
    pub source_name: String,
    pub output_name: String,
    pub artifact: ArtifactReference,
    pub target_language: String,
    pub completed_at: DateTime<Utc>,
}

/// A file that was skipped or whose translation failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    /// Position of the file in the job
    pub index: usize,
    pub source_name: String,
    pub reason: FailureReason,
}

/// Final output of a job run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub succeeded: Vec<TranslatedFile>,
    pub skipped_or_failed: Vec<FileFailure>,
    /// Number of files the job was submitted with
    pub total_files: usize,
    /// Set when the run stopped early; files never started are absent
    pub cancelled: bool,
}

impl BatchResult {
    /// Fold tasks into a result. Tasks are ordered by input index and
    /// non-terminal tasks (never started because of cancellation) are dropped.
    pub fn from_tasks(
        mut tasks: Vec<FileTask>,
        target_language: &str,
        total_files: usize,
        cancelled: bool,
    ) -> Self {
        tasks.retain(|task| task.state.is_terminal());
        tasks.sort_by_key(|task| task.index);

        let mut succeeded = Vec::new();
        let mut skipped_or_failed = Vec::new();

        for task in tasks {
            let completed_at = task.completed_at.unwrap_or_else(Utc::now);
            match task.state {
                TaskState::Succeeded(artifact) => succeeded.push(TranslatedFile {
                    index: task.index,
                    source_name: task.source_name,
                    output_name: artifact.output_name,
                    artifact: artifact.reference,
                    target_language: target_language.to_string(),
                    completed_at,
                }),
                TaskState::Failed(reason) | TaskState::Skipped(reason) => {
                    skipped_or_failed.push(FileFailure {
                        index: task.index,
                        source_name: task.source_name,
                        reason,
                    })
                }
                TaskState::Pending | TaskState::InProgress => {}
            }
        }

        Self {
            succeeded,
            skipped_or_failed,
            total_files,
            cancelled,
        }
    }

    /// Files that reached a terminal state
    pub fn processed_count(&self) -> usize {
        self.succeeded.len() + self.skipped_or_failed.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_or_failed.iter().filter(|f| f.reason.is_skip()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.skipped_or_failed.len() - self.skipped_count()
    }

    /// Nothing was translated
    pub fn is_all_failed(&self) -> bool {
        self.succeeded.is_empty()
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} translated, {} skipped, {} failed",
            self.succeeded.len(),
            self.skipped_count(),
            self.failed_count()
        );
        if self.cancelled {
            summary.push_str(&format!(
                " (cancelled after {} of {} files)",
                self.processed_count(),
                self.total_files
            ));
        }
        summary
    }
}
