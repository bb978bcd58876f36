/*!
 * Batch job orchestration.
 *
 * Runs every file of a `TranslationJob` through the translation backend,
 * one request per supported file, and folds the outcomes into a
 * `BatchResult`. A failing file never aborts the batch: only a job that
 * fails validation is rejected as a whole.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::app_config::{Config, Engine};
use crate::errors::{InvalidJob, JobError, TaskStateError};
use crate::file_classifier;
use crate::job::{
    Artifact, BatchResult, FailureReason, FileTask, InputFile, ProgressSnapshot, TranslationJob,
};
use crate::naming;
use crate::observer::JobObserver;
use crate::providers::{TranslationClient, TranslationRequest};

/// Tuning knobs for a job run
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Files translated at the same time; 1 means strictly sequential
    pub max_concurrent_files: usize,
    /// Files larger than this are skipped without contacting the backend
    pub max_file_size: Option<u64>,
    /// Engines a job may select
    pub enabled_engines: Vec<Engine>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            max_concurrent_files: 1,
            max_file_size: None,
            enabled_engines: Engine::ALL.to_vec(),
        }
    }
}

impl OrchestratorOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_concurrent_files: config.max_concurrent_files.max(1),
            max_file_size: config.backend.max_file_size_bytes,
            enabled_engines: config.enabled_engines.clone(),
        }
    }

    pub fn with_max_concurrent_files(mut self, max_concurrent_files: usize) -> Self {
        self.max_concurrent_files = max_concurrent_files;
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: Option<u64>) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn with_enabled_engines(mut self, engines: Vec<Engine>) -> Self {
        self.enabled_engines = engines;
        self
    }
}

/// Drives translation jobs against a backend
#[derive(Debug, Clone)]
pub struct JobOrchestrator {
    /// Backend used for every file
    client: Arc<dyn TranslationClient>,
    options: OrchestratorOptions,
}

impl JobOrchestrator {
    /// Create an orchestrator with default options (sequential, no size limit)
    pub fn new(client: Arc<dyn TranslationClient>) -> Self {
        Self::with_options(client, OrchestratorOptions::default())
    }

    pub fn with_options(client: Arc<dyn TranslationClient>, options: OrchestratorOptions) -> Self {
        Self { client, options }
    }

    /// Build a job from raw request values and run it
    pub async fn submit(
        &self,
        files: Vec<InputFile>,
        target_language: &str,
        engine_id: Option<&str>,
        observer: &dyn JobObserver,
    ) -> Result<BatchResult, JobError> {
        let job = TranslationJob::from_request(files, target_language, engine_id)?;
        self.run(job, observer).await
    }

    /// Run a job to completion
    pub async fn run(&self, job: TranslationJob, observer: &dyn JobObserver) -> Result<BatchResult, JobError> {
        self.run_with_cancellation(job, observer, CancellationToken::new()).await
    }

    /// Run a job, stopping before the next file once `cancel` fires.
    ///
    /// A request already in flight is allowed to finish. Files that were
    /// never started are absent from the result, which is marked `cancelled`.
    pub async fn run_with_cancellation(
        &self,
        job: TranslationJob,
        observer: &dyn JobObserver,
        cancel: CancellationToken,
    ) -> Result<BatchResult, JobError> {
        self.validate(&job)?;

        let start_time = Instant::now();
        let total_count = job.files.len();
        let target_language = job.target_language.as_str();
        let engine = job.engine;
        let concurrency = self.options.max_concurrent_files.max(1);

        info!(
            "Translating {} file(s) to '{}' with {}",
            total_count,
            target_language,
            engine.display_name()
        );

        let mut tasks = Vec::with_capacity(total_count);
        let mut completed_count = 0;
        let mut cancelled = false;

        let mut processed = stream::iter(job.files.iter().enumerate())
            .map(|(index, file)| {
                let cancel = cancel.clone();
                async move {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    Some(self.process_file(index, file, target_language, engine).await)
                }
            })
            .buffer_unordered(concurrency);

        // Events are emitted here, on the job's own task, so counts only grow
        while let Some(outcome) = processed.next().await {
            let Some(task) = outcome else {
                cancelled = true;
                continue;
            };
            let task = task?;
            let Some(file_outcome) = task.outcome() else {
                continue;
            };

            completed_count += 1;
            observer.on_progress(&ProgressSnapshot {
                completed_count,
                total_count,
                current_file_name: task.source_name.clone(),
                outcome: file_outcome,
            });
            tasks.push(task);
        }

        let result = BatchResult::from_tasks(tasks, target_language, total_count, cancelled);

        if cancelled {
            warn!("Job cancelled: {}", result.summary());
        } else {
            info!("Job finished in {:.1}s: {}", start_time.elapsed().as_secs_f64(), result.summary());
        }

        observer.on_complete(&result);
        Ok(result)
    }

    fn validate(&self, job: &TranslationJob) -> Result<(), InvalidJob> {
        job.validate()?;
        if !self.options.enabled_engines.contains(&job.engine) {
            return Err(InvalidJob::EngineNotEnabled(job.engine));
        }
        Ok(())
    }

    /// Drive one file to a terminal state
    async fn process_file(
        &self,
        index: usize,
        file: &InputFile,
        target_language: &str,
        engine: Engine,
    ) -> Result<FileTask, TaskStateError> {
        let mut task = FileTask::new(index, file);

        if !task.kind.is_supported() {
            let reason = FailureReason::UnsupportedType {
                extension: file_classifier::extension_of(&file.name),
            };
            warn!("Skipping {}: {}", file.name, reason);
            task.skip(reason)?;
            return Ok(task);
        }

        if let Some(limit) = self.options.max_file_size {
            if file.size > limit {
                let reason = FailureReason::FileTooLarge { size: file.size, limit };
                warn!("Skipping {}: {}", file.name, reason);
                task.skip(reason)?;
                return Ok(task);
            }
        }

        task.start()?;
        debug!("Sending {} ({:?}, {} bytes)", file.name, task.kind, file.size);

        let request = TranslationRequest::new(file, task.kind, target_language, engine);
        match self.client.translate(request).await {
            Ok(reference) => {
                let output_name = naming::output_name(&file.name, target_language);
                debug!("Translated {} -> {}", file.name, output_name);
                task.succeed(Artifact { reference, output_name })?;
            }
            Err(e) => {
                warn!("Failed to translate {}: {}", file.name, e);
                task.fail(FailureReason::TranslationBackendError { message: e.to_string() })?;
            }
        }

        Ok(task)
    }
}
