use anyhow::{Result, Context, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, warn, info};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::app_config::{Config, Engine};
use crate::file_utils::{FileManager, InputPath};
use crate::file_classifier;
use crate::job::{BatchResult, ProgressSnapshot, TranslationJob};
use crate::language_utils;
use crate::observer::JobObserver;
use crate::providers::http::HttpBackend;
use crate::providers::{LanguageCatalogClient, LanguageOption, TranslationClient};
use crate::translation::{JobOrchestrator, OrchestratorOptions};

// @module: Application controller for batch document translation

/// Name of the per-run issues log written next to the outputs
pub const ISSUES_LOG_FILE: &str = "doctran.issues.log";

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

/// Observer drawing a terminal progress bar
struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        bar.set_message("Translating");
        Self { bar }
    }
}

impl JobObserver for ProgressBarObserver {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        self.bar.set_position(snapshot.completed_count as u64);
        self.bar.set_message(snapshot.current_file_name.clone());
    }

    fn on_complete(&self, _result: &BatchResult) {
        self.bar.finish_and_clear();
    }
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Translate the given files and directories against the configured backend.
    ///
    /// Ctrl-C stops the job before the next file; files already translated
    /// are still written out.
    pub async fn run(&self, inputs: Vec<PathBuf>, output_dir: Option<PathBuf>, force_overwrite: bool) -> Result<Option<BatchResult>> {
        let backend = Arc::new(HttpBackend::from_config(&self.config.backend));

        self.check_target_language(backend.as_ref(), self.config.engine, &self.config.target_language).await;

        let cancel = CancellationToken::new();
        let signal_token = cancel.clone();
        let signal_task = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, finishing the current file before stopping");
                signal_token.cancel();
            }
        });

        let result = self.run_with_client(backend, inputs, output_dir, force_overwrite, cancel).await;
        signal_task.abort();
        result
    }

    /// Run the whole workflow with the given backend.
    ///
    /// Returns `None` when every input already has a translation on disk.
    pub async fn run_with_client(
        &self,
        client: Arc<dyn TranslationClient>,
        inputs: Vec<PathBuf>,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
        cancel: CancellationToken,
    ) -> Result<Option<BatchResult>> {
        let candidates = FileManager::collect_input_paths(&inputs)?;
        if candidates.is_empty() {
            return Err(anyhow!("No XML or JSON files found in the given paths"));
        }

        let target_language = self.config.target_language.trim().to_string();
        let log_dir = output_dir.clone().unwrap_or_else(|| Self::default_output_dir(&candidates));
        let mut issues = Vec::new();

        let planned = Self::plan_outputs(candidates, output_dir.as_deref(), &target_language, &mut issues);

        let mut files = Vec::with_capacity(planned.len());
        let mut output_paths = Vec::with_capacity(planned.len());
        for (input, output_path) in planned {
            if !force_overwrite && Self::output_exists(&input, &output_path) {
                warn!("Skipping {:?}, translation already exists (use -f to force overwrite)", input.path);
                continue;
            }
            files.push(FileManager::load_input_file(&input.path)?);
            output_paths.push(output_path);
        }

        if files.is_empty() {
            self.write_issues_log(&log_dir, None, &issues);
            info!("Nothing to translate, all outputs already exist");
            return Ok(None);
        }

        let job = TranslationJob::new(files, target_language, self.config.engine);
        let orchestrator = JobOrchestrator::with_options(client, OrchestratorOptions::from_config(&self.config));
        let observer = ProgressBarObserver::new(job.files.len());

        info!("Translating with {} into '{}'", self.config.engine.display_name(), job.target_language);

        let result = orchestrator.run_with_cancellation(job, &observer, cancel).await?;

        let write_failures = self.save_outputs(&result, &output_paths);
        let write_failure_count = write_failures.len();
        issues.extend(write_failures);
        self.write_issues_log(&log_dir, Some(&result), &issues);

        info!("{}", result.summary());

        if write_failure_count > 0 {
            return Err(anyhow!(
                "Failed to write {} translated file(s), see {}",
                write_failure_count,
                log_dir.join(ISSUES_LOG_FILE).display()
            ));
        }

        if result.is_all_failed() && !result.cancelled {
            return Err(anyhow!("No files were translated successfully"));
        }

        Ok(Some(result))
    }

    /// Fetch the catalog for an engine
    pub async fn list_languages(&self, catalog: &dyn LanguageCatalogClient, engine: Engine) -> Result<Vec<LanguageOption>> {
        let languages = catalog.list_languages(engine).await
            .with_context(|| format!("Failed to get supported languages for {}", engine))?;

        if languages.is_empty() {
            warn!("{} has no configured languages", engine.display_name());
        }

        Ok(languages)
    }

    /// Format catalog entries as `code  Name` lines
    pub fn format_languages(languages: &[LanguageOption]) -> String {
        languages.iter()
            .map(|option| match &option.model {
                Some(model) => format!("{:<6} {} ({})", option.code, language_utils::display_name(option), model),
                None => format!("{:<6} {}", option.code, language_utils::display_name(option)),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Warn early when the engine does not list the target language
    async fn check_target_language(&self, catalog: &dyn LanguageCatalogClient, engine: Engine, target_language: &str) {
        match catalog.list_languages(engine).await {
            Ok(languages) if !languages.is_empty() && !language_utils::catalog_contains(&languages, target_language) => {
                warn!(
                    "{} does not list '{}' as a target language; translations may fail",
                    engine.display_name(),
                    target_language
                );
            }
            Ok(_) => {}
            Err(e) => warn!("Could not verify target language: {}", e),
        }
    }

    /// The issues log goes next to the first input unless an output directory is given
    fn default_output_dir(inputs: &[InputPath]) -> PathBuf {
        inputs.first()
            .and_then(|input| input.path.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Pair every input with its output path.
    ///
    /// Inputs that are themselves the output of another input (a previous
    /// run writing next to its sources) are dropped, and so is any input
    /// whose output path was already claimed by an earlier one.
    fn plan_outputs(
        inputs: Vec<InputPath>,
        output_dir: Option<&Path>,
        target_language: &str,
        issues: &mut Vec<String>,
    ) -> Vec<(InputPath, PathBuf)> {
        let mut planned: Vec<(InputPath, PathBuf)> = inputs.into_iter()
            .filter_map(|input| {
                let output_path = input.output_path(output_dir, target_language)?;
                Some((input, output_path))
            })
            .collect();

        let outputs: HashSet<PathBuf> = planned.iter().map(|(_, output)| output.clone()).collect();
        planned.retain(|(input, _)| {
            let is_output = outputs.contains(&input.path);
            if is_output {
                debug!("Ignoring {:?}, it is the translation of another input", input.path);
            }
            !is_output
        });

        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        planned.retain(|(input, output_path)| match claimed.get(output_path) {
            Some(first) => {
                warn!("Skipping {:?}, its output {:?} is already written for {:?}", input.path, output_path, first);
                issues.push(format!(
                    "{}: output {} collides with {}",
                    input.path.display(),
                    output_path.display(),
                    first.display()
                ));
                false
            }
            None => {
                claimed.insert(output_path.clone(), input.path.clone());
                true
            }
        });

        planned
    }

    fn output_exists(input: &InputPath, output_path: &Path) -> bool {
        let supported = input.file_name()
            .is_some_and(|name| file_classifier::classify(&name).is_supported());
        supported && FileManager::file_exists(output_path)
    }

    /// Write every translated artifact to the output path of its input.
    ///
    /// A failed write does not stop the others; each one is returned as an
    /// issues log line.
    fn save_outputs(&self, result: &BatchResult, output_paths: &[PathBuf]) -> Vec<String> {
        let mut failures = Vec::new();

        for file in &result.succeeded {
            let Some(output_path) = output_paths.get(file.index) else {
                continue;
            };
            match FileManager::write_bytes(output_path, file.artifact.content()) {
                Ok(()) => info!("Success: {}", output_path.display()),
                Err(e) => {
                    error!("Failed to save {}: {:#}", file.source_name, e);
                    failures.push(format!("{}: could not write {}: {:#}", file.source_name, output_path.display(), e));
                }
            }
        }

        failures
    }

    /// Record skipped, failed and unsaved files in the issues log
    fn write_issues_log(&self, log_dir: &Path, result: Option<&BatchResult>, extra: &[String]) {
        let nothing_to_report = result.is_none_or(|r| r.skipped_or_failed.is_empty() && !r.cancelled);
        if extra.is_empty() && nothing_to_report {
            return;
        }

        let log_path = log_dir.join(ISSUES_LOG_FILE);
        let summary = result
            .map(|r| r.summary())
            .unwrap_or_else(|| "nothing translated".to_string());
        let mut content = format!(
            "{} - {} -> {}: {}",
            self.config.engine.display_name(),
            self.config.backend.endpoint,
            self.config.target_language,
            summary
        );
        for failure in result.iter().flat_map(|r| r.skipped_or_failed.iter()) {
            content.push_str(&format!("\n  {}: {}", failure.source_name, failure.reason));
        }
        for issue in extra {
            content.push_str(&format!("\n  {}", issue));
        }

        if let Err(e) = FileManager::append_to_log_file(&log_path, &content) {
            error!("Failed to write issues log: {}", e);
        } else {
            info!("Issues written to {}", log_path.display());
        }
    }
}
