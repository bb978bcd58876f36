/*!
 * # doctran - batch document translation
 *
 * A Rust library for translating batches of XML and JSON documents through
 * a remote translation backend.
 *
 * ## Features
 *
 * - Classify uploads by extension and skip unsupported files
 * - Translate each document with a selectable engine:
 *   - Hugging Face
 *   - Amazon Bedrock
 *   - Claude
 * - Per-file outcomes: one bad file never aborts the batch
 * - Progress events after every file and a final batch summary
 * - Cooperative cancellation between files
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management and engine selection
 * - `job`: Job, task, artifact and result types
 * - `file_classifier`: Document kind detection
 * - `naming`: Output file naming
 * - `observer`: Progress and completion reporting
 * - `translation`: Job orchestration:
 *   - `translation::orchestrator`: Runs a job file by file
 * - `providers`: Translation backend clients:
 *   - `providers::http`: HTTP translation service client
 *   - `providers::mock`: In-memory backend for tests and dry runs
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod file_classifier;
pub mod naming;
pub mod job;
pub mod observer;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, Engine};
pub use job::{BatchResult, InputFile, ProgressSnapshot, TranslationJob};
pub use observer::{ChannelObserver, JobObserver, NoopObserver};
pub use translation::{JobOrchestrator, OrchestratorOptions};
pub use providers::{LanguageCatalogClient, LanguageOption, TranslationClient};
pub use language_utils::{language_codes_match, normalize_to_part2t, get_language_name};
pub use errors::{CatalogError, InvalidJob, JobError, ProviderError};
