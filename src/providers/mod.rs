/*!
 * Backend collaborators.
 *
 * The orchestrator only sees the two traits defined here:
 * - `TranslationClient`: translates one file and returns a retrievable artifact
 * - `LanguageCatalogClient`: lists the target languages an engine supports
 *
 * Implementations:
 * - `http`: the REST translation service (multipart upload, translated file in the response body)
 * - `mock`: scripted in-memory backend for tests
 */

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::app_config::Engine;
use crate::errors::{CatalogError, ProviderError};
use crate::file_classifier::DocumentKind;
use crate::job::{ArtifactReference, InputFile};

/// Everything the backend needs to translate one file
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// Original file name, sent along with the upload
    pub file_name: String,
    /// Kind decided by the classifier; never `Unsupported`
    pub kind: DocumentKind,
    /// Raw file bytes
    pub content: Bytes,
    /// Target language code
    pub target_language: String,
    /// Engine to use
    pub engine: Engine,
}

impl TranslationRequest {
    pub fn new(file: &InputFile, kind: DocumentKind, target_language: &str, engine: Engine) -> Self {
        Self {
            file_name: file.name.clone(),
            kind,
            content: file.content.clone(),
            target_language: target_language.to_string(),
            engine,
        }
    }
}

/// One entry of a language catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    /// Language code accepted as a target
    pub code: String,
    /// Human readable name, when the engine provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Model serving this language, when the engine reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl LanguageOption {
    pub fn new(code: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            code: code.into(),
            name: name.map(str::to_string),
            model: None,
        }
    }
}

/// Sends a single file to the translation backend
///
/// Implementations own timeouts and transport concerns; any failure,
/// a timeout included, is reported as a `ProviderError` whose message
/// ends up in the per-file failure record.
#[async_trait]
pub trait TranslationClient: Send + Sync + Debug {
    /// Translate one file and return a handle on the translated content
    async fn translate(&self, request: TranslationRequest) -> Result<ArtifactReference, ProviderError>;
}

/// Fetches the supported target languages of an engine
#[async_trait]
pub trait LanguageCatalogClient: Send + Sync + Debug {
    /// An engine with no configured languages yields an empty list, not an error
    async fn list_languages(&self, engine: Engine) -> Result<Vec<LanguageOption>, CatalogError>;
}

pub mod http;
pub mod mock;
