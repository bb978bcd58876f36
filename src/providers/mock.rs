/*!
 * Mock backend implementation for testing.
 *
 * This module provides a scripted backend that simulates different behaviors:
 * - `MockBackend::working()` - Always succeeds, echoing the file with a marker
 * - `MockBackend::intermittent(n)` - Fails every nth request
 * - `MockBackend::failing()` - Always fails with an error
 * - `MockBackend::slow(ms)` - Succeeds after a delay
 *
 * Individual files can also be scripted to fail with `fail_on`.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::app_config::Engine;
use crate::errors::{CatalogError, ProviderError};
use crate::job::ArtifactReference;

use super::{LanguageCatalogClient, LanguageOption, TranslationClient, TranslationRequest};

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a translation
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for cancellation and concurrency testing)
    Slow { delay_ms: u64 },
}

/// Mock backend for testing orchestration behavior
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Requests currently being served
    in_flight: Arc<AtomicUsize>,
    /// Highest number of simultaneous requests observed
    max_in_flight: Arc<AtomicUsize>,
    /// File names received, in call order
    calls: Arc<Mutex<Vec<String>>>,
    /// File names that always fail
    failing_files: Arc<HashSet<String>>,
    /// Catalog served per engine; `None` makes the catalog unavailable
    catalog: Option<Arc<HashMap<Engine, Vec<LanguageOption>>>>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
            failing_files: Arc::new(HashSet::new()),
            catalog: Some(Arc::new(default_catalog())),
        }
    }

    /// Create a working mock backend that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock backend
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock backend that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a backend that answers after a delay
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Make the named files fail regardless of behavior
    pub fn fail_on(mut self, file_names: &[&str]) -> Self {
        self.failing_files = Arc::new(file_names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Serve a custom catalog for one engine
    pub fn with_languages(mut self, engine: Engine, languages: Vec<LanguageOption>) -> Self {
        let mut catalog = self.catalog.as_deref().cloned().unwrap_or_default();
        catalog.insert(engine, languages);
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Make every catalog request fail
    pub fn without_catalog(mut self) -> Self {
        self.catalog = None;
        self
    }

    /// Number of translate calls received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// File names received, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Highest number of overlapping translate calls
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Marker the mock puts in front of translated content
    pub fn translated_content(request: &TranslationRequest) -> String {
        format!(
            "[TRANSLATED to {}] {}",
            request.target_language,
            String::from_utf8_lossy(&request.content)
        )
    }

    async fn respond(&self, request: &TranslationRequest, count: usize) -> Result<ArtifactReference, ProviderError> {
        if self.failing_files.contains(&request.file_name) {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("Translation failed: could not process {}", request.file_name),
            });
        }

        match self.behavior {
            MockBehavior::Working => {}
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    return Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    });
                }
            }
            MockBehavior::Failing => {
                return Err(ProviderError::ConnectionError("Simulated backend failure".to_string()));
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
            }
        }

        Ok(ArtifactReference::new(
            Self::translated_content(request),
            Some(request.kind.media_type().to_string()),
        ))
    }
}

fn default_catalog() -> HashMap<Engine, Vec<LanguageOption>> {
    let huggingface = ["fi", "sv", "de", "fr", "es"]
        .iter()
        .map(|code| LanguageOption {
            code: code.to_string(),
            name: None,
            model: Some(format!("Helsinki-NLP/opus-mt-en-{}", code)),
        })
        .collect();
    let premium: Vec<LanguageOption> = [("fi", "Finnish"), ("sv", "Swedish"), ("ja", "Japanese")]
        .iter()
        .map(|(code, name)| LanguageOption::new(*code, Some(*name)))
        .collect();

    HashMap::from([
        (Engine::Huggingface, huggingface),
        (Engine::Bedrock, premium.clone()),
        (Engine::Claude, premium),
    ])
}

#[async_trait]
impl TranslationClient for MockBackend {
    async fn translate(&self, request: TranslationRequest) -> Result<ArtifactReference, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(request.file_name.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let result = self.respond(&request, count).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[async_trait]
impl LanguageCatalogClient for MockBackend {
    async fn list_languages(&self, engine: Engine) -> Result<Vec<LanguageOption>, CatalogError> {
        let catalog = self.catalog.as_ref().ok_or_else(|| {
            CatalogError::Unavailable(ProviderError::ConnectionError("Simulated catalog outage".to_string()))
        })?;
        Ok(catalog.get(&engine).cloned().unwrap_or_default())
    }
}
