use async_trait::async_trait;
use log::{debug, error};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, header};
use serde::Deserialize;
use std::time::Duration;

use crate::app_config::{BackendConfig, Engine};
use crate::errors::{CatalogError, ProviderError};
use crate::file_classifier::DocumentKind;
use crate::job::ArtifactReference;

use super::{LanguageCatalogClient, LanguageOption, TranslationClient, TranslationRequest};

/// Client for the REST translation service
#[derive(Debug, Clone)]
pub struct HttpBackend {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, e.g. `http://localhost:8000/api/v1`
    endpoint: String,
}

/// Body of `GET /translate/languages`
#[derive(Debug, Deserialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageOption>,
}

impl HttpBackend {
    /// Create a new backend client
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the backend section of the configuration
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.endpoint.clone(), Duration::from_secs(config.timeout_secs))
    }

    /// Upload route for a document kind
    pub fn translate_url(&self, kind: DocumentKind) -> Option<String> {
        kind.endpoint()
            .map(|segment| format!("{}/translate/{}", self.endpoint, segment))
    }

    /// Catalog route
    pub fn languages_url(&self) -> String {
        format!("{}/translate/languages", self.endpoint)
    }

    /// Turn a non-success response into an `ApiError` carrying the server's message
    async fn api_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = error_detail(status, &body);
        error!("Translation API error ({}): {}", status, message);
        ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        }
    }
}

/// Message for a failed response: the `detail` field of a JSON error body,
/// or a generic status line
pub fn error_detail(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(message)) => message,
        Some(other) => other.to_string(),
        None => format!("Server error: {}", status.as_u16()),
    }
}

#[async_trait]
impl TranslationClient for HttpBackend {
    async fn translate(&self, request: TranslationRequest) -> Result<ArtifactReference, ProviderError> {
        let url = self.translate_url(request.kind).ok_or_else(|| {
            ProviderError::RequestFailed(format!("No upload route for {}", request.file_name))
        })?;

        let part = Part::bytes(request.content.to_vec())
            .file_name(request.file_name.clone())
            .mime_str(request.kind.media_type())
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        let form = Form::new()
            .part("file", part)
            .text("target_language", request.target_language.clone())
            .text("service_type", request.engine.as_str());

        debug!("POST {} ({}, {} -> {})", url, request.file_name, request.engine, request.target_language);

        let response = self.client.post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let media_type = response.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let content = response.bytes().await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        Ok(ArtifactReference::new(content, media_type))
    }
}

#[async_trait]
impl LanguageCatalogClient for HttpBackend {
    async fn list_languages(&self, engine: Engine) -> Result<Vec<LanguageOption>, CatalogError> {
        let response = self.client.get(self.languages_url())
            .query(&[("service_type", engine.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await.into());
        }

        let body = response.json::<LanguagesResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(body.languages)
    }
}
