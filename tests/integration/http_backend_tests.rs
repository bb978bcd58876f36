/*!
 * Integration tests for the HTTP backend against a mock server
 */

use anyhow::Result;
use mockito::{Matcher, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;

use doctran::app_config::Engine;
use doctran::errors::{CatalogError, ProviderError};
use doctran::file_classifier::DocumentKind;
use doctran::job::{FailureReason, InputFile, TranslationJob};
use doctran::observer::RecordingObserver;
use doctran::providers::http::HttpBackend;
use doctran::providers::{LanguageCatalogClient, TranslationClient, TranslationRequest};
use doctran::translation::JobOrchestrator;
use crate::common;

fn backend(server: &ServerGuard) -> HttpBackend {
    HttpBackend::new(format!("{}/api/v1", server.url()), Duration::from_secs(5))
}

fn request(name: &str, content: &str, kind: DocumentKind, engine: Engine) -> TranslationRequest {
    TranslationRequest::new(&InputFile::new(name, content.to_string()), kind, "fi", engine)
}

/// Regex for a plain multipart text field
fn form_field(name: &str, value: &str) -> Matcher {
    Matcher::Regex(format!("name=\"{}\"\r\n\r\n{}\r\n", name, value))
}

/// Test that an XML upload is a multipart POST with the expected fields
#[tokio::test]
async fn test_translate_withXmlFile_shouldPostMultipartForm() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/translate/xml")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="a\.xml""#.to_string()),
            Matcher::Regex("<title>Hello</title>".to_string()),
            form_field("target_language", "fi"),
            form_field("service_type", "claude"),
        ]))
        .with_status(200)
        .with_header("content-type", "application/xml")
        .with_body("<root>Hei</root>")
        .expect(1)
        .create_async()
        .await;

    let artifact = backend(&server)
        .translate(request("a.xml", common::sample_xml(), DocumentKind::Xml, Engine::Claude))
        .await?;

    mock.assert_async().await;
    assert_eq!(artifact.content().as_ref(), b"<root>Hei</root>");
    assert_eq!(artifact.media_type.as_deref(), Some("application/xml"));
    Ok(())
}

/// Test that JSON files go to the JSON route
#[tokio::test]
async fn test_translate_withJsonFile_shouldUseJsonRoute() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/translate/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="b\.json""#.to_string()),
            form_field("service_type", "huggingface"),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"title":"Hei"}"#)
        .expect(1)
        .create_async()
        .await;

    let artifact = backend(&server)
        .translate(request("b.json", common::sample_json(), DocumentKind::Json, Engine::Huggingface))
        .await?;

    mock.assert_async().await;
    assert_eq!(artifact.content().as_ref(), br#"{"title":"Hei"}"#);
    Ok(())
}

/// Test that the server's detail message is surfaced
#[tokio::test]
async fn test_translate_withDetailError_shouldReturnApiError() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v1/translate/json")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Invalid JSON file"}"#)
        .create_async()
        .await;

    let err = backend(&server)
        .translate(request("b.json", "{", DocumentKind::Json, Engine::Huggingface))
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::ApiError { status_code: 400, message: "Invalid JSON file".to_string() });
    Ok(())
}

/// Test that errors without a detail fall back to the status
#[tokio::test]
async fn test_translate_withPlainServerError_shouldReportStatus() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v1/translate/xml")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = backend(&server)
        .translate(request("a.xml", "<a/>", DocumentKind::Xml, Engine::Huggingface))
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::ApiError { status_code: 502, message: "Server error: 502".to_string() });
    Ok(())
}

/// Test that an unreachable backend is a connection error
#[tokio::test]
async fn test_translate_withUnreachableServer_shouldReturnConnectionError() -> Result<()> {
    let backend = HttpBackend::new(common::unreachable_base_url()?, Duration::from_secs(5));

    let err = backend
        .translate(request("a.xml", "<a/>", DocumentKind::Xml, Engine::Huggingface))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ConnectionError(_)), "unexpected error: {:?}", err);
    Ok(())
}

/// Test that the catalog is fetched per engine
#[tokio::test]
async fn test_list_languages_shouldQueryByServiceType() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/translate/languages")
        .match_query(Matcher::UrlEncoded("service_type".to_string(), "bedrock".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"languages":[{"code":"fi","name":"Finnish"},{"code":"sv","model":"Helsinki-NLP/opus-mt-en-sv"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let languages = backend(&server).list_languages(Engine::Bedrock).await?;

    mock.assert_async().await;
    assert_eq!(languages.len(), 2);
    assert_eq!(languages[0].code, "fi");
    assert_eq!(languages[0].name.as_deref(), Some("Finnish"));
    assert_eq!(languages[1].model.as_deref(), Some("Helsinki-NLP/opus-mt-en-sv"));
    Ok(())
}

/// Test that a catalog server error is reported as unavailable
#[tokio::test]
async fn test_list_languages_withServerError_shouldReturnUnavailable() -> Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/translate/languages")
        .match_query(Matcher::UrlEncoded("service_type".to_string(), "claude".to_string()))
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"boom"}"#)
        .create_async()
        .await;

    let err = backend(&server).list_languages(Engine::Claude).await.unwrap_err();

    assert_eq!(
        err,
        CatalogError::Unavailable(ProviderError::ApiError { status_code: 500, message: "boom".to_string() })
    );
    Ok(())
}

/// Test that an unreachable catalog is reported as unavailable
#[tokio::test]
async fn test_list_languages_withUnreachableServer_shouldReturnUnavailable() -> Result<()> {
    let backend = HttpBackend::new(common::unreachable_base_url()?, Duration::from_secs(5));

    let err = backend.list_languages(Engine::Huggingface).await.unwrap_err();

    assert!(matches!(err, CatalogError::Unavailable(ProviderError::ConnectionError(_))));
    Ok(())
}

/// Test a whole job against the HTTP backend with one rejected file
#[tokio::test]
async fn test_orchestrator_withHttpBackend_shouldRecordPerFileOutcomes() -> Result<()> {
    let mut server = Server::new_async().await;
    let xml_route = server
        .mock("POST", "/api/v1/translate/xml")
        .with_status(200)
        .with_header("content-type", "application/xml")
        .with_body("<root>Hei</root>")
        .expect(1)
        .create_async()
        .await;
    let json_route = server
        .mock("POST", "/api/v1/translate/json")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Invalid JSON file"}"#)
        .expect(1)
        .create_async()
        .await;

    let orchestrator = JobOrchestrator::new(Arc::new(backend(&server)));
    let observer = RecordingObserver::new();
    let job = TranslationJob::new(
        vec![
            InputFile::new("a.xml", common::sample_xml()),
            InputFile::new("b.json", "{"),
            InputFile::new("c.bin", vec![0u8, 1, 2]),
        ],
        "fi",
        Engine::Huggingface,
    );

    let result = orchestrator.run(job, &observer).await?;

    xml_route.assert_async().await;
    json_route.assert_async().await;
    assert_eq!(result.succeeded.len(), 1);
    assert_eq!(result.succeeded[0].output_name, "a_fi.xml");
    assert_eq!(
        result.skipped_or_failed[0].reason,
        FailureReason::TranslationBackendError {
            message: "API responded with error: 400 - Invalid JSON file".to_string()
        }
    );
    assert!(result.skipped_or_failed[1].reason.is_skip());
    assert_eq!(observer.progress().len(), 3);
    Ok(())
}
