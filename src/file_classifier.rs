use serde::{Deserialize, Serialize};

// @module: Document kind detection by file name

/// Kind of document a file holds, judged from its name only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// `.xml`
    Xml,
    /// `.json` or `.jsonl`
    Json,
    /// Anything else
    Unsupported,
}

impl DocumentKind {
    /// Whether the backend accepts this kind
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    /// Backend route segment (`/translate/{endpoint}`)
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Xml => Some("xml"),
            Self::Json => Some("json"),
            Self::Unsupported => None,
        }
    }

    /// MIME type used when uploading the file
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Xml => "application/xml",
            Self::Json => "application/json",
            Self::Unsupported => "application/octet-stream",
        }
    }
}

/// Classify a file by its suffix, case-insensitively.
///
/// No content sniffing happens here: a `.json` file holding XML is still
/// `Json`, and the mismatch surfaces later as a backend failure.
pub fn classify(file_name: &str) -> DocumentKind {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".xml") {
        DocumentKind::Xml
    } else if lower.ends_with(".json") || lower.ends_with(".jsonl") {
        DocumentKind::Json
    } else {
        DocumentKind::Unsupported
    }
}

/// Lowercased text after the last dot, if any
pub fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}
