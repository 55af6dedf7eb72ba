//! Imported document handling.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Document format, detected from the file extension.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentKind {
    /// Plain text or journal export.
    Text,
    /// Word document (.doc or .docx).
    Word,
    /// PDF document.
    Pdf,
    /// JSON export (chat history, app backups).
    Json,
    /// Anything else. Content is still read as text.
    #[default]
    Unknown,
}

impl DocumentKind {
    /// Detect the kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("txt") => Self::Text,
            Some("doc") | Some("docx") => Self::Word,
            Some("pdf") => Self::Pdf,
            Some("json") => Self::Json,
            _ => Self::Unknown,
        }
    }
}

/// A document loaded for event extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedDocument {
    /// File name, shown in progress reporting and failure messages.
    pub name: String,
    /// Text content of the document.
    pub content: String,
    /// Detected format.
    pub kind: DocumentKind,
}

impl ImportedDocument {
    /// Create a document from a name and already-loaded content.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let kind = DocumentKind::from_file_name(&name);
        Self {
            name,
            content: content.into(),
            kind,
        }
    }

    /// Load a document from disk.
    ///
    /// All formats are read as UTF-8 text for now.
    // TODO: run .docx and .pdf through a real text extractor; a raw read
    // only yields usable text for the plain formats.
    pub fn from_path(path: impl AsRef<Path>) -> crate::error::MemoirResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(name, content))
    }
}
