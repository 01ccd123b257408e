//! Located documents

use std::fmt;
use std::path::PathBuf;

/// Where a document's bytes were obtained from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Downloaded from a work item attachment
    Attachment {
        /// Attachment file name
        name: String,
    },

    /// Downloaded from a URL embedded in the work item notes
    EmbeddedUrl {
        /// The URL found in the notes
        url: String,
    },
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Attachment { name } => write!(f, "attachment '{}'", name),
            DocumentSource::EmbeddedUrl { url } => write!(f, "notes URL {}", url),
        }
    }
}

/// Raw document content for a single pipeline run
#[derive(Debug, Clone)]
pub struct Document {
    /// Raw bytes as served by the document host
    pub bytes: Vec<u8>,

    /// Provenance of the bytes
    pub source: DocumentSource,

    /// Local copy of the bytes, when persisting succeeded
    pub stored_path: Option<PathBuf>,
}

impl Document {
    /// Create a document that has not been persisted
    pub fn new(bytes: Vec<u8>, source: DocumentSource) -> Self {
        Self {
            bytes,
            source,
            stored_path: None,
        }
    }

    /// Size of the content in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no content
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
