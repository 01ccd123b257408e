//! Document Locator
//!
//! Finds the Form 471 document for a work item, downloads it and keeps a
//! local copy under the storage directory.

use formlink_domain::traits::{DocumentFetcher, FetchError};
use formlink_domain::{Document, DocumentSource, WorkItem};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

static PDF_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://\S+\.pdf").expect("PDF URL pattern is valid")
});

/// Why no document could be obtained
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// Neither a PDF attachment nor a PDF URL in the notes
    #[error("No PDF found")]
    NoDocument,

    /// The document host did not deliver the bytes
    #[error("PDF download failed: {reason} ({url})")]
    DownloadFailed {
        /// URL that was fetched
        url: String,
        /// Status or transport failure
        reason: String,
    },
}

/// Where a document will be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    /// URL to fetch
    pub url: String,
    /// Provenance recorded on the document
    pub source: DocumentSource,
    /// Name used for the local copy, before sanitizing
    pub file_name: String,
}

/// Downloads documents over HTTP with a bounded timeout
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Locates, fetches and stores the document of a work item
pub struct DocumentLocator<F> {
    fetcher: F,
    storage_dir: Option<PathBuf>,
}

impl<F> DocumentLocator<F>
where
    F: DocumentFetcher,
{
    /// Create a locator that stores documents in `storage_dir`
    pub fn new(fetcher: F, storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            storage_dir: Some(storage_dir.into()),
        }
    }

    /// Create a locator that keeps documents in memory only
    pub fn without_storage(fetcher: F) -> Self {
        Self {
            fetcher,
            storage_dir: None,
        }
    }

    /// Get a reference to the underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Pick the document source for an item
    ///
    /// The first PDF attachment that carries a download URL wins; otherwise the
    /// first PDF URL in the notes.
    pub fn find(item: &WorkItem) -> Option<DocumentLocation> {
        let attachment = item
            .attachments
            .iter()
            .filter(|a| a.is_pdf())
            .find_map(|a| a.download_url.as_deref().map(|url| (a, url)));

        if let Some((attachment, url)) = attachment {
            return Some(DocumentLocation {
                url: url.to_string(),
                source: DocumentSource::Attachment {
                    name: attachment.name.clone(),
                },
                file_name: attachment.name.clone(),
            });
        }

        let url = PDF_URL.find(&item.notes)?.as_str();
        let file_name = url.rsplit('/').next().unwrap_or(url).to_string();
        Some(DocumentLocation {
            url: url.to_string(),
            source: DocumentSource::EmbeddedUrl {
                url: url.to_string(),
            },
            file_name,
        })
    }

    /// Locate and download the document of an item
    ///
    /// A failed download is final: a broken attachment does not fall back to
    /// URLs in the notes.
    pub async fn locate(&self, item: &WorkItem) -> Result<Document, LocateError> {
        let location = match Self::find(item) {
            Some(location) => location,
            None => {
                info!("No PDF attachment or PDF URL on item {}", item.id);
                return Err(LocateError::NoDocument);
            }
        };
        debug!("Fetching {} from {}", location.source, location.url);

        let bytes = self
            .fetcher
            .fetch(&location.url)
            .await
            .map_err(|e| {
                warn!("Download of {} failed: {}", location.url, e);
                LocateError::DownloadFailed {
                    url: location.url.clone(),
                    reason: e.to_string(),
                }
            })?;
        info!("Downloaded {} bytes from {}", bytes.len(), location.source);

        let mut document = Document::new(bytes, location.source);
        if let Some(dir) = &self.storage_dir {
            let path = dir.join(format!("{}_{}", item.id, sanitize_file_name(&location.file_name)));
            match persist(&path, &document.bytes).await {
                Ok(()) => {
                    debug!("Stored document at {}", path.display());
                    document.stored_path = Some(path);
                }
                Err(e) => warn!("Could not store document at {}: {}", path.display(), e),
            }
        }
        Ok(document)
    }
}

async fn persist(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}

/// Reduce a file name to characters safe on every filesystem
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "document.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}
