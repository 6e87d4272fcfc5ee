use std::path::{Path, PathBuf};

use reqwest::Url;
use tokio::fs;
use tracing::{info, warn};

use crate::{
    client::StudyBackend,
    error::{Result, StudyError},
    types::{DocumentId, DocumentRef, SourceKind},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadSource {
    Video { url: String },
    Pdf { path: PathBuf },
}

impl UploadSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            UploadSource::Video { .. } => SourceKind::Video,
            UploadSource::Pdf { .. } => SourceKind::Pdf,
        }
    }
}

/// Extra guidance shown next to an upload error when the cause is known
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadHint {
    /// The video platform refuses transcript fetches from the backend's network
    PlatformBlocked,
}

impl UploadHint {
    pub const PLATFORM_BLOCKED_CODE: &'static str = "platform_blocked";

    // The backend currently reports this only as prose. Matching stays here
    // so a structured code can replace it without touching callers.
    const PLATFORM_BLOCKED_TEXT: &'static str = "YouTube is blocking";

    pub fn classify(error: &StudyError) -> Option<Self> {
        if error.code() == Some(Self::PLATFORM_BLOCKED_CODE) {
            return Some(UploadHint::PlatformBlocked);
        }
        match error.detail() {
            Some(detail) if detail.contains(Self::PLATFORM_BLOCKED_TEXT) => {
                Some(UploadHint::PlatformBlocked)
            }
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            UploadHint::PlatformBlocked => {
                "YouTube refuses transcript requests from many cloud hosting IPs, so this is \
                 not a problem with the video itself. Try uploading the material as a PDF instead."
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFailure {
    pub message: String,
    pub hint: Option<UploadHint>,
}

impl From<&StudyError> for UploadFailure {
    fn from(error: &StudyError) -> Self {
        Self {
            message: error.detail().map_or_else(|| error.to_string(), str::to_string),
            hint: UploadHint::classify(error),
        }
    }
}

/// Trim and check a video URL before anything is sent
pub fn validate_video_url(raw: &str) -> Result<String> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(StudyError::EmptyUrl);
    }
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url.to_string()),
        _ => Err(StudyError::InvalidUrl {
            url: url.to_string(),
        }),
    }
}

/// Check a PDF path and read it, returning the file name to upload under
pub async fn read_pdf(path: &Path) -> Result<(String, Vec<u8>)> {
    if path.as_os_str().is_empty() {
        return Err(StudyError::MissingFile);
    }
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(StudyError::NotPdf {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read(path).await.map_err(|source| StudyError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    Ok((file_name, contents))
}

#[derive(Default)]
pub struct UploadCoordinator {
    error: Option<UploadFailure>,
}

impl UploadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&UploadFailure> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Validate, upload, and return the new document. Any failure is kept as
    /// a dismissible error and yields `None`.
    pub async fn submit<B: StudyBackend>(
        &mut self,
        backend: &B,
        source: &UploadSource,
    ) -> Option<DocumentRef> {
        self.error = None;
        match Self::upload(backend, source).await {
            Ok(id) => {
                info!(document_id = %id, kind = ?source.kind(), "upload complete");
                Some(DocumentRef {
                    id,
                    kind: source.kind(),
                })
            }
            Err(error) => {
                if !error.is_validation() {
                    warn!(%error, kind = ?source.kind(), "upload failed");
                }
                self.error = Some(UploadFailure::from(&error));
                None
            }
        }
    }

    async fn upload<B: StudyBackend>(backend: &B, source: &UploadSource) -> Result<DocumentId> {
        match source {
            UploadSource::Video { url } => {
                let url = validate_video_url(url)?;
                backend.process_video(&url).await
            }
            UploadSource::Pdf { path } => {
                let (file_name, contents) = read_pdf(path).await?;
                backend.process_pdf(&file_name, contents).await
            }
        }
    }
}
