use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Please enter a video URL")]
    EmptyUrl,

    #[error("Not a valid http(s) URL: {url}")]
    InvalidUrl { url: String },

    #[error("Please choose a PDF file")]
    MissingFile,

    #[error("File must be a PDF: {path}")]
    NotPdf { path: PathBuf },

    #[error("Could not read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Backend returned {status}: {detail}")]
    Status {
        status: u16,
        detail: String,
        code: Option<String>,
    },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StudyError {
    /// Validation errors are raised before any request is issued.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StudyError::EmptyUrl
                | StudyError::InvalidUrl { .. }
                | StudyError::MissingFile
                | StudyError::NotPdf { .. }
                | StudyError::FileRead { .. }
        )
    }

    /// Backend-provided error text, if the failure came with one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            StudyError::Status { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            StudyError::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StudyError>;
