use reqwest::{
    Response,
    multipart::{Form, Part},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::{
    config::ApiConfig,
    error::{Result, StudyError},
    types::{
        ChatRequest, DocumentId, DocumentRequest, DocumentResponse, ErrorBody, Flashcard,
        FlashcardsResponse, ProcessVideoRequest, QuizQuestion, QuizResponse,
    },
};

/// A body that arrives in pieces. Each call may suspend until the next chunk
/// or end of stream (`None`).
pub trait ChunkSource {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>>;
}

/// The backend contract every study tool talks through
pub trait StudyBackend {
    type Stream: ChunkSource;

    async fn process_video(&self, youtube_url: &str) -> Result<DocumentId>;

    async fn process_pdf(&self, file_name: &str, contents: Vec<u8>) -> Result<DocumentId>;

    async fn generate_flashcards(&self, document_id: &DocumentId) -> Result<Vec<Flashcard>>;

    async fn generate_quiz(&self, document_id: &DocumentId) -> Result<Vec<QuizQuestion>>;

    /// Start a chat exchange. Resolves once the response headers are in and
    /// the status is a success; the text then streams through the returned source.
    async fn chat(&self, request: &ChatRequest) -> Result<Self::Stream>;
}

pub struct BackendClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl BackendClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send().await?;
        read_json(check_status(response).await?).await
    }
}

impl StudyBackend for BackendClient {
    type Stream = ResponseStream;

    async fn process_video(&self, youtube_url: &str) -> Result<DocumentId> {
        let response: DocumentResponse = self
            .post_json("process-video", &ProcessVideoRequest { youtube_url })
            .await?;
        info!(document_id = %response.document_id, "video processed");
        Ok(response.document_id)
    }

    async fn process_pdf(&self, file_name: &str, contents: Vec<u8>) -> Result<DocumentId> {
        let url = self.config.endpoint("process-pdf");
        debug!(%url, file_name, bytes = contents.len(), "POST multipart");

        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let response = self
            .http
            .post(&url)
            .multipart(Form::new().part("file", part))
            .send()
            .await?;

        let response: DocumentResponse = read_json(check_status(response).await?).await?;
        info!(document_id = %response.document_id, "pdf processed");
        Ok(response.document_id)
    }

    async fn generate_flashcards(&self, document_id: &DocumentId) -> Result<Vec<Flashcard>> {
        let response: FlashcardsResponse = self
            .post_json("generate-flashcards", &DocumentRequest { document_id })
            .await?;
        Ok(response.flashcards)
    }

    async fn generate_quiz(&self, document_id: &DocumentId) -> Result<Vec<QuizQuestion>> {
        let response: QuizResponse = self
            .post_json("generate-quiz", &DocumentRequest { document_id })
            .await?;
        Ok(response.quizzes)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ResponseStream> {
        let url = self.config.endpoint("chat");
        debug!(%url, history = request.history.len(), "POST stream");
        let response = self.http.post(&url).json(request).send().await?;
        Ok(ResponseStream {
            response: check_status(response).await?,
        })
    }
}

/// Streaming body of a successful chat response
pub struct ResponseStream {
    response: Response,
}

impl ChunkSource for ResponseStream {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.response.chunk().await?.map(|bytes| bytes.to_vec()))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Turn a non-success response into `StudyError::Status`, pulling the
/// backend's `detail`/`code` out of the body when it is JSON.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let detail = match body.detail {
        Some(serde_json::Value::String(detail)) => detail,
        Some(other) => other.to_string(),
        None if !text.trim().is_empty() => text.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    warn!(status = status.as_u16(), %detail, "backend returned an error");
    Err(StudyError::Status {
        status: status.as_u16(),
        detail,
        code: body.code,
    })
}
