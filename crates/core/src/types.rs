use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque key for a source the backend has ingested
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Video,
    Pdf,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Video => "YouTube video",
            SourceKind::Pdf => "PDF document",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: DocumentId,
    pub kind: SourceKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

// Wire shapes for the backend contract

#[derive(Serialize)]
pub struct ProcessVideoRequest<'a> {
    pub youtube_url: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct DocumentResponse {
    pub document_id: DocumentId,
}

#[derive(Serialize)]
pub struct DocumentRequest<'a> {
    pub document_id: &'a DocumentId,
}

/// `null` and a missing key both read as an empty list
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct FlashcardsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Deserialize)]
pub struct QuizResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub quizzes: Vec<QuizQuestion>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub parts: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub document_id: DocumentId,
    pub message: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub code: Option<String>,
}
