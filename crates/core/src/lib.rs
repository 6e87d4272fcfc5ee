//! Studymate Core Library
//!
//! Typed client for the study backend plus the state behind each study tool:
//! document upload, flashcard review, quizzes, and the streaming tutor chat.

pub mod chat;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod flashcards;
pub mod format;
pub mod quiz;
pub mod shell;
pub mod types;
pub mod upload;

#[cfg(test)]
mod testing;

// Re-export commonly used items at crate root
pub use chat::{ChatSession, SendOutcome, Turn, TurnState};
pub use client::{BackendClient, ChunkSource, StudyBackend};
pub use config::ApiConfig;
pub use error::{Result, StudyError};
pub use flashcards::{Deck, FlashcardState, FlashcardViewer};
pub use quiz::{Answer, QuizResult, QuizRunner, QuizSession, QuizState};
pub use shell::{Dashboard, Message, Shell, Tool, View};
pub use types::{DocumentId, DocumentRef, Flashcard, QuizQuestion, Role, SourceKind};
pub use upload::{UploadCoordinator, UploadFailure, UploadHint, UploadSource};
