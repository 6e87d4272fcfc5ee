//! Scripted in-memory backend for unit tests.

use std::{cell::RefCell, collections::VecDeque};

use crate::{
    client::{ChunkSource, StudyBackend},
    error::{Result, StudyError},
    types::{ChatRequest, DocumentId, Flashcard, QuizQuestion},
};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    ProcessVideo(String),
    ProcessPdf { file_name: String, bytes: usize },
    Flashcards(DocumentId),
    Quiz(DocumentId),
    Chat(ChatRequest),
}

pub fn status_error(status: u16, detail: &str) -> StudyError {
    StudyError::Status {
        status,
        detail: detail.to_string(),
        code: None,
    }
}

pub struct FakeStream {
    chunks: VecDeque<Result<Vec<u8>>>,
}

impl FakeStream {
    pub fn chunks(chunks: &[&str]) -> Self {
        Self::bytes(chunks.iter().map(|c| c.as_bytes()).collect())
    }

    pub fn bytes(chunks: Vec<&[u8]>) -> Self {
        Self {
            chunks: chunks.into_iter().map(|c| Ok(c.to_vec())).collect(),
        }
    }

    pub fn failing_after(chunks: &[&str], error: StudyError) -> Self {
        let mut stream = Self::chunks(chunks);
        stream.chunks.push_back(Err(error));
        stream
    }
}

impl ChunkSource for FakeStream {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        self.chunks.pop_front().transpose()
    }
}

#[derive(Default)]
pub struct FakeBackend {
    pub documents: RefCell<VecDeque<Result<DocumentId>>>,
    pub flashcards: RefCell<VecDeque<Result<Vec<Flashcard>>>>,
    pub quizzes: RefCell<VecDeque<Result<Vec<QuizQuestion>>>>,
    pub chats: RefCell<VecDeque<Result<FakeStream>>>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, reply: Result<DocumentId>) -> Self {
        self.documents.borrow_mut().push_back(reply);
        self
    }

    pub fn with_flashcards(self, reply: Result<Vec<Flashcard>>) -> Self {
        self.flashcards.borrow_mut().push_back(reply);
        self
    }

    pub fn with_quiz(self, reply: Result<Vec<QuizQuestion>>) -> Self {
        self.quizzes.borrow_mut().push_back(reply);
        self
    }

    pub fn with_chat(self, reply: Result<FakeStream>) -> Self {
        self.chats.borrow_mut().push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn next<T>(queue: &RefCell<VecDeque<Result<T>>>) -> Result<T> {
        queue
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(status_error(500, "no scripted reply")))
    }
}

impl StudyBackend for FakeBackend {
    type Stream = FakeStream;

    async fn process_video(&self, youtube_url: &str) -> Result<DocumentId> {
        self.calls
            .borrow_mut()
            .push(Call::ProcessVideo(youtube_url.to_string()));
        Self::next(&self.documents)
    }

    async fn process_pdf(&self, file_name: &str, contents: Vec<u8>) -> Result<DocumentId> {
        self.calls.borrow_mut().push(Call::ProcessPdf {
            file_name: file_name.to_string(),
            bytes: contents.len(),
        });
        Self::next(&self.documents)
    }

    async fn generate_flashcards(&self, document_id: &DocumentId) -> Result<Vec<Flashcard>> {
        self.calls
            .borrow_mut()
            .push(Call::Flashcards(document_id.clone()));
        Self::next(&self.flashcards)
    }

    async fn generate_quiz(&self, document_id: &DocumentId) -> Result<Vec<QuizQuestion>> {
        self.calls.borrow_mut().push(Call::Quiz(document_id.clone()));
        Self::next(&self.quizzes)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<FakeStream> {
        self.calls.borrow_mut().push(Call::Chat(request.clone()));
        Self::next(&self.chats)
    }
}

pub fn card(front: &str, back: &str) -> Flashcard {
    Flashcard {
        front: front.to_string(),
        back: back.to_string(),
    }
}

pub fn question(question: &str, options: &[&str], correct: &str) -> QuizQuestion {
    QuizQuestion {
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: correct.to_string(),
    }
}
