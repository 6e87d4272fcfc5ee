use tracing::{info, warn};

use crate::{
    client::StudyBackend,
    types::{DocumentId, QuizQuestion},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    Unanswered,
    Selected(String),
    Evaluated { selected: String, correct: bool },
}

impl Answer {
    pub fn selected(&self) -> Option<&str> {
        match self {
            Answer::Unanswered => None,
            Answer::Selected(option) | Answer::Evaluated { selected: option, .. } => Some(option),
        }
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(self, Answer::Evaluated { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
}

impl QuizResult {
    /// Rounded to the nearest whole percent
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.score as f64 / self.total as f64 * 100.0).round() as u32
    }
}

/// One pass through a fixed question list
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    answers: Vec<Answer>,
    index: usize,
    score: usize,
    finished: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let answers = vec![Answer::Unanswered; questions.len()];
        Self {
            questions,
            answers,
            index: 0,
            score: 0,
            finished: false,
        }
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        if self.finished {
            return None;
        }
        self.questions.get(self.index)
    }

    pub fn current_answer(&self) -> Option<&Answer> {
        if self.finished {
            return None;
        }
        self.answers.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn evaluated_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_evaluated()).count()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn result(&self) -> Option<QuizResult> {
        self.finished.then_some(QuizResult {
            score: self.score,
            total: self.questions.len(),
        })
    }

    /// Pick an option for the current question. Ignored once evaluated or
    /// when `option` is not one of the choices.
    pub fn select(&mut self, option: &str) -> bool {
        let Some(question) = self.current() else {
            return false;
        };
        if !question.options.iter().any(|o| o == option) {
            return false;
        }
        let answer = &mut self.answers[self.index];
        if answer.is_evaluated() {
            return false;
        }
        *answer = Answer::Selected(option.to_string());
        true
    }

    /// Lock in the selection. Returns whether it was correct, or `None` when
    /// there was nothing to evaluate.
    pub fn evaluate(&mut self) -> Option<bool> {
        let question = self.current()?;
        let Answer::Selected(selected) = &self.answers[self.index] else {
            return None;
        };
        let selected = selected.clone();
        let correct = selected == question.correct_answer;
        self.answers[self.index] = Answer::Evaluated { selected, correct };
        if correct {
            self.score += 1;
        }
        Some(correct)
    }

    /// Move on after evaluation; past the last question the quiz finishes.
    pub fn advance(&mut self) -> bool {
        match self.current_answer() {
            Some(answer) if answer.is_evaluated() => {}
            _ => return false,
        }
        if self.is_last() {
            self.finished = true;
        } else {
            self.index += 1;
        }
        true
    }

    /// Start over with the same questions
    pub fn retake(&mut self) {
        self.answers.fill(Answer::Unanswered);
        self.index = 0;
        self.score = 0;
        self.finished = false;
    }
}

#[derive(Debug)]
pub enum QuizState {
    Loading,
    Failed(String),
    Empty,
    Active(QuizSession),
}

pub struct QuizRunner {
    document_id: DocumentId,
    state: QuizState,
}

impl QuizRunner {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            state: QuizState::Loading,
        }
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            QuizState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut QuizSession> {
        match &mut self.state {
            QuizState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn needs_load(&self) -> bool {
        matches!(self.state, QuizState::Loading)
    }

    pub async fn load<B: StudyBackend>(&mut self, backend: &B) {
        self.state = QuizState::Loading;
        self.state = match backend.generate_quiz(&self.document_id).await {
            Ok(questions) if questions.is_empty() => QuizState::Empty,
            Ok(questions) => {
                info!(document_id = %self.document_id, count = questions.len(), "quiz loaded");
                QuizState::Active(QuizSession::new(questions))
            }
            Err(error) => {
                warn!(%error, document_id = %self.document_id, "quiz fetch failed");
                QuizState::Failed(error.to_string())
            }
        };
    }

    pub async fn retry<B: StudyBackend>(&mut self, backend: &B) -> bool {
        if !matches!(self.state, QuizState::Failed(_)) {
            return false;
        }
        self.load(backend).await;
        true
    }
}
