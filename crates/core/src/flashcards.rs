use tracing::{info, warn};

use crate::{
    client::StudyBackend,
    types::{DocumentId, Flashcard},
};

#[derive(Debug)]
pub enum FlashcardState {
    Loading,
    Failed(String),
    Empty,
    Ready(Deck),
}

/// A non-empty run of cards with a cursor that never leaves `0..len`
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
}

impl Deck {
    fn new(cards: Vec<Flashcard>) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        Some(Self {
            cards,
            index: 0,
            flipped: false,
        })
    }

    pub fn current(&self) -> &Flashcard {
        &self.cards[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.cards.len()
    }

    /// Fraction of the deck seen so far, counting the current card
    pub fn progress(&self) -> f64 {
        (self.index + 1) as f64 / self.cards.len() as f64
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Move forward one card, stopping at the last. Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        self.flipped = false;
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Move back one card, stopping at the first. Returns whether the cursor moved.
    pub fn previous(&mut self) -> bool {
        self.flipped = false;
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        true
    }
}

pub struct FlashcardViewer {
    document_id: DocumentId,
    state: FlashcardState,
}

impl FlashcardViewer {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            state: FlashcardState::Loading,
        }
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn state(&self) -> &FlashcardState {
        &self.state
    }

    pub fn deck(&self) -> Option<&Deck> {
        match &self.state {
            FlashcardState::Ready(deck) => Some(deck),
            _ => None,
        }
    }

    pub fn deck_mut(&mut self) -> Option<&mut Deck> {
        match &mut self.state {
            FlashcardState::Ready(deck) => Some(deck),
            _ => None,
        }
    }

    /// True until the first fetch has been made
    pub fn needs_load(&self) -> bool {
        matches!(self.state, FlashcardState::Loading)
    }

    pub async fn load<B: StudyBackend>(&mut self, backend: &B) {
        self.state = FlashcardState::Loading;
        self.state = match backend.generate_flashcards(&self.document_id).await {
            Ok(cards) => {
                info!(document_id = %self.document_id, count = cards.len(), "flashcards loaded");
                Deck::new(cards).map_or(FlashcardState::Empty, FlashcardState::Ready)
            }
            Err(error) => {
                warn!(%error, document_id = %self.document_id, "flashcard fetch failed");
                FlashcardState::Failed(error.to_string())
            }
        };
    }

    /// Re-issue the fetch after a failure. Returns false when there was nothing to retry.
    pub async fn retry<B: StudyBackend>(&mut self, backend: &B) -> bool {
        if !matches!(self.state, FlashcardState::Failed(_)) {
            return false;
        }
        self.load(backend).await;
        true
    }
}
