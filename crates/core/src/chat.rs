use tracing::{debug, warn};

use crate::{
    client::{ChunkSource, StudyBackend},
    decode::Utf8StreamDecoder,
    error::{Result, StudyError},
    types::{ChatRequest, DocumentId, HistoryEntry, Role},
};

pub const GREETING: &str =
    "Hi! I'm your AI tutor. Ask me anything about the document or video you just provided.";

/// Replaces the open turn's text when the exchange fails at any point
pub const STREAM_ERROR_MESSAGE: &str =
    "Sorry, I encountered an error while processing your request.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    /// Still receiving streamed text
    Open,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub state: TurnState,
}

impl Turn {
    fn closed(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            state: TurnState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == TurnState::Open
    }
}

#[derive(Debug)]
pub enum SendOutcome {
    /// Empty message, or another send still in flight. Nothing changed.
    Rejected,
    Completed,
    Failed(StudyError),
}

/// Chat transcript for one document.
///
/// Sends are strictly one at a time: `begin` refuses while a previous
/// exchange has not been completed or failed. The assistant placeholder
/// created by `begin` is the only turn that streamed text is written into.
pub struct ChatSession {
    document_id: DocumentId,
    turns: Vec<Turn>,
    greeting: bool,
    in_flight: bool,
    decoder: Utf8StreamDecoder,
}

impl ChatSession {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            turns: vec![Turn::closed(Role::Assistant, GREETING)],
            greeting: true,
            in_flight: false,
            decoder: Utf8StreamDecoder::new(),
        }
    }

    pub fn without_greeting(document_id: DocumentId) -> Self {
        Self {
            turns: Vec::new(),
            greeting: false,
            ..Self::new(document_id)
        }
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn open_turn(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.is_open())
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Closed turns sent as context with the next message. The greeting is
    /// local decoration and never leaves the client.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.turns
            .iter()
            .skip(usize::from(self.greeting))
            .filter(|t| !t.is_open())
            .map(|t| HistoryEntry {
                role: t.role,
                parts: t.text.clone(),
            })
            .collect()
    }

    /// Record the user turn and open an assistant placeholder, returning the
    /// request to send. `None` when the message is blank or a send is in flight.
    pub fn begin(&mut self, message: &str) -> Option<ChatRequest> {
        let message = message.trim();
        if message.is_empty() {
            debug!("ignoring empty chat message");
            return None;
        }
        if self.in_flight {
            debug!("chat send already in flight");
            return None;
        }

        let history = self.history();
        self.turns.push(Turn::closed(Role::User, message));
        self.turns.push(Turn {
            role: Role::Assistant,
            text: String::new(),
            state: TurnState::Open,
        });
        self.in_flight = true;
        self.decoder = Utf8StreamDecoder::new();

        Some(ChatRequest {
            document_id: self.document_id.clone(),
            message: message.to_string(),
            history,
        })
    }

    /// Decode a received chunk into the open turn. Returns the text appended.
    pub fn apply_chunk(&mut self, chunk: &[u8]) -> String {
        if self.open_turn().is_none() {
            warn!("chunk received with no open turn, dropping");
            return String::new();
        }
        let delta = self.decoder.decode(chunk);
        if let Some(turn) = self.open_turn_mut() {
            turn.text.push_str(&delta);
        }
        delta
    }

    /// End of stream: flush the decoder and close the open turn. Returns any
    /// text flushed from the decoder.
    pub fn complete(&mut self) -> String {
        let tail = self.decoder.finish();
        if let Some(turn) = self.open_turn_mut() {
            turn.text.push_str(&tail);
            turn.state = TurnState::Closed;
        }
        self.in_flight = false;
        tail
    }

    pub fn fail(&mut self) {
        self.decoder = Utf8StreamDecoder::new();
        if let Some(turn) = self.open_turn_mut() {
            turn.text = STREAM_ERROR_MESSAGE.to_string();
            turn.state = TurnState::Closed;
        }
        self.in_flight = false;
    }

    /// Run one full exchange. `on_delta` sees each piece of decoded text as
    /// it is appended, in delivery order.
    pub async fn send<B, F>(&mut self, backend: &B, message: &str, mut on_delta: F) -> SendOutcome
    where
        B: StudyBackend,
        F: FnMut(&str),
    {
        let Some(request) = self.begin(message) else {
            return SendOutcome::Rejected;
        };

        match self.pump(backend, &request, &mut on_delta).await {
            Ok(()) => {
                let tail = self.complete();
                if !tail.is_empty() {
                    on_delta(&tail);
                }
                SendOutcome::Completed
            }
            Err(error) => {
                warn!(%error, document_id = %self.document_id, "chat stream failed");
                self.fail();
                SendOutcome::Failed(error)
            }
        }
    }

    async fn pump<B, F>(&mut self, backend: &B, request: &ChatRequest, on_delta: &mut F) -> Result<()>
    where
        B: StudyBackend,
        F: FnMut(&str),
    {
        let mut stream = backend.chat(request).await?;
        while let Some(chunk) = stream.next_chunk().await? {
            let delta = self.apply_chunk(&chunk);
            if !delta.is_empty() {
                on_delta(&delta);
            }
        }
        debug!(document_id = %self.document_id, "chat stream finished");
        Ok(())
    }

    fn open_turn_mut(&mut self) -> Option<&mut Turn> {
        self.turns.iter_mut().rev().find(|t| t.is_open())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeBackend, FakeStream, status_error};

    fn session() -> ChatSession {
        ChatSession::new(DocumentId::new("doc-1"))
    }

    fn open_count(session: &ChatSession) -> usize {
        session.turns().iter().filter(|t| t.is_open()).count()
    }

    #[tokio::test]
    async fn streamed_answer_lands_in_last_turn() {
        let backend =
            FakeBackend::new().with_chat(Ok(FakeStream::chunks(&["X is ", "Y."])));
        let mut chat = session();
        let mut seen = Vec::new();

        let outcome = chat
            .send(&backend, "What is X?", |delta| seen.push(delta.to_string()))
            .await;

        assert!(matches!(outcome, SendOutcome::Completed));
        assert_eq!(seen, vec!["X is ", "Y."]);
        assert_eq!(
            chat.last(),
            Some(&Turn::closed(Role::Assistant, "X is Y."))
        );
        assert_eq!(chat.turns()[1], Turn::closed(Role::User, "What is X?"));
        assert!(!chat.is_in_flight());
        assert_eq!(
            backend.calls(),
            vec![Call::Chat(ChatRequest {
                document_id: DocumentId::new("doc-1"),
                message: "What is X?".to_string(),
                history: Vec::new(),
            })]
        );
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_request() {
        let backend = FakeBackend::new();
        let mut chat = session();

        let outcome = chat.send(&backend, "   \n", |_| {}).await;

        assert!(matches!(outcome, SendOutcome::Rejected));
        assert_eq!(chat.turns().len(), 1);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn second_begin_while_in_flight_is_rejected() {
        let mut chat = session();
        assert!(chat.begin("first").is_some());
        assert!(chat.begin("second").is_none());
        assert_eq!(chat.turns().len(), 3);

        chat.apply_chunk(b"done");
        chat.complete();
        assert!(chat.begin("second").is_some());
    }

    #[test]
    fn only_the_open_turn_receives_chunks() {
        let mut chat = session();
        chat.begin("first");
        chat.apply_chunk(b"one");
        chat.complete();
        let before: Vec<Turn> = chat.turns().to_vec();

        chat.begin("second");
        for chunk in [b"a", b"b", b"c"] {
            chat.apply_chunk(chunk);
            assert_eq!(open_count(&chat), 1);
            assert!(chat.last().is_some_and(|t| t.is_open()));
            assert_eq!(&chat.turns()[..before.len()], &before[..]);
        }
        chat.complete();

        assert_eq!(open_count(&chat), 0);
        assert_eq!(chat.last().map(|t| t.text.as_str()), Some("abc"));
    }

    #[test]
    fn chunk_without_open_turn_is_dropped() {
        let mut chat = session();
        assert_eq!(chat.apply_chunk(b"stray"), "");
        assert_eq!(chat.turns().len(), 1);
    }

    #[tokio::test]
    async fn failure_mid_stream_replaces_partial_text() {
        let backend = FakeBackend::new().with_chat(Ok(FakeStream::failing_after(
            &["X is "],
            status_error(502, "upstream closed"),
        )));
        let mut chat = session();

        let outcome = chat.send(&backend, "What is X?", |_| {}).await;

        assert!(matches!(outcome, SendOutcome::Failed(_)));
        assert_eq!(
            chat.last(),
            Some(&Turn::closed(Role::Assistant, STREAM_ERROR_MESSAGE))
        );
        assert!(!chat.is_in_flight());
    }

    #[tokio::test]
    async fn error_status_closes_placeholder_and_allows_resend() {
        let backend = FakeBackend::new()
            .with_chat(Err(status_error(500, "boom")))
            .with_chat(Ok(FakeStream::chunks(&["ok"])));
        let mut chat = session();

        let first = chat.send(&backend, "hello", |_| {}).await;
        assert!(matches!(first, SendOutcome::Failed(StudyError::Status { status: 500, .. })));
        assert_eq!(open_count(&chat), 0);

        let second = chat.send(&backend, "hello again", |_| {}).await;
        assert!(matches!(second, SendOutcome::Completed));
        assert_eq!(chat.last().map(|t| t.text.as_str()), Some("ok"));
    }

    #[tokio::test]
    async fn history_carries_prior_turns_but_not_greeting() {
        let backend = FakeBackend::new()
            .with_chat(Ok(FakeStream::chunks(&["Y."])))
            .with_chat(Ok(FakeStream::chunks(&["Z."])));
        let mut chat = session();

        chat.send(&backend, "What is X?", |_| {}).await;
        chat.send(&backend, "And W?", |_| {}).await;

        let calls = backend.calls();
        let Call::Chat(second) = &calls[1] else {
            panic!("expected chat call, got {calls:?}");
        };
        assert_eq!(second.message, "And W?");
        assert_eq!(
            second.history,
            vec![
                HistoryEntry {
                    role: Role::User,
                    parts: "What is X?".to_string()
                },
                HistoryEntry {
                    role: Role::Assistant,
                    parts: "Y.".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn multibyte_text_split_between_chunks() {
        let text = "naïve → ok";
        let bytes = text.as_bytes();
        for split in 1..bytes.len() {
            let (head, tail) = bytes.split_at(split);
            let backend = FakeBackend::new().with_chat(Ok(FakeStream::bytes(vec![head, tail])));
            let mut chat = ChatSession::without_greeting(DocumentId::new("doc"));
            let mut streamed = String::new();

            chat.send(&backend, "q", |delta| streamed.push_str(delta)).await;

            assert_eq!(chat.last().map(|t| t.text.as_str()), Some(text));
            assert_eq!(streamed, text);
        }
    }

    #[tokio::test]
    async fn empty_stream_closes_with_empty_text() {
        let backend = FakeBackend::new().with_chat(Ok(FakeStream::chunks(&[])));
        let mut chat = session();

        let outcome = chat.send(&backend, "anything?", |_| {}).await;

        assert!(matches!(outcome, SendOutcome::Completed));
        assert_eq!(chat.last(), Some(&Turn::closed(Role::Assistant, "")));
    }
}
