use crate::{
    chat::ChatSession,
    flashcards::FlashcardViewer,
    quiz::QuizRunner,
    types::DocumentRef,
    upload::UploadCoordinator,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Flashcards,
    Quiz,
}

/// Study tools for one ingested document. Each tool gets its own copy of
/// the document id and keeps its state across tab switches.
pub struct Dashboard {
    document: DocumentRef,
    tool: Tool,
    pub flashcards: FlashcardViewer,
    pub quiz: QuizRunner,
    pub chat: ChatSession,
}

impl Dashboard {
    pub fn new(document: DocumentRef) -> Self {
        Self {
            flashcards: FlashcardViewer::new(document.id.clone()),
            quiz: QuizRunner::new(document.id.clone()),
            chat: ChatSession::new(document.id.clone()),
            tool: Tool::default(),
            document,
        }
    }

    pub fn document(&self) -> &DocumentRef {
        &self.document
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }
}

pub enum View {
    Upload(UploadCoordinator),
    Dashboard(Box<Dashboard>),
}

#[derive(Debug, Clone)]
pub enum Message {
    DocumentReady(DocumentRef),
    SelectTool(Tool),
    UploadAnother,
}

pub struct Shell {
    view: View,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self {
            view: View::Upload(UploadCoordinator::new()),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn document(&self) -> Option<&DocumentRef> {
        self.dashboard().map(Dashboard::document)
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match &self.view {
            View::Dashboard(dashboard) => Some(&**dashboard),
            View::Upload(_) => None,
        }
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut Dashboard> {
        match &mut self.view {
            View::Dashboard(dashboard) => Some(&mut **dashboard),
            View::Upload(_) => None,
        }
    }

    pub fn upload_mut(&mut self) -> Option<&mut UploadCoordinator> {
        match &mut self.view {
            View::Upload(upload) => Some(upload),
            View::Dashboard(_) => None,
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::DocumentReady(document) => {
                self.view = View::Dashboard(Box::new(Dashboard::new(document)));
            }
            Message::SelectTool(tool) => {
                if let View::Dashboard(dashboard) = &mut self.view {
                    dashboard.tool = tool;
                }
            }
            Message::UploadAnother => {
                self.view = View::Upload(UploadCoordinator::new());
            }
        }
    }
}
