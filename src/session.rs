use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::chunker::Chunker;
use crate::config::AssistantConfig;
use crate::conversation::{ConversationStore, ConversationTurn};
use crate::embedding::{Embedder, HttpEmbedder};
use crate::error::ConfigError;
use crate::ingest::{Document, Ingestor};
use crate::llm::{CompletionClient, LLM};
use crate::prompt::{self, Persona, PromptMode};
use crate::retriever::Retriever;

/// What happened to a "process document" request, phrased for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Indexed { chunks: usize },
    NoText,
    Failed(String),
    NotSupported,
}

impl ProcessOutcome {
    pub fn message(&self) -> String {
        match self {
            ProcessOutcome::Indexed { chunks } => {
                format!("Document processed and embedded in-memory ({chunks} chunks).")
            }
            ProcessOutcome::NoText => {
                "No text extracted. Possibly a scanned PDF or empty file.".to_string()
            }
            ProcessOutcome::Failed(reason) => format!("Error processing document: {reason}"),
            ProcessOutcome::NotSupported => {
                "This assistant does not use uploaded documents.".to_string()
            }
        }
    }
}

/// One user's conversation: history, the document index, and the
/// collaborators used to answer.
pub struct Session {
    id: Uuid,
    persona: Persona,
    chunker: Chunker,
    top_k: usize,
    completion: Arc<dyn CompletionClient>,
    retriever: Retriever,
    document_processed: bool,
    chat_history: ConversationStore,
}

impl Session {
    pub fn new(
        persona: Persona,
        embedder: Arc<dyn Embedder>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Session {
            id: Uuid::new_v4(),
            persona,
            chunker: Chunker::default(),
            top_k: 3,
            completion,
            retriever: Retriever::new(embedder),
            document_processed: false,
            chat_history: ConversationStore::new(),
        }
    }

    /// A session wired to the hosted embedding and completion backends.
    pub fn from_config(persona: Persona, config: &AssistantConfig) -> Result<Self, ConfigError> {
        let chunker = Chunker::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap)?;
        Ok(Session::new(
            persona,
            Arc::new(HttpEmbedder::new(&config.embedding)),
            Arc::new(LLM::new(config.completion.clone())),
        )
        .with_chunker(chunker)
        .with_top_k(config.retrieval.top_k))
    }

    pub fn with_chunker(mut self, chunker: Chunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn document_processed(&self) -> bool {
        self.document_processed
    }

    pub fn has_index(&self) -> bool {
        self.retriever.has_index()
    }

    pub fn history(&self) -> &ConversationStore {
        &self.chat_history
    }

    pub fn mode(&self) -> PromptMode {
        PromptMode::select(self.document_processed, self.retriever.has_index())
    }

    /// Extracts, chunks and indexes `doc`, replacing any earlier document.
    /// On any failure the session keeps its previous document state.
    pub async fn process_document(&mut self, doc: &Document) -> ProcessOutcome {
        let span = info_span!("process_document", session = %self.id, name = %doc.name);
        async {
            if !self.persona.accepts_documents() {
                return ProcessOutcome::NotSupported;
            }

            let extraction = Ingestor::extract(doc);
            if let Some(err) = extraction.error {
                return ProcessOutcome::Failed(err.to_string());
            }
            if extraction.text.trim().is_empty() {
                warn!("no text extracted");
                return ProcessOutcome::NoText;
            }

            let chunks = self.chunker.split(&extraction.text);
            if let Err(e) = self.retriever.build(&chunks).await {
                warn!(error = %e, "embedding failed");
                return ProcessOutcome::Failed(e.to_string());
            }

            self.document_processed = true;
            info!(chunks = chunks.len(), "document ready");
            ProcessOutcome::Indexed {
                chunks: chunks.len(),
            }
        }
        .instrument(span)
        .await
    }

    /// Answers `question` and records exactly one turn. Blank questions are
    /// ignored. Backend failures become the recorded answer.
    pub async fn ask(&mut self, question: &str) -> Option<&ConversationTurn> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        let span = info_span!("ask", session = %self.id, mode = ?self.mode());
        let answer = self.answer(question).instrument(span).await;
        Some(self.chat_history.append(ConversationTurn {
            question: question.to_string(),
            answer,
        }))
    }

    async fn answer(&self, question: &str) -> String {
        let prompt = match self.build_prompt(question).await {
            Ok(prompt) => prompt,
            Err(message) => return message,
        };
        match self.completion.complete(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "completion failed");
                format!("Error: could not get a response from the model ({e}).")
            }
        }
    }

    /// The prompt for `question` under the current mode, or a user-facing
    /// error if context retrieval failed.
    pub async fn build_prompt(&self, question: &str) -> Result<String, String> {
        match self.mode() {
            PromptMode::Document => {
                let context = self
                    .retriever
                    .retrieve(question, self.top_k)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "context retrieval failed");
                        format!("Error: could not search the document ({e}).")
                    })?;
                Ok(prompt::document_prompt(&context, question))
            }
            PromptMode::Persona => Ok(prompt::persona_prompt(self.persona, question)),
        }
    }

    /// "New Chat": drops history, the index and the document flag together.
    pub fn reset(&mut self) {
        self.chat_history.reset();
        self.retriever.clear();
        self.document_processed = false;
        info!(session = %self.id, "session reset");
    }
}
