//! RetrievalQa -- the "Knowledge Base" tool.
//!
//! Embeds the question, pulls the nearest documents from the vector index,
//! and "stuffs" their text into a single QA prompt for the LLM.

use std::sync::Arc;

use tracing::{Instrument, debug, info_span};

use ragchat_types::agent::AgentConfig;
use ragchat_types::error::{AgentError, RetrievalError};
use ragchat_types::llm::{CompletionRequest, LlmMessage};
use ragchat_types::retrieval::ScoredDocument;

use crate::agent::tool::Tool;
use crate::llm::box_provider::BoxLlmProvider;

use super::embedder::BoxEmbedder;
use super::index::BoxVectorIndex;

pub const KNOWLEDGE_BASE_TOOL: &str = "Knowledge Base";

const KNOWLEDGE_BASE_DESCRIPTION: &str =
    "use this tool when answering general knowledge queries to get more information about the topic";

/// Question answering over the vector index.
pub struct RetrievalQa {
    provider: Arc<BoxLlmProvider>,
    embedder: BoxEmbedder,
    index: BoxVectorIndex,
    config: AgentConfig,
    top_k: usize,
}

impl RetrievalQa {
    pub fn new(
        provider: Arc<BoxLlmProvider>,
        embedder: BoxEmbedder,
        index: BoxVectorIndex,
        config: AgentConfig,
        top_k: usize,
    ) -> Self {
        Self {
            provider,
            embedder,
            index,
            config,
            top_k,
        }
    }

    /// Embed `question` and return the index's nearest documents.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredDocument>, RetrievalError> {
        let vectors = self.embedder.embed(&[question.to_string()]).await?;
        let vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::Embedding("embedder returned no vector".to_string()))?;
        self.index.query(&vector, self.top_k).await
    }

    /// Build the "stuff" prompt: every document's text joined as context.
    fn stuff_prompt(documents: &[ScoredDocument]) -> String {
        let context = documents
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        format!(
            "Use the following pieces of context to answer the user's question. \n\
If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\
----------------\n{context}"
        )
    }

    fn tool_error(&self, err: RetrievalError) -> AgentError {
        AgentError::Tool {
            name: KNOWLEDGE_BASE_TOOL.to_string(),
            message: err.to_string(),
        }
    }
}

impl Tool for RetrievalQa {
    fn name(&self) -> &str {
        KNOWLEDGE_BASE_TOOL
    }

    fn description(&self) -> &str {
        KNOWLEDGE_BASE_DESCRIPTION
    }

    async fn run(&self, input: &str) -> Result<String, AgentError> {
        let documents = self.retrieve(input).await.map_err(|e| self.tool_error(e))?;
        debug!(matches = documents.len(), "Retrieved context documents");

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![LlmMessage::user(input)],
            system: Some(Self::stuff_prompt(&documents)),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            stop_sequences: None,
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            tool = KNOWLEDGE_BASE_TOOL,
        );
        let response = self.provider.complete(&request).instrument(span).await?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex as StdMutex;

    use ragchat_types::llm::{CompletionResponse, LlmError, StopReason, Usage};
    use ragchat_types::retrieval::VectorRecord;

    use crate::llm::provider::LlmProvider;
    use crate::retrieval::embedder::Embedder;
    use crate::retrieval::index::VectorIndex;

    struct EchoProvider {
        seen: Arc<StdMutex<Vec<CompletionRequest>>>,
    }

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(CompletionResponse {
                id: "qa".to_string(),
                content: "answer from context".to_string(),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }

    struct FixedEmbedder;

    impl Embedder for FixedEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
            Ok(texts.iter().map(|t| vec![t.len() as f32]).collect())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct StaticIndex {
        queried_top_k: Arc<StdMutex<Option<usize>>>,
    }

    impl VectorIndex for StaticIndex {
        async fn query(
            &self,
            _vector: &[f32],
            top_k: usize,
        ) -> Result<Vec<ScoredDocument>, RetrievalError> {
            *self.queried_top_k.lock().unwrap() = Some(top_k);
            Ok(vec![
                ScoredDocument {
                    id: "a-0".to_string(),
                    score: 0.9,
                    text: "Ferris is the Rust mascot.".to_string(),
                },
                ScoredDocument {
                    id: "a-1".to_string(),
                    score: 0.7,
                    text: "Cargo is the Rust package manager.".to_string(),
                },
            ])
        }

        async fn upsert(&self, records: &[VectorRecord]) -> Result<usize, RetrievalError> {
            Ok(records.len())
        }
    }

    struct BrokenIndex;

    impl VectorIndex for BrokenIndex {
        async fn query(
            &self,
            _vector: &[f32],
            _top_k: usize,
        ) -> Result<Vec<ScoredDocument>, RetrievalError> {
            Err(RetrievalError::Index("503 unavailable".to_string()))
        }

        async fn upsert(&self, _records: &[VectorRecord]) -> Result<usize, RetrievalError> {
            Ok(0)
        }
    }

    fn provider(seen: Arc<StdMutex<Vec<CompletionRequest>>>) -> Arc<BoxLlmProvider> {
        Arc::new(BoxLlmProvider::new(EchoProvider { seen }))
    }

    #[tokio::test]
    async fn test_run_stuffs_retrieved_text_into_prompt() {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let top_k = Arc::new(StdMutex::new(None));
        let qa = RetrievalQa::new(
            provider(seen.clone()),
            BoxEmbedder::new(FixedEmbedder),
            BoxVectorIndex::new(StaticIndex {
                queried_top_k: top_k.clone(),
            }),
            AgentConfig::default(),
            4,
        );

        let answer = qa.run("who is ferris").await.unwrap();

        assert_eq!(answer, "answer from context");
        assert_eq!(*top_k.lock().unwrap(), Some(4));
        let seen = seen.lock().unwrap();
        let system = seen[0].system.as_deref().unwrap();
        assert!(system.contains("Ferris is the Rust mascot."));
        assert!(system.contains("Cargo is the Rust package manager."));
        assert_eq!(seen[0].messages[0].content, "who is ferris");
    }

    #[tokio::test]
    async fn test_index_failure_is_tool_error() {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let qa = RetrievalQa::new(
            provider(seen.clone()),
            BoxEmbedder::new(FixedEmbedder),
            BoxVectorIndex::new(BrokenIndex),
            AgentConfig::default(),
            4,
        );

        let err = qa.run("anything").await.unwrap_err();

        assert!(matches!(err, AgentError::Tool { ref name, .. } if name == KNOWLEDGE_BASE_TOOL));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tool_identity() {
        let qa = RetrievalQa::new(
            provider(Arc::new(StdMutex::new(Vec::new()))),
            BoxEmbedder::new(FixedEmbedder),
            BoxVectorIndex::new(BrokenIndex),
            AgentConfig::default(),
            4,
        );
        assert_eq!(qa.name(), "Knowledge Base");
        assert!(qa.description().starts_with("use this tool when answering general knowledge"));
    }
}
