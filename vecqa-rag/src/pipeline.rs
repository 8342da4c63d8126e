use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use vecqa_core::{ChatModel, ChatRequest, Embedding, Message, VectorStore};

use crate::prompt::{PromptTemplate, DEFAULT_SYSTEM_PROMPT};
use crate::{RagAnswer, RagError, RagQuery, Stage, DEFAULT_MAX_TOP_K};

/// How answers are produced once context has been retrieved.
#[derive(Clone, Debug)]
struct GenerationSettings {
    system_prompt: String,
    temperature: f32,
    template: PromptTemplate,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.3,
            template: PromptTemplate::default(),
        }
    }
}

#[derive(Clone)]
pub struct QueryPipeline {
    embedder: Arc<dyn Embedding>,
    store: Arc<dyn VectorStore>,
    generator: Option<Arc<dyn ChatModel>>,
    generation: GenerationSettings,
    max_top_k: usize,
    call_timeout: Option<Duration>,
}

impl std::fmt::Debug for QueryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("embedding_dimension", &self.embedder.dimension())
            .field("generation", &self.generator.is_some())
            .field("max_top_k", &self.max_top_k)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

pub struct QueryPipelineBuilder {
    embedder: Arc<dyn Embedding>,
    store: Arc<dyn VectorStore>,
    generator: Option<Arc<dyn ChatModel>>,
    generation: GenerationSettings,
    max_top_k: usize,
    call_timeout: Option<Duration>,
}

impl QueryPipelineBuilder {
    pub fn with_generator(mut self, generator: Arc<dyn ChatModel>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation.temperature = temperature;
        self
    }

    pub fn with_max_top_k(mut self, max_top_k: usize) -> Self {
        self.max_top_k = max_top_k;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<QueryPipeline, RagError> {
        if self.max_top_k == 0 {
            return Err(RagError::Config("max_top_k must be at least 1".to_string()));
        }
        if matches!(self.call_timeout, Some(timeout) if timeout.is_zero()) {
            return Err(RagError::Config("call timeout must be non-zero".to_string()));
        }
        Ok(QueryPipeline {
            embedder: self.embedder,
            store: self.store,
            generator: self.generator,
            generation: self.generation,
            max_top_k: self.max_top_k,
            call_timeout: self.call_timeout,
        })
    }
}

impl QueryPipeline {
    pub fn builder(
        embedder: Arc<dyn Embedding>,
        store: Arc<dyn VectorStore>,
    ) -> QueryPipelineBuilder {
        QueryPipelineBuilder {
            embedder,
            store,
            generator: None,
            generation: GenerationSettings::default(),
            max_top_k: DEFAULT_MAX_TOP_K,
            call_timeout: None,
        }
    }

    pub fn max_top_k(&self) -> usize {
        self.max_top_k
    }

    pub fn generates_answers(&self) -> bool {
        self.generator.is_some()
    }

    /// Checks the query before any collaborator is contacted and returns the
    /// trimmed question text.
    pub fn validate<'a>(&self, query: &'a RagQuery) -> Result<&'a str, RagError> {
        let question = query.query.trim();
        if question.is_empty() {
            return Err(RagError::Validation("query must not be empty".to_string()));
        }
        if query.top_k == 0 || query.top_k > self.max_top_k {
            return Err(RagError::Validation(format!(
                "top_k must be between 1 and {}",
                self.max_top_k
            )));
        }
        Ok(question)
    }

    /// Embeds the query and returns the text of the nearest matches, in the
    /// order the store ranked them.
    pub async fn retrieve(&self, query: &RagQuery) -> Result<RagAnswer, RagError> {
        let question = self.validate(query)?;
        let span = tracing::info_span!("rag_retrieve", top_k = query.top_k);
        async {
            let context = self.search(question, query.top_k).await?;
            tracing::info!(stage = %Stage::Responded, snippets = context.len(), "context returned");
            Ok::<_, RagError>(RagAnswer {
                context,
                answer: None,
            })
        }
        .instrument(span)
        .await
    }

    /// Retrieves context and, when a generator is configured, asks it to
    /// answer the question from that context.
    pub async fn ask(&self, query: &RagQuery) -> Result<RagAnswer, RagError> {
        let question = self.validate(query)?;
        let span = tracing::info_span!(
            "rag_ask",
            top_k = query.top_k,
            generation = self.generator.is_some()
        );
        async {
            let context = self.search(question, query.top_k).await?;
            let answer = match &self.generator {
                Some(generator) => Some(self.generate(generator, question, &context).await?),
                None => None,
            };
            tracing::info!(stage = %Stage::Responded, snippets = context.len(), "answer returned");
            Ok::<_, RagError>(RagAnswer { context, answer })
        }
        .instrument(span)
        .await
    }

    async fn search(&self, question: &str, top_k: usize) -> Result<Vec<String>, RagError> {
        tracing::debug!(stage = %Stage::Received, chars = question.len(), "embedding query");
        let vector = self.bounded(Stage::Embedded, self.embedder.embed(question)).await?;
        tracing::debug!(stage = %Stage::Embedded, dimension = vector.len(), "query embedded");

        let matches = self.bounded(Stage::Retrieved, self.store.query(&vector, top_k)).await?;
        for item in &matches {
            tracing::debug!(id = %item.id, score = item.score, "match");
        }

        let context = matches
            .iter()
            .take(top_k)
            .map(|item| item.text().to_string())
            .collect::<Vec<_>>();
        tracing::debug!(stage = %Stage::Retrieved, snippets = context.len(), "context retrieved");
        Ok(context)
    }

    async fn generate(
        &self,
        generator: &Arc<dyn ChatModel>,
        question: &str,
        context: &[String],
    ) -> Result<String, RagError> {
        let prompt = self.generation.template.render_answer(context, question)?;
        let request = ChatRequest {
            messages: vec![
                Message::system(self.generation.system_prompt.clone()),
                Message::user(prompt),
            ],
            temperature: Some(self.generation.temperature),
        };

        tracing::debug!(stage = %Stage::Generating, "requesting answer");
        let response = self.bounded(Stage::Generating, generator.complete(request)).await?;
        Ok(response.content.trim().to_string())
    }

    async fn bounded<T, E, F>(&self, stage: Stage, call: F) -> Result<T, RagError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<RagError>,
    {
        let result = match self.call_timeout {
            Some(after) => match tokio::time::timeout(after, call).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(%stage, ?after, "upstream call timed out");
                    return Err(RagError::Timeout { stage, after });
                }
            },
            None => call.await,
        };
        result.map_err(|err| {
            let err: RagError = err.into();
            tracing::warn!(%stage, error = %err, "upstream call failed");
            err
        })
    }
}
