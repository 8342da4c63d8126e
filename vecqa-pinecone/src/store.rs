use tracing::Instrument;
use vecqa_core::{Match, StoreError, VectorStore};

use crate::client::PineconeHttpClient;
use crate::config::PineconeStoreBuilder;
use crate::mapper::query_match_to_match;
use crate::types::{Metric, QueryRequest, QueryResponse};
use crate::PineconeStoreError;

/// Query-side adapter over one Pinecone index and namespace.
///
/// Built once at startup and shared by every request; it holds no mutable
/// state.
#[derive(Clone, Debug)]
pub struct PineconeVectorStore {
    pub(crate) client: PineconeHttpClient,
    pub(crate) index_name: Option<String>,
    pub(crate) namespace: Option<String>,
    pub(crate) dimension: usize,
    pub(crate) metric: Metric,
}

impl PineconeVectorStore {
    pub fn builder() -> PineconeStoreBuilder {
        PineconeStoreBuilder::new()
    }

    pub(crate) fn new(
        client: PineconeHttpClient,
        index_name: Option<String>,
        namespace: Option<String>,
        dimension: usize,
        metric: Metric,
    ) -> Self {
        Self {
            client,
            index_name,
            namespace,
            dimension,
            metric,
        }
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub async fn query_matches(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<Match>, PineconeStoreError> {
        if vector.len() != self.dimension {
            return Err(PineconeStoreError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let span = tracing::info_span!(
            "pinecone_query",
            index_name = ?self.index_name,
            namespace = ?self.namespace,
            top_k = top_k,
        );

        async {
            let request = QueryRequest {
                vector: vector.to_vec(),
                top_k,
                include_metadata: true,
                include_values: false,
                namespace: self.namespace.clone(),
            };

            let response: QueryResponse = self
                .client
                .post_typed_with_context("/query", &request, self.namespace.as_deref())
                .await?;

            let mut matches = response
                .matches
                .into_iter()
                .map(query_match_to_match)
                .collect::<Result<Vec<_>, _>>()?;
            matches.truncate(top_k);

            tracing::debug!(returned = matches.len(), "pinecone query finished");
            Ok::<_, PineconeStoreError>(matches)
        }
        .instrument(span)
        .await
    }
}

#[async_trait::async_trait]
impl VectorStore for PineconeVectorStore {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>, StoreError> {
        self.query_matches(vector, top_k)
            .await
            .map_err(StoreError::from)
    }
}
