use std::sync::Arc;

use vecqa_rag::QueryPipeline;

use crate::auth::BearerAuth;

/// Shared by every handler; built once at startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub pipeline: Arc<QueryPipeline>,
    pub auth: Arc<BearerAuth>,
    pub default_top_k: usize,
}

impl AppState {
    pub fn new(pipeline: QueryPipeline, auth: BearerAuth, default_top_k: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            auth: Arc::new(auth),
            default_top_k,
        }
    }
}
