use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use vecqa_rag::{RagAnswer, RagQuery};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Clone, Debug, Deserialize)]
pub struct VectorClientParams {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

pub(crate) async fn retrieve_context(
    state: &AppState,
    query: String,
    top_k: Option<usize>,
) -> Result<RagAnswer, ApiError> {
    let query = RagQuery::new(query, top_k.unwrap_or(state.default_top_k));
    Ok(state.pipeline.retrieve(&query).await?)
}

pub(crate) async fn answer_question(
    state: &AppState,
    query: String,
    top_k: Option<usize>,
) -> Result<RagAnswer, ApiError> {
    let query = RagQuery::new(query, top_k.unwrap_or(state.default_top_k));
    Ok(state.pipeline.ask(&query).await?)
}

/// `GET /vector_client`: context only, behind bearer auth.
pub(crate) async fn vector_client(
    State(state): State<AppState>,
    params: Result<Query<VectorClientParams>, QueryRejection>,
) -> Result<Json<RagAnswer>, ApiError> {
    let Query(params) = params?;
    let answer = retrieve_context(&state, params.query, params.top_k).await?;
    Ok(Json(answer))
}

/// `POST /ask`: context plus a generated answer when generation is enabled.
pub(crate) async fn ask(
    State(state): State<AppState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<RagAnswer>, ApiError> {
    let Json(body) = body?;
    let answer = answer_question(&state, body.query, body.top_k).await?;
    Ok(Json(answer))
}
