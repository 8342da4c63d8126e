use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use super::query::{answer_question, retrieve_context, AskRequest, VectorClientParams};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub(crate) struct ToolInfo {
    name: &'static str,
    description: &'static str,
    parameters: Value,
}

#[derive(Serialize)]
pub(crate) struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

fn query_schema(max_top_k: usize, default_top_k: usize) -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": { "type": "string", "minLength": 1, "description": "Text to search" },
            "top_k": {
                "type": "integer",
                "minimum": 1,
                "maximum": max_top_k,
                "default": default_top_k,
                "description": "Number of results to return"
            }
        },
        "required": ["query"]
    })
}

pub(crate) async fn list_tools(State(state): State<AppState>) -> Json<ToolListResponse> {
    let max_top_k = state.pipeline.max_top_k();
    let schema = query_schema(max_top_k, state.default_top_k);
    Json(ToolListResponse {
        tools: vec![
            ToolInfo {
                name: "vector_client",
                description: "Search the client knowledge base and return matching text snippets",
                parameters: schema.clone(),
            },
            ToolInfo {
                name: "ask",
                description: "Answer a question from snippets retrieved from the client knowledge base",
                parameters: schema,
            },
        ],
    })
}

pub(crate) async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    params: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(params) = params?;
    let result = match name.as_str() {
        "vector_client" => {
            let params: VectorClientParams = parse_params(&name, params)?;
            retrieve_context(&state, params.query, params.top_k).await?
        }
        "ask" => {
            let params: AskRequest = parse_params(&name, params)?;
            answer_question(&state, params.query, params.top_k).await?
        }
        _ => {
            return Err(ApiError::not_found(format!(
                "no tool registered with name: {name}"
            )))
        }
    };
    Ok(Json(json!({ "result": result })))
}

fn parse_params<T: serde::de::DeserializeOwned>(tool: &str, params: Value) -> Result<T, ApiError> {
    serde_json::from_value(params)
        .map_err(|err| ApiError::bad_request(format!("{tool}: invalid params: {err}")))
}
