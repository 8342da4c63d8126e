//! HTTP surface.
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | `GET`  | `/vector_client?query=..&top_k=..` | bearer | retrieved context only |
//! | `POST` | `/ask` | none | retrieved context plus generated answer |
//! | `GET`  | `/tools/list` | bearer | the two query operations as callable tools |
//! | `POST` | `/tools/:name` | bearer | invoke a tool with a JSON params object |
//! | `GET`  | `/health` | none | liveness and version |

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_bearer;
use crate::state::AppState;

mod health;
mod query;
mod tools;

pub use query::{AskRequest, VectorClientParams};

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/vector_client", get(query::vector_client))
        .route("/tools/list", get(tools::list_tools))
        .route("/tools/:name", post(tools::call_tool))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/ask", post(query::ask))
        .route("/health", get(health::health))
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
