use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ApiError;
use crate::state::AppState;

/// Exact-match check of `Authorization: Bearer <secret>`.
///
/// An empty secret matches nothing, so a deployment without `AUTH_API`
/// rejects every protected request.
#[derive(Clone)]
pub struct BearerAuth {
    secret: SecretString,
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuth")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl BearerAuth {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    pub fn is_configured(&self) -> bool {
        !self.secret.expose_secret().is_empty()
    }

    pub fn verify(&self, header: Option<&str>) -> Result<(), ApiError> {
        let header =
            header.ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("invalid Authorization header format"))?;

        if self.is_configured() && token == self.secret.expose_secret().as_str() {
            Ok(())
        } else {
            Err(ApiError::unauthorized("invalid or missing API key"))
        }
    }
}

pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if let Err(err) = state.auth.verify(header) {
        tracing::warn!(path = %request.uri().path(), "rejected unauthenticated request");
        return Err(err);
    }
    Ok(next.run(request).await)
}
