use std::collections::HashMap;

use serde_json::Value;
use vecqa_core::Match;

use crate::error::PineconeStoreError;
use crate::types::QueryMatch;

/// Converts a raw Pinecone match into a core [`Match`].
///
/// Missing or null metadata becomes an empty map; metadata that is present but
/// not a JSON object is rejected as malformed.
pub fn query_match_to_match(raw: QueryMatch) -> Result<Match, PineconeStoreError> {
    let metadata = match raw.metadata {
        None | Some(Value::Null) => HashMap::new(),
        Some(Value::Object(object)) => object.into_iter().collect(),
        Some(_) => {
            return Err(PineconeStoreError::Malformed(format!(
                "metadata of match '{}' must be an object",
                raw.id
            )))
        }
    };

    Ok(Match {
        id: raw.id,
        score: raw.score,
        metadata,
    })
}

/// Control-plane hosts come back without a scheme.
pub fn host_to_base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}
