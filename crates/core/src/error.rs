use crate::models::Collection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("missing query")]
    InvalidQuery,

    #[error("{collection} fetch failed: {details}")]
    Backend {
        collection: Collection,
        details: String,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    /// Attach the failing collection to transport-level errors so the caller
    /// always learns which fetch broke the request.
    pub fn for_collection(self, collection: Collection) -> Self {
        match self {
            SearchError::InvalidQuery | SearchError::Backend { .. } => self,
            other => SearchError::Backend {
                collection,
                details: other.to_string(),
            },
        }
    }
}
