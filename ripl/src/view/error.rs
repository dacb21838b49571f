use thiserror::Error;

/// Template cache error.
///
/// Failures are never cached, so the next request for the same template tries again.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid template identifier \"{0}\"")]
    InvalidId(String),

    #[error("failed to fetch template \"{id}\": {source}")]
    Fetch {
        id: String,
        source: crate::http::Error,
    },

    #[error("failed to compile template \"{id}\": {source}")]
    Template {
        id: String,
        source: super::template::Error,
    },
}

impl Error {
    /// Identifier of the template that failed.
    pub fn id(&self) -> &str {
        match self {
            Error::InvalidId(id) => id,
            Error::Fetch { id, .. } => id,
            Error::Template { id, .. } => id,
        }
    }
}
