//! Global error type.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Config(#[from] crate::config::Error),

    #[error("{0}")]
    Http(#[from] crate::http::Error),

    #[error("{0}")]
    Template(#[from] crate::view::template::Error),

    #[error("{0}")]
    View(#[from] crate::view::Error),
}
