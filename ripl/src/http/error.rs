use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("\"{url}\" returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("\"{0}\" not found")]
    NotFound(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no template origin or root configured")]
    NoTransport,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages() {
        let status = Error::Status {
            status: 404,
            url: "/static/templates/missing.html".into(),
        };
        assert_eq!(
            status.to_string(),
            "\"/static/templates/missing.html\" returned HTTP 404"
        );
        assert_eq!(
            Error::NoTransport.to_string(),
            "no template origin or root configured"
        );
    }
}
