//! Fetch templates from a web server.
use super::{Error, Fetch};

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP transport.
///
/// URL paths are resolved against the origin, e.g. `/static/templates/header.html`
/// against `http://localhost:8000` is fetched from `http://localhost:8000/static/templates/header.html`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    origin: Url,
}

impl HttpClient {
    /// Create a client with a 5 second request timeout.
    pub fn new(origin: &str) -> Result<Self, Error> {
        Self::with_timeout(origin, Duration::from_secs(5))
    }

    pub fn with_timeout(origin: &str, timeout: Duration) -> Result<Self, Error> {
        let origin = Url::parse(origin)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, origin })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        let url = self.origin.join(url)?;

        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
