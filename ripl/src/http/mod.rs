//! Template transports.
//!
//! The template cache doesn't care where templates come from. It asks a [`Fetch`]
//! implementation for the body of a URL path, e.g. `/static/templates/header.html`,
//! and compiles whatever comes back.
//!
//! Two transports are included: [`HttpClient`] fetches templates from a web server,
//! and [`StaticFiles`] reads them from a local folder laid out the same way.
pub mod client;
pub mod error;
pub mod static_files;
pub mod url;

pub use client::HttpClient;
pub use error::Error;
pub use static_files::StaticFiles;
pub use self::url::TemplateUrl;

/// Template server origins are URLs.
pub use ::url::Url;

use crate::config::Transport;

use async_trait::async_trait;
use std::sync::Arc;

/// Fetch a resource by URL path and return its body.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, Error>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        (**self).fetch(url).await
    }
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for Box<T> {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        (**self).fetch(url).await
    }
}

/// Create the transport described by the configuration.
///
/// The HTTP transport is used if an origin is set, otherwise templates are read from the
/// static root folder.
pub fn transport(config: &Transport) -> Result<Box<dyn Fetch>, Error> {
    if let Some(ref origin) = config.origin {
        return Ok(Box::new(HttpClient::with_timeout(
            origin.as_str(),
            config.timeout(),
        )?));
    }

    if let Some(ref root) = config.root {
        return Ok(Box::new(
            StaticFiles::new(root)?.prefix(&config.prefix),
        ));
    }

    Err(Error::NoTransport)
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[tokio::test]
    async fn test_transport_from_config() -> Result<(), Error> {
        let dir = TempDir::new("ripl-transport")?;
        std::fs::create_dir_all(dir.path().join("static/templates"))?;
        std::fs::write(dir.path().join("static/templates/header.html"), "<h1>{{title}}</h1>")?;

        let config = Transport {
            root: Some(dir.path().to_owned()),
            ..Default::default()
        };

        let fetch = transport(&config)?;
        let body = fetch.fetch("/static/templates/header.html").await?;
        assert_eq!(body, "<h1>{{title}}</h1>");

        assert!(matches!(
            transport(&Transport::default()),
            Err(Error::NoTransport)
        ));

        Ok(())
    }
}
