//! Read templates out of a folder.
//!
//! URL paths are mapped onto the folder after removing the prefix, so with the default `/` prefix,
//! `/static/templates/header.html` is read from `<root>/static/templates/header.html`.
use super::{Error, Fetch};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Static folder transport.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    prefix: PathBuf,
    root: PathBuf,
}

impl StaticFiles {
    /// Serve templates out of this folder.
    ///
    /// The path can be relative, or absolute. It must exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, Error> {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_owned()
        } else {
            std::env::current_dir()?.join(root)
        };

        Ok(Self {
            prefix: PathBuf::from("/"),
            root: root.canonicalize()?,
        })
    }

    /// Set the prefix removed from URL paths before they are
    /// resolved against the root folder.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = PathBuf::from("/").join(prefix.trim_start_matches('/'));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Fetch for StaticFiles {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        let relative = match Path::new(url).strip_prefix(&self.prefix) {
            Ok(relative) => relative,
            Err(_) => return Err(Error::NotFound(url.to_string())),
        };

        let path = self.root.join(relative);

        debug!("{} -> {}", url, path.display());

        // Resolve all symlinks.
        let path = match tokio::fs::canonicalize(&path).await {
            Ok(path) => path,
            Err(_) => return Err(Error::NotFound(url.to_string())),
        };

        // Protect against .. and symlinks going out of the root folder.
        if !path.starts_with(&self.root) {
            return Err(Error::NotFound(url.to_string()));
        }

        if !tokio::fs::metadata(&path).await?.is_file() {
            return Err(Error::NotFound(url.to_string()));
        }

        Ok(tokio::fs::read_to_string(&path).await?)
    }
}
