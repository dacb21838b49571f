//! Template cache.
//!
//! Using the cache ensures that templates are only fetched and compiled once. The first request for
//! a template fetches it through the transport, compiles it and keeps it in memory. Every request after
//! that is served from memory, without suspending.
//!
//! Requests for the same template made while it's still being fetched are not coalesced: each one
//! fetches the template. The first one to finish populates the cache, and the others get the
//! cached copy back.
//!
//! Entries are never evicted.
use super::{Error, Template};
use crate::config::Config;
use crate::http::{Fetch, TemplateUrl};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Templates cache.
pub struct Templates<F> {
    templates: Mutex<HashMap<String, Arc<Template>>>,
    fetch: F,
    url: TemplateUrl,
    cache_templates: bool,
}

impl<F: Fetch> Templates<F> {
    /// Create new empty template cache using the default URL scheme,
    /// e.g. `/static/templates/<id>.html`.
    pub fn new(fetch: F) -> Self {
        Self {
            templates: Mutex::new(HashMap::new()),
            fetch,
            url: TemplateUrl::default(),
            cache_templates: true,
        }
    }

    /// Create new empty template cache configured from `ripl.toml`.
    pub fn from_config(fetch: F, config: &Config) -> Self {
        Self::new(fetch)
            .url_scheme(config.templates.url())
            .cache_templates(config.general.cache_templates)
    }

    /// Set the URL scheme used to find templates.
    pub fn url_scheme(mut self, url: TemplateUrl) -> Self {
        self.url = url;
        self
    }

    /// Enable or disable caching. With caching disabled, every request
    /// fetches and compiles the template again.
    pub fn cache_templates(mut self, cache_templates: bool) -> Self {
        self.cache_templates = cache_templates;
        self
    }

    /// URL the template is fetched from.
    pub fn url(&self, id: &str) -> Result<String, Error> {
        validate(id)?;
        Ok(self.url.url(id))
    }

    /// Get a template from the cache. If the template isn't cached, it will be fetched
    /// and compiled.
    ///
    /// Cached templates are returned without suspending. Failures are returned
    /// to the caller and the template is not cached.
    pub async fn get(&self, id: &str) -> Result<Arc<Template>, Error> {
        validate(id)?;

        if let Some(template) = self.cached(id) {
            debug!("template \"{}\" cache hit", id);
            return Ok(template);
        }

        let url = self.url.url(id);
        debug!("template \"{}\" cache miss, fetching {}", id, url);

        let source = match self.fetch.fetch(&url).await {
            Ok(source) => source,
            Err(source) => {
                warn!("template \"{}\" fetch failed: {}", id, source);
                return Err(Error::Fetch {
                    id: id.to_string(),
                    source,
                });
            }
        };

        let template = match Template::compile(id, &source) {
            Ok(template) => Arc::new(template),
            Err(source) => {
                warn!("template \"{}\" failed to compile: {}", id, source);
                return Err(Error::Template {
                    id: id.to_string(),
                    source,
                });
            }
        };

        if !self.cache_templates {
            return Ok(template);
        }

        // Another request for the same template may have finished first.
        // Keep the template that's already there.
        let mut templates = self.templates.lock();
        let template = templates
            .entry(id.to_string())
            .or_insert_with(|| {
                info!("template \"{}\" cached", id);
                template
            })
            .clone();

        Ok(template)
    }

    /// Get a template only if it's already cached. Never fetches.
    pub fn cached(&self, id: &str) -> Option<Arc<Template>> {
        self.templates.lock().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.templates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.lock().is_empty()
    }

    /// Identifiers of all cached templates, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids = self.templates.lock().keys().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    /// The transport used to fetch templates.
    pub fn transport(&self) -> &F {
        &self.fetch
    }
}

impl<F: Fetch + 'static> Templates<F> {
    /// Get a template and pass it to the callback.
    ///
    /// If the template is cached (or the identifier is invalid), the callback is called before this
    /// function returns, and no task is spawned. Otherwise, the template is fetched in a Tokio task
    /// and the callback is called from that task, exactly once, with the template or the error.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn get_template<C>(self: &Arc<Self>, id: &str, callback: C) -> Option<JoinHandle<()>>
    where
        C: FnOnce(Result<Arc<Template>, Error>) + Send + 'static,
    {
        if let Err(err) = validate(id) {
            callback(Err(err));
            return None;
        }

        if let Some(template) = self.cached(id) {
            debug!("template \"{}\" cache hit", id);
            callback(Ok(template));
            return None;
        }

        let templates = Arc::clone(self);
        let id = id.to_string();

        Some(tokio::spawn(async move {
            callback(templates.get(&id).await);
        }))
    }
}

/// Template identifiers are relative URL paths: not empty, no leading `/`,
/// no `.` or `..` segments, and no query string or fragment.
fn validate(id: &str) -> Result<(), Error> {
    let valid = !id.is_empty()
        && !id.contains(['?', '#', '\\'])
        && id
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidId(id.to_string()))
    }
}
