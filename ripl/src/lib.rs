//! Ripl is a template cache for applications that render HTML from templates
//! stored on a web server.
//!
//! Templates are identified by a relative path, e.g. `header` or `partials/row`, and fetched
//! on first use from `/static/templates/<id>.html`. Once fetched, they are compiled and kept in memory,
//! so every render after the first one is served without a network round trip.
//!
//! # Getting started
//!
//! Ripl is built on top of Tokio:
//!
//! ```bash
//! cargo add ripl
//! cargo add tokio@1 --features full
//! ```
//!
//! Most types are available from the prelude:
//!
//! ```
//! use ripl::prelude::*;
//! ```
//!
//! ### Fetching templates
//!
//! The cache needs a transport to fetch templates with. [`http::HttpClient`] fetches them from a web server:
//!
//! ```rust,ignore
//! use ripl::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ripl::error::Error> {
//!     let templates = Templates::new(HttpClient::new("http://localhost:8000")?);
//!
//!     let header = templates.get("header").await?;
//!     println!("{}", header.render([("title", "Hi")])?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Templates
//!
//! Templates use a subset of Handlebars:
//!
//! ```rust
//! use ripl::prelude::*;
//!
//! let template = Template::from_str(
//!     "<ul>{{#each users}}<li>{{ name }}</li>{{else}}<li>nobody</li>{{/each}}</ul>",
//! )
//! .unwrap();
//!
//! let html = template
//!     .render(ripl::serde_json::json!({"users": [{"name": "Alice"}]}))
//!     .unwrap();
//!
//! assert_eq!(html, "<ul><li>Alice</li></ul>");
//! ```
pub mod colors;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod prelude;
pub mod view;

/// Wrapper around async traits to make them easy to use.
pub use async_trait::async_trait;
/// Template contexts can be built from JSON.
pub use serde_json;
/// Tokio is an asynchronous runtime for Rust.
pub use tokio;

/// Remove unsafe characters from a string printed
/// inside an HTML template.
pub fn escape_html(string: &str) -> String {
    let mut result = String::with_capacity(string.len());

    for c in string.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            '`' => result.push_str("&#x60;"),
            '=' => result.push_str("&#x3D;"),
            c => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"/\">Tom & 'Jerry'</a>"),
            "&lt;a href&#x3D;&quot;/&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("`x`"), "&#x60;x&#x60;");
        assert_eq!(escape_html("plain text"), "plain text");
    }
}
