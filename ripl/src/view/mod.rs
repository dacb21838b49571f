//! Templates and the template cache.
//!
//! Templates use a small Handlebars-style language. They are fetched by identifier,
//! compiled once, and kept in a [`Templates`] cache owned by the application.
//!
//! # Example
//!
//! ```
//! # use ripl::view::*;
//! let template = Template::from_str("<h1>{{ title }}</h1>").unwrap();
//! let mut context = Context::new();
//!
//! context.set("title", "Hello from ripl!").unwrap();
//!
//! let rendered = template.render(&context).unwrap();
//!
//! assert_eq!(rendered, "<h1>Hello from ripl!</h1>");
//! ```
pub mod cache;
pub mod error;
pub mod template;

pub use cache::Templates;
pub use error::Error;
pub use template::Context;
pub use template::Template;

pub use template::{ToTemplateValue, Value};
