//! A collection of types which, when imported, make working with templates easy.
//!
//! ```
//! use ripl::prelude::*;
//! ```
pub use crate::config::Config;
pub use crate::http::{Fetch, HttpClient, StaticFiles, TemplateUrl};
pub use crate::logging::Logger;
pub use crate::view::{Context, Template, Templates, ToTemplateValue, Value};

/// A macro to easily implement async traits methods.
pub use async_trait::async_trait;

pub use tokio;
