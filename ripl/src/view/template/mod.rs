pub mod context;
pub mod error;
pub mod language;
pub mod lexer;

pub use context::Context;
pub use error::Error;
pub use lexer::{Lexer, ToTemplateValue, Token, TokenWithContext, Tokenize, Value};

use language::Program;

/// A compiled template, ready to be rendered with a context.
///
/// Templates are immutable once compiled. The cache hands them out as `Arc<Template>`.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    program: Program,
    name: String,
}

impl Template {
    /// Compile a template from source. Syntax errors point to the
    /// line and column in the source, prefixed with the template name.
    pub fn compile(name: &str, source: &str) -> Result<Self, Error> {
        let program = Program::from_str(source).map_err(|err| err.pretty(source, Some(name)))?;

        Ok(Template {
            program,
            name: name.to_string(),
        })
    }

    pub fn from_str(template: &str) -> Result<Self, Error> {
        Ok(Template {
            program: Program::from_str(template)?,
            name: String::from("inline"),
        })
    }

    /// Name the template was compiled with, e.g. the template identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, context: impl TryInto<Context, Error = Error>) -> Result<String, Error> {
        let context: Context = context.try_into()?;

        self.program.evaluate(&context)
    }

    pub fn render_default(&self) -> Result<String, Error> {
        self.program.evaluate(&Context::default())
    }
}
