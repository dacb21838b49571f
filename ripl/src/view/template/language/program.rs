//! Executable template.
//!
//! A program is a list of statements.
use super::super::{Context, Error, TokenWithContext, Tokenize};
use super::Statement;

/// Executable program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    /// Evaluate the program given the context. The context contains variable definitions.
    pub fn evaluate(&self, context: &Context) -> Result<String, Error> {
        let mut result = String::new();
        for statement in &self.statements {
            result.push_str(&statement.evaluate(context)?);
        }

        Ok(result)
    }

    /// Parse the program from a list of tokens.
    pub fn parse(tokens: Vec<TokenWithContext>) -> Result<Self, Error> {
        let mut iter = tokens.into_iter().peekable();
        let mut statements = vec![];

        while iter.peek().is_some() {
            let statement = Statement::parse(&mut iter)?;

            match statement {
                Statement::Else => return Err(Error::Unexpected("else")),
                Statement::ElseIf(_) => return Err(Error::Unexpected("else if")),
                Statement::End(_) => return Err(Error::Unexpected("closing tag")),
                statement => statements.push(statement),
            }
        }

        Ok(Program { statements })
    }

    /// Compile the program from source.
    pub fn from_str(source: &str) -> Result<Self, Error> {
        let tokens = source.tokenize()?;
        Program::parse(tokens)
    }
}
