//! Expression term, a single entity in an expression.
use super::super::{
    lexer::{Token, Value},
    Context,
};

/// Expression term.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Constant(Value),
    Variable(String),
}

impl Term {
    /// Convert a token into a term. If the token isn't a term, return `None`.
    pub fn from_token(token: Token) -> Option<Self> {
        Option::<Self>::from(token)
    }

    /// Create a constant term from a value. Constant terms are evaluated to the value.
    pub fn constant(value: Value) -> Self {
        Term::Constant(value)
    }

    /// Create a variable term. The term requires a context to be evaluated.
    pub fn variable(name: String) -> Self {
        Term::Variable(name)
    }

    /// Evaluate the term given the context.
    ///
    /// Variables that are not in scope evaluate to `null`, which prints nothing.
    pub fn evaluate(&self, context: &Context) -> Value {
        match self {
            Term::Constant(value) => value.clone(),
            Term::Variable(name) => context.get(name).unwrap_or_default(),
        }
    }

    /// Get the term name, i.e. what it's called in the template.
    /// Constant terms don't have names.
    pub fn name(&self) -> &str {
        match self {
            Term::Variable(name) => name,
            Term::Constant(_) => "",
        }
    }
}

impl From<Token> for Option<Term> {
    fn from(token: Token) -> Option<Term> {
        Some(match token {
            Token::Variable(name) => Term::Variable(name),
            Token::Value(value) => Term::Constant(value),
            _ => return None,
        })
    }
}
