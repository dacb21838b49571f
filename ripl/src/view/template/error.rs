use super::{Token, TokenWithContext};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("syntax error")]
    Syntax(TokenWithContext),

    #[error("expression syntax error")]
    ExpressionSyntax(TokenWithContext),

    #[error("expected token \"{1:?}\", but have {0} instead")]
    WrongToken(TokenWithContext, Token),

    #[error("reached end of file while parsing {0}, did you forget a closing tag?")]
    Eof(&'static str),

    #[error("unknown block helper \"#{0}\"")]
    UnknownBlock(String),

    #[error("block \"{{{{#{expected}}}}}\" closed with \"{{{{/{found}}}}}\"")]
    MismatchedBlock {
        expected: &'static str,
        found: String,
    },

    #[error("blocks or expressions nested more than {0} levels deep")]
    TooDeep(usize),

    #[error("unexpected \"{0}\" outside of a block")]
    Unexpected(&'static str),

    #[error("serialization error")]
    SerializationError,

    #[error("{0}")]
    Pretty(String),
}

impl Error {
    /// Rewrite a syntax error into a message pointing at the offending line,
    /// with the token underlined.
    pub fn pretty(self, source: &str, name: Option<&str>) -> Self {
        let token = match self {
            Error::Syntax(ref token) => token,
            Error::ExpressionSyntax(ref token) => token,
            Error::WrongToken(ref token, _) => token,
            _ => {
                if let Some(name) = name {
                    let prefix = "---> ";
                    return Error::Pretty(format!(
                        "{}{}\n\n{}{}",
                        prefix,
                        name,
                        " ".repeat(prefix.len()),
                        self
                    ));
                } else {
                    return self;
                }
            }
        };

        let error_msg = match self {
            Error::Syntax(_) => "syntax error",
            Error::ExpressionSyntax(_) => "expression syntax error",
            Error::WrongToken(_, _) => "unexpected token",
            _ => "",
        };

        let context = source.lines().nth(std::cmp::max(1, token.line()) - 1);
        let leading_spaces = if let Some(context) = context {
            context.len() - context.trim_start().len()
        } else {
            0
        };

        let underline = " ".repeat(std::cmp::max(
            0,
            token.column() as i64 - token.token().len() as i64 - leading_spaces as i64,
        ) as usize)
            + &format!("^ {}", error_msg);

        let line_number = format!("{} | ", token.line());
        let underline_offset = " ".repeat(token.line().to_string().len()) + " | ";

        let name = if let Some(name) = name {
            format!("---> {}:{}:{}\n\n", name, token.line(), token.column())
        } else {
            "".to_string()
        };

        if let Some(context) = context {
            Error::Pretty(format!(
                "{}{}\n{}{}\n{}{}",
                name,
                underline_offset,
                line_number,
                context.trim(),
                underline_offset,
                underline
            ))
        } else {
            self
        }
    }
}
