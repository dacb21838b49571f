//! Template lexer.
//!
//! Converts template source into a list of tokens for the parser.
pub mod token;
pub mod value;

pub use token::Token;
pub use value::{ToTemplateValue, Value};

use super::Error;

use std::iter::Peekable;
use std::str::Chars;

/// A token with its position in the template source.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithContext {
    token: Token,
    line: usize,
    column: usize,
}

impl std::fmt::Display for TokenWithContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:?} (line: {}, column: {})",
            self.token, self.line, self.column
        )
    }
}

impl TokenWithContext {
    pub fn new(token: Token, line: usize, column: usize) -> Self {
        Self {
            token,
            line,
            column,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn token(&self) -> Token {
        self.token.clone()
    }
}

/// The lexer converts a template text
/// into a list of tokens that may mean something
/// in our template language.
///
/// Anything that's not inside a code block, e.g. `{{ }}`, is considered
/// to be just text that needs to be printed as-is.
/// This text is represented by the special `Token::Text`.
pub struct Lexer<'a> {
    // Template source.
    source: &'a str,
    // Resulting tokens.
    tokens: Vec<TokenWithContext>,
    // Buffer for multi-character tokens.
    buffer: String,
    // Inside `{{ }}` or `{{{ }}}`, where some characters have special meaning.
    code_block: bool,
    // The code block was opened with `{{{`.
    raw: bool,
    // Which line we're on.
    line: usize,
    // Which column we're on. The lexer processes input one character at a time.
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create new lexer from text input.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: vec![],
            buffer: String::new(),
            code_block: false,
            raw: false,
            line: 1,
            column: 0,
        }
    }

    /// Parse an input string into tokens supported by our template language.
    ///
    /// Tokens are processed one character at a time. Multi-character tokens like `#if`
    /// or variable names are buffered and parsed as a string.
    pub fn tokens(mut self) -> Result<Vec<TokenWithContext>, Error> {
        let mut iter = self.source.chars().peekable();

        while let Some(c) = iter.next() {
            self.column += 1;

            if self.code_block {
                self.code(c, &mut iter)?;
            } else {
                self.text(c, &mut iter)?;
            }

            if c == '\n' {
                self.line += 1;
                self.column = 0;
            }
        }

        if self.code_block {
            return Err(Error::Eof("code block"));
        }

        self.drain_buffer()?;

        Ok(self
            .tokens
            .into_iter()
            // Remove spaces from output, the lexer handled it, the parser doesn't need to.
            .filter(|token| token.token != Token::Space)
            .collect())
    }

    // Characters outside of a code block.
    fn text(&mut self, c: char, iter: &mut Peekable<Chars<'_>>) -> Result<(), Error> {
        if c != '{' || iter.peek() != Some(&'{') {
            self.buffer.push(c);
            return Ok(());
        }

        let _ = iter.next();
        self.column += 1;

        let raw = if iter.peek() == Some(&'{') {
            let _ = iter.next();
            self.column += 1;
            true
        } else {
            false
        };

        self.drain_buffer()?;

        if !raw && iter.peek() == Some(&'!') {
            return self.comment(iter);
        }

        let token = if raw {
            Token::BlockStartRaw
        } else {
            Token::BlockStart
        };

        self.tokens.push(self.add_token(token));
        self.code_block = true;
        self.raw = raw;

        Ok(())
    }

    // `{{! comment }}` and `{{!-- comment --}}` are dropped entirely.
    fn comment(&mut self, iter: &mut Peekable<Chars<'_>>) -> Result<(), Error> {
        let mut comment = String::new();

        for c in iter.by_ref() {
            self.column += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            }

            comment.push(c);

            let closed = if comment.starts_with("!--") {
                comment.len() >= 7 && comment.ends_with("--}}")
            } else {
                comment.ends_with("}}")
            };

            if closed {
                return Ok(());
            }
        }

        Err(Error::Eof("comment"))
    }

    // Characters inside a code block.
    fn code(&mut self, c: char, iter: &mut Peekable<Chars<'_>>) -> Result<(), Error> {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                // Spaces separate tokens.
                self.drain_buffer()?;
                self.tokens.push(self.add_token(Token::Space));
            }

            '}' => {
                if iter.peek() != Some(&'}') {
                    return Err(Error::Syntax(self.add_token(Token::BlockEnd)));
                }

                let _ = iter.next();
                self.column += 1;
                self.drain_buffer()?;

                if self.raw && iter.peek() == Some(&'}') {
                    let _ = iter.next();
                    self.column += 1;
                    self.tokens.push(self.add_token(Token::BlockEndRaw));
                } else {
                    self.tokens.push(self.add_token(Token::BlockEnd));
                }

                self.code_block = false;
                self.raw = false;
            }

            '"' | '\'' => {
                self.drain_buffer()?;
                let string = self.string(c, iter)?;
                self.tokens
                    .push(self.add_token(Token::Value(Value::String(string))));
            }

            '!' => {
                self.drain_buffer()?;
                if iter.peek() == Some(&'=') {
                    let _ = iter.next();
                    self.column += 1;
                    self.tokens.push(self.add_token(Token::NotEquals));
                } else {
                    self.tokens.push(self.add_token(Token::Not));
                }
            }

            '=' => {
                self.drain_buffer()?;
                if iter.peek() == Some(&'=') {
                    let _ = iter.next();
                    self.column += 1;
                    self.tokens.push(self.add_token(Token::Equals));
                } else {
                    return Err(Error::Syntax(
                        self.add_token(Token::Text("=".to_string())),
                    ));
                }
            }

            '<' | '>' => {
                self.drain_buffer()?;
                let or_equal = iter.peek() == Some(&'=');
                if or_equal {
                    let _ = iter.next();
                    self.column += 1;
                }

                let token = match (c, or_equal) {
                    ('<', false) => Token::LessThan,
                    ('<', true) => Token::LessEqualThan,
                    (_, false) => Token::GreaterThan,
                    (_, true) => Token::GreaterEqualThan,
                };

                self.tokens.push(self.add_token(token));
            }

            '&' | '|' => {
                self.drain_buffer()?;
                if iter.peek() != Some(&c) {
                    return Err(Error::Syntax(self.add_token(Token::Text(c.to_string()))));
                }

                let _ = iter.next();
                self.column += 1;

                let token = if c == '&' { Token::And } else { Token::Or };
                self.tokens.push(self.add_token(token));
            }

            '/' => {
                // `{{/if}}` closes a block. Anywhere else, it's division.
                let closing = self.buffer.is_empty()
                    && self
                        .tokens
                        .iter()
                        .rev()
                        .find(|token| token.token != Token::Space)
                        .map(|token| token.token == Token::BlockStart)
                        .unwrap_or(false);

                if closing {
                    self.buffer.push('/');
                } else {
                    self.drain_buffer()?;
                    self.tokens.push(self.add_token(Token::Div));
                }
            }

            '+' | '-' | '*' | '%' | '(' | ')' => {
                self.drain_buffer()?;
                let token = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Mult,
                    '%' => Token::Mod,
                    '(' => Token::RoundBracketStart,
                    _ => Token::RoundBracketEnd,
                };
                self.tokens.push(self.add_token(token));
            }

            '{' => return Err(Error::Syntax(self.add_token(Token::BlockStart))),

            c => self.buffer.push(c),
        }

        Ok(())
    }

    // Read a quoted string, e.g. `"hello world"`. Supports `\"`, `\\`, `\n` and `\t` escapes.
    fn string(&mut self, quote: char, iter: &mut Peekable<Chars<'_>>) -> Result<String, Error> {
        let mut string = String::new();

        while let Some(c) = iter.next() {
            self.column += 1;

            match c {
                '\\' => {
                    self.column += 1;
                    match iter.next() {
                        Some('n') => string.push('\n'),
                        Some('t') => string.push('\t'),
                        Some(c) => string.push(c),
                        None => break,
                    }
                }

                c if c == quote => return Ok(string),

                c => {
                    if c == '\n' {
                        self.line += 1;
                        self.column = 0;
                    }
                    string.push(c);
                }
            }
        }

        Err(Error::Eof("string"))
    }

    // Handle multi-character tokens.
    fn drain_buffer(&mut self) -> Result<(), Error> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let s = std::mem::take(&mut self.buffer);

        if !self.code_block {
            self.tokens.push(self.add_token(Token::Text(s)));
            return Ok(());
        }

        let token = match s.as_str() {
            "#if" | "if" => Token::If,
            "#unless" => Token::Unless,
            "#each" => Token::Each,
            "else" => Token::Else,
            "true" => Token::Value(Value::Boolean(true)),
            "false" => Token::Value(Value::Boolean(false)),
            "null" | "undefined" => Token::Value(Value::Null),
            st if st.starts_with('#') => return Err(Error::UnknownBlock(st[1..].to_string())),
            st if st.starts_with('/') => Token::End(st[1..].to_string()),
            st => {
                if let Ok(integer) = st.parse::<i64>() {
                    Token::Value(Value::Integer(integer))
                } else if let Ok(float) = st.parse::<f64>() {
                    Token::Value(Value::Float(float))
                } else {
                    Token::Variable(s)
                }
            }
        };

        self.tokens.push(self.add_token(token));

        Ok(())
    }

    // Add token to output with lexer context (e.g. line number).
    fn add_token(&self, token: Token) -> TokenWithContext {
        TokenWithContext::new(token, self.line, self.column)
    }
}

/// Easily tokenize strings.
pub trait Tokenize {
    /// Parse a string and convert it to a list of tokens.
    fn tokenize(&self) -> Result<Vec<TokenWithContext>, Error>;
}

impl Tokenize for &str {
    fn tokenize(&self) -> Result<Vec<TokenWithContext>, Error> {
        Lexer::new(self).tokens()
    }
}

impl Tokenize for String {
    fn tokenize(&self) -> Result<Vec<TokenWithContext>, Error> {
        Lexer::new(self).tokens()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        source
            .tokenize()
            .expect("tokenize")
            .into_iter()
            .map(|t| t.token())
            .collect()
    }

    #[test]
    fn test_text_and_print() {
        assert_eq!(
            tokens("<h1>{{title}}</h1>"),
            vec![
                Token::Text("<h1>".into()),
                Token::BlockStart,
                Token::Variable("title".into()),
                Token::BlockEnd,
                Token::Text("</h1>".into()),
            ]
        );
    }

    #[test]
    fn test_raw_print() {
        assert_eq!(
            tokens("{{{ body }}}"),
            vec![
                Token::BlockStartRaw,
                Token::Variable("body".into()),
                Token::BlockEndRaw,
            ]
        );
    }

    #[test]
    fn test_blocks() {
        assert_eq!(
            tokens("{{#if a}}x{{else if b}}y{{/if}}"),
            vec![
                Token::BlockStart,
                Token::If,
                Token::Variable("a".into()),
                Token::BlockEnd,
                Token::Text("x".into()),
                Token::BlockStart,
                Token::Else,
                Token::If,
                Token::Variable("b".into()),
                Token::BlockEnd,
                Token::Text("y".into()),
                Token::BlockStart,
                Token::End("if".into()),
                Token::BlockEnd,
            ]
        );
    }

    #[test]
    fn test_operators_and_values() {
        assert_eq!(
            tokens(r#"{{ count >= 1.5 && name != "a\"b" }}"#),
            vec![
                Token::BlockStart,
                Token::Variable("count".into()),
                Token::GreaterEqualThan,
                Token::Value(Value::Float(1.5)),
                Token::And,
                Token::Variable("name".into()),
                Token::NotEquals,
                Token::Value(Value::String("a\"b".into())),
                Token::BlockEnd,
            ]
        );

        assert_eq!(
            tokens("{{ 10 / 2 }}"),
            vec![
                Token::BlockStart,
                Token::Value(Value::Integer(10)),
                Token::Div,
                Token::Value(Value::Integer(2)),
                Token::BlockEnd,
            ]
        );
    }

    #[test]
    fn test_comments_dropped() {
        assert_eq!(
            tokens("a{{! hidden }}b{{!-- {{nested}} --}}c"),
            vec![
                Token::Text("a".into()),
                Token::Text("b".into()),
                Token::Text("c".into()),
            ]
        );
    }

    #[test]
    fn test_single_braces_are_text() {
        assert_eq!(
            tokens("function() { return 1; }"),
            vec![Token::Text("function() { return 1; }".into())]
        );
    }

    #[test]
    fn test_unterminated() {
        assert!(matches!(
            "{{ title".tokenize(),
            Err(Error::Eof("code block"))
        ));
        assert!(matches!(
            "{{#foo}}".tokenize(),
            Err(Error::UnknownBlock(name)) if name == "foo"
        ));
    }

    #[test]
    fn test_line_numbers() {
        let tokens = "line one\n{{ two }}".tokenize().expect("tokenize");
        assert_eq!(tokens[1].line(), 2);
        assert_eq!(tokens[1].column(), 2);
    }
}
