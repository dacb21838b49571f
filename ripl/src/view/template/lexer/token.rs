use super::Value;

/// A template language token, e.g. `#if` or `/each`.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // e.g. `<html><body></body></html>`
    Text(String),
    // e.g. `{{ title }}` or `{{ user.name }}`
    Variable(String),
    // e.g. `{{ 5 }}` or `{{ "hello" }}`
    Value(Value),
    // `{{#if }}`
    If,
    // `{{#unless }}`
    Unless,
    // `{{#each }}`
    Each,
    // `{{else}}`
    Else,
    // `{{/if}}`, `{{/unless}}`, `{{/each}}`
    End(String),
    // `{{`
    BlockStart,
    // `{{{`
    BlockStartRaw,
    // `}}`
    BlockEnd,
    // `}}}`
    BlockEndRaw,
    Space,
    And,
    Or,
    Not,
    Plus,
    Minus,
    Mod,
    Div,
    Mult,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterEqualThan,
    LessThan,
    LessEqualThan,
    RoundBracketStart,
    RoundBracketEnd,
}

impl Token {
    /// Number of characters the token occupied in the source, used to underline errors.
    pub fn len(&self) -> usize {
        match self {
            Token::If | Token::Each => 3,
            Token::Unless => 7,
            Token::Else => 4,
            Token::End(name) => name.len() + 1,
            Token::Variable(name) => name.len(),
            Token::BlockStart | Token::BlockEnd => 2,
            Token::BlockStartRaw | Token::BlockEndRaw => 3,
            _ => 1,
        }
    }
}
