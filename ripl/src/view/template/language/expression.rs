use super::{
    super::lexer::{Token, TokenWithContext, Value},
    super::Context,
    super::Error,
    Op, Term, MAX_DEPTH,
};

use std::iter::{Iterator, Peekable};

/// An expression, like `count == 5` or `!logged_in`,
/// which when evaluated produces a single value, e.g. `true`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Standard `5 + 6`-style expression.
    // It's recursive, so you can have something like `(5 + 6) / (1 - 5)`.
    Binary {
        left: Box<Expression>,
        op: Op,
        right: Box<Expression>,
    },

    Unary {
        op: Op,
        operand: Box<Expression>,
    },

    // Base case for recursive expression parsing, which evaluates to the value
    // of the term, e.g. `5` evaluates to `5` or `variable_name` evaluates to whatever
    // the variable is set to in the context.
    Term {
        term: Term,
    },
}

impl Expression {
    /// Create new constant expression (term).
    pub fn constant(value: Value) -> Self {
        Self::Term {
            term: Term::constant(value),
        }
    }

    /// Create new variable expression (term).
    pub fn variable(variable: String) -> Self {
        Self::Term {
            term: Term::variable(variable),
        }
    }

    /// Evaluate the expression to a value given the context.
    pub fn evaluate(&self, context: &Context) -> Value {
        match self {
            Expression::Term { term } => term.evaluate(context),

            Expression::Binary { left, op, right } => {
                let left = left.evaluate(context);
                let right = right.evaluate(context);
                op.evaluate_binary(&left, &right)
            }

            Expression::Unary { op, operand } => {
                let operand = operand.evaluate(context);
                op.evaluate_unary(&operand)
            }
        }
    }

    fn term(
        iter: &mut Peekable<impl Iterator<Item = TokenWithContext>>,
        depth: usize,
    ) -> Result<Self, Error> {
        if depth > MAX_DEPTH {
            return Err(Error::TooDeep(MAX_DEPTH));
        }

        let next = iter.next().ok_or(Error::Eof("expression"))?;

        let term = match next.token() {
            Token::Not => Expression::Unary {
                op: Op::Not,
                operand: Box::new(Self::term(iter, depth + 1)?),
            },

            Token::Minus => Expression::Unary {
                op: Op::Sub,
                operand: Box::new(Self::term(iter, depth + 1)?),
            },

            Token::Plus => Expression::Unary {
                op: Op::Add,
                operand: Box::new(Self::term(iter, depth + 1)?),
            },

            Token::RoundBracketStart => {
                let expr = Self::binary(iter, u8::MAX, depth + 1)?;
                let close = iter.next().ok_or(Error::Eof("round bracket"))?;

                if close.token() != Token::RoundBracketEnd {
                    return Err(Error::WrongToken(close, Token::RoundBracketEnd));
                }

                expr
            }

            token => match Term::from_token(token) {
                Some(term) => Expression::Term { term },
                None => return Err(Error::ExpressionSyntax(next)),
            },
        };

        Ok(term)
    }

    // Precedence climbing. Only operators that bind tighter than `max_precedence`
    // are consumed, which makes operators of equal precedence left-associative.
    // `depth` counts brackets and unary operators.
    fn binary(
        iter: &mut Peekable<impl Iterator<Item = TokenWithContext>>,
        max_precedence: u8,
        depth: usize,
    ) -> Result<Self, Error> {
        let mut left = Self::term(iter, depth)?;

        loop {
            let op = match iter.peek().and_then(|next| Op::from_token(next.token())) {
                Some(op) if op.binary() && op.precedence() < max_precedence => op,
                _ => return Ok(left),
            };

            // Consume the operator.
            let _ = iter.next();

            let right = Self::binary(iter, op.precedence(), depth)?;

            left = Expression::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
    }

    /// Recursively parse the expression.
    ///
    /// Consumes language tokens up to, but not including, the token
    /// that ends the expression (usually `}}`).
    pub fn parse(
        iter: &mut Peekable<impl Iterator<Item = TokenWithContext>>,
    ) -> Result<Self, Error> {
        Self::binary(iter, u8::MAX, 0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::view::template::Tokenize;

    fn evaluate(source: &str, context: &Context) -> Result<Value, Error> {
        // Skip the opening `{{`.
        let mut iter = source.tokenize()?.into_iter().skip(1).peekable();
        let expr = Expression::parse(&mut iter)?;
        assert_eq!(iter.next().map(|t| t.token()), Some(Token::BlockEnd));
        Ok(expr.evaluate(context))
    }

    #[test]
    fn test_precedence() -> Result<(), Error> {
        let context = Context::default();

        assert_eq!(evaluate("{{ 1 + 2 * 3 }}", &context)?, Value::Integer(7));
        assert_eq!(evaluate("{{ (1 + 2) * 3 }}", &context)?, Value::Integer(9));
        assert_eq!(evaluate("{{ 10 - 4 - 3 }}", &context)?, Value::Integer(3));
        assert_eq!(
            evaluate("{{ 1 == 1 && 2 == 3 }}", &context)?,
            Value::Boolean(false)
        );
        assert_eq!(
            evaluate("{{ 1 == 2 || 2 < 3 }}", &context)?,
            Value::Boolean(true)
        );

        Ok(())
    }

    #[test]
    fn test_unary() -> Result<(), Error> {
        let mut context = Context::default();
        context.set("logged_in", false)?;

        assert_eq!(evaluate("{{ !logged_in }}", &context)?, Value::Boolean(true));
        assert_eq!(evaluate("{{ -5 + 2 }}", &context)?, Value::Integer(-3));

        Ok(())
    }

    #[test]
    fn test_variables() -> Result<(), Error> {
        let context = Context::try_from(serde_json::json!({"user": {"age": 30}}))?;

        assert_eq!(
            evaluate("{{ user.age >= 18 }}", &context)?,
            Value::Boolean(true)
        );
        assert_eq!(evaluate("{{ user.missing }}", &context)?, Value::Null);

        Ok(())
    }

    #[test]
    fn test_nesting_limit() -> Result<(), Error> {
        let context = Context::default();

        let nested = format!("{{{{ {}1{} }}}}", "(".repeat(20), ")".repeat(20));
        assert_eq!(evaluate(&nested, &context)?, Value::Integer(1));

        let brackets = format!("{{{{ {}1{} }}}}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(
            evaluate(&brackets, &context),
            Err(Error::TooDeep(MAX_DEPTH))
        ));

        let negations = format!("{{{{ {}true }}}}", "!".repeat(10_000));
        assert!(matches!(
            evaluate(&negations, &context),
            Err(Error::TooDeep(MAX_DEPTH))
        ));

        Ok(())
    }

    #[test]
    fn test_syntax_errors() {
        let context = Context::default();

        assert!(matches!(
            evaluate("{{ 1 + }}", &context),
            Err(Error::ExpressionSyntax(_))
        ));
        assert!(matches!(
            evaluate("{{ (1 + 2 }}", &context),
            Err(Error::WrongToken(_, Token::RoundBracketEnd))
        ));
    }
}
