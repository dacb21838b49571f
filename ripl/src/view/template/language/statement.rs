use super::{
    super::{Context, Error, Token, TokenWithContext, Tokenize, Value},
    Expression, MAX_DEPTH,
};
use crate::escape_html;

use std::iter::{Iterator, Peekable};

macro_rules! expect {
    ($iter:expr, $expected:expr, $what:expr) => {
        let token = $iter.next().ok_or(Error::Eof($what))?;
        if token.token() != $expected {
            return Err(Error::WrongToken(token, $expected));
        }
    };
}

macro_rules! block_end {
    ($iter:expr) => {
        expect!($iter, Token::BlockEnd, "code block");
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    // e.g. `{{ variable }}` or `{{{ variable }}}`
    Print {
        expression: Expression,
        escape: bool,
    },
    // e.g. `<html><body></body></html>`
    PrintText(String),
    // e.g. `{{#if variable == 5}}right{{else}}wrong{{/if}}`
    // `{{#unless}}` is an `if` with the condition negated.
    If {
        expression: Expression,
        if_body: Vec<Statement>,
        else_body: Vec<Statement>,
        negate: bool,
    },

    // `{{#each items}} {{ this }} {{else}} nothing {{/each}}`
    Each {
        list: Expression,
        body: Vec<Statement>,
        else_body: Vec<Statement>,
    },

    // `{{else}}`
    Else,
    // `{{else if expression}}`
    ElseIf(Expression),
    // `{{/if}}`
    End(String),
}

impl Statement {
    pub fn from_str(string: &str) -> Result<Self, Error> {
        let tokens = string.tokenize()?;
        Statement::parse(&mut tokens.into_iter().peekable())
    }

    pub fn evaluate(&self, context: &Context) -> Result<String, Error> {
        match self {
            Statement::PrintText(text) => Ok(text.clone()),

            Statement::Print { expression, escape } => {
                let value = expression.evaluate(context).to_string();

                if *escape {
                    Ok(escape_html(&value))
                } else {
                    Ok(value)
                }
            }

            Statement::If {
                expression,
                if_body,
                else_body,
                negate,
            } => {
                let body = if expression.evaluate(context).truthy() != *negate {
                    if_body
                } else {
                    else_body
                };

                Self::evaluate_all(body, context)
            }

            Statement::Each {
                list,
                body,
                else_body,
            } => {
                let mut result = String::new();

                match list.evaluate(context) {
                    Value::List(values) if !values.is_empty() => {
                        let last = values.len() - 1;
                        for (index, value) in values.into_iter().enumerate() {
                            let mut each_context = Self::scope(context, value)?;
                            each_context
                                .set("@index", index)?
                                .set("@first", index == 0)?
                                .set("@last", index == last)?;

                            result.push_str(&Self::evaluate_all(body, &each_context)?);
                        }
                    }

                    Value::Hash(hash) if !hash.is_empty() => {
                        let mut keys = hash.keys().cloned().collect::<Vec<_>>();
                        keys.sort();
                        let last = keys.len() - 1;

                        for (index, key) in keys.into_iter().enumerate() {
                            let value = hash.get(&key).cloned().unwrap_or_default();
                            let mut each_context = Self::scope(context, value)?;
                            each_context
                                .set("@key", key)?
                                .set("@index", index)?
                                .set("@first", index == 0)?
                                .set("@last", index == last)?;

                            result.push_str(&Self::evaluate_all(body, &each_context)?);
                        }
                    }

                    _ => result.push_str(&Self::evaluate_all(else_body, context)?),
                }

                Ok(result)
            }

            Statement::Else => Err(Error::Unexpected("else")),
            Statement::ElseIf(_) => Err(Error::Unexpected("else if")),
            Statement::End(_) => Err(Error::Unexpected("closing tag")),
        }
    }

    // Loop body scope: `this` is the current item, and if the item is a hash,
    // its fields are available directly as well.
    fn scope(context: &Context, value: Value) -> Result<Context, Error> {
        let mut scope = context.clone();

        if let Value::Hash(ref hash) = value {
            for (key, value) in hash {
                scope.set(key, value.clone())?;
            }
        }

        scope.set("this", value)?;

        Ok(scope)
    }

    fn evaluate_all(statements: &[Statement], context: &Context) -> Result<String, Error> {
        let mut result = String::new();
        for statement in statements {
            result.push_str(&statement.evaluate(context)?);
        }

        Ok(result)
    }

    pub fn parse(
        iter: &mut Peekable<impl Iterator<Item = TokenWithContext>>,
    ) -> Result<Statement, Error> {
        Self::parse_nested(iter, 0)
    }

    // `depth` is the number of blocks the statement is inside of.
    fn parse_nested(
        iter: &mut Peekable<impl Iterator<Item = TokenWithContext>>,
        depth: usize,
    ) -> Result<Statement, Error> {
        let next = iter.next().ok_or(Error::Eof("statement"))?;

        match next.token() {
            Token::Text(string) => Ok(Statement::PrintText(string)),

            Token::BlockStartRaw => {
                let expression = Expression::parse(iter)?;
                expect!(iter, Token::BlockEndRaw, "raw code block");

                Ok(Statement::Print {
                    expression,
                    escape: false,
                })
            }

            Token::BlockStart => {
                let token = iter.peek().ok_or(Error::Eof("code block"))?.token();

                match token {
                    Token::If | Token::Unless => {
                        let _ = iter.next();
                        let expression = Expression::parse(iter)?;
                        block_end!(iter);

                        if token == Token::If {
                            Self::conditional(expression, false, "if", iter, depth + 1)
                        } else {
                            Self::conditional(expression, true, "unless", iter, depth + 1)
                        }
                    }

                    Token::Each => {
                        let _ = iter.next();
                        let list = Expression::parse(iter)?;
                        block_end!(iter);

                        Self::each(list, iter, depth + 1)
                    }

                    Token::Else => {
                        let _ = iter.next();

                        if iter.peek().map(|t| t.token()) == Some(Token::If) {
                            let _ = iter.next();
                            let expression = Expression::parse(iter)?;
                            block_end!(iter);

                            Ok(Statement::ElseIf(expression))
                        } else {
                            block_end!(iter);
                            Ok(Statement::Else)
                        }
                    }

                    Token::End(name) => {
                        let _ = iter.next();
                        block_end!(iter);

                        Ok(Statement::End(name))
                    }

                    _ => {
                        let expression = Expression::parse(iter)?;
                        block_end!(iter);

                        Ok(Statement::Print {
                            expression,
                            escape: true,
                        })
                    }
                }
            }

            _ => Err(Error::Syntax(next)),
        }
    }

    // Parse the body of `{{#if}}` or `{{#unless}}` up to its closing tag.
    fn conditional(
        expression: Expression,
        negate: bool,
        name: &'static str,
        iter: &mut Peekable<impl Iterator<Item = TokenWithContext>>,
        depth: usize,
    ) -> Result<Statement, Error> {
        if depth > MAX_DEPTH {
            return Err(Error::TooDeep(MAX_DEPTH));
        }

        let (mut if_body, mut else_body) = (vec![], vec![]);
        let mut in_else = false;

        loop {
            if iter.peek().is_none() {
                return Err(Error::Eof(if negate { "#unless block" } else { "#if block" }));
            }

            match Self::parse_nested(iter, depth)? {
                Statement::End(found) => {
                    if found != name {
                        return Err(Error::MismatchedBlock {
                            expected: name,
                            found,
                        });
                    }

                    break;
                }

                Statement::Else if !in_else => in_else = true,

                // if
                // else if
                // else
                // end
                //
                // translates into this:
                //
                // if
                // else
                //   if
                //   else
                //   end
                // end
                //
                // The nested block consumes the shared closing tag.
                Statement::ElseIf(expression) if !in_else => {
                    else_body.push(Self::conditional(
                        expression,
                        false,
                        name,
                        iter,
                        depth + 1,
                    )?);
                    break;
                }

                Statement::Else => return Err(Error::Unexpected("else")),
                Statement::ElseIf(_) => return Err(Error::Unexpected("else if")),

                statement => {
                    if in_else {
                        else_body.push(statement);
                    } else {
                        if_body.push(statement);
                    }
                }
            }
        }

        Ok(Statement::If {
            expression,
            if_body,
            else_body,
            negate,
        })
    }

    // Parse the body of `{{#each}}` up to `{{/each}}`.
    fn each(
        list: Expression,
        iter: &mut Peekable<impl Iterator<Item = TokenWithContext>>,
        depth: usize,
    ) -> Result<Statement, Error> {
        if depth > MAX_DEPTH {
            return Err(Error::TooDeep(MAX_DEPTH));
        }

        let (mut body, mut else_body) = (vec![], vec![]);
        let mut in_else = false;

        loop {
            if iter.peek().is_none() {
                return Err(Error::Eof("#each block"));
            }

            match Self::parse_nested(iter, depth)? {
                Statement::End(found) => {
                    if found != "each" {
                        return Err(Error::MismatchedBlock {
                            expected: "each",
                            found,
                        });
                    }

                    break;
                }

                Statement::Else if !in_else => in_else = true,
                Statement::Else => return Err(Error::Unexpected("else")),
                Statement::ElseIf(_) => return Err(Error::Unexpected("else if")),

                statement => {
                    if in_else {
                        else_body.push(statement);
                    } else {
                        body.push(statement);
                    }
                }
            }
        }

        Ok(Statement::Each {
            list,
            body,
            else_body,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statements_basic() -> Result<(), Error> {
        let ast = Statement::from_str("{{#if variable == 5}}right{{else}}wrong{{/if}}")?;
        let mut context = Context::default();
        context.set("variable", 5)?;

        assert_eq!(ast.evaluate(&context)?, "right");

        context.set("variable", 6)?;
        assert_eq!(ast.evaluate(&context)?, "wrong");

        Ok(())
    }

    #[test]
    fn test_statements_if_else() -> Result<(), Error> {
        let ast = Statement::from_str(
            "{{#if variable == 5}}
                right
            {{else if variable == 6}}
                wrong
            {{else}}
                neither
            {{/if}}",
        )?;
        let mut context = Context::default();

        context.set("variable", 7)?;
        assert_eq!(ast.evaluate(&context)?.trim(), "neither");

        context.set("variable", 6)?;
        assert_eq!(ast.evaluate(&context)?.trim(), "wrong");

        Ok(())
    }

    #[test]
    fn test_unless() -> Result<(), Error> {
        let ast = Statement::from_str("{{#unless admin}}guest{{else}}admin{{/unless}}")?;
        let mut context = Context::default();

        assert_eq!(ast.evaluate(&context)?, "guest");

        context.set("admin", true)?;
        assert_eq!(ast.evaluate(&context)?, "admin");

        Ok(())
    }

    #[test]
    fn test_print_escapes() -> Result<(), Error> {
        let mut context = Context::default();
        context.set("html", "<b>\"hi\" & 'bye'</b>")?;

        let escaped = Statement::from_str("{{ html }}")?.evaluate(&context)?;
        assert_eq!(
            escaped,
            "&lt;b&gt;&quot;hi&quot; &amp; &#x27;bye&#x27;&lt;/b&gt;"
        );

        let raw = Statement::from_str("{{{ html }}}")?.evaluate(&context)?;
        assert_eq!(raw, "<b>\"hi\" & 'bye'</b>");

        Ok(())
    }

    #[test]
    fn test_each_list() -> Result<(), Error> {
        let ast = Statement::from_str(
            "{{#each items}}<li>{{@index}}:{{this}}{{#if @last}}.{{/if}}</li>{{/each}}",
        )?;
        let context = Context::try_from(json!({"items": [1, "hello", 3.45]}))?;

        assert_eq!(
            ast.evaluate(&context)?,
            "<li>0:1</li><li>1:hello</li><li>2:3.45.</li>"
        );

        Ok(())
    }

    #[test]
    fn test_each_hashes_and_else() -> Result<(), Error> {
        let ast = Statement::from_str(
            "{{#each users}}{{name}}/{{this.age}} {{else}}nobody{{/each}}",
        )?;

        let context = Context::try_from(json!({
            "users": [{"name": "a", "age": 1}, {"name": "b", "age": 2}]
        }))?;
        assert_eq!(ast.evaluate(&context)?, "a/1 b/2 ");

        let empty = Context::try_from(json!({"users": []}))?;
        assert_eq!(ast.evaluate(&empty)?, "nobody");
        assert_eq!(ast.evaluate(&Context::default())?, "nobody");

        let keys = Statement::from_str("{{#each h}}{{@key}}={{this}};{{/each}}")?;
        let context = Context::try_from(json!({"h": {"b": 2, "a": 1}}))?;
        assert_eq!(keys.evaluate(&context)?, "a=1;b=2;");

        Ok(())
    }

    #[test]
    fn test_block_errors() {
        assert!(matches!(
            Statement::from_str("{{#if a}}x{{/each}}"),
            Err(Error::MismatchedBlock { expected: "if", .. })
        ));
        assert!(matches!(
            Statement::from_str("{{#each a}}x"),
            Err(Error::Eof("#each block"))
        ));
        assert!(matches!(
            Statement::from_str("{{#if a}}x{{else}}y{{else}}z{{/if}}"),
            Err(Error::Unexpected("else"))
        ));
        assert!(matches!(
            Statement::from_str("{{{ a }}"),
            Err(Error::WrongToken(_, Token::BlockEndRaw))
        ));
    }

    #[test]
    fn test_nesting_limit() -> Result<(), Error> {
        let nested = |open: &str, close: &str, depth: usize| {
            format!("{}x{}", open.repeat(depth), close.repeat(depth))
        };

        let ast = Statement::from_str(&nested("{{#if a}}", "{{/if}}", MAX_DEPTH))?;
        let mut context = Context::default();
        context.set("a", true)?;
        assert_eq!(ast.evaluate(&context)?, "x");

        for (open, close) in [
            ("{{#if a}}", "{{/if}}"),
            ("{{#unless a}}", "{{/unless}}"),
            ("{{#each a}}", "{{/each}}"),
        ] {
            assert!(matches!(
                Statement::from_str(&nested(open, close, MAX_DEPTH + 1)),
                Err(Error::TooDeep(MAX_DEPTH))
            ));
            assert!(matches!(
                Statement::from_str(&nested(open, close, 10_000)),
                Err(Error::TooDeep(MAX_DEPTH))
            ));
        }

        // Each `else if` nests one level deeper.
        let chain = format!("{{{{#if a}}}}{}x{{{{/if}}}}", "{{else if a}}".repeat(10_000));
        assert!(matches!(
            Statement::from_str(&chain),
            Err(Error::TooDeep(MAX_DEPTH))
        ));

        Ok(())
    }
}
