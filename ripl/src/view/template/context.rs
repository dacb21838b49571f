use crate::view::template::{Error, ToTemplateValue, Value};
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

/// Variables available to a template while it renders.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Context {
    values: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a variable by name. Dotted paths like `user.name` or `items.0`
    /// walk into hashes and lists.
    pub fn get(&self, path: &str) -> Option<Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut value = self.values.get(first)?.clone();

        for part in parts {
            value = value.get(part);
        }

        Some(value)
    }

    pub fn set(&mut self, key: &str, value: impl ToTemplateValue) -> Result<&mut Self, Error> {
        self.values.insert(key.to_string(), value.to_template_value()?);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TryFrom<HashMap<String, Value>> for Context {
    type Error = Error;

    fn try_from(values: HashMap<String, Value>) -> Result<Context, Self::Error> {
        Ok(Context { values })
    }
}

impl TryFrom<&Context> for Context {
    type Error = Error;

    fn try_from(context: &Context) -> Result<Context, Self::Error> {
        Ok(context.clone())
    }
}

/// Only JSON objects can be used as a context.
impl TryFrom<serde_json::Value> for Context {
    type Error = Error;

    fn try_from(json: serde_json::Value) -> Result<Context, Self::Error> {
        match json.to_template_value()? {
            Value::Hash(values) => Ok(Context { values }),
            Value::Null => Ok(Context::default()),
            _ => Err(Error::SerializationError),
        }
    }
}

impl TryFrom<&serde_json::Value> for Context {
    type Error = Error;

    fn try_from(json: &serde_json::Value) -> Result<Context, Self::Error> {
        Context::try_from(json.clone())
    }
}

impl<V: ToTemplateValue, const N: usize> TryFrom<[(&str, V); N]> for Context {
    type Error = Error;

    fn try_from(values: [(&str, V); N]) -> Result<Context, Self::Error> {
        let mut context = Context::new();
        for (key, value) in values {
            context.set(key, value)?;
        }

        Ok(context)
    }
}

impl<V: ToTemplateValue> TryFrom<Vec<(&str, V)>> for Context {
    type Error = Error;

    fn try_from(values: Vec<(&str, V)>) -> Result<Context, Self::Error> {
        let mut context = Context::new();
        for (key, value) in values {
            context.set(key, value)?;
        }

        Ok(context)
    }
}

impl Index<&str> for Context {
    type Output = Value;

    fn index(&self, key: &str) -> &Self::Output {
        self.values.get(key).unwrap_or(&Value::Null)
    }
}

impl IndexMut<&str> for Context {
    fn index_mut(&mut self, key: &str) -> &mut Self::Output {
        self.values.entry(key.to_string()).or_insert(Value::Null)
    }
}
