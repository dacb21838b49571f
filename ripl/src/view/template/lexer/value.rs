//! The basic building block of the template language: the value.
//! Numbers, strings, booleans, lists and hashes handed to a template
//! through its context are all represented using the value.
use super::super::Error;

use std::cmp::Ordering;
use std::collections::HashMap;

/// A constant value, e.g. `5` or `"hello world"`.
#[derive(Debug, PartialEq, Clone, Default)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    List(Vec<Value>),
    Hash(HashMap<String, Value>),
    #[default]
    Null,
}

/// Longest string `"text" * n` is allowed to produce, in bytes.
/// Anything longer evaluates to `null`.
pub const MAX_REPEAT_LEN: usize = 1024 * 1024;

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(i1), Value::Integer(i2)) => i1.partial_cmp(i2),
            (Value::Integer(i1), Value::Float(f2)) => (*i1 as f64).partial_cmp(f2),
            (Value::Float(f1), Value::Integer(i2)) => f1.partial_cmp(&(*i2 as f64)),
            (Value::Float(f1), Value::Float(f2)) => f1.partial_cmp(f2),
            (Value::String(s1), Value::String(s2)) => s1.partial_cmp(s2),
            (Value::Boolean(b1), Value::Boolean(b2)) => b1.partial_cmp(b2),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::List(l) => {
                for (i, v) in l.iter().enumerate() {
                    write!(f, "{}", v)?;
                    if i < l.len() - 1 {
                        write!(f, ",")?;
                    }
                }
                Ok(())
            }
            Value::Hash(_) => write!(f, "[object Object]"),
            // Missing values print nothing.
            Value::Null => Ok(()),
        }
    }
}

impl Value {
    /// If the value, when evaluated in the context of an `#if` block
    /// would result in the block being rendered.
    ///
    /// e.g. `{{#if 5}}five is true{{/if}}`
    /// would output "five is true" since `5` is truthy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Null => false,
            Value::List(list) => !list.is_empty(),
            Value::Hash(hash) => !hash.is_empty(),
        }
    }

    /// Look up a hash key or a list index, e.g. `user.name` or `items.0`.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Hash(hash) => hash.get(key).cloned().unwrap_or_default(),
            Value::List(list) => match key {
                "length" => Value::Integer(list.len() as i64),
                key => key
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| list.get(index).cloned())
                    .unwrap_or_default(),
            },
            Value::String(s) if key == "length" => Value::Integer(s.chars().count() as i64),
            _ => Value::Null,
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (Value::Integer(i1), Value::Integer(i2)) => Value::Integer(i1.wrapping_add(*i2)),
            (Value::Integer(i1), Value::Float(f2)) => Value::Float(*i1 as f64 + f2),
            (Value::Float(f1), Value::Integer(i2)) => Value::Float(f1 + *i2 as f64),
            (Value::Float(f1), Value::Float(f2)) => Value::Float(f1 + f2),
            (Value::String(s1), Value::String(s2)) => Value::String(format!("{}{}", s1, s2)),
            (Value::String(s1), Value::Integer(i2)) => Value::String(format!("{}{}", s1, i2)),
            (Value::Integer(i1), Value::String(s2)) => Value::String(format!("{}{}", i1, s2)),
            (Value::String(s1), Value::Float(f2)) => Value::String(format!("{}{}", s1, f2)),
            (Value::Float(f1), Value::String(s2)) => Value::String(format!("{}{}", f1, s2)),
            (Value::List(list), other) => {
                let mut list = list.clone();
                list.push(other.clone());
                Value::List(list)
            }
            _ => Value::Null,
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        match (self, other) {
            (Value::Integer(i1), Value::Integer(i2)) => Value::Integer(i1.wrapping_sub(*i2)),
            (Value::Integer(i1), Value::Float(f2)) => Value::Float(*i1 as f64 - f2),
            (Value::Float(f1), Value::Integer(i2)) => Value::Float(f1 - *i2 as f64),
            (Value::Float(f1), Value::Float(f2)) => Value::Float(f1 - f2),
            (Value::String(s1), Value::String(s2)) => Value::String(s1.replace(s2.as_str(), "")),
            _ => Value::Null,
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (Value::Integer(i1), Value::Integer(i2)) => Value::Integer(i1.wrapping_mul(*i2)),
            (Value::Integer(i1), Value::Float(f2)) => Value::Float(*i1 as f64 * f2),
            (Value::Float(f1), Value::Integer(i2)) => Value::Float(f1 * *i2 as f64),
            (Value::Float(f1), Value::Float(f2)) => Value::Float(f1 * f2),
            (Value::String(s), Value::Integer(n)) | (Value::Integer(n), Value::String(s)) => {
                let n = usize::try_from(*n).unwrap_or(0);

                match s.len().checked_mul(n) {
                    Some(len) if len <= MAX_REPEAT_LEN => Value::String(s.repeat(n)),
                    _ => Value::Null,
                }
            }
            _ => Value::Null,
        }
    }

    /// Division. Integer division by zero produces `Null`.
    pub fn div(&self, other: &Self) -> Self {
        match (self, other) {
            (Value::Integer(_), Value::Integer(0)) => Value::Null,
            (Value::Integer(i1), Value::Integer(i2)) => Value::Integer(i1.wrapping_div(*i2)),
            (Value::Integer(i1), Value::Float(f2)) => Value::Float(*i1 as f64 / f2),
            (Value::Float(f1), Value::Integer(i2)) => Value::Float(f1 / *i2 as f64),
            (Value::Float(f1), Value::Float(f2)) => Value::Float(f1 / f2),
            _ => Value::Null,
        }
    }

    pub fn rem(&self, other: &Self) -> Self {
        match (self, other) {
            (Value::Integer(_), Value::Integer(0)) => Value::Null,
            (Value::Integer(i1), Value::Integer(i2)) => Value::Integer(i1.wrapping_rem(*i2)),
            (Value::Integer(i1), Value::Float(f2)) => Value::Float(*i1 as f64 % f2),
            (Value::Float(f1), Value::Integer(i2)) => Value::Float(f1 % *i2 as f64),
            (Value::Float(f1), Value::Float(f2)) => Value::Float(f1 % f2),
            _ => Value::Null,
        }
    }
}

/// Convert a Rust value into a template value.
pub trait ToTemplateValue {
    fn to_template_value(&self) -> Result<Value, Error>;
}

impl ToTemplateValue for Value {
    fn to_template_value(&self) -> Result<Value, Error> {
        Ok(self.clone())
    }
}

impl ToTemplateValue for String {
    fn to_template_value(&self) -> Result<Value, Error> {
        Ok(Value::String(self.clone()))
    }
}

impl ToTemplateValue for &str {
    fn to_template_value(&self) -> Result<Value, Error> {
        Ok(Value::String(self.to_string()))
    }
}

macro_rules! impl_integer {
    ($ty:ty) => {
        impl ToTemplateValue for $ty {
            fn to_template_value(&self) -> Result<Value, Error> {
                Ok(Value::Integer(*self as i64))
            }
        }
    };
}

impl_integer!(i64);
impl_integer!(i32);
impl_integer!(i16);
impl_integer!(i8);
impl_integer!(u32);
impl_integer!(u16);
impl_integer!(u8);

// Unsigned integers wider than i64 are rejected instead of wrapping.
macro_rules! impl_checked_integer {
    ($ty:ty) => {
        impl ToTemplateValue for $ty {
            fn to_template_value(&self) -> Result<Value, Error> {
                i64::try_from(*self)
                    .map(Value::Integer)
                    .map_err(|_| Error::SerializationError)
            }
        }
    };
}

impl_checked_integer!(u64);
impl_checked_integer!(usize);

impl ToTemplateValue for f64 {
    fn to_template_value(&self) -> Result<Value, Error> {
        Ok(Value::Float(*self))
    }
}

impl ToTemplateValue for f32 {
    fn to_template_value(&self) -> Result<Value, Error> {
        Ok(Value::Float(*self as f64))
    }
}

impl ToTemplateValue for bool {
    fn to_template_value(&self) -> Result<Value, Error> {
        Ok(Value::Boolean(*self))
    }
}

impl<T: ToTemplateValue> ToTemplateValue for Option<T> {
    fn to_template_value(&self) -> Result<Value, Error> {
        match self {
            Some(value) => value.to_template_value(),
            None => Ok(Value::Null),
        }
    }
}

impl<T: ToTemplateValue> ToTemplateValue for Vec<T> {
    fn to_template_value(&self) -> Result<Value, Error> {
        let mut list = vec![];

        for value in self.iter() {
            list.push(value.to_template_value()?);
        }

        Ok(Value::List(list))
    }
}

impl<T: ToTemplateValue> ToTemplateValue for HashMap<String, T> {
    fn to_template_value(&self) -> Result<Value, Error> {
        let mut hash = HashMap::new();

        for (key, value) in self.iter() {
            hash.insert(key.clone(), value.to_template_value()?);
        }

        Ok(Value::Hash(hash))
    }
}

impl ToTemplateValue for serde_json::Value {
    fn to_template_value(&self) -> Result<Value, Error> {
        use serde_json::Value as Json;

        Ok(match self {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    return Err(Error::SerializationError);
                }
            }
            Json::String(s) => Value::String(s.clone()),
            Json::Array(list) => Value::List(
                list.iter()
                    .map(|v| v.to_template_value())
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Json::Object(map) => {
                let mut hash = HashMap::new();
                for (key, value) in map {
                    hash.insert(key.clone(), value.to_template_value()?);
                }
                Value::Hash(hash)
            }
        })
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = Error;

    fn try_from(value: Value) -> Result<serde_json::Value, Self::Error> {
        use serde_json::value::Number;

        match value {
            Value::Integer(i) => Ok(serde_json::Value::Number(i.into())),
            Value::Float(f) => Number::from_f64(f)
                .map(serde_json::Value::Number)
                .ok_or(Error::SerializationError),
            Value::String(s) => Ok(serde_json::Value::String(s)),
            Value::Boolean(b) => Ok(serde_json::Value::Bool(b)),
            Value::List(l) => {
                let mut list = vec![];
                for v in l {
                    list.push(v.try_into()?);
                }
                Ok(serde_json::Value::Array(list))
            }
            Value::Hash(h) => {
                let mut hash = serde_json::Map::new();
                for (k, v) in h {
                    hash.insert(k, v.try_into()?);
                }
                Ok(serde_json::Value::Object(hash))
            }
            Value::Null => Ok(serde_json::Value::Null),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthy() {
        assert!(Value::Integer(5).truthy());
        assert!(!Value::Integer(0).truthy());
        assert!(!Value::String(String::new()).truthy());
        assert!(!Value::List(vec![]).truthy());
        assert!(!Value::Null.truthy());
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            Value::Integer(5).add(&Value::Float(0.5)),
            Value::Float(5.5)
        );
        assert_eq!(
            Value::String("a".into()).add(&Value::Integer(1)),
            Value::String("a1".into())
        );
        assert_eq!(Value::Integer(7).rem(&Value::Integer(3)), Value::Integer(1));
        assert_eq!(Value::Integer(7).div(&Value::Integer(0)), Value::Null);
    }

    #[test]
    fn test_string_repeat() {
        let ab = Value::String("ab".into());

        assert_eq!(ab.mul(&Value::Integer(3)), Value::String("ababab".into()));
        assert_eq!(Value::Integer(2).mul(&ab), Value::String("abab".into()));
        assert_eq!(ab.mul(&Value::Integer(-1)), Value::String(String::new()));
        assert_eq!(ab.mul(&Value::Integer(i64::MAX)), Value::Null);
        assert_eq!(
            ab.mul(&Value::Integer((MAX_REPEAT_LEN / 2 + 1) as i64)),
            Value::Null
        );
    }

    #[test]
    fn test_unsigned_out_of_range() {
        assert_eq!(
            (i64::MAX as usize).to_template_value().expect("fits"),
            Value::Integer(i64::MAX)
        );
        assert!(matches!(
            usize::MAX.to_template_value(),
            Err(Error::SerializationError)
        ));
        assert!(matches!(
            u64::MAX.to_template_value(),
            Err(Error::SerializationError)
        ));
    }

    #[test]
    fn test_get() {
        let value = json!({"user": {"name": "Lev"}, "items": [1, 2]})
            .to_template_value()
            .expect("json");

        assert_eq!(
            value.get("user").get("name"),
            Value::String("Lev".into())
        );
        assert_eq!(value.get("items").get("1"), Value::Integer(2));
        assert_eq!(value.get("items").get("length"), Value::Integer(2));
        assert_eq!(value.get("missing").get("name"), Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(
            Value::List(vec![Value::Integer(1), Value::Integer(2)]).to_string(),
            "1,2"
        );
    }

    #[test]
    fn test_json_round_trip() {
        let json = json!({"a": [1, 2.5, "x", true, null]});
        let value = json.to_template_value().expect("to value");
        let back: serde_json::Value = value.try_into().expect("to json");
        assert_eq!(json, back);
    }
}
