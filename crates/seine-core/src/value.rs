use std::collections::BTreeMap;
use std::fmt::{self, Display, Write};

use serde::{Deserialize, Serialize};

/// Dynamic value exchanged between user computations and the engine.
///
/// Equality is deep and structural. Floats compare by exact bit pattern, so
/// `NaN` equals itself and `-0.0` differs from `0.0`; this keeps [`PartialEq`]
/// in agreement with [`Value::canonical_key`], which is the bin key used by
/// marginal accumulation. `Map` is backed by `BTreeMap`, so two maps built in
/// different insertion orders canonicalize identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// The unit value, delivered by side-effecting host helpers.
    Unit,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A double precision float.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A string-keyed mapping, canonically ordered by key.
    Map(BTreeMap<String, Value>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Renders an injective, deterministic key for this value.
    ///
    /// Two values receive the same key exactly when they are structurally
    /// equal. Floats render as hexadecimal bit patterns and strings are
    /// length-prefixed so no rendering of one variant collides with another.
    pub fn canonical_key(&self) -> String {
        let mut key = String::new();
        self.write_key(&mut key);
        key
    }

    fn write_key(&self, out: &mut String) {
        match self {
            Value::Unit => out.push('u'),
            Value::Bool(b) => {
                out.push_str(if *b { "b:t" } else { "b:f" });
            }
            Value::Int(i) => {
                let _ = write!(out, "i:{i}");
            }
            Value::Float(x) => {
                let _ = write!(out, "f:{:016x}", x.to_bits());
            }
            Value::Str(s) => {
                let _ = write!(out, "s:{}:{s}", s.len());
            }
            Value::List(items) => {
                out.push_str("l(");
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        out.push(',');
                    }
                    item.write_key(out);
                }
                out.push(')');
            }
            Value::Map(entries) => {
                out.push_str("m(");
                for (idx, (name, item)) in entries.iter().enumerate() {
                    if idx > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, "{}:{name}=", name.len());
                    item.write_key(out);
                }
                out.push(')');
            }
        }
    }

    /// Reads this value as a real number; integers coerce to the real line.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Reads this value as an integer. No coercion from floats.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Reads this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (idx, (name, item)) in entries.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {item}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
