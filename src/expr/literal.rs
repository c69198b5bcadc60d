use std::fmt;

use itertools::Itertools;
use ordered_float::OrderedFloat;

/// Opaque leaf operand: column names, indices, constants and frame keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
    /// Key of a frame that already lives on the remote engine.
    Key(String),
    IntList(Vec<i64>),
}

impl Literal {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Literal::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) | Literal::Key(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::Str(s) => write!(f, "\"{}\"", s),
            Literal::Key(k) => write!(f, "{}", k),
            Literal::IntList(vs) => write!(f, "[{}]", vs.iter().join(" ")),
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(OrderedFloat(v))
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Str(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Str(s)
    }
}

impl From<Vec<i64>> for Literal {
    fn from(vs: Vec<i64>) -> Self {
        Literal::IntList(vs)
    }
}
