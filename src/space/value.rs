//! Coordinate Values and Keys
//!
//! A `Value` is a single coordinate, a `Key` is one point in parameter space.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// == Value ==
/// A single coordinate along one dimension.
///
/// Integers are held exactly and compare equal to a float of the same
/// value, so `Value::from(2)` and `Value::from(2.0)` address the same key
/// while `2^53` and `2^53 + 1` stay distinct. Numbers sort before text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Number(f64),
    Text(String),
}

// Normal form used for equality and hashing
#[derive(PartialEq, Eq, Hash)]
enum Canonical<'a> {
    Integer(i64),
    Float(u64),
    Text(&'a str),
}

// 2^63, the first float above i64::MAX
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

impl Value {
    /// Returns the numeric payload, if any.
    ///
    /// Integers beyond 2^53 are rounded to the nearest float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    fn canonical(&self) -> Canonical<'_> {
        match self {
            Value::Integer(n) => Canonical::Integer(*n),
            // Integral floats in i64 range fold onto the integer they equal
            Value::Number(n) if n.fract() == 0.0 && *n >= -I64_LIMIT && *n < I64_LIMIT => {
                Canonical::Integer(*n as i64)
            }
            // All NaN payloads share one key
            Value::Number(n) if n.is_nan() => Canonical::Float(f64::NAN.to_bits()),
            Value::Number(n) => Canonical::Float(n.to_bits()),
            Value::Text(s) => Canonical::Text(s),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.canonical(), other.canonical()) {
            (Canonical::Integer(a), Canonical::Integer(b)) => a.cmp(&b),
            (Canonical::Float(a), Canonical::Float(b)) => {
                f64::from_bits(a).total_cmp(&f64::from_bits(b))
            }
            (Canonical::Integer(a), Canonical::Float(b)) => integer_cmp_float(a, f64::from_bits(b)),
            (Canonical::Float(a), Canonical::Integer(b)) => {
                integer_cmp_float(b, f64::from_bits(a)).reverse()
            }
            (Canonical::Text(a), Canonical::Text(b)) => a.cmp(b),
            (Canonical::Text(_), _) => Ordering::Greater,
            (_, Canonical::Text(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// A canonical float is never equal to an integer, so a tie after rounding
// can only happen at +/-2^63 and is broken by the float's sign.
fn integer_cmp_float(a: i64, b: f64) -> Ordering {
    match (a as f64).total_cmp(&b) {
        Ordering::Equal if b > 0.0 => Ordering::Less,
        Ordering::Equal => Ordering::Greater,
        ordering => ordering,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        match i64::try_from(n) {
            Ok(n) => Value::Integer(n),
            Err(_) => Value::Number(n as f64),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

// == Key ==
/// An ordered tuple of values, one per declared dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(Vec<Value>);

impl Key {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Returns the key's components in dimension order.
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Returns the component for the dimension at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for Key {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

/// Builds a [`Key`] from a list of values convertible into [`Value`].
///
/// ```
/// use paramap::key;
/// let k = key![2, 0.7];
/// assert_eq!(k.to_string(), "(2, 0.7)");
/// ```
#[macro_export]
macro_rules! key {
    ($($value:expr),* $(,)?) => {
        $crate::space::Key::new(vec![$($crate::space::Value::from($value)),*])
    };
}
