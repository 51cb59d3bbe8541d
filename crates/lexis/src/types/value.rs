use std::fmt::{Display, Formatter, Result as FmtResult};

/// A runtime value passed as an argument or produced by evaluation.
///
/// Arguments are supplied to a resolution as a `HashMap<String, Value>`.
/// Integers and floats are kept apart so that integral counts display without
/// a fractional part and select plural branches exactly.
///
/// # Example
///
/// ```
/// use lexis::Value;
///
/// let count: Value = 42.into();
/// let ratio: Value = 0.5.into();
/// let name: Value = "Alice".into();
///
/// assert_eq!(count.as_number(), Some(42.0));
/// assert_eq!(ratio.to_string(), "0.5");
/// assert_eq!(name.as_string(), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer number.
    Number(i64),

    /// A floating-point number.
    Float(f64),

    /// A string value.
    String(String),
}

impl Value {
    /// Numeric view of this value, without parsing strings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::String(_) => None,
        }
    }

    /// Get this value as a string, if it is one.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Number(_) | Value::Float(_) => None,
        }
    }

    /// Coerce to a number the way macro arguments are coerced.
    ///
    /// Strings are parsed as floats after trimming. Returns `None` when the
    /// result is not a finite number.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => *n as f64,
            Value::Float(f) => *f,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// Whether this value may be used as an argument.
    ///
    /// Floats must be finite; everything else is accepted.
    pub fn is_valid_argument(&self) -> bool {
        match self {
            Value::Float(f) => f.is_finite(),
            Value::Number(_) | Value::String(_) => true,
        }
    }

    /// Length of the textual form, in characters.
    pub(crate) fn char_len(&self) -> usize {
        match self {
            Value::String(s) => s.chars().count(),
            Value::Number(_) | Value::Float(_) => self.to_string().chars().count(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<u64> for Value {
    /// Counts beyond `i64::MAX` become floats.
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Value::Float(n as f64), Value::Number)
    }
}

impl From<usize> for Value {
    /// Counts beyond `i64::MAX` become floats.
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Value::Float(n as f64), Value::Number)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
