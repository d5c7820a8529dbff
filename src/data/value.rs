//! Cell values and grouping levels

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single cell of a [`Dataset`](super::Dataset)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Value {
    /// Parse a raw text cell: empty → `Missing`, numeric → `Number`, otherwise `Text`
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") {
            return Value::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the cell. Text cells are parsed leniently.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Missing => None,
        }
    }

    /// Text view of the cell; numbers are formatted
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Number(_) => self.to_level().map(|l| l.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Missing => None,
        }
    }

    /// Convert to a grouping level. `None` for missing cells.
    pub fn to_level(&self) -> Option<Level> {
        match self {
            Value::Number(n) => Some(Level::from_f64(*n)),
            Value::Text(s) => match s.trim().parse::<i64>() {
                Ok(i) => Some(Level::Integer(i)),
                Err(_) => Some(Level::Text(s.clone())),
            },
            Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => write!(f, "NA"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

/// An ordered grouping key (subject, period or sequence level)
///
/// Integral numbers order numerically and sort before text levels, so subject
/// `2` precedes subject `10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Integer(i64),
    Text(String),
}

impl Level {
    fn from_f64(n: f64) -> Self {
        if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
            Level::Integer(n as i64)
        } else {
            Level::Text(n.to_string())
        }
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Level::Integer(a), Level::Integer(b)) => a.cmp(b),
            (Level::Integer(_), Level::Text(_)) => Ordering::Less,
            (Level::Text(_), Level::Integer(_)) => Ordering::Greater,
            (Level::Text(a), Level::Text(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Integer(i) => write!(f, "{}", i),
            Level::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Level {
    fn from(v: i64) -> Self {
        Level::Integer(v)
    }
}

impl From<&str> for Level {
    fn from(v: &str) -> Self {
        Level::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cells() {
        assert_eq!(Value::parse("1.5"), Value::Number(1.5));
        assert_eq!(Value::parse(" "), Value::Missing);
        assert_eq!(Value::parse("NA"), Value::Missing);
        assert_eq!(Value::parse("TR"), Value::Text("TR".to_string()));
    }

    #[test]
    fn test_levels_sort_numerically() {
        let mut levels = vec![
            Value::from(10).to_level().unwrap(),
            Value::from("B").to_level().unwrap(),
            Value::from(2).to_level().unwrap(),
            Value::from("A").to_level().unwrap(),
        ];
        levels.sort();
        let names: Vec<String> = levels.iter().map(|l| l.to_string()).collect();
        assert_eq!(names, vec!["2", "10", "A", "B"]);
    }

    #[test]
    fn test_numeric_text_becomes_integer_level() {
        assert_eq!(Value::from("7").to_level(), Some(Level::Integer(7)));
        assert_eq!(Value::from(1.5).to_level(), Some(Level::Text("1.5".into())));
        assert_eq!(Value::Missing.to_level(), None);
    }
}
