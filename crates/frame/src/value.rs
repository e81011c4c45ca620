//! Tagged cell values
//!
//! `Value` is the closed sum type for table cells; `TypeTag` names the six
//! concrete element types a column can hold. All comparison and formatting
//! logic dispatches on the tag.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{FrameError, Result};

/// Element type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int32,
    Int64,
    Float32,
    Float64,
    Str,
    Char,
}

impl TypeTag {
    /// The type's zero value, used to materialize nulls
    pub fn zero(self) -> Value {
        match self {
            Self::Int32 => Value::Int32(0),
            Self::Int64 => Value::Int64(0),
            Self::Float32 => Value::Float32(0.0),
            Self::Float64 => Value::Float64(0.0),
            Self::Str => Value::Str(String::new()),
            Self::Char => Value::Char('\0'),
        }
    }

    /// Whether sum/mean are defined for this type
    #[inline]
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Int32 | Self::Int64 | Self::Float32 | Self::Float64
        )
    }

    /// Whether two tags belong to the same comparison family
    ///
    /// Integers compare against integers and floats against floats after
    /// widening; everything else requires an exact tag match.
    pub fn comparable_with(self, other: TypeTag) -> bool {
        use TypeTag::*;
        matches!(
            (self, other),
            (Int32 | Int64, Int32 | Int64)
                | (Float32 | Float64, Float32 | Float64)
                | (Str, Str)
                | (Char, Char)
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Str => "string",
            Self::Char => "char",
        };
        f.write_str(name)
    }
}

/// A single table cell
///
/// `Null` is accepted on append and materializes as the column type's zero
/// value; it never survives inside a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Str(String),
    Char(char),
    Null,
}

impl Value {
    /// The value's type tag; `None` for null
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            Self::Int32(_) => Some(TypeTag::Int32),
            Self::Int64(_) => Some(TypeTag::Int64),
            Self::Float32(_) => Some(TypeTag::Float32),
            Self::Float64(_) => Some(TypeTag::Float64),
            Self::Str(_) => Some(TypeTag::Str),
            Self::Char(_) => Some(TypeTag::Char),
            Self::Null => None,
        }
    }

    /// Tag name for error messages ("null" for null)
    pub fn tag_name(&self) -> String {
        match self.tag() {
            Some(tag) => tag.to_string(),
            None => "null".into(),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    /// Canonical, locale-free formatting of a cell
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
            Self::Char(v) => write!(f, "{v}"),
            Self::Null => Ok(()),
        }
    }
}

/// Comparison operator for row filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Evaluate the operator against an ordering between cell and probe
    #[inline]
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

/// Compare two values, widening within a numeric family
///
/// Integers compare as `i64`, floats as `f64` (total order), strings
/// lexicographically and characters as single characters. Any other
/// combination fails with `Incomparable`.
pub fn compare(left: &Value, right: &Value) -> Result<Ordering> {
    use Value::*;

    let ordering = match (left, right) {
        (Int32(a), Int32(b)) => a.cmp(b),
        (Int64(a), Int64(b)) => a.cmp(b),
        (Int32(a), Int64(b)) => i64::from(*a).cmp(b),
        (Int64(a), Int32(b)) => a.cmp(&i64::from(*b)),
        (Float32(a), Float32(b)) => a.total_cmp(b),
        (Float64(a), Float64(b)) => a.total_cmp(b),
        (Float32(a), Float64(b)) => f64::from(*a).total_cmp(b),
        (Float64(a), Float32(b)) => a.total_cmp(&f64::from(*b)),
        (Str(a), Str(b)) => a.cmp(b),
        (Char(a), Char(b)) => a.cmp(b),
        _ => {
            return Err(FrameError::Incomparable {
                left: left.tag_name(),
                right: right.tag_name(),
            });
        }
    };

    Ok(ordering)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert_eq!(TypeTag::Int32.zero(), Value::Int32(0));
        assert_eq!(TypeTag::Int64.zero(), Value::Int64(0));
        assert_eq!(TypeTag::Str.zero(), Value::Str(String::new()));
        assert_eq!(TypeTag::Char.zero(), Value::Char('\0'));
    }

    #[test]
    fn test_arithmetic_tags() {
        assert!(TypeTag::Int32.is_arithmetic());
        assert!(TypeTag::Float64.is_arithmetic());
        assert!(!TypeTag::Str.is_arithmetic());
        assert!(!TypeTag::Char.is_arithmetic());
    }

    #[test]
    fn test_comparable_families() {
        assert!(TypeTag::Int32.comparable_with(TypeTag::Int64));
        assert!(TypeTag::Float32.comparable_with(TypeTag::Float64));
        assert!(TypeTag::Str.comparable_with(TypeTag::Str));
        assert!(!TypeTag::Int32.comparable_with(TypeTag::Float32));
        assert!(!TypeTag::Str.comparable_with(TypeTag::Char));
    }

    #[test]
    fn test_compare_widens_integers() {
        let ord = compare(&Value::Int32(5), &Value::Int64(5)).unwrap();
        assert_eq!(ord, Ordering::Equal);

        let ord = compare(&Value::Int64(3), &Value::Int32(9)).unwrap();
        assert_eq!(ord, Ordering::Less);
    }

    #[test]
    fn test_compare_strings_lexicographic() {
        let ord = compare(&Value::Str("BUY".into()), &Value::Str("ZOOM".into())).unwrap();
        assert_eq!(ord, Ordering::Less);
    }

    #[test]
    fn test_cross_family_compare_fails() {
        assert!(compare(&Value::Int32(1), &Value::Str("1".into())).is_err());
        assert!(compare(&Value::Int32(1), &Value::Float32(1.0)).is_err());
        assert!(compare(&Value::Null, &Value::Int32(0)).is_err());
    }

    #[test]
    fn test_compare_op_matrix() {
        assert!(CompareOp::Eq.matches(Ordering::Equal));
        assert!(!CompareOp::Eq.matches(Ordering::Less));
        assert!(CompareOp::Ne.matches(Ordering::Greater));
        assert!(CompareOp::Le.matches(Ordering::Equal));
        assert!(CompareOp::Le.matches(Ordering::Less));
        assert!(CompareOp::Ge.matches(Ordering::Greater));
        assert!(!CompareOp::Gt.matches(Ordering::Equal));
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(Value::Int32(42).to_string(), "42");
        assert_eq!(Value::Float32(1.5).to_string(), "1.5");
        assert_eq!(Value::Str("P1".into()).to_string(), "P1");
        assert_eq!(Value::Char('x').to_string(), "x");
        assert_eq!(Value::Null.to_string(), "");
    }
}
