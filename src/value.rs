//! Attribute values.

use std::{any::Any, fmt, sync::Arc};

use by_address::ByAddress;
use ordered_float::OrderedFloat;

use crate::{error::RecordError, records::Record, symbols::Symbol};

/// Anything that can be held in a record attribute.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(OrderedFloat<f64>),
    Character(char),
    String(Arc<str>),
    Symbol(Symbol),
    Vector(Arc<[Value]>),
    Record(Record),
    Opaque(Opaque),
}

/// A foreign Rust value. Equality and hashing go by allocation, not content.
#[derive(Clone, PartialEq, Eq, Hash, derive_more::Debug, derive_more::From)]
#[debug("#<opaque>")]
pub struct Opaque(ByAddress<Arc<dyn Any + Send + Sync>>);

impl Opaque {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        let value: Arc<dyn Any + Send + Sync> = Arc::new(value);
        Self(ByAddress(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Character(_) => "character",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Vector(_) => "vector",
            Self::Record(_) => "record",
            Self::Opaque(_) => "opaque",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            Self::Symbol(sym) => Some(*sym),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{:?}", x.into_inner()),
            Self::Character(c) => write!(f, "{c:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Symbol(sym) => write!(f, "'{sym}"),
            Self::Vector(vec) => {
                write!(f, "[")?;
                for (i, item) in vec.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Record(record) => write!(f, "{record}"),
            Self::Opaque(opaque) => write!(f, "{opaque:?}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(OrderedFloat(x))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Character(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl From<Vec<Value>> for Value {
    fn from(vec: Vec<Value>) -> Self {
        Self::Vector(Arc::from(vec))
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<Opaque> for Value {
    fn from(opaque: Opaque) -> Self {
        Self::Opaque(opaque)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

macro_rules! impl_try_from_value {
    ( $ty:ty, $expected:literal, $( $pat:pat => $out:expr ),+ $(,)? ) => {
        impl TryFrom<Value> for $ty {
            type Error = RecordError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    $( $pat => Ok($out), )+
                    other => Err(RecordError::invalid_type($expected, other.type_name())),
                }
            }
        }
    };
}

impl_try_from_value!(bool, "bool", Value::Boolean(b) => b);
impl_try_from_value!(i64, "integer", Value::Integer(i) => i);
impl_try_from_value!(f64, "float", Value::Float(x) => x.into_inner());
impl_try_from_value!(char, "character", Value::Character(c) => c);
impl_try_from_value!(String, "string", Value::String(s) => s.to_string());
impl_try_from_value!(Arc<str>, "string", Value::String(s) => s);
impl_try_from_value!(Symbol, "symbol", Value::Symbol(sym) => sym);
impl_try_from_value!(Vec<Value>, "vector", Value::Vector(vec) => vec.to_vec());
impl_try_from_value!(Record, "record", Value::Record(record) => record);
impl_try_from_value!(Opaque, "opaque", Value::Opaque(opaque) => opaque);

impl TryFrom<Value> for i32 {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let i = i64::try_from(value)?;
        i32::try_from(i).map_err(|_| RecordError::invalid_type("i32", "integer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let vec = Value::from(vec![
            Value::from(1),
            Value::from("two"),
            Value::from(Symbol::intern("three")),
            Value::from(4.5),
            Value::Null,
        ]);
        assert_eq!(vec.to_string(), r#"[1, "two", 'three, 4.5, null]"#);
        assert_eq!(Value::from('x').to_string(), "'x'");
    }

    #[test]
    fn opaque_values_compare_by_address() {
        let a = Opaque::new(5u8);
        let b = Opaque::new(5u8);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.downcast_ref::<u8>(), Some(&5));
        assert_eq!(Value::from(a).to_string(), "#<opaque>");
    }

    #[test]
    fn conversions() {
        assert_eq!(i64::try_from(Value::from(3)), Ok(3));
        assert_eq!(
            i64::try_from(Value::from("3")),
            Err(RecordError::invalid_type("integer", "string"))
        );
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }
}
