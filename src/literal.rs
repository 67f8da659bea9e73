//! Value-to-literal formatting.
//!
//! [`ToCqlLiteral`] is the capability the expression model consults to inline
//! a typed value into a statement. It replaces a process-wide codec registry:
//! the mapping is resolved statically per value type, and custom types opt in
//! by implementing the trait. Formatting failures surface when the literal
//! term is constructed, never at render time.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// A value that can be rendered as a CQL literal.
pub trait ToCqlLiteral {
    /// Produce the exact literal text, quoting included where applicable.
    fn to_cql_literal(&self) -> Result<String>;
}

impl<T: ToCqlLiteral + ?Sized> ToCqlLiteral for &T {
    fn to_cql_literal(&self) -> Result<String> {
        (**self).to_cql_literal()
    }
}

/// Strings are single-quoted, embedded quotes doubled.
impl ToCqlLiteral for str {
    fn to_cql_literal(&self) -> Result<String> {
        Ok(format!("'{}'", self.replace('\'', "''")))
    }
}

impl ToCqlLiteral for String {
    fn to_cql_literal(&self) -> Result<String> {
        self.as_str().to_cql_literal()
    }
}

impl ToCqlLiteral for bool {
    fn to_cql_literal(&self) -> Result<String> {
        Ok(if *self { "true" } else { "false" }.into())
    }
}

macro_rules! integer_literal {
    ($($ty:ty),*) => {
        $(impl ToCqlLiteral for $ty {
            fn to_cql_literal(&self) -> Result<String> {
                Ok(self.to_string())
            }
        })*
    };
}

integer_literal!(i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! float_literal {
    ($($ty:ty),*) => {
        $(impl ToCqlLiteral for $ty {
            fn to_cql_literal(&self) -> Result<String> {
                if !self.is_finite() {
                    return Err(Error::no_literal_mapping(format!(
                        "non-finite floating point value {self}"
                    )));
                }
                if self.fract() == 0.0 {
                    Ok(format!("{self:.1}"))
                } else {
                    Ok(self.to_string())
                }
            }
        })*
    };
}

float_literal!(f32, f64);

/// `None` renders as `NULL`.
impl<T: ToCqlLiteral> ToCqlLiteral for Option<T> {
    fn to_cql_literal(&self) -> Result<String> {
        match self {
            Some(value) => value.to_cql_literal(),
            None => Ok("NULL".into()),
        }
    }
}

fn join_literals<'a, T: ToCqlLiteral + 'a>(
    values: impl Iterator<Item = &'a T>,
) -> Result<String> {
    let rendered: Result<Vec<String>> = values.map(ToCqlLiteral::to_cql_literal).collect();
    Ok(rendered?.join(","))
}

/// Lists render as `[e1,e2,...]`.
impl<T: ToCqlLiteral> ToCqlLiteral for Vec<T> {
    fn to_cql_literal(&self) -> Result<String> {
        Ok(format!("[{}]", join_literals(self.iter())?))
    }
}

/// Sets render as `{e1,e2,...}` in the set's iteration order.
impl<T: ToCqlLiteral> ToCqlLiteral for BTreeSet<T> {
    fn to_cql_literal(&self) -> Result<String> {
        Ok(format!("{{{}}}", join_literals(self.iter())?))
    }
}

/// Maps render as `{k1:v1,k2:v2,...}` in the map's iteration order.
impl<K: ToCqlLiteral, V: ToCqlLiteral> ToCqlLiteral for BTreeMap<K, V> {
    fn to_cql_literal(&self) -> Result<String> {
        let mut entries = Vec::with_capacity(self.len());
        for (key, value) in self {
            entries.push(format!(
                "{}:{}",
                key.to_cql_literal()?,
                value.to_cql_literal()?
            ));
        }
        Ok(format!("{{{}}}", entries.join(",")))
    }
}

macro_rules! tuple_literal {
    ($(($($name:ident : $idx:tt),+)),+) => {
        $(impl<$($name: ToCqlLiteral),+> ToCqlLiteral for ($($name,)+) {
            fn to_cql_literal(&self) -> Result<String> {
                let parts = vec![$(self.$idx.to_cql_literal()?),+];
                Ok(format!("({})", parts.join(",")))
            }
        })+
    };
}

tuple_literal!(
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3)
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_scalars() {
        assert_eq!(1.to_cql_literal().unwrap(), "1");
        assert_eq!("foo".to_cql_literal().unwrap(), "'foo'");
        assert_eq!("it's".to_cql_literal().unwrap(), "'it''s'");
        assert_eq!(true.to_cql_literal().unwrap(), "true");
        assert_eq!(0.42.to_cql_literal().unwrap(), "0.42");
        assert_eq!(2.0f64.to_cql_literal().unwrap(), "2.0");
    }

    #[test]
    fn formats_collections() {
        assert_eq!(vec![1, 2, 3].to_cql_literal().unwrap(), "[1,2,3]");

        let set: BTreeSet<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(set.to_cql_literal().unwrap(), "{1,2,3}");

        let mut map = BTreeMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.to_cql_literal().unwrap(), "{'a':1,'b':2}");

        assert_eq!((1, "foo").to_cql_literal().unwrap(), "(1,'foo')");
    }

    #[test]
    fn formats_null() {
        let missing: Option<i32> = None;
        assert_eq!(missing.to_cql_literal().unwrap(), "NULL");
    }

    #[test]
    fn rejects_non_finite_floats() {
        assert!(f64::NAN.to_cql_literal().is_err());
        assert!(f64::INFINITY.to_cql_literal().is_err());
    }
}
