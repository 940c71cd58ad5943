//! Rust types with a known runtime descriptor
//!
//! [`Typed`] lets callers receive plain Rust values from the engine instead of
//! [`Value`]s, see [`ConverterEngine::convert_into`](crate::ConverterEngine::convert_into).

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::value::{Data, Value};
use crate::value_type::TypeDescriptor;

pub trait Typed: Sized {
    fn type_descriptor() -> TypeDescriptor;

    /// Extract from a value of exactly [`Typed::type_descriptor`].
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! typed_integer {
    ($($ty:ident => $accessor:ident;)*) => {
        $(
            impl Typed for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::$ty()
                }

                fn from_value(value: Value) -> Option<Self> {
                    value.$accessor().map(|v| v as $ty)
                }
            }
        )*
    };
}

typed_integer! {
    i8 => as_i64;
    i16 => as_i64;
    i32 => as_i64;
    i64 => as_i64;
    isize => as_i64;
    u8 => as_u64;
    u16 => as_u64;
    u32 => as_u64;
    u64 => as_u64;
    usize => as_u64;
    f32 => as_f64;
    f64 => as_f64;
}

impl Typed for bool {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::bool()
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl Typed for String {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::string()
    }

    fn from_value(value: Value) -> Option<Self> {
        match value.into_data() {
            Data::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Any value; the target is the empty interface.
impl Typed for Value {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::any()
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence(&T::type_descriptor())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value.into_data() {
            Data::Seq(items) => items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<K: Typed + Eq + Hash, V: Typed> Typed for HashMap<K, V> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::map(&K::type_descriptor(), &V::type_descriptor())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value.into_data() {
            Data::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Some((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            _ => None,
        }
    }
}

impl<K: Typed + Ord, V: Typed> Typed for BTreeMap<K, V> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::map(&K::type_descriptor(), &V::type_descriptor())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value.into_data() {
            Data::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Some((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors() {
        assert_eq!(<Vec<u8>>::type_descriptor().to_string(), "Vec<u8>");
        assert_eq!(<HashMap<String, i32>>::type_descriptor().to_string(), "HashMap<String, i32>");
        assert_eq!(<Vec<Value>>::type_descriptor().to_string(), "Vec<any>");
    }

    #[test]
    fn test_from_value() {
        assert_eq!(i16::from_value(Value::from(-7i16)), Some(-7));
        assert_eq!(String::from_value(Value::from("x")), Some("x".to_string()));
        assert_eq!(bool::from_value(Value::from("true")), None);
        assert_eq!(
            <Vec<u8>>::from_value(Value::from(vec![1u8, 2])),
            Some(vec![1u8, 2])
        );
    }
}
