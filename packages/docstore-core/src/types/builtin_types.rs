use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use chrono::NaiveDateTime;

use super::{FieldValue, ScalarKind, TypeDesc, Value, ValueError};

// Integer impls go through i64/u64 and narrow on the way back.

macro_rules! signed_field_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn type_desc() -> TypeDesc {
                    TypeDesc::Scalar(ScalarKind::$kind)
                }

                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }

                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).map_err(|_| ValueError::OutOfRange {
                            type_name: stringify!($ty),
                            value: v.to_string(),
                        }),
                        other => Err(ValueError::mismatch(stringify!($ty), &other)),
                    }
                }
            }
        )*
    };
}

macro_rules! unsigned_field_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn type_desc() -> TypeDesc {
                    TypeDesc::Scalar(ScalarKind::$kind)
                }

                fn to_value(&self) -> Value {
                    Value::UInt(u64::from(*self))
                }

                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::UInt(v) => <$ty>::try_from(v).map_err(|_| ValueError::OutOfRange {
                            type_name: stringify!($ty),
                            value: v.to_string(),
                        }),
                        other => Err(ValueError::mismatch(stringify!($ty), &other)),
                    }
                }
            }
        )*
    };
}

signed_field_value!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
unsigned_field_value!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);

impl FieldValue for bool {
    fn type_desc() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::Bool)
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(ValueError::mismatch("bool", &other)),
        }
    }
}

impl FieldValue for f32 {
    fn type_desc() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::F32)
    }

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(v) => Ok(v as f32),
            other => Err(ValueError::mismatch("f32", &other)),
        }
    }
}

impl FieldValue for f64 {
    fn type_desc() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::F64)
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(ValueError::mismatch("f64", &other)),
        }
    }
}

impl FieldValue for char {
    fn type_desc() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::Char)
    }

    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Char(v) => Ok(v),
            other => Err(ValueError::mismatch("char", &other)),
        }
    }
}

impl FieldValue for String {
    fn type_desc() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::String)
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(ValueError::mismatch("String", &other)),
        }
    }
}

impl FieldValue for NaiveDateTime {
    fn type_desc() -> TypeDesc {
        TypeDesc::Scalar(ScalarKind::Timestamp)
    }

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Timestamp(v) => Ok(v),
            other => Err(ValueError::mismatch("NaiveDateTime", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Optional(Box::new(T::type_desc()))
    }

    fn to_value(&self) -> Value {
        Value::Optional(self.as_ref().map(|v| Box::new(v.to_value())))
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Optional(None) => Ok(None),
            Value::Optional(Some(inner)) => T::from_value(*inner).map(Some),
            other => Err(ValueError::mismatch("Option", &other)),
        }
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::List(Box::new(T::type_desc()))
    }

    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ValueError::mismatch("Vec", &other)),
        }
    }
}

impl<T: FieldValue, const N: usize> FieldValue for [T; N] {
    fn type_desc() -> TypeDesc {
        TypeDesc::Array(Box::new(T::type_desc()), N)
    }

    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        let items = match value {
            Value::Sequence(items) => items,
            other => return Err(ValueError::mismatch("array", &other)),
        };
        let got = items.len();
        let items: Vec<T> = items
            .into_iter()
            .map(T::from_value)
            .collect::<Result<_, _>>()?;
        items
            .try_into()
            .map_err(|_| ValueError::LengthMismatch { expected: N, got })
    }
}

impl<K, V> FieldValue for BTreeMap<K, V>
where
    K: FieldValue + Ord,
    V: FieldValue,
{
    fn type_desc() -> TypeDesc {
        TypeDesc::Map(Box::new(K::type_desc()), Box::new(V::type_desc()))
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Map(entries) => {
                let mut map = BTreeMap::new();
                for (k, v) in entries {
                    map.insert(K::from_value(k)?, V::from_value(v)?);
                }
                Ok(map)
            }
            other => Err(ValueError::mismatch("BTreeMap", &other)),
        }
    }
}

impl<K, V, S> FieldValue for HashMap<K, V, S>
where
    K: FieldValue + Eq + Hash,
    V: FieldValue,
    S: BuildHasher + Default,
{
    fn type_desc() -> TypeDesc {
        TypeDesc::Map(Box::new(K::type_desc()), Box::new(V::type_desc()))
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Map(entries) => {
                let mut map = HashMap::with_capacity_and_hasher(entries.len(), S::default());
                for (k, v) in entries {
                    map.insert(K::from_value(k)?, V::from_value(v)?);
                }
                Ok(map)
            }
            other => Err(ValueError::mismatch("HashMap", &other)),
        }
    }
}
