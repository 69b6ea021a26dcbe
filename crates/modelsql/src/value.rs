//! Bindable values and the static field types they map to.
//!
//! [`Value`] is what travels in a [`Query`](crate::Query)'s argument list and what value
//! accessors read from and write into entity fields. [`FieldType`] describes the Rust type of
//! a mapped field (`T` or `Option<T>` for a supported scalar `T`), including its memory layout
//! and zero value.

use chrono::NaiveDateTime;
use std::alloc::Layout;
use std::fmt;
use uuid::Uuid;

/// Invoke `$mac` with the `Kind => RustType` list of every supported scalar.
macro_rules! for_each_scalar {
    ($mac:ident) => {
        $mac! {
            Bool => bool,
            I16 => i16,
            I32 => i32,
            I64 => i64,
            F32 => f32,
            F64 => f64,
            Text => String,
            Bytes => Vec<u8>,
            Timestamp => chrono::NaiveDateTime,
            Uuid => uuid::Uuid,
        }
    };
}
pub(crate) use for_each_scalar;

/// A value bound to a statement placeholder or stored in an entity field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
    Uuid(Uuid),
}

impl Value {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
            Value::Uuid(_) => "uuid",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this is the zero value of its own type.
    ///
    /// `Null` counts as zero. Timestamps are zero at the Unix epoch, UUIDs when nil.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(v) => !*v,
            Value::I16(v) => *v == 0,
            Value::I32(v) => *v == 0,
            Value::I64(v) => *v == 0,
            Value::F32(v) => *v == 0.0,
            Value::F64(v) => *v == 0.0,
            Value::Text(v) => v.is_empty(),
            Value::Bytes(v) => v.is_empty(),
            Value::Timestamp(v) => *v == NaiveDateTime::default(),
            Value::Uuid(v) => v.is_nil(),
        }
    }
}

/// Scalar kinds a field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I16,
    I32,
    I64,
    F32,
    F64,
    Text,
    Bytes,
    Timestamp,
    Uuid,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Text => "text",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Uuid => "uuid",
        }
    }
}

/// The static type of a mapped field: a scalar, optionally wrapped in `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldType {
    pub kind: ScalarKind,
    pub nullable: bool,
}

impl FieldType {
    pub const fn scalar(kind: ScalarKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    pub const fn nullable(kind: ScalarKind) -> Self {
        Self {
            kind,
            nullable: true,
        }
    }

    /// Memory layout of the Rust type this field type stands for.
    pub fn layout(self) -> Layout {
        let key = (self.kind, self.nullable);
        macro_rules! layout {
            ($($kind:ident => $ty:ty),* $(,)?) => {
                match key {
                    $(
                        (ScalarKind::$kind, false) => Layout::new::<$ty>(),
                        (ScalarKind::$kind, true) => Layout::new::<Option<$ty>>(),
                    )*
                }
            };
        }
        for_each_scalar!(layout)
    }

    /// Whether `value` is the zero value of this field type.
    ///
    /// Nullable fields are zero only when `None`; `Some(0)` is an explicitly set value.
    pub fn is_zero(self, value: &Value) -> bool {
        if self.nullable {
            value.is_null()
        } else {
            value.is_zero()
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.kind.as_str())
        } else {
            f.write_str(self.kind.as_str())
        }
    }
}

/// A value that cannot be converted into the requested field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: FieldType,
    pub found: &'static str,
}

impl Mismatch {
    pub fn new(expected: FieldType, found: &Value) -> Self {
        Self {
            expected,
            found: found.type_name(),
        }
    }

    /// Attach the field name, producing [`OrmError::TypeMismatch`](crate::OrmError::TypeMismatch).
    pub fn into_error(self, field: &str) -> crate::OrmError {
        crate::OrmError::TypeMismatch {
            field: field.to_string(),
            expected: self.expected,
            found: self.found,
        }
    }

    fn into_nullable(mut self) -> Self {
        self.expected.nullable = true;
        self
    }
}

/// Read a field as a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Convert a [`Value`] back into a field's Rust type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, Mismatch>;
}

mod sealed {
    pub trait Sealed {}
}

/// Rust types that can back a mapped field.
///
/// Sealed: the direct-memory accessor casts field pointers to the type named by
/// `FIELD_TYPE`, so only the scalars listed in [`ScalarKind`] and `Option`s of them qualify.
pub trait SqlType: ToValue + FromValue + sealed::Sealed {
    const FIELD_TYPE: FieldType;
}

macro_rules! impl_from_value {
    ($ty:ty, $kind:ident, $($variant:ident($v:ident) => $conv:expr),+ $(,)?) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, Mismatch> {
                match value {
                    $(Value::$variant($v) => Ok($conv),)+
                    other => Err(Mismatch::new(FieldType::scalar(ScalarKind::$kind), &other)),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, Bool(v) => v);
impl_from_value!(i16, I16, I16(v) => v);
impl_from_value!(i32, I32, I16(v) => i32::from(v), I32(v) => v);
impl_from_value!(i64, I64, I16(v) => i64::from(v), I32(v) => i64::from(v), I64(v) => v);
impl_from_value!(f32, F32, F32(v) => v);
impl_from_value!(f64, F64, F32(v) => f64::from(v), F64(v) => v);
impl_from_value!(String, Text, Text(v) => v);
impl_from_value!(Vec<u8>, Bytes, Bytes(v) => v);
impl_from_value!(NaiveDateTime, Timestamp, Timestamp(v) => v);
impl_from_value!(Uuid, Uuid, Uuid(v) => v);

macro_rules! impl_scalars {
    ($($kind:ident => $ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl sealed::Sealed for Option<$ty> {}

            impl SqlType for $ty {
                const FIELD_TYPE: FieldType = FieldType::scalar(ScalarKind::$kind);
            }

            impl SqlType for Option<$ty> {
                const FIELD_TYPE: FieldType = FieldType::nullable(ScalarKind::$kind);
            }

            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::$kind(self.clone())
                }
            }

            impl ToValue for Option<$ty> {
                fn to_value(&self) -> Value {
                    match self {
                        Some(v) => v.to_value(),
                        None => Value::Null,
                    }
                }
            }

            impl FromValue for Option<$ty> {
                fn from_value(value: Value) -> Result<Self, Mismatch> {
                    match value {
                        Value::Null => Ok(None),
                        other => <$ty as FromValue>::from_value(other)
                            .map(Some)
                            .map_err(Mismatch::into_nullable),
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$kind(v)
                }
            }

            impl From<Option<$ty>> for Value {
                fn from(v: Option<$ty>) -> Self {
                    match v {
                        Some(v) => Value::$kind(v),
                        None => Value::Null,
                    }
                }
            }
        )*
    };
}

for_each_scalar!(impl_scalars);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}
