//! Type-directed coercion of dynamic values into typed fields.
//!
//! Values whose dynamic type already is the field's type are assigned as
//! is. Beyond that, only strings are converted: into integers (with a second
//! chance through the size-suffix grammar) and into floats. Any other pairing
//! is an error; in particular, a boolean never becomes an integer and a float
//! never becomes an integer.

use std::convert::TryFrom;
use std::fmt;

use log::debug;

use crate::errors::{CoerceError, FieldError, SizeError};
use crate::size::parse_sized;
use crate::value::Value;

/// The kind of a value or of a destination field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    /// A signed integer of the given bit width.
    Signed(u32),
    /// An unsigned integer of the given bit width.
    Unsigned(u32),
    /// A float of the given bit width.
    Float(u32),
    /// A pointer-sized signed integer.
    Isize,
    /// A pointer-sized unsigned integer.
    Usize,
    Str,
    List,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Kind::Null => write!(f, "null"),
            Kind::Bool => write!(f, "bool"),
            Kind::Signed(bits) => write!(f, "i{}", bits),
            Kind::Unsigned(bits) => write!(f, "u{}", bits),
            Kind::Float(bits) => write!(f, "f{}", bits),
            Kind::Isize => write!(f, "isize"),
            Kind::Usize => write!(f, "usize"),
            Kind::Str => write!(f, "string"),
            Kind::List => write!(f, "list"),
        }
    }
}

/// A field type that holds exactly one value.
pub trait Scalar: Sized + Default {
    const KIND: Kind;

    /// Takes the value as is when its dynamic type is this type.
    fn assign(value: &Value) -> Option<Self>;

    /// Converts a string into this type.
    fn parse(s: &str) -> Result<Self, CoerceError>;
}

/// Coerces one dynamic value into a scalar.
///
/// Lists are not scalars; binding a list into a scalar field is decided by
/// the caller (see `Target`), which hands the sole element here.
pub fn coerce<T: Scalar>(value: &Value) -> Result<T, CoerceError> {
    if let Some(t) = T::assign(value) {
        return Ok(t);
    }
    match *value {
        Value::Str(ref s) => {
            debug!("coercing {:?} to {}", s, T::KIND);
            T::parse(s)
        }
        ref other => Err(CoerceError::Unconvertible {
            from: other.kind(),
            to: T::KIND,
        }),
    }
}

fn invalid<E: fmt::Display>(s: &str, to: Kind, err: E) -> CoerceError {
    CoerceError::Invalid {
        value: s.into(),
        to,
        reason: err.to_string(),
    }
}

/// Runs `s` through the size-suffix grammar after a plain parse failed.
///
/// When the grammar does not apply, the plain parse error is the one that
/// gets reported.
fn reparse_sized<E: fmt::Display>(s: &str, to: Kind, err: E) -> Result<i64, CoerceError> {
    parse_sized(s).map_err(|size_err| match size_err {
        SizeError::NoUnit => invalid(s, to, err),
        SizeError::Overflow { .. } => CoerceError::Overflow {
            value: s.into(),
            to,
        },
        SizeError::Number { reason, .. } => CoerceError::Invalid {
            value: s.into(),
            to,
            reason,
        },
    })
}

macro_rules! signed {
    (@impl $ty:ty, $kind:expr, $assign:expr) => {
        impl Scalar for $ty {
            const KIND: Kind = $kind;

            fn assign(value: &Value) -> Option<$ty> {
                let assign: fn(&Value) -> Option<$ty> = $assign;
                assign(value)
            }

            fn parse(s: &str) -> Result<$ty, CoerceError> {
                match s.parse::<$ty>() {
                    Ok(n) => Ok(n),
                    Err(err) => {
                        let n = reparse_sized(s, Self::KIND, err)?;
                        <$ty>::try_from(n).map_err(|_| CoerceError::Overflow {
                            value: s.into(),
                            to: Self::KIND,
                        })
                    }
                }
            }
        }
    };
    ($($ty:ident => $kind:expr),*) => {
        $( signed!(@impl $ty, $kind, |_| None); )*
    };
}

// Unsigned fields never take a value as is: parsers only produce `i64`.
macro_rules! unsigned {
    ($($ty:ident => $kind:expr),*) => {
        $(
            impl Scalar for $ty {
                const KIND: Kind = $kind;

                fn assign(_: &Value) -> Option<$ty> {
                    None
                }

                fn parse(s: &str) -> Result<$ty, CoerceError> {
                    match s.parse::<$ty>() {
                        Ok(n) => Ok(n),
                        Err(err) => {
                            let n = reparse_sized(s, Self::KIND, err)?;
                            if n < 0 {
                                return Err(CoerceError::Negative {
                                    value: s.into(),
                                    to: Self::KIND,
                                });
                            }
                            <$ty>::try_from(n).map_err(|_| CoerceError::Overflow {
                                value: s.into(),
                                to: Self::KIND,
                            })
                        }
                    }
                }
            }
        )*
    };
}

macro_rules! float {
    ($ty:ty, $bits:expr, $assign:expr) => {
        impl Scalar for $ty {
            const KIND: Kind = Kind::Float($bits);

            fn assign(value: &Value) -> Option<$ty> {
                let assign: fn(&Value) -> Option<$ty> = $assign;
                assign(value)
            }

            fn parse(s: &str) -> Result<$ty, CoerceError> {
                s.parse::<$ty>().map_err(|err| invalid(s, Self::KIND, err))
            }
        }
    };
}

signed!(
    i8 => Kind::Signed(8),
    i16 => Kind::Signed(16),
    i32 => Kind::Signed(32),
    isize => Kind::Isize
);
signed!(@impl i64, Kind::Signed(64), |value| match *value {
    Value::Int(n) => Some(n),
    _ => None,
});
unsigned!(
    u8 => Kind::Unsigned(8),
    u16 => Kind::Unsigned(16),
    u32 => Kind::Unsigned(32),
    u64 => Kind::Unsigned(64),
    usize => Kind::Usize
);
float!(f32, 32, |_| None);
float!(f64, 64, |value| match *value {
    Value::Float(n) => Some(n),
    _ => None,
});

impl Scalar for bool {
    const KIND: Kind = Kind::Bool;

    fn assign(value: &Value) -> Option<bool> {
        match *value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn parse(_: &str) -> Result<bool, CoerceError> {
        Err(CoerceError::UnhandledKind(Kind::Bool))
    }
}

impl Scalar for String {
    const KIND: Kind = Kind::Str;

    fn assign(value: &Value) -> Option<String> {
        match *value {
            Value::Str(ref s) => Some(s.clone()),
            _ => None,
        }
    }

    fn parse(s: &str) -> Result<String, CoerceError> {
        Ok(s.into())
    }
}

/// Where a `Target` reports what went wrong while binding one field.
pub struct FieldSink<'a> {
    key: &'a str,
    report_ambiguous: bool,
    failures: &'a mut Vec<FieldError>,
}

impl<'a> FieldSink<'a> {
    pub(crate) fn new(
        key: &'a str,
        report_ambiguous: bool,
        failures: &'a mut Vec<FieldError>,
    ) -> FieldSink<'a> {
        FieldSink { key, report_ambiguous, failures }
    }

    /// The option key of the field being bound.
    pub fn key(&self) -> &str {
        self.key
    }

    /// Records a conversion failure for this field.
    pub fn fail(&mut self, cause: CoerceError) {
        self.failures.push(FieldError::Convert {
            key: self.key.into(),
            cause,
        });
    }

    /// Notes that a list of `len` values met a scalar field.
    ///
    /// The field is left alone either way; this is only recorded as a
    /// failure when the schema asked for it.
    pub fn ambiguous(&mut self, len: usize) {
        debug!("leaving '{}' unset: {} values for a scalar field", self.key, len);
        if self.report_ambiguous {
            self.failures.push(FieldError::Ambiguous {
                key: self.key.into(),
                len,
            });
        }
    }
}

/// A field type a binding can write into.
///
/// Implemented for every `Scalar`, for `Option` of a scalar and for `Vec` of
/// a scalar. Records nest no deeper than that.
pub trait Target {
    /// The kind of field, for diagnostics.
    fn kind() -> Kind;

    /// Writes `value` into `self`.
    ///
    /// `value` is never `Value::Null`; the binder handles that before
    /// getting here. On failure `self` is left as it was and the failure
    /// goes to `sink`.
    fn bind(&mut self, value: &Value, sink: &mut FieldSink<'_>);
}

/// Binds into a scalar slot, collapsing a one-element list to its element.
fn bind_scalar<T: Scalar>(slot: &mut T, value: &Value, sink: &mut FieldSink<'_>) {
    let value = match *value {
        Value::List(ref vs) if vs.len() == 1 => &vs[0],
        Value::List(ref vs) => return sink.ambiguous(vs.len()),
        ref value => value,
    };
    match coerce::<T>(value) {
        Ok(t) => *slot = t,
        Err(err) => sink.fail(err),
    }
}

macro_rules! scalar_target {
    ($($ty:ident)*) => {
        $(
            impl Target for $ty {
                fn kind() -> Kind {
                    <$ty as Scalar>::KIND
                }

                fn bind(&mut self, value: &Value, sink: &mut FieldSink<'_>) {
                    bind_scalar(self, value, sink)
                }
            }
        )*
    };
}

scalar_target!(i8 i16 i32 i64 isize u8 u16 u32 u64 usize f32 f64 bool String);

impl<T: Scalar> Target for Option<T> {
    fn kind() -> Kind {
        T::KIND
    }

    fn bind(&mut self, value: &Value, sink: &mut FieldSink<'_>) {
        let mut slot = T::default();
        let before = sink.failures.len();
        bind_scalar(&mut slot, value, sink);
        // An ambiguous list leaves the slot alone without necessarily
        // recording anything, so only a scalar or singleton counts.
        let bound = match *value {
            Value::List(ref vs) => vs.len() == 1,
            _ => true,
        };
        if bound && sink.failures.len() == before {
            *self = Some(slot);
        }
    }
}

impl<T: Scalar> Target for Vec<T> {
    fn kind() -> Kind {
        Kind::List
    }

    fn bind(&mut self, value: &Value, sink: &mut FieldSink<'_>) {
        match *value {
            Value::List(ref vs) => {
                // A failing element keeps its default so positions line up
                // with the source list.
                let mut out = Vec::with_capacity(vs.len());
                for v in vs {
                    match coerce::<T>(v) {
                        Ok(t) => out.push(t),
                        Err(err) => {
                            sink.fail(err);
                            out.push(T::default());
                        }
                    }
                }
                *self = out;
            }
            Value::Str(_) => sink.fail(CoerceError::UnhandledKind(Kind::List)),
            ref other => sink.fail(CoerceError::Unconvertible {
                from: other.kind(),
                to: Kind::List,
            }),
        }
    }
}
