//! Error types for binding option maps onto records.
use std::error::Error as StdError;
use std::fmt;
use std::result;

use crate::coerce::Kind;

/// The aggregate error returned by a bind.
///
/// Binding never stops at the first bad field. Every field that could not be
/// populated contributes one `FieldError`, in the order the fields were
/// declared, and every field that could be populated is.
///
/// The `Display` form is the human readable report: one line per failure and
/// no trailing newline. Callers that want to branch on specific failures can
/// walk `failures()` instead.
///
/// ### Example
///
/// ```rust
/// use docopt_cast::{OptionMap, Schema};
///
/// #[derive(Default)]
/// struct Args {
///     count: u32,
/// }
///
/// let schema = Schema::new().long("count", |a: &mut Args| &mut a.count);
/// let options: OptionMap = vec![("--cuont", "3")].into_iter().collect();
///
/// let mut args = Args::default();
/// let err = schema.bind(&mut args, &options).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "'--count' not found in option map. Did you mean '--cuont'?",
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    failures: Vec<FieldError>,
}

impl Error {
    pub(crate) fn new(failures: Vec<FieldError>) -> Error {
        Error { failures }
    }

    /// Every field level failure, in field declaration order.
    pub fn failures(&self) -> &[FieldError] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<FieldError> {
        self.failures
    }

    /// The number of failures recorded.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Short result type alias.
pub type Result<T> = result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.failures.first().map(|e| e as &(dyn StdError + 'static))
    }
}

/// Why a single destination field could not be populated.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// The declared field name does not decode to a role and a bare name.
    ///
    /// This can only come from `Schema::field`, which parses the name. It is
    /// also reported up front by `Schema::check`.
    Resolve {
        field: String,
    },

    /// The option key built for the field is not in the option map.
    ///
    /// `suggestion` is the closest key that is in the map, if one is close
    /// enough to be a likely typo.
    MissingKey {
        key: String,
        suggestion: Option<String>,
    },

    /// The value was present but could not be coerced into the field's type.
    Convert {
        key: String,
        cause: CoerceError,
    },

    /// A list of `len` values was bound to a scalar field.
    ///
    /// Only reported when the schema opts in with `report_ambiguous(true)`.
    /// Otherwise the field is silently left alone.
    Ambiguous {
        key: String,
        len: usize,
    },
}

impl FieldError {
    /// The option key this failure concerns, when one could be built.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Resolve { .. } => None,
            Self::MissingKey { ref key, .. }
            | Self::Convert { ref key, .. }
            | Self::Ambiguous { ref key, .. } => Some(key),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve { ref field } => write!(
                f,
                "field '{}' is not of the form A_*, S_*, L_*, C_*, \
                 arg_*, flag_* or cmd_*",
                field
            ),
            Self::MissingKey { ref key, suggestion: None } => {
                write!(f, "'{}' not found in option map.", key)
            }
            Self::MissingKey { ref key, suggestion: Some(ref s) } => write!(
                f,
                "'{}' not found in option map. Did you mean '{}'?",
                key, s
            ),
            Self::Convert { ref key, ref cause } => {
                write!(f, "{} (for '{}')", cause, key)
            }
            Self::Ambiguous { ref key, len } => write!(
                f,
                "'{}' has {} values but its field holds exactly one",
                key, len
            ),
        }
    }
}

impl StdError for FieldError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Convert { ref cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Why a single value could not be coerced into a target type.
#[derive(Clone, Debug, PartialEq)]
pub enum CoerceError {
    /// The string is not a valid literal for the target type.
    Invalid {
        value: String,
        to: Kind,
        reason: String,
    },

    /// The value is a valid number but does not fit the target type.
    Overflow {
        value: String,
        to: Kind,
    },

    /// A size-suffixed value came out negative for an unsigned target.
    Negative {
        value: String,
        to: Kind,
    },

    /// Strings cannot be converted into this kind of destination.
    UnhandledKind(Kind),

    /// Only strings are converted; any other mismatched pairing lands here.
    Unconvertible {
        from: Kind,
        to: Kind,
    },
}

impl fmt::Display for CoerceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { ref value, to, ref reason } => write!(
                f,
                "could not convert '{}' to {}: {}",
                value, to, reason
            ),
            Self::Overflow { ref value, to } => {
                write!(f, "'{}' is out of range for {}", value, to)
            }
            Self::Negative { ref value, to } => {
                write!(f, "'{}' is negative, which {} cannot hold", value, to)
            }
            Self::UnhandledKind(kind) => {
                write!(f, "unhandled destination kind: {}", kind)
            }
            Self::Unconvertible { from, to } => {
                write!(f, "don't know how to convert {} to {}", from, to)
            }
        }
    }
}

impl StdError for CoerceError {}

/// Failure of the size-suffix grammar.
#[derive(Clone, Debug, PartialEq)]
pub enum SizeError {
    /// The last character is not one of `B`, `K`, `M`, `G` or `T`.
    ///
    /// The grammar does not apply, so callers report whatever error made
    /// them try it in the first place.
    NoUnit,

    /// A unit was found but the rest is neither an integer nor a decimal.
    Number {
        value: String,
        reason: String,
    },

    /// The scaled magnitude does not fit in an `i64`.
    Overflow {
        value: String,
    },
}

impl fmt::Display for SizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoUnit => write!(f, "no size unit (B, K, M, G or T)"),
            Self::Number { ref value, ref reason } => {
                write!(f, "invalid size '{}': {}", value, reason)
            }
            Self::Overflow { ref value } => {
                write!(f, "size '{}' does not fit in 64 bits", value)
            }
        }
    }
}

impl StdError for SizeError {}
