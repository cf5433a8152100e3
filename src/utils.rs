//! Utilities that needed a home.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A regex compiled on first use.
pub(crate) type LazyRegex = Lazy<Regex>;

/// Declares lazily compiled regex statics.
///
/// The patterns are literals owned by this crate, so a compile failure is a
/// bug here rather than something a caller can provoke.
macro_rules! decl_regex {
    ($($name:ident : $re:literal; )*) => {
        $(
            static $name: $crate::utils::LazyRegex =
                ::once_cell::sync::Lazy::new(|| {
                    ::regex::Regex::new($re).expect(concat!("invalid regex: ", $re))
                });
        )*
    };
}

pub(crate) fn cap_or_empty<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}
