//! Binds docopt-style option maps onto typed records.
//!
//! A command line parser in the docopt family hands back a map from keys
//! like `--speed`, `-v` or `<name>` to loosely typed values: booleans for
//! switches, counts, strings and lists of strings. This crate takes such an
//! `OptionMap` and a `Schema` describing a destination record, and fills in
//! every field of the record, converting values to the field types as it
//! goes.
//!
//! Parsing usage strings and matching argv is someone else's job. This
//! crate starts from the finished map.
//!
//! # Field roles
//!
//! Each field binds one key. The key comes from the field's role and bare
//! name, given explicitly or encoded in the field name:
//!
//! | role       | schema method | field name            | key      |
//! |------------|---------------|-----------------------|----------|
//! | argument   | `argument`    | `A_name`, `arg_name`  | `<name>` |
//! | short flag | `short`       | `S_v`, `flag_v`       | `-v`     |
//! | long flag  | `long`        | `L_speed`, `flag_speed` | `--speed` |
//! | command    | `command`     | `C_ship`, `cmd_ship`  | `ship`   |
//!
//! # Conversion
//!
//! A value whose type already is the field's type is assigned as is.
//! Otherwise strings are converted to integers and floats; integer fields
//! also accept a size suffix, so `10K` is `10240` and `3.5k` is `3584`.
//! A list binds to a `Vec` field element by element, and to a scalar field
//! only when it holds exactly one element. `Value::Null` leaves the field
//! alone, which keeps any default the record was created with.
//!
//! # Errors
//!
//! One bad field never stops the others. A bind returns a single `Error`
//! listing every field that could not be populated, while every field that
//! could be populated is.
//!
//! # Example
//!
//! ```rust
//! use docopt_cast::{OptionMap, Schema, Value};
//!
//! #[derive(Default)]
//! struct Args {
//!     min_size: u64,
//!     verbose: bool,
//!     files: Vec<String>,
//! }
//!
//! let schema = Schema::new()
//!     .long("min-size", |a: &mut Args| &mut a.min_size)
//!     .short('v', |a: &mut Args| &mut a.verbose)
//!     .argument("file", |a: &mut Args| &mut a.files);
//!
//! let options: OptionMap = vec![
//!     ("--min-size", Value::from("2M")),
//!     ("-v", Value::from(true)),
//!     ("<file>", Value::from(vec!["a.txt", "b.txt"])),
//! ].into_iter().collect();
//!
//! let mut args = Args::default();
//! schema.bind(&mut args, &options).unwrap();
//! assert_eq!(args.min_size, 2 * 1024 * 1024);
//! assert!(args.verbose);
//! assert_eq!(args.files, vec!["a.txt", "b.txt"]);
//! ```

pub use crate::bind::{bind, Record, Schema};
pub use crate::coerce::{coerce, FieldSink, Kind, Scalar, Target};
pub use crate::errors::{CoerceError, Error, FieldError, Result, SizeError};
pub use crate::field::{Key, Role};
pub use crate::size::{parse_sized, unit_multiplier};
pub use crate::value::{OptionMap, Value};

#[macro_use]
mod utils;

mod bind;
mod coerce;
mod errors;
mod field;
mod size;
mod synonym;
mod value;

#[cfg(test)]
mod test;
