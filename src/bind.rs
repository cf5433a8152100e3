//! Binding option maps onto typed records.
//!
//! A `Schema` lists a record's fields, each with the option key it reads
//! and an accessor to the field. Binding visits every field in declaration
//! order and collects all failures into one `Error`.

use std::fmt;

use log::{debug, trace};
use strsim::levenshtein;

use crate::coerce::{FieldSink, Kind, Target};
use crate::errors::{Error, FieldError, Result};
use crate::field::{Key, Role};
use crate::value::{OptionMap, Value};

/// A destination record with a fixed schema.
///
/// ### Example
///
/// ```rust
/// use docopt_cast::{bind, OptionMap, Record, Schema};
///
/// #[derive(Debug, Default)]
/// struct Args {
///     speed: u32,
///     drifting: bool,
///     names: Vec<String>,
/// }
///
/// impl Record for Args {
///     fn schema() -> Schema<Args> {
///         Schema::new()
///             .field("L_speed", |a: &mut Args| &mut a.speed)
///             .field("L_drifting", |a: &mut Args| &mut a.drifting)
///             .field("A_name", |a: &mut Args| &mut a.names)
///     }
/// }
///
/// let mut options = OptionMap::new();
/// options.insert("--speed", "10K");
/// options.insert("--drifting", true);
/// options.insert("<name>", vec!["Guardian", "Lotus"]);
///
/// let mut args = Args::default();
/// bind(&mut args, &options).unwrap();
/// assert_eq!(args.speed, 10240);
/// assert!(args.drifting);
/// assert_eq!(args.names, vec!["Guardian", "Lotus"]);
/// ```
pub trait Record: Sized + 'static {
    fn schema() -> Schema<Self>;
}

/// Binds `options` into `dest` using `R`'s schema.
///
/// This builds the schema on every call. Keep a `Schema` around and call
/// `Schema::bind` directly to bind many times.
pub fn bind<R: Record>(dest: &mut R, options: &OptionMap) -> Result<()> {
    R::schema().bind(dest, options)
}

type Setter<R> = Box<dyn Fn(&mut R, &Value, &mut FieldSink<'_>) + Send + Sync>;

/// One destination field: where its value comes from and how to store it.
struct Binding<R> {
    field: String,
    key: ::std::result::Result<Key, FieldError>,
    kind: Kind,
    set: Setter<R>,
}

/// The fields of a destination record, in declaration order.
///
/// A schema is built once, then used to bind any number of option maps.
/// Fields are declared with an accessor returning a mutable reference to
/// the field, either with an explicit role (`argument`, `short`, `long`,
/// `command`) or with a name that encodes the role (`field`).
pub struct Schema<R> {
    bindings: Vec<Binding<R>>,
    report_ambiguous: bool,
    suggest: bool,
}

impl<R: 'static> Schema<R> {
    pub fn new() -> Schema<R> {
        Schema {
            bindings: vec![],
            report_ambiguous: false,
            suggest: true,
        }
    }

    /// Declares a field whose name encodes its role.
    ///
    /// See `Key::from_field_name` for the naming schemes. A name that does
    /// not decode is not rejected here: it is reported by `check` and by
    /// every `bind`, and the field is skipped.
    pub fn field<T, F>(self, name: &str, access: F) -> Schema<R>
    where
        T: Target + 'static,
        F: Fn(&mut R) -> &mut T,
        F: Send + Sync + 'static,
    {
        let key = Key::from_field_name(name);
        self.push(name.into(), key, access)
    }

    /// Declares a positional argument field, bound from `<name>`.
    pub fn argument<T, F>(self, name: &str, access: F) -> Schema<R>
    where
        T: Target + 'static,
        F: Fn(&mut R) -> &mut T,
        F: Send + Sync + 'static,
    {
        self.with_role(Role::Argument, name, access)
    }

    /// Declares a short flag field, bound from `-c`.
    pub fn short<T, F>(self, flag: char, access: F) -> Schema<R>
    where
        T: Target + 'static,
        F: Fn(&mut R) -> &mut T,
        F: Send + Sync + 'static,
    {
        self.with_role(Role::Short, &flag.to_string(), access)
    }

    /// Declares a long flag field, bound from `--name`.
    pub fn long<T, F>(self, name: &str, access: F) -> Schema<R>
    where
        T: Target + 'static,
        F: Fn(&mut R) -> &mut T,
        F: Send + Sync + 'static,
    {
        self.with_role(Role::Long, name, access)
    }

    /// Declares a command field, bound from `name`.
    pub fn command<T, F>(self, name: &str, access: F) -> Schema<R>
    where
        T: Target + 'static,
        F: Fn(&mut R) -> &mut T,
        F: Send + Sync + 'static,
    {
        self.with_role(Role::Command, name, access)
    }

    fn with_role<T, F>(self, role: Role, name: &str, access: F) -> Schema<R>
    where
        T: Target + 'static,
        F: Fn(&mut R) -> &mut T,
        F: Send + Sync + 'static,
    {
        let key = Key::new(role, name).ok_or_else(|| FieldError::Resolve {
            field: name.into(),
        });
        let field = match key {
            Ok(ref key) => key.to_string(),
            Err(_) => name.into(),
        };
        self.push(field, key, access)
    }

    fn push<T, F>(
        mut self,
        field: String,
        key: ::std::result::Result<Key, FieldError>,
        access: F,
    ) -> Schema<R>
    where
        T: Target + 'static,
        F: Fn(&mut R) -> &mut T,
        F: Send + Sync + 'static,
    {
        self.bindings.push(Binding {
            field,
            key,
            kind: T::kind(),
            set: Box::new(move |dest: &mut R, value: &Value, sink: &mut FieldSink<'_>| {
                access(dest).bind(value, sink)
            }),
        });
        self
    }

    /// Enables reporting of lists bound to scalar fields.
    ///
    /// A scalar field takes a list only when the list has exactly one
    /// element. Otherwise the field is left as it is, and by default nothing
    /// is reported. When enabled, a `FieldError::Ambiguous` is recorded too.
    pub fn report_ambiguous(mut self, yes: bool) -> Schema<R> {
        self.report_ambiguous = yes;
        self
    }

    /// Enables "did you mean" suggestions for missing keys.
    ///
    /// Enabled by default.
    pub fn suggest(mut self, yes: bool) -> Schema<R> {
        self.suggest = yes;
        self
    }

    /// The resolved option keys, in declaration order.
    ///
    /// Fields whose names do not decode are left out.
    pub fn keys(&self) -> Vec<String> {
        self.bindings
            .iter()
            .filter_map(|b| b.key.as_ref().ok().map(|k| k.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Reports every field whose name does not decode, without binding.
    pub fn check(&self) -> Result<()> {
        let failures: Vec<FieldError> = self
            .bindings
            .iter()
            .filter_map(|b| b.key.as_ref().err().cloned())
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::new(failures))
        }
    }

    /// Populates `dest` from `options`.
    ///
    /// Fields are visited in declaration order. A field whose key maps to
    /// `Value::Null` keeps whatever value it had. Every failure is recorded
    /// and the remaining fields are still bound, so on error `dest` holds
    /// everything that could be bound and the error lists everything that
    /// could not.
    pub fn bind(&self, dest: &mut R, options: &OptionMap) -> Result<()> {
        let mut failures = vec![];
        for b in &self.bindings {
            let key = match b.key {
                Ok(ref key) => key.to_string(),
                Err(ref err) => {
                    failures.push(err.clone());
                    continue;
                }
            };
            trace!("binding field '{}' ({}) from '{}'", b.field, b.kind, key);
            let value = match options.find(&key) {
                Some(value) => value,
                None => {
                    let suggestion = if self.suggest {
                        suggest_key(&key, options)
                    } else {
                        None
                    };
                    failures.push(FieldError::MissingKey { key, suggestion });
                    continue;
                }
            };
            if value.is_null() {
                debug!("'{}' is null, leaving field '{}' unchanged", key, b.field);
                continue;
            }
            let mut sink = FieldSink::new(&key, self.report_ambiguous, &mut failures);
            (b.set)(dest, value, &mut sink);
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::new(failures))
        }
    }
}

impl<R: 'static> Default for Schema<R> {
    fn default() -> Schema<R> {
        Schema::new()
    }
}

impl<R> fmt::Debug for Schema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for b in &self.bindings {
            match b.key {
                Ok(ref key) => list.entry(&format_args!("{}: {} <- {}", b.field, b.kind, key)),
                Err(_) => list.entry(&format_args!("{}: {} <- ?", b.field, b.kind)),
            };
        }
        list.finish()
    }
}

/// Finds the key in `options` closest to `key`, if any is close enough to
/// be a likely typo.
fn suggest_key(key: &str, options: &OptionMap) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;
    for name in options.names() {
        let dist = levenshtein(key, name);
        if dist < 3 && best.map_or(true, |(d, _)| dist < d) {
            best = Some((dist, name));
        }
    }
    best.map(|(_, name)| name.to_owned())
}
