use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::iter::FromIterator;

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::coerce::Kind;
use crate::synonym::SynonymMap;

use self::Value::{Bool, Float, Int, List, Null, Str};

/// A dynamically typed value produced by an option parser.
///
/// The variants cover what a docopt-style parser hands back: booleans for
/// switches, integers for counted repetitions, strings for flag and
/// positional arguments, and lists for repeated ones. `Null` means the key
/// is known but nothing was given for it.
///
/// The `as_{bool,count,str,vec}` methods give lenient access without
/// destructuring manually.
///
/// Deserializing an integer that does not fit in an `i64` is an error.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Known key, no value given.
    Null,

    /// A switch: present or not.
    Bool(bool),

    /// A count of repetitions, or any other integer.
    Int(i64),

    Float(f64),

    /// A positional or flag argument, always as the user typed it.
    Str(String),

    /// Repeated arguments, in the order given.
    List(Vec<Value>),
}

impl Value {
    /// The kind of this value, for diagnostics.
    pub fn kind(&self) -> Kind {
        match *self {
            Null => Kind::Null,
            Bool(_) => Kind::Bool,
            Int(_) => Kind::Signed(64),
            Float(_) => Kind::Float(64),
            Str(_) => Kind::Str,
            List(_) => Kind::List,
        }
    }

    pub fn is_null(&self) -> bool {
        *self == Null
    }

    /// Returns the value as a bool.
    ///
    /// Integers are `false` if `0` and `true` otherwise.
    /// Strings are `true`, `Null` is `false`.
    /// Lists are `true` if non-empty and `false` otherwise.
    pub fn as_bool(&self) -> bool {
        match *self {
            Null => false,
            Bool(b) => b,
            Int(n) => n != 0,
            Float(n) => n != 0.0,
            Str(_) => true,
            List(ref vs) => !vs.is_empty(),
        }
    }

    /// Returns the value as a count of the number of times it occurred.
    ///
    /// Booleans are `1` if `true` and `0` otherwise.
    /// Strings are `1` and `Null` is `0`.
    /// Lists correspond to their length.
    pub fn as_count(&self) -> u64 {
        match *self {
            Null => 0,
            Bool(b) => if b { 1 } else { 0 },
            Int(n) => if n < 0 { 0 } else { n as u64 },
            Float(_) | Str(_) => 1,
            List(ref vs) => vs.len() as u64,
        }
    }

    /// Returns the value as a string.
    ///
    /// Everything but a string is the empty string.
    pub fn as_str(&self) -> &str {
        match *self {
            Str(ref s) => s,
            Null | Bool(_) | Int(_) | Float(_) | List(_) => "",
        }
    }

    /// Returns the value as a list of strings.
    ///
    /// A string is a list of length `1`; a list keeps its string elements.
    /// Everything else is an empty list.
    pub fn as_vec(&self) -> Vec<&str> {
        match *self {
            Str(ref s) => vec![&**s],
            List(ref vs) => vs
                .iter()
                .filter_map(|v| match *v {
                    Str(ref s) => Some(&**s),
                    _ => None,
                })
                .collect(),
            Null | Bool(_) | Int(_) | Float(_) => vec![],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Null => write!(f, "null"),
            Bool(b) => write!(f, "{}", b),
            Int(n) => write!(f, "{}", n),
            Float(n) => write!(f, "{}", n),
            Str(ref s) => write!(f, "{:?}", s),
            List(ref vs) => {
                write!(f, "[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

macro_rules! value_from_int {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Value {
                    Int(n as i64)
                }
            }
        )*
    };
}

value_from_int!(i8 i16 i32 i64 u8 u16 u32);

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(de: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("null, a bool, a number, a string or a list of those")
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Null)
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Null)
            }

            fn visit_some<D>(self, de: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Value::deserialize(de)
            }

            fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
                Ok(Bool(b))
            }

            fn visit_i64<E>(self, n: i64) -> Result<Value, E> {
                Ok(Int(n))
            }

            fn visit_u64<E>(self, n: u64) -> Result<Value, E>
            where
                E: de::Error,
            {
                if n > i64::MAX as u64 {
                    return Err(E::custom(format!("integer {} is out of range for i64", n)));
                }
                Ok(Int(n as i64))
            }

            fn visit_f64<E>(self, n: f64) -> Result<Value, E> {
                Ok(Float(n))
            }

            fn visit_str<E>(self, s: &str) -> Result<Value, E> {
                Ok(Str(s.into()))
            }

            fn visit_string<E>(self, s: String) -> Result<Value, E> {
                Ok(Str(s))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut vs = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(v) = seq.next_element()? {
                    vs.push(v);
                }
                Ok(List(vs))
            }
        }

        de.deserialize_any(ValueVisitor)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Bool(b)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Value {
        Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Float(n)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Value {
        Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(vs: Vec<T>) -> Value {
        List(vs.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        v.map_or(Null, Into::into)
    }
}

/// A map of option keys to the values a parser matched for them.
///
/// The keys are just as specified in docopt: `--flag` for a long flag or
/// `-f` for a short flag. (If `-f` is a synonym for `--flag`, then either
/// key will work.) `ARG` or `<arg>` specify a positional argument and `cmd`
/// specifies a command.
///
/// The map is read-only while a bind runs, so one map can be bound into any
/// number of records, from any number of threads.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct OptionMap {
    map: SynonymMap<String, Value>,
}

impl OptionMap {
    pub fn new() -> OptionMap {
        OptionMap { map: SynonymMap::new() }
    }

    /// Inserts a value under a canonical key, returning the previous value.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.map.insert(key.into(), value.into())
    }

    /// Makes `from` another name for `to`, e.g. `-v` for `--verbose`.
    ///
    /// Returns `false` if `to` is not in the map or `from` already is.
    pub fn insert_synonym<F, T>(&mut self, from: F, to: T) -> bool
    where
        F: Into<String>,
        T: Into<String>,
    {
        self.map.insert_synonym(from.into(), to.into())
    }

    /// Return the raw value corresponding to some `key`.
    ///
    /// `key` should be a string in the traditional docopt format. e.g.,
    /// `<arg>` or `--flag`.
    pub fn find(&self, key: &str) -> Option<&Value> {
        self.map.find(&key.to_owned())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(&key.to_owned())
    }

    /// Finds the value corresponding to `key` and calls `as_bool()` on it.
    /// If the key does not exist, `false` is returned.
    pub fn get_bool(&self, key: &str) -> bool {
        self.find(key).map_or(false, |v| v.as_bool())
    }

    /// Finds the value corresponding to `key` and calls `as_count()` on it.
    /// If the key does not exist, `0` is returned.
    pub fn get_count(&self, key: &str) -> u64 {
        self.find(key).map_or(0, |v| v.as_count())
    }

    /// Finds the value corresponding to `key` and calls `as_str()` on it.
    /// If the key does not exist, `""` is returned.
    pub fn get_str(&self, key: &str) -> &str {
        self.find(key).map_or("", |v| v.as_str())
    }

    /// Finds the value corresponding to `key` and calls `as_vec()` on it.
    /// If the key does not exist, `vec!()` is returned.
    pub fn get_vec(&self, key: &str) -> Vec<&str> {
        self.find(key).map(|v| v.as_vec()).unwrap_or_default()
    }

    /// Canonical keys, sorted. Synonyms are not included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(|k| &**k)
    }

    /// Every name lookups accept: canonical keys and synonyms.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().chain(self.map.synonyms().map(|(from, _)| from)).map(|k| &**k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.map.iter().map(|(k, v)| (&**k, v))
    }

    /// Return the number of values, not including synonyms.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OptionMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> OptionMap {
        OptionMap {
            map: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<BTreeMap<String, Value>> for OptionMap {
    fn from(map: BTreeMap<String, Value>) -> OptionMap {
        map.into_iter().collect()
    }
}

impl From<HashMap<String, Value>> for OptionMap {
    fn from(map: HashMap<String, Value>) -> OptionMap {
        map.into_iter().collect()
    }
}

impl From<OptionMap> for BTreeMap<String, Value> {
    fn from(options: OptionMap) -> BTreeMap<String, Value> {
        options.map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl fmt::Debug for OptionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{{EMPTY}}");
        }

        // Group synonyms with the key they stand for. Keys are already
        // sorted by the underlying map.
        let mut reverse: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (from, to) in self.map.synonyms() {
            reverse.entry(&**to).or_insert_with(Vec::new).push(&**from);
        }
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match reverse.get(k) {
                None => write!(f, "{} => {:?}", k, v)?,
                Some(syns) => write!(f, "{}, {} => {:?}", syns.join(", "), k, v)?,
            }
        }
        Ok(())
    }
}
