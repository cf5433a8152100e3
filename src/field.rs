//! Mapping between destination fields and option keys.
//!
//! Every field binds one option. Which option is decided by the field's
//! role and its bare name: a positional argument `<name>`, a short flag
//! `-n`, a long flag `--name` or a command `name`.

use std::fmt;

use regex::Captures;

use crate::errors::FieldError;
use crate::utils::cap_or_empty;

decl_regex! {
    PREFIXED: r"^(?P<role>[ASLC])_(?P<name>.+)$";
    DOCOPT: r"^(?P<role>arg|flag|cmd)_(?P<name>.+)$";
    UPPER: r"^\p{Lu}+$";
    KEY: r"^(?:--?(?P<flag>\S+)|(?:(?P<argu>\p{Lu}+)|<(?P<argb>[^>]+)>)|(?P<cmd>\S+))$";
}

/// What kind of option a field binds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// A positional argument, `<name>` (or `NAME`).
    Argument,
    /// A single dash flag, `-n`.
    Short,
    /// A double dash flag, `--name`.
    Long,
    /// A command word, `name`.
    Command,
}

/// The option key a field binds, as a role plus a bare name.
///
/// `Display` gives the key as it appears in an option map.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    role: Role,
    name: String,
    /// Positional arguments written `NAME` rather than `<name>`.
    bare: bool,
}

impl Key {
    /// Builds a key, or `None` when `name` is empty.
    pub fn new<S: Into<String>>(role: Role, name: S) -> Option<Key> {
        let name = name.into();
        if name.is_empty() {
            return None;
        }
        Some(Key { role, name, bare: false })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The bare name, without any dashes or angle brackets.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decodes a destination field name into a key.
    ///
    /// Two naming schemes are understood.
    ///
    /// * `A_`, `S_`, `L_` and `C_` prefixes mark an argument, a short flag,
    ///   a long flag and a command. The rest of the name is used verbatim,
    ///   so `L_minsize` binds `--minsize`.
    /// * docopt's `arg_`, `flag_` and `cmd_` prefixes. Underscores in the
    ///   rest become dashes, `flag_` is a short flag when one character
    ///   follows and a long flag otherwise, and an uppercase `arg_` name
    ///   binds the `NAME` form of a positional. So `flag_min_size` binds
    ///   `--min-size`, `flag_v` binds `-v` and `arg_FILE` binds `FILE`.
    ///
    /// Anything else, including a prefix with nothing after it, is a
    /// `FieldError::Resolve`.
    pub fn from_field_name(field: &str) -> Result<Key, FieldError> {
        if let Some(caps) = PREFIXED.captures(field) {
            return Ok(Key::from_prefixed(&caps));
        }
        if let Some(caps) = DOCOPT.captures(field) {
            return Ok(Key::from_docopt(&caps));
        }
        Err(FieldError::Resolve { field: field.into() })
    }

    fn from_prefixed(caps: &Captures<'_>) -> Key {
        let role = match cap_or_empty(caps, "role") {
            "A" => Role::Argument,
            "S" => Role::Short,
            "L" => Role::Long,
            _ => Role::Command,
        };
        Key {
            role,
            name: cap_or_empty(caps, "name").into(),
            bare: false,
        }
    }

    fn from_docopt(caps: &Captures<'_>) -> Key {
        let name = cap_or_empty(caps, "name").replace('_', "-");
        let (role, bare) = match cap_or_empty(caps, "role") {
            "flag" if name.chars().count() == 1 => (Role::Short, false),
            "flag" => (Role::Long, false),
            "arg" => (Role::Argument, UPPER.is_match(&name)),
            _ => (Role::Command, false),
        };
        Key { role, name, bare }
    }

    /// Parses an option key, such as `--min-size` or `<file>`.
    ///
    /// Returns `None` for the empty string.
    pub fn parse(key: &str) -> Option<Key> {
        let caps = KEY.captures(key)?;
        let (flag, cmd) = (cap_or_empty(&caps, "flag"), cap_or_empty(&caps, "cmd"));
        let (argu, argb) = (cap_or_empty(&caps, "argu"), cap_or_empty(&caps, "argb"));
        let (role, name, bare) = if !flag.is_empty() {
            let role = if key.starts_with("--") { Role::Long } else { Role::Short };
            (role, flag, false)
        } else if !argu.is_empty() {
            (Role::Argument, argu, true)
        } else if !argb.is_empty() {
            (Role::Argument, argb, false)
        } else {
            (Role::Command, cmd, false)
        };
        Some(Key { role, name: name.into(), bare })
    }

    /// Converts this key to a docopt style struct field name.
    ///
    /// This makes a half-hearted attempt at making the key a valid struct
    /// field name (like replacing `-` with `_`), but it does not otherwise
    /// guarantee that the result is a valid identifier.
    pub fn to_field_name(&self) -> String {
        let prefix = match self.role {
            Role::Argument => "arg_",
            Role::Short | Role::Long => "flag_",
            Role::Command => "cmd_",
        };
        let mut field = prefix.to_owned();
        field.push_str(&self.name.replace('-', "_"));
        field
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Role::Argument if self.bare => write!(f, "{}", self.name),
            Role::Argument => write!(f, "<{}>", self.name),
            Role::Short => write!(f, "-{}", self.name),
            Role::Long => write!(f, "--{}", self.name),
            Role::Command => write!(f, "{}", self.name),
        }
    }
}
