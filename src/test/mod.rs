use crate::{OptionMap, Schema, Value};

pub(crate) fn map_from_alist(alist: Vec<(&'static str, Value)>) -> OptionMap {
    alist.into_iter().collect()
}

/// The destination used by most binder tests.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Options {
    pub intval: isize,
    pub uintval: u64,
    pub b: bool,
    pub byteval: u32,
    pub realval: f32,
    pub strval: String,
    pub values: Vec<isize>,
}

pub(crate) fn options_schema() -> Schema<Options> {
    Schema::new()
        .field("L_intval", |o: &mut Options| &mut o.intval)
        .field("L_uintval", |o: &mut Options| &mut o.uintval)
        .field("S_b", |o: &mut Options| &mut o.b)
        .field("L_byteval", |o: &mut Options| &mut o.byteval)
        .field("L_realval", |o: &mut Options| &mut o.realval)
        .field("L_strval", |o: &mut Options| &mut o.strval)
        .field("A_values", |o: &mut Options| &mut o.values)
}

/// What a parser would produce for
/// `--intval -10 --uintval 1000000000000000000 --byteval 3.5k
///  --realval 1.234 -b --strval hello 1 1k`.
pub(crate) fn full_argv() -> OptionMap {
    map_from_alist(vec![
        ("--intval", Value::from("-10")),
        ("--uintval", Value::from("1000000000000000000")),
        ("--byteval", Value::from("3.5k")),
        ("--realval", Value::from("1.234")),
        ("-b", Value::from(true)),
        ("--strval", Value::from("hello")),
        ("<values>", Value::from(vec!["1", "1k"])),
    ])
}

macro_rules! test_size(
    ($name:ident, $input:expr, $expected:expr) => (
        #[test]
        fn $name() {
            assert_eq!(crate::parse_sized($input), $expected);
        }
    );
);

macro_rules! test_coerce(
    ($name:ident, $ty:ty, $value:expr, $expected:expr) => (
        #[test]
        fn $name() {
            let got: $ty = match crate::coerce::<$ty>(&crate::Value::from($value)) {
                Ok(got) => got,
                Err(err) => panic!("{}", err),
            };
            assert_eq!(got, $expected);
        }
    );
);

macro_rules! test_coerce_err(
    ($name:ident, $ty:ty, $value:expr, $expected:expr) => (
        #[test]
        fn $name() {
            match crate::coerce::<$ty>(&crate::Value::from($value)) {
                Ok(got) => panic!("expected an error, got {:?}", got),
                Err(err) => assert_eq!(err.to_string(), $expected),
            }
        }
    );
);

mod bind;
