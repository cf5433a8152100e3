use std::sync::Arc;
use std::thread;

use crate::test::{full_argv, map_from_alist, options_schema, Options};
use crate::{bind, CoerceError, FieldError, Kind, OptionMap, Record, Schema, Value};

fn bind_options(options: &OptionMap) -> (Options, crate::Result<()>) {
    let mut opts = Options::default();
    let res = options_schema().bind(&mut opts, options);
    (opts, res)
}

fn expected_options() -> Options {
    Options {
        intval: -10,
        uintval: 1_000_000_000_000_000_000,
        b: true,
        byteval: 3584,
        realval: 1.234,
        strval: "hello".into(),
        values: vec![1, 1024],
    }
}

#[test]
fn test_full_argv() {
    let (opts, res) = bind_options(&full_argv());
    if let Err(err) = res {
        panic!("{}", err);
    }
    assert_eq!(opts, expected_options());
}

#[test]
fn test_missing_key() {
    let schema = options_schema().field("L_missing", |o: &mut Options| &mut o.strval);
    let mut opts = Options::default();
    let err = schema.bind(&mut opts, &full_argv()).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.failures()[0].key(), Some("--missing"));
    assert!(err.to_string().contains("'--missing' not found"), "{}", err);
    // Every other field still binds.
    assert_eq!(opts, expected_options());
}

#[test]
fn test_null_keeps_default() {
    let mut argv = full_argv();
    argv.insert("--intval", Value::Null);
    argv.insert("<values>", Value::Null);

    let mut opts = Options { intval: 99, values: vec![5], ..Options::default() };
    options_schema().bind(&mut opts, &argv).unwrap();
    assert_eq!(opts.intval, 99);
    assert_eq!(opts.values, vec![5]);
    assert_eq!(opts.strval, "hello");
}

#[test]
fn test_values_as_is() {
    let argv = map_from_alist(vec![
        ("--intval", Value::Null),
        ("--uintval", Value::Null),
        ("-b", Value::from(false)),
        ("--byteval", Value::Null),
        ("--realval", Value::Null),
        ("--strval", Value::from("  spaced out  ")),
        ("<values>", Value::from(Vec::<Value>::new())),
    ]);
    let mut opts = Options { b: true, values: vec![3], ..Options::default() };
    options_schema().bind(&mut opts, &argv).unwrap();
    assert!(!opts.b);
    assert_eq!(opts.strval, "  spaced out  ");
    assert!(opts.values.is_empty());
}

#[test]
fn test_list_fans_out() {
    #[derive(Default)]
    struct Sizes {
        sizes: Vec<u32>,
    }
    let schema = Schema::new().argument("size", |s: &mut Sizes| &mut s.sizes);
    let argv = map_from_alist(vec![("<size>", Value::from(vec!["1", "2K", "x", "4"]))]);

    let mut sizes = Sizes::default();
    let err = schema.bind(&mut sizes, &argv).unwrap_err();
    // The bad element keeps its place, as a zero.
    assert_eq!(sizes.sizes, vec![1, 2048, 0, 4]);
    assert_eq!(
        err.into_failures(),
        vec![FieldError::Convert {
            key: "<size>".into(),
            cause: CoerceError::Invalid {
                value: "x".into(),
                to: Kind::Unsigned(32),
                reason: "invalid digit found in string".into(),
            },
        }],
    );
}

#[test]
fn test_singleton_list_collapses() {
    let mut argv = full_argv();
    argv.insert("--intval", vec!["42"]);
    argv.insert("--strval", vec!["only"]);

    let (opts, res) = bind_options(&argv);
    res.unwrap();
    assert_eq!(opts.intval, 42);
    assert_eq!(opts.strval, "only");
}

#[test]
fn test_ambiguous_list_is_silent() {
    let mut argv = full_argv();
    argv.insert("--intval", vec!["1", "2"]);
    argv.insert("--strval", Vec::<String>::new());

    let mut opts = Options { intval: 7, strval: "keep".into(), ..Options::default() };
    options_schema().bind(&mut opts, &argv).unwrap();
    assert_eq!(opts.intval, 7);
    assert_eq!(opts.strval, "keep");
}

#[test]
fn test_ambiguous_list_reported() {
    let mut argv = full_argv();
    argv.insert("--intval", vec!["1", "2"]);

    let mut opts = Options { intval: 7, ..Options::default() };
    let err = options_schema()
        .report_ambiguous(true)
        .bind(&mut opts, &argv)
        .unwrap_err();
    assert_eq!(opts.intval, 7);
    assert_eq!(
        err.failures(),
        &[FieldError::Ambiguous { key: "--intval".into(), len: 2 }][..],
    );
    assert_eq!(err.to_string(), "'--intval' has 2 values but its field holds exactly one");
}

#[test]
fn test_errors_do_not_short_circuit() {
    let mut argv = full_argv();
    argv.insert("--intval", "ten");
    argv.insert("--byteval", "-1K");
    argv.insert("-b", "yes");

    let (opts, res) = bind_options(&argv);
    let err = res.unwrap_err();
    assert_eq!(
        err.to_string(),
        "could not convert 'ten' to isize: invalid digit found in string (for '--intval')\n\
         unhandled destination kind: bool (for '-b')\n\
         '-1K' is negative, which u32 cannot hold (for '--byteval')",
    );
    let keys: Vec<_> = err.failures().iter().filter_map(|f| f.key()).collect();
    assert_eq!(keys, vec!["--intval", "-b", "--byteval"]);
    // The failing fields keep their zero values, the rest bind.
    assert_eq!(opts, Options {
        intval: 0,
        b: false,
        byteval: 0,
        ..expected_options()
    });
}

#[test]
fn test_bad_field_name_is_recorded() {
    let schema = Schema::new()
        .field("intval", |o: &mut Options| &mut o.intval)
        .field("L_strval", |o: &mut Options| &mut o.strval)
        .long("", |o: &mut Options| &mut o.uintval);
    assert_eq!(schema.keys(), vec!["--strval"]);

    let check = schema.check().unwrap_err();
    assert_eq!(check.len(), 2);

    let mut opts = Options::default();
    let err = schema.bind(&mut opts, &full_argv()).unwrap_err();
    assert_eq!(err, check);
    assert_eq!(
        err.failures()[0].to_string(),
        "field 'intval' is not of the form A_*, S_*, L_*, C_*, arg_*, flag_* or cmd_*",
    );
    assert_eq!(opts.strval, "hello");
}

#[test]
fn test_schema_debug() {
    let schema = Schema::new()
        .field("L_intval", |o: &mut Options| &mut o.intval)
        .short('b', |o: &mut Options| &mut o.b)
        .argument("values", |o: &mut Options| &mut o.values)
        .field("strval", |o: &mut Options| &mut o.strval);
    assert_eq!(
        format!("{:?}", schema),
        "[L_intval: isize <- --intval, -b: bool <- -b, \
          <values>: list <- <values>, strval: string <- ?]",
    );
}

#[test]
fn test_explicit_roles() {
    #[derive(Debug, Default, PartialEq)]
    struct Ship {
        new: bool,
        name: Vec<String>,
        speed: Option<u16>,
        depth: Option<f64>,
        verbose: u64,
    }
    let schema = Schema::new()
        .command("new", |s: &mut Ship| &mut s.new)
        .argument("name", |s: &mut Ship| &mut s.name)
        .long("speed", |s: &mut Ship| &mut s.speed)
        .long("depth", |s: &mut Ship| &mut s.depth)
        .short('v', |s: &mut Ship| &mut s.verbose);
    assert_eq!(schema.keys(), vec!["new", "<name>", "--speed", "--depth", "-v"]);
    schema.check().unwrap();

    let argv = map_from_alist(vec![
        ("new", Value::from(true)),
        ("<name>", Value::from(vec!["Guardian"])),
        ("--speed", Value::from("10")),
        ("--depth", Value::Null),
        ("-v", Value::from("3")),
    ]);
    let mut ship = Ship::default();
    schema.bind(&mut ship, &argv).unwrap();
    assert_eq!(ship, Ship {
        new: true,
        name: vec!["Guardian".into()],
        speed: Some(10),
        depth: None,
        verbose: 3,
    });
}

#[test]
fn test_option_keeps_none_on_failure() {
    #[derive(Default)]
    struct Opt {
        speed: Option<u8>,
    }
    let schema = Schema::new().long("speed", |o: &mut Opt| &mut o.speed);
    let argv = map_from_alist(vec![("--speed", Value::from("1K"))]);
    let mut opt = Opt::default();
    let err = schema.bind(&mut opt, &argv).unwrap_err();
    assert_eq!(opt.speed, None);
    assert_eq!(err.to_string(), "'1K' is out of range for u8 (for '--speed')");
}

#[test]
fn test_scalar_into_list() {
    #[derive(Default)]
    struct Lists {
        names: Vec<String>,
        counts: Vec<i64>,
    }
    let schema = Schema::new()
        .field("arg_name", |l: &mut Lists| &mut l.names)
        .field("flag_count", |l: &mut Lists| &mut l.counts);
    let argv = map_from_alist(vec![
        ("<name>", Value::from("solo")),
        ("--count", Value::from(3i64)),
    ]);
    let mut lists = Lists::default();
    let err = schema.bind(&mut lists, &argv).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unhandled destination kind: list (for '<name>')\n\
         don't know how to convert i64 to list (for '--count')",
    );
    assert!(lists.names.is_empty());
    assert!(lists.counts.is_empty());
}

#[test]
fn test_synonym_binds() {
    #[derive(Default)]
    struct Verbose {
        verbose: bool,
    }
    let schema = Schema::new().field("S_v", |v: &mut Verbose| &mut v.verbose);
    let mut argv = map_from_alist(vec![("--verbose", Value::from(true))]);
    assert!(argv.insert_synonym("-v", "--verbose"));

    let mut verbose = Verbose::default();
    schema.bind(&mut verbose, &argv).unwrap();
    assert!(verbose.verbose);
}

#[test]
fn test_counted_flag() {
    #[derive(Default)]
    struct Counted {
        verbose: i64,
        quiet: u8,
    }
    let schema = Schema::new()
        .short('v', |c: &mut Counted| &mut c.verbose)
        .short('q', |c: &mut Counted| &mut c.quiet);
    let argv = map_from_alist(vec![("-v", Value::from(3i64)), ("-q", Value::from(1i64))]);
    let mut counted = Counted::default();
    let err = schema.bind(&mut counted, &argv).unwrap_err();
    assert_eq!(counted.verbose, 3);
    assert_eq!(counted.quiet, 0);
    assert_eq!(err.to_string(), "don't know how to convert i64 to u8 (for '-q')");
}

#[test]
fn test_counted_flag_into_isize() {
    #[derive(Default)]
    struct Counted {
        verbose: isize,
    }
    let schema = Schema::new().short('v', |c: &mut Counted| &mut c.verbose);
    let argv = map_from_alist(vec![("-v", Value::from(3i64))]);
    let mut counted = Counted::default();
    let err = schema.bind(&mut counted, &argv).unwrap_err();
    assert_eq!(counted.verbose, 0);
    assert_eq!(err.to_string(), "don't know how to convert i64 to isize (for '-v')");
}

impl Record for Options {
    fn schema() -> Schema<Options> {
        options_schema()
    }
}

#[test]
fn test_record() {
    let mut opts = Options::default();
    bind(&mut opts, &full_argv()).unwrap();
    assert_eq!(opts, expected_options());
}

#[test]
fn test_shared_across_threads() {
    let schema = Arc::new(options_schema());
    let argv = Arc::new(full_argv());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let (schema, argv) = (schema.clone(), argv.clone());
            thread::spawn(move || {
                let mut opts = Options::default();
                schema.bind(&mut opts, &argv).map(|_| opts)
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap().unwrap(), expected_options());
    }
}
