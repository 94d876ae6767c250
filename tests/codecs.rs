use anyhow::Result;
use ironstream::codec::{Codec, CodecRegistry, SharedCodec, WireValue};
use ironstream::error::{MalformedKind, StreamResult, StreamingError};
use ironstream::utils::{Complex32, Complex64};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

fn codec<T: WireValue>() -> SharedCodec<T> {
    CodecRegistry::default()
        .resolve::<T>()
        .expect("built-in codec")
}

fn decode<T: WireValue>(raw: &str) -> StreamResult<T> {
    codec::<T>().decode(raw.as_bytes())
}

fn encode<T: WireValue>(value: &T) -> String {
    String::from_utf8(codec::<T>().encode(value).expect("encodable")).expect("utf-8")
}

fn kind_of<T: WireValue>(raw: &str) -> Option<MalformedKind> {
    decode::<T>(raw).err().and_then(|e| e.malformed_kind())
}

macro_rules! integer_bounds {
    ($($t:ident),+ $(,)?) => {
        $(
            paste::paste! {
                #[test]
                fn [<integer_bounds_ $t>]() -> Result<()> {
                    assert_eq!(decode::<$t>(&<$t>::MIN.to_string())?, <$t>::MIN);
                    assert_eq!(decode::<$t>(&<$t>::MAX.to_string())?, <$t>::MAX);
                    assert_eq!(encode(&<$t>::MAX), <$t>::MAX.to_string());
                    assert_eq!(kind_of::<$t>(&format!("{}0", <$t>::MAX)), Some(MalformedKind::Range));
                    assert_eq!(kind_of::<$t>("12x"), Some(MalformedKind::Syntax));
                    assert_eq!(kind_of::<$t>(""), Some(MalformedKind::Syntax));
                    Ok(())
                }
            }
        )+
    };
}

integer_bounds!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! unsigned_rejects_negative {
    ($($t:ident),+ $(,)?) => {
        $(
            paste::paste! {
                #[test]
                fn [<negative_is_out_of_range_for_ $t>]() {
                    assert_eq!(kind_of::<$t>("-1"), Some(MalformedKind::Range));
                }

                #[test]
                fn [<plus_sign_is_rejected_for_ $t>]() {
                    assert_eq!(kind_of::<$t>("+5"), Some(MalformedKind::Syntax));
                    assert_eq!(kind_of::<$t>("+"), Some(MalformedKind::Syntax));
                }
            }
        )+
    };
}

unsigned_rejects_negative!(u8, u16, u32, u64, u128, usize);

macro_rules! round_trip {
    ($name:ident: $t:ty => [$($v:expr),+ $(,)?]) => {
        paste::paste! {
            #[test]
            fn [<round_trip_ $name>]() -> Result<()> {
                for v in [$($v),+] {
                    let back: $t = decode(&encode::<$t>(&v))?;
                    assert_eq!(back, v);
                }
                Ok(())
            }
        }
    };
}

macro_rules! signed_round_trip {
    ($($t:ident),+ $(,)?) => {
        $( round_trip!($t: $t => [0, -1, $t::MIN, $t::MAX]); )+
    };
}

macro_rules! unsigned_round_trip {
    ($($t:ident),+ $(,)?) => {
        $( round_trip!($t: $t => [0, 1, $t::MIN, $t::MAX]); )+
    };
}

signed_round_trip!(i8, i16, i32, i64, i128, isize);
unsigned_round_trip!(u8, u16, u32, u64, u128, usize);
round_trip!(f32: f32 => [0.0, -1.0, f32::MIN, f32::MAX, f32::MIN_POSITIVE, f32::EPSILON, 16_777_217.0]);
round_trip!(f64: f64 => [0.0, -1.0, f64::MIN, f64::MAX, f64::MIN_POSITIVE, f64::EPSILON, 0.1 + 0.2]);
round_trip!(complex64: Complex64 => [Complex64::new(0.0, 0.0), Complex64::new(-1.0, -1.0), Complex64::new(f64::MAX, f64::MIN_POSITIVE)]);
round_trip!(complex32: Complex32 => [Complex32::new(1.5, -0.25), Complex32::new(f32::MIN, 1e-30)]);
round_trip!(bool: bool => [true, false]);
round_trip!(string: String => [String::new(), "tab\there".to_string(), "ünïcödé".to_string()]);

#[test]
fn signed_underflow_is_out_of_range() {
    assert_eq!(kind_of::<i8>("-129"), Some(MalformedKind::Range));
    assert_eq!(kind_of::<i64>("-9223372036854775809"), Some(MalformedKind::Range));
}

#[test]
fn signed_integers_accept_a_plus_sign() -> Result<()> {
    assert_eq!(decode::<i8>("+5")?, 5);
    assert_eq!(decode::<i64>("+0")?, 0);
    Ok(())
}

#[test]
fn integer_never_wraps() {
    assert!(decode::<u8>("256").is_err());
    assert!(decode::<i16>("32768").is_err());
}

#[test]
fn bool_spellings() -> Result<()> {
    for text in ["true", "TRUE", "True", "t", "T", "1"] {
        assert!(decode::<bool>(text)?, "{text}");
    }
    for text in ["false", "FALSE", "f", "F", "0"] {
        assert!(!decode::<bool>(text)?, "{text}");
    }
    assert_eq!(kind_of::<bool>("yes"), Some(MalformedKind::Syntax));
    assert_eq!(encode(&true), "true");
    assert_eq!(encode(&false), "false");
    Ok(())
}

#[test]
fn float_text_uses_shortest_round_trip_digits() -> Result<()> {
    assert_eq!(encode(&0.1f64), "0.1");
    assert_eq!(encode(&0.1f32), "0.1");
    assert_eq!(encode(&-2.5f64), "-2.5");
    assert_eq!(decode::<f64>("0.1")?, 0.1);
    assert_eq!(decode::<f32>("1e-3")?, 1e-3f32);
    Ok(())
}

#[test]
fn float_overflow_is_out_of_range() {
    assert_eq!(kind_of::<f32>("3.5e38"), Some(MalformedKind::Range));
    assert_eq!(kind_of::<f64>("1e400"), Some(MalformedKind::Range));
    assert_eq!(kind_of::<f64>("-1e400"), Some(MalformedKind::Range));
    assert_eq!(kind_of::<f64>("1.5.2"), Some(MalformedKind::Syntax));
}

#[test]
fn float_special_values() -> Result<()> {
    assert!(decode::<f64>("inf")?.is_infinite());
    assert!(decode::<f64>("-inf")?.is_sign_negative());
    assert!(decode::<f32>("NaN")?.is_nan());
    assert_eq!(encode(&f64::INFINITY), "inf");
    assert_eq!(encode(&f64::NEG_INFINITY), "-inf");
    assert_eq!(encode(&f64::NAN), "NaN");
    Ok(())
}

#[test]
fn complex_wire_form() -> Result<()> {
    assert_eq!(encode(&Complex64::new(1.0, 2.0)), "(1+2i)");
    assert_eq!(encode(&Complex64::new(1.5, -2.0)), "(1.5-2i)");
    assert_eq!(encode(&Complex32::new(0.0, 0.5)), "(0+0.5i)");

    assert_eq!(decode::<Complex64>("(1+2i)")?, Complex64::new(1.0, 2.0));
    assert_eq!(decode::<Complex64>("1.5-2i")?, Complex64::new(1.5, -2.0));
    assert_eq!(decode::<Complex64>("(1e-3-2e+2i)")?, Complex64::new(1e-3, -200.0));
    assert_eq!(decode::<Complex64>("3")?, Complex64::new(3.0, 0.0));
    assert_eq!(decode::<Complex64>("-2i")?, Complex64::new(0.0, -2.0));
    Ok(())
}

#[test]
fn complex_rejects_malformed_text() {
    assert_eq!(kind_of::<Complex64>("(1+2i"), Some(MalformedKind::Syntax));
    assert_eq!(kind_of::<Complex64>("()"), Some(MalformedKind::Syntax));
    assert_eq!(kind_of::<Complex64>("i"), Some(MalformedKind::Syntax));
    assert_eq!(kind_of::<Complex64>("1+xi"), Some(MalformedKind::Syntax));
    assert_eq!(kind_of::<Complex32>("(1e39+0i)"), Some(MalformedKind::Range));
}

#[test]
fn string_is_verbatim() -> Result<()> {
    assert_eq!(decode::<String>("a b\tc")?, "a b\tc");
    assert_eq!(decode::<String>("")?, "");
    assert_eq!(encode(&"héllo".to_string()), "héllo");
    Ok(())
}

#[test]
fn string_rejects_line_terminator_and_bad_utf8() {
    let err = codec::<String>()
        .encode(&"two\nlines".to_string())
        .unwrap_err();
    assert!(matches!(err, StreamingError::Encode { .. }));

    let err = codec::<String>().decode(&[0x66, 0xff]).unwrap_err();
    assert_eq!(err.malformed_kind(), Some(MalformedKind::Encoding));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Visit {
    page: String,
    hits: u32,
    tags: Vec<String>,
}

#[test]
fn other_types_travel_as_compact_json() -> Result<()> {
    let visit = Visit {
        page: "/home".into(),
        hits: 3,
        tags: vec!["a".into()],
    };
    let text = encode(&visit);
    assert_eq!(text, r#"{"page":"/home","hits":3,"tags":["a"]}"#);
    assert_eq!(decode::<Visit>(&text)?, visit);
    assert_eq!(kind_of::<Visit>("{\"page\":"), Some(MalformedKind::Syntax));
    Ok(())
}

#[test]
fn json_never_emits_newlines() {
    let value = serde_json::json!({"text": "line one\nline two"});
    assert!(!encode(&value).contains('\n'));
}

struct Upper;

impl Codec<String> for Upper {
    fn encode(&self, value: &String) -> StreamResult<Vec<u8>> {
        Ok(value.to_uppercase().into_bytes())
    }

    fn decode(&self, raw: &[u8]) -> StreamResult<String> {
        Ok(String::from_utf8_lossy(raw).to_lowercase())
    }
}

#[test]
fn registered_codec_replaces_builtin() -> Result<()> {
    let mut registry = CodecRegistry::default();
    registry.register::<String, _>(Upper);
    let codec = registry.resolve::<String>().expect("registered");
    assert_eq!(codec.encode(&"abc".to_string())?, b"ABC");
    assert_eq!(codec.decode(b"XyZ")?, "xyz");
    Ok(())
}

#[test]
fn denied_types_do_not_resolve() {
    let mut registry = CodecRegistry::default();
    assert!(registry.resolve::<()>().is_none());
    registry.deny::<Visit>();
    assert!(registry.resolve::<Visit>().is_none());
    assert!(registry.resolve::<Vec<Visit>>().is_some());
}
