//! Property-based tests for the write-then-read guarantee: any tag the model
//! accepts writes to SDL text that reads back to an equal tag.

use chrono::{Duration, FixedOffset, NaiveDate};
use proptest::prelude::*;
use sdlang::{parse, Decimal, Number, SdlDateTime, Tag, TimeSpan, TimeZone, Value};

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_.-]{0,8}".prop_filter("reserved word", |s| {
        !["true", "false", "on", "off", "null"].contains(&s.as_str())
    })
}

fn zone() -> impl Strategy<Value = Option<TimeZone>> {
    prop_oneof![
        Just(None),
        prop::sample::select(vec!["JST", "UTC", "Z", "PST", "ABCDEF"])
            .prop_map(|name| Some(TimeZone::Abbreviation(name.to_string()))),
        (-(23 * 60 + 59)..=(23 * 60 + 59i32))
            .prop_map(|minutes| FixedOffset::east_opt(minutes * 60).map(TimeZone::Offset)),
    ]
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (0i32..=12345, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

fn datetime() -> impl Strategy<Value = Value> {
    (date(), 0u32..24, 0u32..60, 0u32..60, 0u32..1_000_000_000, zone()).prop_map(
        |(date, h, m, s, nanos, zone)| match date.and_hms_nano_opt(h, m, s, nanos) {
            Some(naive) => Value::DateTime(SdlDateTime::new(naive, zone)),
            None => Value::Null,
        },
    )
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::from),
        any::<i64>().prop_map(|l| Value::Number(Number::Long(l))),
        any::<f32>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(|f| Value::Number(Number::Float(f))),
        any::<f64>()
            .prop_filter("finite", |d| d.is_finite())
            .prop_map(|d| Value::Number(Number::Double(d))),
        "-?[0-9]{1,12}(\\.[0-9]{1,6})?".prop_map(|text| {
            text.parse::<Decimal>()
                .map_or(Value::Null, |d| Value::Number(Number::Decimal(d)))
        }),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
        r"[\x00-\x7e\u{e9}\u{65e5}]{0,16}".prop_map(Value::String),
        date().prop_map(Value::Date),
        datetime(),
        (-1_000_000_000i64..1_000_000_000)
            .prop_map(|ms| Value::TimeSpan(TimeSpan::new(Duration::milliseconds(ms)))),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(Value::Binary),
    ]
}

fn leaf() -> impl Strategy<Value = Tag> {
    (
        identifier(),
        prop::option::of(identifier()),
        prop::collection::vec(value(), 0..4),
        prop::collection::vec((identifier(), value()), 0..3),
    )
        .prop_map(|(name, namespace, values, attributes)| {
            let mut tag = match namespace {
                Some(ns) => Tag::with_namespace(&ns, &name).unwrap(),
                None => Tag::new(&name).unwrap(),
            };
            tag.set_values(values).unwrap();
            for (key, value) in attributes {
                tag.set_attribute(&key, value).unwrap();
            }
            tag
        })
}

fn tag() -> impl Strategy<Value = Tag> {
    leaf().prop_recursive(3, 16, 4, |inner| {
        (leaf(), prop::collection::vec(inner, 0..4)).prop_map(|(mut tag, children)| {
            tag.set_children(children);
            tag
        })
    })
}

proptest! {
    #[test]
    fn prop_tag_roundtrip(tag in tag()) {
        let text = tag.to_string();
        let parsed = parse(&text).map_err(|e| TestCaseError::fail(format!("{}\n{}", e, text)))?;
        prop_assert_eq!(parsed.len(), 1);
        prop_assert_eq!(&parsed[0], &tag);
    }

    #[test]
    fn prop_document_roundtrip(tags in prop::collection::vec(tag(), 0..5)) {
        let text = sdlang::to_string(&tags);
        let parsed = parse(&text).unwrap();
        prop_assert_eq!(parsed, tags);
    }

    #[test]
    fn prop_value_list_roundtrip(values in prop::collection::vec(value(), 1..8)) {
        let mut tag = Tag::new("t").unwrap();
        tag.set_values(values.clone()).unwrap();
        let parsed = parse(&tag.to_string()).unwrap();
        let read_back = parsed[0].values();
        prop_assert_eq!(read_back.as_slice(), values.as_slice());
    }

    #[test]
    fn prop_int_text_parses(n in any::<i32>()) {
        let parsed = parse(&format!("n {}", n)).unwrap();
        prop_assert_eq!(parsed[0].value(), Some(&Value::from(n)));
    }

    #[test]
    fn prop_parse_never_panics(input in "\\PC{0,64}") {
        let _ = parse(&input);
    }
}
