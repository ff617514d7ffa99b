//! Identifier validation and value coercion.
//!
//! Every mutation of a [`Tag`](crate::Tag) routes its input through this
//! module, so a tag can never hold an invalid name or an unsupported value:
//!
//! - [`validate_identifier`] / [`validate_namespace`] check tag names,
//!   namespaces and attribute keys
//! - [`coerce`] maps a host value into a [`Value`] ([`IntoValue`]) and checks
//!   that the result can be written as an SDL literal
//! - [`FromValue`] projects a stored [`Value`] back to a host type
//!
//! ## Conversion Rules
//!
//! | requested | accepted sources |
//! |-----------|------------------|
//! | integers | whole numbers in range, decimal text, `true`/`false` as 1/0 |
//! | floats | any number, numeric text, `true`/`false` as 1.0/0.0 |
//! | `bool` | booleans, numbers (non-zero), the text `true`/`false` |
//! | `String` | anything except `null`, as plain text |
//! | dates | dates, date-times, SDL date text |
//!
//! Strings are never read as truthy: `"8"` converts to `8` but not to `true`.
//!
//! ```rust
//! use sdlang::{coerce, Value};
//!
//! let value = coerce("8").unwrap();
//! assert_eq!(value.convert::<i64>().unwrap(), 8);
//! assert!(value.convert::<bool>().is_err());
//!
//! assert!(coerce(f64::NAN).is_err());
//! ```

use crate::value::{Decimal, Number, SdlDateTime, TimeSpan, TimeZone};
use crate::{Error, Result, Value};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};
use num_bigint::BigInt;

/// Words the lexer reads as literals; they cannot name tags or attributes.
pub(crate) const RESERVED_WORDS: &[&str] = &["true", "false", "on", "off", "null"];

#[inline]
pub(crate) fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

#[inline]
pub(crate) fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.')
}

/// Returns `true` if `s` is a valid SDL identifier.
///
/// # Examples
///
/// ```rust
/// use sdlang::coerce::is_identifier;
///
/// assert!(is_identifier("first_name"));
/// assert!(is_identifier("_x.y-z"));
/// assert!(!is_identifier("2nd"));
/// assert!(!is_identifier("null"));
/// ```
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => {
            chars.all(is_identifier_char) && !RESERVED_WORDS.contains(&s)
        }
        _ => false,
    }
}

/// Validates a tag name or attribute key.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifier`] if `s` is empty, starts with
/// something other than a letter or `_`, contains characters other than
/// letters, digits, `_`, `-` and `.`, or is one of the literal keywords.
pub fn validate_identifier(s: &str) -> Result<&str> {
    if is_identifier(s) {
        Ok(s)
    } else {
        Err(Error::invalid_identifier(s))
    }
}

/// Validates a namespace: empty (no namespace) or an identifier.
pub fn validate_namespace(s: &str) -> Result<&str> {
    if s.is_empty() {
        Ok(s)
    } else {
        validate_identifier(s)
    }
}

/// Host values that can be stored in a tag.
///
/// Types without an implementation are rejected at compile time; the
/// implementations themselves reject values with no SDL representation
/// (for example `u64` values above `i64::MAX`).
pub trait IntoValue {
    fn into_value(self) -> Result<Value>;
}

macro_rules! into_value_via_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Result<Value> {
                    Ok(Value::from(self))
                }
            }
        )*
    };
}

into_value_via_from!(
    bool, i8, i16, i32, i64, u8, u16, u32, char, String, &str, NaiveDate, SdlDateTime, TimeSpan,
    Vec<u8>, &[u8], Decimal, Number,
);

impl IntoValue for &String {
    fn into_value(self) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Result<Value> {
        Ok(self)
    }
}

impl IntoValue for &Value {
    fn into_value(self) -> Result<Value> {
        Ok(self.clone())
    }
}

impl IntoValue for u64 {
    fn into_value(self) -> Result<Value> {
        i64::try_from(self)
            .map(|l| Value::Number(Number::Long(l)))
            .map_err(|_| Error::unsupported_type(format!("{} does not fit in a long", self)))
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Result<Value> {
        (self as u64).into_value()
    }
}

impl IntoValue for isize {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Number(Number::Long(self as i64)))
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Number(Number::Float(self)))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Result<Value> {
        Ok(Value::Number(Number::Double(self)))
    }
}

impl IntoValue for NaiveDateTime {
    fn into_value(self) -> Result<Value> {
        Ok(Value::DateTime(SdlDateTime::local(self)))
    }
}

impl IntoValue for DateTime<FixedOffset> {
    fn into_value(self) -> Result<Value> {
        Ok(Value::DateTime(SdlDateTime::new(
            self.naive_local(),
            Some(TimeZone::Offset(*self.offset())),
        )))
    }
}

impl IntoValue for DateTime<Utc> {
    fn into_value(self) -> Result<Value> {
        Ok(Value::DateTime(SdlDateTime::new(
            self.naive_utc(),
            Some(TimeZone::Abbreviation("UTC".to_string())),
        )))
    }
}

impl IntoValue for Duration {
    fn into_value(self) -> Result<Value> {
        Ok(Value::TimeSpan(TimeSpan::new(self)))
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Result<Value> {
        match self {
            Some(value) => value.into_value(),
            None => Ok(Value::Null),
        }
    }
}

/// Converts `value` into a [`Value`] that can be written as an SDL literal.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for non-finite floats, negative years,
/// leap seconds, unknown zone spellings, zone offsets with a seconds
/// component, and integers outside the `long` range.
pub fn coerce<V: IntoValue>(value: V) -> Result<Value> {
    let value = value.into_value()?;
    check(&value)?;
    Ok(value)
}

fn check(value: &Value) -> Result<()> {
    match value {
        Value::Number(Number::Float(f)) if !f.is_finite() => {
            Err(Error::unsupported_type(format!("non-finite float {}", f)))
        }
        Value::Number(Number::Double(d)) if !d.is_finite() => {
            Err(Error::unsupported_type(format!("non-finite double {}", d)))
        }
        Value::Date(date) => check_date(date),
        Value::DateTime(dt) => {
            check_date(&dt.date())?;
            if dt.time().nanosecond() >= 1_000_000_000 {
                return Err(Error::unsupported_type("leap seconds cannot be written"));
            }
            match dt.zone() {
                Some(TimeZone::Abbreviation(name)) if !TimeZone::is_abbreviation(name) => Err(
                    Error::unsupported_type(format!("invalid time zone abbreviation {:?}", name)),
                ),
                Some(TimeZone::Offset(offset)) if offset.local_minus_utc() % 60 != 0 => Err(
                    Error::unsupported_type("time zone offsets must be whole minutes"),
                ),
                _ => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

fn check_date(date: &NaiveDate) -> Result<()> {
    if date.year() < 0 {
        Err(Error::unsupported_type(format!(
            "year {} is before year 0",
            date.year()
        )))
    } else {
        Ok(())
    }
}

/// Host types a stored [`Value`] can be converted to.
///
/// See the module documentation for the conversion rules.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

fn conversion_error(value: &Value, to: &'static str) -> Error {
    Error::conversion(format!("{} {}", value.kind(), value), to)
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(n.as_f64()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

macro_rules! from_value_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    integer(value)
                        .and_then(|i| <$ty>::try_from(i).ok())
                        .ok_or_else(|| conversion_error(value, stringify!($ty)))
                }
            }
        )*
    };
}

from_value_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        float(value).ok_or_else(|| conversion_error(value, "f64"))
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        float(value)
            .map(|f| f as f32)
            .ok_or_else(|| conversion_error(value, "f32"))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => Ok(n.is_nonzero()),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(conversion_error(value, "bool")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Err(conversion_error(value, "String")),
            other => Ok(other.to_text()),
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y/%m/%d").ok()
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    ["%Y/%m/%d %H:%M:%S%.f", "%Y/%m/%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| parse_date(text).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date()),
            Value::String(s) => parse_date(s),
            _ => None,
        }
        .ok_or_else(|| conversion_error(value, "NaiveDate"))
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::DateTime(dt) => Some(dt.datetime()),
            Value::Date(d) => d.and_hms_opt(0, 0, 0),
            Value::String(s) => parse_datetime(s),
            _ => None,
        }
        .ok_or_else(|| conversion_error(value, "NaiveDateTime"))
    }
}

impl FromValue for SdlDateTime {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::DateTime(dt) => Ok(dt.clone()),
            Value::Date(_) | Value::String(_) => {
                NaiveDateTime::from_value(value).map(SdlDateTime::local)
            }
            _ => Err(conversion_error(value, "SdlDateTime")),
        }
    }
}

impl FromValue for TimeSpan {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_timespan()
            .ok_or_else(|| conversion_error(value, "TimeSpan"))
    }
}

impl FromValue for Duration {
    fn from_value(value: &Value) -> Result<Self> {
        TimeSpan::from_value(value).map(|span| span.duration())
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_binary()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| conversion_error(value, "Vec<u8>"))
    }
}

impl FromValue for Decimal {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Number(Number::Decimal(d)) => Ok(d.clone()),
            Value::Number(Number::Int(i)) => Ok(Decimal::new(BigInt::from(*i), 0)),
            Value::Number(Number::Long(l)) => Ok(Decimal::new(BigInt::from(*l), 0)),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| conversion_error(value, "Decimal")),
            _ => Err(conversion_error(value, "Decimal")),
        }
    }
}

impl FromValue for Number {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_number()
            .cloned()
            .ok_or_else(|| conversion_error(value, "Number"))
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
