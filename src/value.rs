//! Literal values carried by SDL tags.
//!
//! This module provides the [`Value`] enum, the closed set of scalar kinds an
//! SDL tag can hold as a value or attribute value, together with the
//! supporting literal types:
//!
//! - [`Number`]: `int`, `long`, `float`, `double` and `decimal` literals
//! - [`Decimal`]: an arbitrary-precision decimal (`12.50BD`)
//! - [`SdlDateTime`] and [`TimeZone`]: a date-time with an optional zone
//! - [`TimeSpan`]: a signed duration (`2d:12:30:00`)
//!
//! ## Canonical Text
//!
//! `Display` on a [`Value`] renders the canonical SDL literal, which the
//! parser reads back to an equal value:
//!
//! ```rust
//! use sdlang::{Number, Value};
//!
//! assert_eq!(Value::from("hi").to_string(), "\"hi\"");
//! assert_eq!(Value::from(4).to_string(), "4");
//! assert_eq!(Value::Number(Number::Long(4)).to_string(), "4L");
//! assert_eq!(Value::Number(Number::Double(4.0)).to_string(), "4.0");
//! ```
//!
//! [`Value::to_text`] gives the plain textual form used for XML output and for
//! string conversion (`"hi"` becomes `hi`, `4L` becomes `4`).
//!
//! ## Extracting Values
//!
//! ```rust
//! use sdlang::Value;
//!
//! let value = Value::from("8");
//! assert_eq!(value.convert::<i32>().unwrap(), 8);
//! assert_eq!(value.convert_or(false), false);
//! ```

use crate::coerce::FromValue;
use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single SDL literal.
///
/// Raw (backtick) and quoted strings both parse to [`Value::String`]; the
/// distinction only exists in source text.
///
/// # Examples
///
/// ```rust
/// use sdlang::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Int(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(NaiveDate),
    DateTime(SdlDateTime),
    TimeSpan(TimeSpan),
    Binary(Vec<u8>),
}

/// A numeric literal.
///
/// The variant records the literal's declared width, so `4`, `4L`, `4.0F`,
/// `4.0` and `4BD` are five distinct values.
///
/// # Examples
///
/// ```rust
/// use sdlang::Number;
///
/// let integer = Number::Int(42);
/// let double = Number::Double(3.5);
///
/// assert!(integer.is_integer());
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(double.as_f64(), 3.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
}

impl Number {
    /// Returns `true` for `Int` and `Long`.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Int(_) | Number::Long(_))
    }

    /// Returns `true` for `Float`, `Double` and `Decimal`.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        !self.is_integer()
    }

    /// Converts this number to an `i64` when it holds a whole value in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdlang::Number;
    ///
    /// assert_eq!(Number::Int(42).as_i64(), Some(42));
    /// assert_eq!(Number::Double(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Double(42.5).as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(i64::from(*i)),
            Number::Long(l) => Some(*l),
            Number::Float(f) => whole_f64(f64::from(*f)),
            Number::Double(d) => whole_f64(*d),
            Number::Decimal(d) => d.to_i64(),
        }
    }

    /// Converts this number to an `f64`, losing precision where necessary.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => f64::from(*i),
            Number::Long(l) => *l as f64,
            Number::Float(f) => f64::from(*f),
            Number::Double(d) => *d,
            Number::Decimal(d) => d.to_f64(),
        }
    }

    /// Returns `true` when the number is non-zero.
    #[must_use]
    pub fn is_nonzero(&self) -> bool {
        match self {
            Number::Decimal(d) => d.unscaled.sign() != Sign::NoSign,
            other => other.as_f64() != 0.0,
        }
    }

    pub(crate) fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Long(l) => write!(f, "{}L", l),
            Number::Float(fl) => write!(f, "{}F", float_text(fl.to_string())),
            Number::Double(d) => write!(f, "{}", float_text(d.to_string())),
            Number::Decimal(d) => write!(f, "{}BD", d),
        }
    }
}

fn whole_f64(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

// Rust prints whole floats without a fraction; SDL needs the '.' to tell a
// double from an int.
fn float_text(mut text: String) -> String {
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Plain numeric text, without the SDL type suffix.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Long(l) => write!(f, "{}", l),
            Number::Float(fl) => write!(f, "{}", fl),
            Number::Double(d) => write!(f, "{}", d),
            Number::Decimal(d) => write!(f, "{}", d),
        }
    }
}

/// An arbitrary-precision decimal: `unscaled * 10^-scale`.
///
/// # Examples
///
/// ```rust
/// use sdlang::Decimal;
///
/// let price: Decimal = "-12.50".parse().unwrap();
/// assert_eq!(price.scale(), 2);
/// assert_eq!(price.to_string(), "-12.50");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    #[must_use]
    pub fn new(unscaled: BigInt, scale: u32) -> Self {
        Decimal { unscaled, scale }
    }

    #[must_use]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Returns the value as `i64` when its fractional digits are all zero.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        let text = self.to_string();
        let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
        if frac.bytes().all(|b| b == b'0') {
            int.parse().ok()
        } else {
            None
        }
    }

    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl FromStr for Decimal {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || crate::Error::unsupported_type(format!("invalid decimal {:?}", s));
        let digits = s.strip_prefix('-').unwrap_or(s);
        let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if int.is_empty()
            || !int.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
            || (digits.contains('.') && frac.is_empty())
        {
            return Err(invalid());
        }
        let mut unscaled: BigInt = format!("{}{}", int, frac).parse().map_err(|_| invalid())?;
        if s.starts_with('-') {
            unscaled = -unscaled;
        }
        let scale = u32::try_from(frac.len()).map_err(|_| invalid())?;
        Ok(Decimal { unscaled, scale })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut digits = self.unscaled.magnitude().to_string();
        let scale = self.scale as usize;
        if self.unscaled.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() <= scale {
            digits.insert_str(0, &"0".repeat(scale + 1 - digits.len()));
        }
        let (int, frac) = digits.split_at(digits.len() - scale);
        write!(f, "{}.{}", int, frac)
    }
}

/// The zone attached to a date-time literal.
///
/// Zones are either an abbreviation (`JST`, `UTC`) or an explicit offset,
/// written `GMT+hh:mm`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeZone {
    Abbreviation(String),
    Offset(FixedOffset),
}

// Offsets in minutes east of UTC.
const ZONE_ABBREVIATIONS: &[(&str, i32)] = &[
    ("UTC", 0),
    ("GMT", 0),
    ("Z", 0),
    ("WET", 0),
    ("BST", 60),
    ("CET", 60),
    ("CEST", 120),
    ("EET", 120),
    ("EEST", 180),
    ("MSK", 180),
    ("IST", 330),
    ("CST", -360),
    ("CDT", -300),
    ("EST", -300),
    ("EDT", -240),
    ("MST", -420),
    ("MDT", -360),
    ("PST", -480),
    ("PDT", -420),
    ("AKST", -540),
    ("AKDT", -480),
    ("HST", -600),
    ("JST", 540),
    ("KST", 540),
    ("HKT", 480),
    ("SGT", 480),
    ("AWST", 480),
    ("ACST", 570),
    ("AEST", 600),
    ("AEDT", 660),
    ("NZST", 720),
    ("NZDT", 780),
];

impl TimeZone {
    /// Parses the zone part of a date-time literal (the text after `-`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdlang::TimeZone;
    ///
    /// let jst = TimeZone::parse("JST").unwrap();
    /// assert_eq!(jst.offset().unwrap().local_minus_utc(), 9 * 3600);
    ///
    /// let explicit = TimeZone::parse("GMT-05:30").unwrap();
    /// assert_eq!(explicit.to_string(), "GMT-05:30");
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Option<TimeZone> {
        for prefix in ["GMT", "UTC"] {
            if let Some(rest) = text.strip_prefix(prefix) {
                if rest.starts_with('+') || rest.starts_with('-') {
                    return parse_offset(rest).map(TimeZone::Offset);
                }
            }
        }
        if TimeZone::is_abbreviation(text) {
            Some(TimeZone::Abbreviation(text.to_string()))
        } else {
            None
        }
    }

    pub(crate) fn is_abbreviation(text: &str) -> bool {
        !text.is_empty() && text.len() <= 6 && text.bytes().all(|b| b.is_ascii_uppercase())
    }

    /// Resolves this zone to a fixed offset. Unknown abbreviations yield `None`.
    #[must_use]
    pub fn offset(&self) -> Option<FixedOffset> {
        match self {
            TimeZone::Offset(offset) => Some(*offset),
            TimeZone::Abbreviation(name) => ZONE_ABBREVIATIONS
                .iter()
                .find(|(abbr, _)| *abbr == name.as_str())
                .and_then(|(_, minutes)| FixedOffset::east_opt(minutes * 60)),
        }
    }
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    let (sign, rest) = match text.as_bytes().first().copied()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    if hours.is_empty() || hours.len() > 2 || minutes.is_empty() || minutes.len() > 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZone::Abbreviation(name) => f.write_str(name),
            TimeZone::Offset(offset) => {
                let secs = offset.local_minus_utc();
                let sign = if secs < 0 { '-' } else { '+' };
                let secs = secs.abs();
                write!(f, "GMT{}{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60)
            }
        }
    }
}

/// A date-time literal: calendar date, time of day and an optional zone.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use sdlang::{SdlDateTime, TimeZone};
///
/// let naive = NaiveDate::from_ymd_opt(2005, 12, 5)
///     .unwrap()
///     .and_hms_milli_opt(14, 12, 23, 345)
///     .unwrap();
/// let dt = SdlDateTime::new(naive, TimeZone::parse("JST"));
/// assert_eq!(dt.to_string(), "2005/12/05 14:12:23.345-JST");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SdlDateTime {
    datetime: NaiveDateTime,
    zone: Option<TimeZone>,
}

impl SdlDateTime {
    #[must_use]
    pub fn new(datetime: NaiveDateTime, zone: Option<TimeZone>) -> Self {
        SdlDateTime { datetime, zone }
    }

    /// A date-time without a zone.
    #[must_use]
    pub fn local(datetime: NaiveDateTime) -> Self {
        SdlDateTime::new(datetime, None)
    }

    #[must_use]
    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.datetime.time()
    }

    #[must_use]
    pub fn zone(&self) -> Option<&TimeZone> {
        self.zone.as_ref()
    }

    /// Interprets the local date-time in its zone, when the zone resolves to an offset.
    #[must_use]
    pub fn to_fixed_offset(&self) -> Option<chrono::DateTime<FixedOffset>> {
        let offset = self.zone.as_ref()?.offset()?;
        self.datetime.and_local_timezone(offset).single()
    }
}

impl fmt::Display for SdlDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_date(&self.datetime.date(), f)?;
        let time = self.datetime.time();
        write!(
            f,
            " {:02}:{:02}:{:02}",
            time.hour(),
            time.minute(),
            time.second()
        )?;
        fmt_fraction(time.nanosecond(), f)?;
        if let Some(zone) = &self.zone {
            write!(f, "-{}", zone)?;
        }
        Ok(())
    }
}

fn fmt_date(date: &NaiveDate, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
}

fn fmt_fraction(nanos: u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if nanos == 0 {
        return Ok(());
    }
    let digits = format!("{:09}", nanos);
    write!(f, ".{}", digits.trim_end_matches('0'))
}

/// A signed duration literal: `[-][Nd:]hh:mm:ss[.fff]`.
///
/// The alternate form (`{:#}`) always writes the day field.
///
/// # Examples
///
/// ```rust
/// use chrono::Duration;
/// use sdlang::TimeSpan;
///
/// let span = TimeSpan::new(Duration::hours(36) + Duration::milliseconds(5));
/// assert_eq!(span.to_string(), "1d:12:00:00.005");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeSpan(Duration);

impl TimeSpan {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        TimeSpan(duration)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < Duration::zero();
        let abs = if negative { -self.0 } else { self.0 };
        let total = abs.num_seconds();
        let (days, rest) = (total / 86_400, total % 86_400);
        if negative {
            f.write_str("-")?;
        }
        if days > 0 || f.alternate() {
            write!(f, "{}d:", days)?;
        }
        write!(
            f,
            "{:02}:{:02}:{:02}",
            rest / 3600,
            (rest % 3600) / 60,
            rest % 60
        )?;
        fmt_fraction(abs.subsec_nanos().unsigned_abs(), f)
    }
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Value::Date(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_datetime(&self) -> bool {
        matches!(self, Value::DateTime(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_timespan(&self) -> bool {
        matches!(self, Value::TimeSpan(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// If the value is a whole number that fits in `i64`, returns it.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<&SdlDateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timespan(&self) -> Option<TimeSpan> {
        match self {
            Value::TimeSpan(ts) => Some(*ts),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Short name of the literal kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(Number::Int(_)) => "int",
            Value::Number(Number::Long(_)) => "long",
            Value::Number(Number::Float(_)) => "float",
            Value::Number(Number::Double(_)) => "double",
            Value::Number(Number::Decimal(_)) => "decimal",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "date-time",
            Value::TimeSpan(_) => "time span",
            Value::Binary(_) => "binary",
        }
    }

    /// Plain text of the value: strings unquoted, numbers without type suffix,
    /// binary as bare base64.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdlang::{Number, Value};
    ///
    /// assert_eq!(Value::from("a \"b\"").to_text(), "a \"b\"");
    /// assert_eq!(Value::Number(Number::Long(4)).to_text(), "4");
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Binary(bytes) => STANDARD.encode(bytes),
            other => other.to_string(),
        }
    }

    /// Converts the value to `T`, following the crate's conversion rules.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conversion`] when no rule applies.
    pub fn convert<T: FromValue>(&self) -> Result<T> {
        T::from_value(self)
    }

    /// Converts the value to `T`, substituting `default` on any failure.
    #[must_use]
    pub fn convert_or<T: FromValue>(&self, default: T) -> T {
        T::from_value(self).unwrap_or(default)
    }
}

/// Canonical SDL literal text.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => n.fmt_literal(f),
            Value::String(s) => {
                f.write_str("\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        _ => write!(f, "{}", ch)?,
                    }
                }
                f.write_str("\"")
            }
            Value::Date(d) => fmt_date(d, f),
            Value::DateTime(dt) => write!(f, "{}", dt),
            Value::TimeSpan(ts) => write!(f, "{}", ts),
            Value::Binary(bytes) => write!(f, "[{}]", STANDARD.encode(bytes)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Int(i)) => serializer.serialize_i32(*i),
            Value::Number(Number::Long(l)) => serializer.serialize_i64(*l),
            Value::Number(Number::Float(f)) => serializer.serialize_f32(*f),
            Value::Number(Number::Double(d)) => serializer.serialize_f64(*d),
            Value::Binary(bytes) => serializer.serialize_bytes(bytes),
            other => serializer.serialize_str(&other.to_text()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an SDL scalar value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(match i32::try_from(value) {
                    Ok(i) => Value::Number(Number::Int(i)),
                    Err(_) => Value::Number(Number::Long(value)),
                })
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                if let Ok(i) = i64::try_from(value) {
                    self.visit_i64(i)
                } else {
                    Ok(Value::Number(Number::Decimal(Decimal::new(
                        BigInt::from(value),
                        0,
                    ))))
                }
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                if value.is_finite() {
                    Ok(Value::Number(Number::Double(value)))
                } else {
                    Err(E::custom("SDL numbers must be finite"))
                }
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::Binary(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::Binary(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Value, E>
            where
                E: de::Error,
            {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Number(Number::Int(i32::from(value)))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Number(Number::Int(i32::from(value)))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Int(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Long(value))
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Number(Number::Int(i32::from(value)))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Number(Number::Int(i32::from(value)))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Long(i64::from(value)))
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<SdlDateTime> for Value {
    fn from(value: SdlDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<TimeSpan> for Value {
    fn from(value: TimeSpan) -> Self {
        Value::TimeSpan(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Binary(value.to_vec())
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Number(Number::Decimal(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(h: u32, m: u32, s: u32, nanos: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2005, 12, 5)
            .unwrap()
            .and_hms_nano_opt(h, m, s, nanos)
            .unwrap()
    }

    #[test]
    fn test_number_literals_carry_type_suffix() {
        assert_eq!(Value::from(4).to_string(), "4");
        assert_eq!(Value::from(-4i64).to_string(), "-4L");
        assert_eq!(Value::Number(Number::Float(1.5)).to_string(), "1.5F");
        assert_eq!(Value::Number(Number::Float(2.0)).to_string(), "2.0F");
        assert_eq!(Value::Number(Number::Double(4.0)).to_string(), "4.0");
        assert_eq!(Value::Number(Number::Double(-0.25)).to_string(), "-0.25");
    }

    #[test]
    fn test_plain_text_drops_suffix_and_quotes() {
        assert_eq!(Value::from(4i64).to_text(), "4");
        assert_eq!(Value::Number(Number::Double(4.0)).to_text(), "4");
        assert_eq!(Value::from("x").to_text(), "x");
        assert_eq!(Value::Binary(b"hi".to_vec()).to_text(), "aGk=");
    }

    #[test]
    fn test_string_escaping() {
        let value = Value::from("say \"hi\"\\\n\tok");
        assert_eq!(value.to_string(), r#""say \"hi\"\\\n\tok""#);
    }

    #[test]
    fn test_decimal_parse_and_display() {
        let d: Decimal = "12.345".parse().unwrap();
        assert_eq!(d.unscaled(), &BigInt::from(12345));
        assert_eq!(d.scale(), 3);
        assert_eq!(d.to_string(), "12.345");

        let small: Decimal = "-0.005".parse().unwrap();
        assert_eq!(small.to_string(), "-0.005");
        assert_eq!(small.to_i64(), None);

        let whole: Decimal = "42.00".parse().unwrap();
        assert_eq!(whole.to_i64(), Some(42));

        assert!("1.".parse::<Decimal>().is_err());
        assert!(".5".parse::<Decimal>().is_err());
        assert!("1e5".parse::<Decimal>().is_err());
        assert_eq!(
            Value::from(d).to_string(),
            "12.345BD",
            "decimal literal keeps its suffix"
        );
    }

    #[test]
    fn test_timezone_parsing() {
        assert_eq!(
            TimeZone::parse("JST"),
            Some(TimeZone::Abbreviation("JST".to_string()))
        );
        let offset = TimeZone::parse("GMT+09:00").unwrap();
        assert_eq!(offset.offset(), FixedOffset::east_opt(9 * 3600));
        assert_eq!(offset.to_string(), "GMT+09:00");

        let short = TimeZone::parse("UTC-5").unwrap();
        assert_eq!(short.to_string(), "GMT-05:00");

        assert_eq!(TimeZone::parse("jst"), None);
        assert_eq!(TimeZone::parse("GMT+25:00"), None);
        assert_eq!(TimeZone::Abbreviation("XYZ".to_string()).offset(), None);
    }

    #[test]
    fn test_datetime_display() {
        let plain = SdlDateTime::local(datetime(14, 12, 23, 0));
        assert_eq!(plain.to_string(), "2005/12/05 14:12:23");

        let zoned = SdlDateTime::new(datetime(14, 12, 23, 345_000_000), TimeZone::parse("JST"));
        assert_eq!(zoned.to_string(), "2005/12/05 14:12:23.345-JST");
        assert_eq!(
            zoned.to_fixed_offset().unwrap().to_rfc3339(),
            "2005-12-05T14:12:23.345+09:00"
        );
    }

    #[test]
    fn test_timespan_display() {
        let span = TimeSpan::new(Duration::seconds(12 * 3600 + 30 * 60));
        assert_eq!(span.to_string(), "12:30:00");

        let negative = TimeSpan::new(-(Duration::days(2) + Duration::milliseconds(1500)));
        assert_eq!(negative.to_string(), "-2d:00:00:01.5");
        assert_eq!(format!("{:#}", span), "0d:12:30:00");
    }

    #[test]
    fn test_convert_or_falls_back() {
        let value = Value::from("a");
        assert_eq!(value.convert_or(0i32), 0);
        assert_eq!(value.convert_or(0.0f64), 0.0);
        assert_eq!(value.convert_or("x".to_string()), "a");
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Number(Number::Int(42)));
        assert_eq!(Value::from(42u32), Value::Number(Number::Long(42)));
        assert_eq!(Value::from('c'), Value::String("c".to_string()));
        assert_eq!(Value::from(&b"ab"[..]), Value::Binary(vec![b'a', b'b']));
    }

    #[test]
    fn test_serialize_to_json() {
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::from(4),
            Value::from("x"),
            Value::Date(NaiveDate::from_ymd_opt(2005, 12, 5).unwrap()),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,4,"x","2005/12/05"]"#);

        let back: Vec<Value> = serde_json::from_str("[true, 7, 5000000000, 1.5, \"s\"]").unwrap();
        assert_eq!(
            back,
            vec![
                Value::Bool(true),
                Value::from(7),
                Value::from(5_000_000_000i64),
                Value::Number(Number::Double(1.5)),
                Value::from("s"),
            ]
        );
    }

    #[test]
    fn test_deserialize_integer_ranges() {
        let back: Vec<Value> =
            serde_json::from_str("[-7, -5000000000, 18446744073709551615, null]").unwrap();
        assert_eq!(back[0], Value::from(-7));
        assert_eq!(back[1], Value::Number(Number::Long(-5_000_000_000)));
        assert_eq!(back[2].to_string(), "18446744073709551615BD");
        assert_eq!(back[3], Value::Null);
    }
}
