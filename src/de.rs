//! SDL parsing.
//!
//! This module provides the [`Lexer`] that splits SDL source into tokens and
//! the [`Parser`] that assembles those tokens into a forest of [`Tag`]s.
//!
//! ## Overview
//!
//! - **Single pass**: the lexer reads characters once; the only lookahead is
//!   one token in the parser and a short rewind after a date literal to see
//!   whether a time of day follows
//! - **Typed literals**: the lexer produces fully typed [`Value`]s, so the
//!   parser only deals with structure
//! - **Error reporting**: every error carries the line and column of the
//!   offending token, and a failed parse produces no tags at all
//!
//! See [`crate::grammar`] for the accepted syntax.
//!
//! ## Usage
//!
//! ```rust
//! use sdlang::{parse, Value};
//!
//! let tags = parse("greeting \"hello\" lang=\"en\"; count 3").unwrap();
//! assert_eq!(tags.len(), 2);
//! assert_eq!(tags[0].attribute("lang"), Some(&Value::from("en")));
//! assert_eq!(tags[1].value(), Some(&Value::from(3)));
//! ```

use crate::coerce::{is_identifier_char, is_identifier_start};
use crate::tag::ANONYMOUS_TAG_NAME;
use crate::value::{Decimal, Number, SdlDateTime, TimeSpan, TimeZone};
use crate::{Error, Result, Tag, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Duration, NaiveDate, NaiveTime};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Deepest allowed nesting of `{ ... }` blocks.
const MAX_NESTING: usize = 128;

/// Parses SDL text into its top-level tags.
///
/// # Errors
///
/// Returns [`Error::Parse`] with the position of the first malformed token.
pub fn parse(input: &str) -> Result<Vec<Tag>> {
    Parser::new(input).parse_document()
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Literal(Value),
    Colon,
    Equals,
    LeftBrace,
    RightBrace,
    Semicolon,
    Newline,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier {:?}", name),
            TokenKind::Literal(value) => write!(f, "{} {}", value.kind(), value),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Equals => f.write_str("'='"),
            TokenKind::LeftBrace => f.write_str("'{'"),
            TokenKind::RightBrace => f.write_str("'}'"),
            TokenKind::Semicolon => f.write_str("';'"),
            TokenKind::Newline => f.write_str("end of line"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// A token and the position of its first character (1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Copy)]
struct Cursor {
    position: usize,
    line: usize,
    column: usize,
}

/// Splits SDL source into tokens.
///
/// Comments, horizontal whitespace and escaped line breaks are skipped;
/// line breaks are significant and come out as [`TokenKind::Newline`].
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.strip_prefix('\u{feff}').unwrap_or(input),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.position..].chars();
        chars.next();
        chars.next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn cursor(&self) -> Cursor {
        Cursor {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn restore(&mut self, cursor: Cursor) {
        self.position = cursor.position;
        self.line = cursor.line;
        self.column = cursor.column;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() && ch != '\n' {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.next_char();
        }
    }

    fn skip_block_comment(&mut self, line: usize, column: usize) -> Result<()> {
        loop {
            match self.next_char() {
                Some('*') if self.peek_char() == Some('/') => {
                    self.next_char();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(Error::parse(line, column, "unterminated block comment")),
            }
        }
    }

    /// Reads the next token. Returns [`TokenKind::Eof`] once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            self.skip_whitespace();
            let (line, column) = (self.line, self.column);
            let Some(ch) = self.peek_char() else {
                return Ok(self.token(TokenKind::Eof, line, column));
            };

            let kind = match ch {
                '\n' => {
                    self.next_char();
                    TokenKind::Newline
                }
                '#' => {
                    self.skip_line_comment();
                    continue;
                }
                '/' | '-' if self.peek_second() == Some(ch) => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.peek_second() == Some('*') => {
                    self.next_char();
                    self.next_char();
                    self.skip_block_comment(line, column)?;
                    continue;
                }
                '\\' => {
                    self.next_char();
                    self.skip_whitespace();
                    if self.next_char() != Some('\n') {
                        return Err(Error::parse(line, column, "'\\' must end the line"));
                    }
                    continue;
                }
                '{' => self.punct(TokenKind::LeftBrace),
                '}' => self.punct(TokenKind::RightBrace),
                ':' => self.punct(TokenKind::Colon),
                '=' => self.punct(TokenKind::Equals),
                ';' => self.punct(TokenKind::Semicolon),
                '"' => TokenKind::Literal(self.read_string(line, column)?),
                '`' => TokenKind::Literal(self.read_raw_string(line, column)?),
                '[' => TokenKind::Literal(self.read_binary(line, column)?),
                '-' | '0'..='9' => TokenKind::Literal(self.read_number_or_date(line, column)?),
                c if is_identifier_start(c) => self.read_word(),
                other => {
                    return Err(Error::parse(
                        line,
                        column,
                        format!("unexpected character {:?}", other),
                    ))
                }
            };
            return Ok(self.token(kind, line, column));
        }
    }

    fn token(&self, kind: TokenKind, line: usize, column: usize) -> Token {
        trace!("Token {:?} at {}:{}", kind, line, column);
        Token { kind, line, column }
    }

    fn punct(&mut self, kind: TokenKind) -> TokenKind {
        self.next_char();
        kind
    }

    fn read_word(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if is_identifier_char(ch) {
                self.next_char();
            } else {
                break;
            }
        }
        match &self.input[start..self.position] {
            "true" | "on" => TokenKind::Literal(Value::Bool(true)),
            "false" | "off" => TokenKind::Literal(Value::Bool(false)),
            "null" => TokenKind::Literal(Value::Null),
            word => TokenKind::Ident(word.to_string()),
        }
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<Value> {
        self.next_char();
        let mut text = String::new();
        loop {
            match self.next_char() {
                None | Some('\n') => {
                    return Err(Error::parse(line, column, "unterminated string literal"))
                }
                Some('"') => return Ok(Value::String(text)),
                Some('\\') => {
                    let (escape_line, escape_column) = (self.line, self.column - 1);
                    match self.next_char() {
                        Some('n') => text.push('\n'),
                        Some('r') => text.push('\r'),
                        Some('t') => text.push('\t'),
                        Some('"') => text.push('"'),
                        Some('\\') => text.push('\\'),
                        Some('\r') if self.peek_char() == Some('\n') => {
                            self.next_char();
                            self.skip_whitespace();
                        }
                        Some('\n') => self.skip_whitespace(),
                        Some(other) => {
                            return Err(Error::parse(
                                escape_line,
                                escape_column,
                                format!("unknown escape sequence '\\{}'", other),
                            ))
                        }
                        None => {
                            return Err(Error::parse(line, column, "unterminated string literal"))
                        }
                    }
                }
                Some(ch) => text.push(ch),
            }
        }
    }

    fn read_raw_string(&mut self, line: usize, column: usize) -> Result<Value> {
        self.next_char();
        let start = self.position;
        loop {
            match self.next_char() {
                Some('`') => {
                    let end = self.position - 1;
                    return Ok(Value::String(self.input[start..end].to_string()));
                }
                Some(_) => {}
                None => return Err(Error::parse(line, column, "unterminated raw string literal")),
            }
        }
    }

    fn read_binary(&mut self, line: usize, column: usize) -> Result<Value> {
        self.next_char();
        let mut encoded = String::new();
        loop {
            match self.next_char() {
                Some(']') => break,
                Some(ch) if ch.is_whitespace() => {}
                Some(ch) => encoded.push(ch),
                None => return Err(Error::parse(line, column, "unterminated binary literal")),
            }
        }
        STANDARD.decode(encoded.as_bytes()).map(Value::Binary).map_err(|err| {
            Error::parse(line, column, format!("invalid base64 in binary literal: {}", err))
        })
    }

    /// Reads the characters a number, date, time or time span can contain.
    fn read_run(&mut self) -> &'a str {
        let input = self.input;
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | ':' | '/' | '+' | '-') {
                self.next_char();
            } else {
                break;
            }
        }
        &input[start..self.position]
    }

    fn read_number_or_date(&mut self, line: usize, column: usize) -> Result<Value> {
        let negative = self.peek_char() == Some('-');
        if negative {
            self.next_char();
            if !matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                return Err(Error::parse(line, column, "expected a digit after '-'"));
            }
        }

        let run = self.read_run();
        if run.contains('/') {
            let date = parse_date(run)
                .filter(|_| !negative)
                .ok_or_else(|| Error::parse(line, column, format!("invalid date {:?}", run)))?;
            return self.read_time_of_day(date, line, column);
        }
        if run.contains(':') {
            return parse_timespan(run, negative)
                .map(Value::TimeSpan)
                .ok_or_else(|| Error::parse(line, column, format!("invalid time span {:?}", run)));
        }
        parse_number(run, negative)
            .map(Value::Number)
            .map_err(|msg| Error::parse(line, column, format!("{} {:?}", msg, run)))
    }

    /// A date directly followed by a time of day on the same line is a date-time.
    ///
    /// Anything else after the date, including a time span with a day field
    /// (`0d:12:00:00`), is left for the next token.
    fn read_time_of_day(&mut self, date: NaiveDate, line: usize, column: usize) -> Result<Value> {
        let saved = self.cursor();
        while matches!(self.peek_char(), Some(' ' | '\t')) {
            self.next_char();
        }
        if matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            let run = self.read_run();
            let (time, zone) = match run.split_once('-') {
                Some((time, zone)) => (time, Some(zone)),
                None => (run, None),
            };
            if let Some(time) = parse_time(time) {
                let zone = zone
                    .map(|zone| {
                        TimeZone::parse(zone).ok_or_else(|| {
                            Error::parse(line, column, format!("invalid time zone {:?}", zone))
                        })
                    })
                    .transpose()?;
                return Ok(Value::DateTime(SdlDateTime::new(date.and_time(time), zone)));
            }
        }
        self.restore(saved);
        Ok(Value::Date(date))
    }
}

fn parse_digits<T: FromStr>(text: &str) -> Option<T> {
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('/');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(
        parse_digits(year)?,
        parse_digits(month)?,
        parse_digits(day)?,
    )
}

/// `ss[.fffffffff]` as whole seconds and nanoseconds.
fn parse_seconds(text: &str) -> Option<(u32, u32)> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };
    let seconds: u32 = parse_digits(whole)?;
    if seconds > 59 {
        return None;
    }
    let nanos = match fraction {
        Some(fraction) if fraction.len() <= 9 => {
            parse_digits::<u32>(fraction)? * 10u32.pow(9 - fraction.len() as u32)
        }
        Some(_) => return None,
        None => 0,
    };
    Some((seconds, nanos))
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = text.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m] => (*h, *m, "0"),
        [h, m, s] => (*h, *m, *s),
        _ => return None,
    };
    let (seconds, nanos) = parse_seconds(seconds)?;
    NaiveTime::from_hms_nano_opt(parse_digits(hours)?, parse_digits(minutes)?, seconds, nanos)
}

fn parse_timespan(text: &str, negative: bool) -> Option<TimeSpan> {
    let mut parts: Vec<&str> = text.split(':').collect();
    let days: i64 = match parts.first()?.strip_suffix('d') {
        Some(days) => {
            let days = parse_digits(days)?;
            parts.remove(0);
            days
        }
        None => 0,
    };
    let [hours, minutes, seconds] = parts.as_slice() else {
        return None;
    };
    let hours: i64 = parse_digits(hours)?;
    let minutes: i64 = parse_digits(minutes)?;
    let (seconds, nanos) = parse_seconds(seconds)?;
    if minutes > 59 {
        return None;
    }

    let total = days
        .checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes * 60 + i64::from(seconds))?;
    if total > i64::MAX / 1_000 {
        return None;
    }
    let duration = Duration::seconds(total).checked_add(&Duration::nanoseconds(i64::from(nanos)))?;
    Some(TimeSpan::new(if negative { -duration } else { duration }))
}

fn is_numeric_body(text: &str) -> bool {
    let (int, fraction) = match text.split_once('.') {
        Some((int, fraction)) => (int, Some(fraction)),
        None => (text, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(int) && fraction.map_or(true, digits)
}

fn parse_number(run: &str, negative: bool) -> std::result::Result<Number, &'static str> {
    let len = run.len();
    let (body, suffix) = if len > 2 && run[len - 2..].eq_ignore_ascii_case("bd") {
        (&run[..len - 2], "BD")
    } else {
        match run.as_bytes().last() {
            Some(b'L' | b'l') => (&run[..len - 1], "L"),
            Some(b'F' | b'f') => (&run[..len - 1], "F"),
            Some(b'D' | b'd') => (&run[..len - 1], "D"),
            _ => (run, ""),
        }
    };
    if !is_numeric_body(body) {
        return Err("malformed number");
    }

    let text = if negative {
        format!("-{}", body)
    } else {
        body.to_string()
    };
    let fractional = body.contains('.');
    let double = || {
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Number::Double)
            .ok_or("double literal out of range")
    };
    match suffix {
        "L" if fractional => Err("long literal with a fraction"),
        "L" => text.parse().map(Number::Long).map_err(|_| "long literal out of range"),
        "F" => text
            .parse::<f32>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Number::Float)
            .ok_or("float literal out of range"),
        "BD" => text
            .parse::<Decimal>()
            .map(Number::Decimal)
            .map_err(|_| "malformed decimal"),
        "D" => double(),
        _ if fractional => double(),
        _ => match text.parse::<i32>() {
            Ok(i) => Ok(Number::Int(i)),
            Err(_) => text
                .parse()
                .map(Number::Long)
                .map_err(|_| "integer literal out of range"),
        },
    }
}

/// Turns a tag validation failure into a parse error at the given position.
fn relocate(line: usize, column: usize) -> impl Fn(Error) -> Error {
    move |err| match err {
        Error::Parse { .. } => err,
        other => Error::parse(line, column, other.to_string()),
    }
}

/// Assembles tokens into tags.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            peeked: None,
        }
    }

    /// Parses the whole input into its top-level tags.
    pub fn parse_document(mut self) -> Result<Vec<Tag>> {
        let tags = self.parse_block(0)?;
        debug!(count = tags.len(), "parsed SDL document");
        Ok(tags)
    }

    fn next(&mut self) -> Result<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> Result<&TokenKind> {
        let token = self.next()?;
        Ok(&self.peeked.insert(token).kind)
    }

    fn push_back(&mut self, token: Token) {
        self.peeked = Some(token);
    }

    fn expect_ident(&mut self, what: &str) -> Result<String> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            other => Err(Error::parse(
                token.line,
                token.column,
                format!("expected {}, found {}", what, other),
            )),
        }
    }

    /// Statements up to the end of input (`depth == 0`) or the closing `}`.
    fn parse_block(&mut self, depth: usize) -> Result<Vec<Tag>> {
        let mut tags = Vec::new();
        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::Newline | TokenKind::Semicolon => {}
                TokenKind::Eof if depth == 0 => return Ok(tags),
                TokenKind::Eof => {
                    return Err(Error::parse(
                        token.line,
                        token.column,
                        "unexpected end of input, expected '}'",
                    ))
                }
                TokenKind::RightBrace if depth > 0 => return Ok(tags),
                TokenKind::RightBrace => {
                    return Err(Error::parse(token.line, token.column, "unmatched '}'"))
                }
                _ => tags.push(self.parse_statement(token, depth)?),
            }
        }
    }

    fn parse_statement(&mut self, first: Token, depth: usize) -> Result<Tag> {
        let (line, column) = (first.line, first.column);
        let mut tag = match first.kind {
            TokenKind::Ident(name) => {
                let tag = if matches!(self.peek()?, TokenKind::Colon) {
                    self.next()?;
                    let local = self.expect_ident("a tag name after ':'")?;
                    Tag::with_namespace(&name, &local)
                } else {
                    Tag::new(&name)
                };
                tag.map_err(relocate(line, column))?
            }
            TokenKind::Literal(value) => {
                let mut tag = Tag::new(ANONYMOUS_TAG_NAME)?;
                tag.add_value(value).map_err(relocate(line, column))?;
                tag
            }
            other => {
                return Err(Error::parse(
                    line,
                    column,
                    format!("expected a tag name or value, found {}", other),
                ))
            }
        };

        self.parse_values(&mut tag)?;
        self.parse_attributes(&mut tag)?;

        if matches!(self.peek()?, TokenKind::LeftBrace) {
            let open = self.next()?;
            if depth + 1 > MAX_NESTING {
                return Err(Error::parse(
                    open.line,
                    open.column,
                    format!("blocks nested deeper than {} levels", MAX_NESTING),
                ));
            }
            let token = self.next()?;
            if token.kind != TokenKind::Newline {
                return Err(Error::parse(
                    token.line,
                    token.column,
                    format!("expected end of line after '{{', found {}", token.kind),
                ));
            }
            let children = self.parse_block(depth + 1)?;
            tag.set_children(children);
        }

        match self.peek()? {
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof | TokenKind::RightBrace => {
                Ok(tag)
            }
            _ => {
                let token = self.next()?;
                Err(Error::parse(
                    token.line,
                    token.column,
                    format!("unexpected {}", token.kind),
                ))
            }
        }
    }

    fn parse_values(&mut self, tag: &mut Tag) -> Result<()> {
        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::Literal(value) => tag
                    .add_value(value)
                    .map_err(relocate(token.line, token.column))?,
                kind => {
                    self.push_back(Token { kind, ..token });
                    return Ok(());
                }
            }
        }
    }

    fn parse_attributes(&mut self, tag: &mut Tag) -> Result<()> {
        loop {
            let token = self.next()?;
            let (line, column) = (token.line, token.column);
            let name = match token.kind {
                TokenKind::Ident(name) => name,
                TokenKind::Literal(value) => {
                    return Err(Error::parse(
                        line,
                        column,
                        format!("value {} must come before the attributes", value),
                    ))
                }
                kind => {
                    self.push_back(Token { kind, line, column });
                    return Ok(());
                }
            };

            let (namespace, key) = if matches!(self.peek()?, TokenKind::Colon) {
                self.next()?;
                (name, self.expect_ident("an attribute name after ':'")?)
            } else {
                (String::new(), name)
            };

            let token = self.next()?;
            if token.kind != TokenKind::Equals {
                return Err(Error::parse(
                    token.line,
                    token.column,
                    format!("expected '=' after attribute {:?}, found {}", key, token.kind),
                ));
            }

            let token = self.next()?;
            match token.kind {
                TokenKind::Literal(value) => tag
                    .set_attribute_ns(&namespace, &key, value)
                    .map_err(relocate(line, column))?,
                other => {
                    return Err(Error::parse(
                        token.line,
                        token.column,
                        format!("expected a value for attribute {:?}, found {}", key, other),
                    ))
                }
            }
        }
    }
}
