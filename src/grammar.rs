//! SDL Syntax Reference
//!
//! This module documents the SDL (Simple Declarative Language) syntax as
//! accepted by [`parse`](crate::parse) and produced by
//! [`Tag::to_sdl_string`](crate::Tag::to_sdl_string).
//!
//! # Overview
//!
//! An SDL document is a list of tags. A tag has a name, an optional
//! namespace, a list of values, a set of attributes and an optional block of
//! child tags:
//!
//! ```text
//! // a tag with two values, two attributes and two children
//! person "Akiko" "Johnson" dialect="Tokyo" ja:nickname="Aki" {
//!     phone "+81 3 1234 5678" type="home"
//!     birthday 1970/12/05
//! }
//! ```
//!
//! # Grammar
//!
//! ```text
//! document   := line*
//! line       := statement? (';' statement?)* (newline | EOF)
//! statement  := tag-head value* attribute* block?
//!             | value+ attribute* block?          -- anonymous, named "content"
//! tag-head   := ident (':' ident)?
//! attribute  := ident (':' ident)? '=' value
//! block      := '{' newline document '}'
//! ident      := (letter | '_') (letter | digit | '_' | '-' | '.')*
//! value      := string | raw-string | number | boolean | null
//!             | date | date-time | time-span | binary
//! ```
//!
//! Letters are Unicode alphabetic characters. The words `true`, `false`,
//! `on`, `off` and `null` are literals and cannot be used as identifiers.
//!
//! **Rules**:
//! - Values come before attributes; a value after an attribute is an error
//! - `{` must end its line; `}` closes the innermost open block
//! - A line ending in `\` continues on the next line
//! - `;` separates statements on one line
//!
//! # Comments
//!
//! | Form | Extent |
//! |------|--------|
//! | `// text` | to end of line |
//! | `# text` | to end of line |
//! | `-- text` | to end of line |
//! | `/* text */` | until `*/`, may span lines |
//!
//! # Literals
//!
//! | Type | Syntax | Example |
//! |------|--------|---------|
//! | String | `"..."` with `\"` `\\` `\n` `\r` `\t` escapes | `"a \"b\""` |
//! | Raw string | `` `...` ``, no escapes, may span lines | `` `C:\temp` `` |
//! | Int | digits, optional `-` (becomes a long outside 32 bits) | `42` |
//! | Long | digits + `L` | `42L` |
//! | Float | decimal + `F` | `1.5F` |
//! | Double | decimal with `.`, or + `D` | `1.5`, `2D` |
//! | Decimal | decimal + `BD` | `12.50BD` |
//! | Boolean | `true`, `false`, `on`, `off` | `on` |
//! | Null | `null` | `null` |
//! | Date | `yyyy/mm/dd` | `2005/12/05` |
//! | Date-time | date, space, `hh:mm[:ss[.fff]]`, optional `-zone` | `2005/12/05 14:12:23.345-JST` |
//! | Time span | `[-][Nd:]hh:mm:ss[.fff]` | `-1d:02:30:00` |
//! | Binary | base64 inside `[ ]`, whitespace ignored | `[aGVsbG8=]` |
//!
//! Suffixes are case-insensitive. Numbers have no exponent form.
//!
//! ## Strings
//!
//! A backslash at the end of a line inside a quoted string joins the next
//! line, dropping its leading whitespace:
//!
//! ```text
//! quote "this is one \
//!        line"
//! ```
//!
//! A quoted string may not otherwise contain a line break; use a raw string
//! for multi-line text.
//!
//! ## Time Zones
//!
//! A date-time zone is either an upper-case abbreviation of up to six letters
//! or an explicit offset:
//!
//! ```text
//! meeting 2005/12/05 09:00-JST
//! meeting 2005/12/05 09:00-GMT+09:00
//! meeting 2005/12/05 09:00-UTC-5
//! ```
//!
//! Offsets are written back as `GMT+hh:mm`. Abbreviations are kept as
//! written; [`TimeZone::offset`](crate::TimeZone::offset) resolves the common
//! ones.
//!
//! ## Dates Followed by Times
//!
//! A date followed on the same line by a time of day is one date-time value.
//! To write a date value followed by a time span value, give the time span a
//! day field:
//!
//! ```text
//! shift 2005/12/05 08:00:00      -- one date-time
//! shift 2005/12/05 0d:08:00:00   -- a date and an 8 hour span
//! ```
//!
//! # Anonymous Tags
//!
//! A statement that starts with a value has the name `content`:
//!
//! ```text
//! "one" "two"        -- same as: content "one" "two"
//! ```
//!
//! When written back, a `content` tag without a namespace and with at least
//! one value omits its name.
//!
//! # Canonical Form
//!
//! The serializer writes:
//!
//! - values separated by single spaces, then attributes in sorted key order
//! - children four spaces deeper than their parent, every line in a block
//!   ending in `\r\n`
//! - doubles with at least one fractional digit, other numbers with their
//!   suffix
//! - time spans with a day field only when non-zero (or after a date)
//!
//! Two tags are equal exactly when their canonical forms are equal.
//!
//! # Limitations
//!
//! - **Numbers**: no exponent, hexadecimal or `NaN`/`Infinity` forms
//! - **Years**: dates before year 0 cannot be written
//! - **Identifiers**: the literal keywords are reserved
//!
//! # Conformance
//!
//! The syntax follows the SDL language description at
//! <https://sdlang.org>, with the additions listed above (time spans,
//! `UTC` offsets, reserved keywords).

// This module contains only documentation; no implementation code
