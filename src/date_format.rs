//! Date format templates and the rules compiled from them
//!
//! A date format is a small template where six letters stand for the
//! numeric parts of a timestamp:
//!
//! ```text
//! d   day     two digits
//! m   month   two digits
//! Y   year    four digits
//! H   hour    two digits
//! i   minute  two digits
//! s   second  two digits
//! ```
//!
//! Every other character is literal, except that `/`, `[` and `]` are
//! escaped before the letters are substituted. The letters have no escape
//! of their own: a literal `s` anywhere in the template is still read as
//! the seconds placeholder.

use crate::error::ViewerError;
use crate::helpers::replace_all;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Default template, matching timestamps like `[23/01/2024, 08:15:42]`
pub const DEFAULT_DATE_FORMAT: &str = "[d/m/Y, H:i:s]";

/// One filterable component of a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateField {
    Day,
    Month,
    Year,
    Hour,
    Minute,
    Second,
}

impl DateField {
    /// All fields, in the order their specifiers are substituted
    pub const ALL: [DateField; 6] = [
        DateField::Day,
        DateField::Month,
        DateField::Year,
        DateField::Hour,
        DateField::Minute,
        DateField::Second,
    ];

    /// The template letter standing for this field
    pub fn specifier(self) -> &'static str {
        match self {
            DateField::Day => "d",
            DateField::Month => "m",
            DateField::Year => "Y",
            DateField::Hour => "H",
            DateField::Minute => "i",
            DateField::Second => "s",
        }
    }

    /// Pattern used when the field is not constrained
    pub fn unconstrained_pattern(self) -> &'static str {
        match self {
            DateField::Year => "[0-9]{4}",
            _ => "[0-9]{2}",
        }
    }

    /// Whether constrained values are zero-padded to two digits
    pub fn is_zero_padded(self) -> bool {
        !matches!(self, DateField::Year)
    }

    pub fn name(self) -> &'static str {
        match self {
            DateField::Day => "day",
            DateField::Month => "month",
            DateField::Year => "year",
            DateField::Hour => "hour",
            DateField::Minute => "minute",
            DateField::Second => "second",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DateField {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "d" => Ok(DateField::Day),
            "month" | "m" => Ok(DateField::Month),
            "year" | "y" => Ok(DateField::Year),
            "hour" | "h" => Ok(DateField::Hour),
            "minute" | "min" | "i" => Ok(DateField::Minute),
            "second" | "sec" | "s" => Ok(DateField::Second),
            _ => Err(ViewerError::UnknownField(s.to_string())),
        }
    }
}

/// Per-field constraints applied when compiling a date format
///
/// Values are kept as the raw strings the user typed. An empty string is
/// the same as no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFormatSpec {
    values: [Option<String>; 6],
}

impl DateFormatSpec {
    /// Create a spec with every field unconstrained
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`DateFormatSpec::set`]
    pub fn with(mut self, field: DateField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Bind a field to a value; an empty value unconstrains it
    pub fn set(&mut self, field: DateField, value: impl Into<String>) {
        let value = value.into();
        self.values[field.index()] = if value.is_empty() { None } else { Some(value) };
    }

    pub fn unset(&mut self, field: DateField) {
        self.values[field.index()] = None;
    }

    /// The raw constraint for a field, `None` when unconstrained
    pub fn get(&self, field: DateField) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    /// Reset every field to unconstrained
    pub fn clear(&mut self) {
        self.values = Default::default();
    }

    pub fn is_unconstrained(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// Pads a value to two characters by prefixing `0` and keeping the last two
///
/// `"5"` becomes `"05"`, `"15"` stays `"15"`, and `"123"` is cut to `"23"`.
pub fn pad_two(value: &str) -> String {
    let padded = format!("0{value}");
    let skip = padded.chars().count().saturating_sub(2);
    padded.chars().skip(skip).collect()
}

/// Regular expression source derived from a date format, wrapped in one
/// capturing group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompiledRule {
    pattern: String,
}

impl CompiledRule {
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Build the regex for this rule
    ///
    /// Compiling the rule never fails, but the pattern it yields may not be
    /// a valid regular expression, e.g. when a year constraint contains an
    /// unbalanced parenthesis.
    pub fn to_regex(&self) -> Result<Regex, ViewerError> {
        Regex::new(&self.pattern).map_err(|source| ViewerError::InvalidRule {
            pattern: self.pattern.clone(),
            source,
        })
    }
}

impl fmt::Display for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn field_pattern(field: DateField, constraint: Option<&str>) -> String {
    match constraint {
        None => field.unconstrained_pattern().to_string(),
        Some(value) if field.is_zero_padded() => pad_two(value),
        Some(value) => value.to_string(),
    }
}

/// Compile a date format and its field constraints into a matching rule
///
/// Slashes and square brackets are escaped first, since the unconstrained
/// substitutions introduce brackets of their own. The six specifiers are
/// then replaced everywhere they occur, in `d m Y H i s` order.
pub fn compile(format: &str, spec: &DateFormatSpec) -> CompiledRule {
    let mut rule = replace_all(format, "/", "\\/");
    rule = replace_all(&rule, "[", "\\[");
    rule = replace_all(&rule, "]", "\\]");

    for field in DateField::ALL {
        let replacement = field_pattern(field, spec.get(field));
        rule = replace_all(&rule, field.specifier(), &replacement);
    }

    let rule = CompiledRule {
        pattern: format!("({rule})"),
    };
    tracing::debug!(format, pattern = %rule, "compiled date format");
    rule
}
