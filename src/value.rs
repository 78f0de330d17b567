//! Typed conversions between setting lines and Rust values
//!
//! Every setting is stored as an ordered list of lines. Scalars occupy the
//! first line only:
//!
//! | Rust type | Stored as              | Read back when            |
//! |-----------|------------------------|---------------------------|
//! | `bool`    | `"True"` / `"False"`   | first line is `"True"`    |
//! | integers  | decimal digits         | first line parses         |
//! | `f64`     | shortest round-trip    | first line parses         |
//! | `String`  | the string itself      | at least one line exists  |
//!
//! Number formatting never depends on the host locale, so a value written on
//! one machine reads back identically on any other.

use std::str::FromStr;

/// Literal stored for `true`
pub const TRUE_LITERAL: &str = "True";

/// Literal stored for `false`
pub const FALSE_LITERAL: &str = "False";

/// A value that can be written to a setting
pub trait IntoSetting {
    /// Convert into the lines stored for this setting
    fn into_lines(self) -> Vec<String>;
}

/// A value that can be read back from a setting
///
/// Implementations return `None` for input they cannot interpret; callers
/// turn that into a sentinel instead of an error.
pub trait FromSetting: Sized {
    /// Parse the stored lines
    fn from_lines(lines: &[String]) -> Option<Self>;
}

// =============================================================================
// Writers
// =============================================================================

impl IntoSetting for Vec<String> {
    fn into_lines(self) -> Vec<String> {
        self
    }
}

impl IntoSetting for &[String] {
    fn into_lines(self) -> Vec<String> {
        self.to_vec()
    }
}

impl IntoSetting for &[&str] {
    fn into_lines(self) -> Vec<String> {
        self.iter().map(|s| (*s).to_string()).collect()
    }
}

impl<const N: usize> IntoSetting for [&str; N] {
    fn into_lines(self) -> Vec<String> {
        self.iter().map(|s| (*s).to_string()).collect()
    }
}

impl IntoSetting for String {
    fn into_lines(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoSetting for &str {
    fn into_lines(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoSetting for bool {
    fn into_lines(self) -> Vec<String> {
        let literal = if self { TRUE_LITERAL } else { FALSE_LITERAL };
        vec![literal.to_string()]
    }
}

macro_rules! display_setting {
    ($($ty:ty),*) => {
        $(
            impl IntoSetting for $ty {
                fn into_lines(self) -> Vec<String> {
                    vec![self.to_string()]
                }
            }

            impl FromSetting for $ty {
                fn from_lines(lines: &[String]) -> Option<Self> {
                    parse_first(lines)
                }
            }
        )*
    };
}

display_setting!(i32, i64, u32, f64);

// =============================================================================
// Readers
// =============================================================================

impl FromSetting for Vec<String> {
    fn from_lines(lines: &[String]) -> Option<Self> {
        Some(lines.to_vec())
    }
}

impl FromSetting for String {
    fn from_lines(lines: &[String]) -> Option<Self> {
        lines.first().cloned()
    }
}

impl FromSetting for bool {
    fn from_lines(lines: &[String]) -> Option<Self> {
        lines.first().map(|line| line == TRUE_LITERAL)
    }
}

fn parse_first<T: FromStr>(lines: &[String]) -> Option<T> {
    lines.first()?.trim().parse().ok()
}

// =============================================================================
// Line encoding
// =============================================================================

/// Separator between lines in the durable representation
pub const LINE_SEPARATOR: char = '\n';

/// Join lines into the single text value stored in the database.
///
/// An empty list has no text form and maps to `None` (SQL `NULL`), which
/// keeps it distinct from a list holding one empty line.
#[must_use]
pub fn join_lines(lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    let mut joined = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            joined.push(LINE_SEPARATOR);
        }
        joined.push_str(line);
    }
    Some(joined)
}

/// Split a stored text value back into lines (inverse of [`join_lines`])
#[must_use]
pub fn split_lines(value: Option<&str>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(text) => text.split(LINE_SEPARATOR).map(str::to_string).collect(),
    }
}
