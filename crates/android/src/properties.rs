//! `.properties` file parsing
//!
//! Reads the line-oriented format Gradle uses for `key.properties`, following
//! `java.util.Properties.load`: `#`/`!` comments, `=`/`:`/whitespace
//! separators, backslash line continuations and escapes.
//!
//! A UTF-8 byte-order mark is deliberately kept as part of the first key, the
//! same as a `Reader` over the raw file would see it.

use crate::error::{Result, SigningError};
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed key/value pairs from a properties source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

#[allow(clippy::len_without_is_empty)]
impl Properties {
    /// Parse properties text. Later duplicate keys overwrite earlier ones.
    pub fn parse(input: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for (line, logical) in logical_lines(input) {
            let (key, value) = split_entry(&logical);
            let key = unescape(key).map_err(|message| SigningError::Syntax { line, message })?;
            let value =
                unescape(value).map_err(|message| SigningError::Syntax { line, message })?;
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    /// Read and parse a properties file.
    ///
    /// The file is read into memory in one call, so the handle is closed before
    /// parsing starts.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| SigningError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let text = std::str::from_utf8(&bytes).map_err(|e| {
            let valid = &bytes[..e.valid_up_to()];
            SigningError::PropertiesParse {
                path: path.to_path_buf(),
                line: valid.iter().filter(|b| **b == b'\n').count() + 1,
                message: "invalid UTF-8".to_string(),
            }
        })?;

        Self::parse(text).map_err(|e| match e {
            SigningError::Syntax { line, message } => SigningError::PropertiesParse {
                path: path.to_path_buf(),
                line,
                message,
            },
            other => other,
        })
    }

    /// Look up a value by exact key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Split on `\n`, `\r` and `\r\n`.
fn physical_lines(input: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = input.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&input[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&input[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(&input[start..]);
    }

    lines
}

fn ends_with_odd_backslashes(s: &str) -> bool {
    s.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Join continuation lines and drop comments and blank lines.
///
/// Yields the 1-based physical line number each logical line starts on.
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let physical = physical_lines(input);
    let mut logical = Vec::new();
    let mut i = 0;

    while i < physical.len() {
        let start = i;
        let first = physical[i].trim_start_matches(is_blank);
        i += 1;

        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }

        let mut line = String::new();
        let mut current = first;
        loop {
            if !ends_with_odd_backslashes(current) {
                line.push_str(current);
                break;
            }
            line.push_str(&current[..current.len() - 1]);
            match physical.get(i) {
                Some(next) => {
                    current = next.trim_start_matches(is_blank);
                    i += 1;
                }
                None => break,
            }
        }

        logical.push((start + 1, line));
    }

    logical
}

/// Split a logical line into its raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (idx, c) in line.char_indices() {
        if !escaped && (c == '=' || c == ':') {
            key_end = idx;
            value_start = idx + 1;
            has_separator = true;
            break;
        }
        if !escaped && is_blank(c) {
            key_end = idx;
            value_start = idx + 1;
            break;
        }
        escaped = c == '\\' && !escaped;
    }

    let rest = &line[value_start..];
    let mut offset = 0;
    for (idx, c) in rest.char_indices() {
        if is_blank(c) {
            offset = idx + c.len_utf8();
            continue;
        }
        if !has_separator && (c == '=' || c == ':') {
            has_separator = true;
            offset = idx + 1;
            continue;
        }
        offset = idx;
        break;
    }
    if rest[offset..].chars().all(is_blank) {
        offset = rest.len();
    }

    (&line[..key_end], &rest[offset..])
}

/// Resolve backslash escapes, including `\uXXXX` with surrogate pairs.
fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_code_unit(&mut chars)?;
                if (0xD800..0xDC00).contains(&unit) {
                    let mut lookahead = chars.clone();
                    let low = match (lookahead.next(), lookahead.next()) {
                        (Some('\\'), Some('u')) => read_code_unit(&mut lookahead).ok(),
                        _ => None,
                    };
                    match low {
                        Some(low) if (0xDC00..0xE000).contains(&low) => {
                            let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                            out.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                            chars = lookahead;
                        }
                        _ => out.push('\u{FFFD}'),
                    }
                } else {
                    out.push(char::from_u32(unit).unwrap_or('\u{FFFD}'));
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_code_unit(chars: &mut std::str::Chars<'_>) -> std::result::Result<u32, String> {
    let mut unit = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| "Malformed \\uxxxx encoding".to_string())?;
        unit = (unit << 4) | digit;
    }
    Ok(unit)
}
