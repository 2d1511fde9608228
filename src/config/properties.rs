//! Flat `key=value` properties text format.
//!
//! Supports the usual conventions of `.properties` files: `#` and `!`
//! comment lines, `=`, `:` or whitespace as separator, trailing-backslash
//! line continuation, and backslash escapes including `\uXXXX`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Parses properties text into an ordered map. Later duplicates win.
#[must_use]
pub fn parse(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    for line in logical_lines(content) {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || is_comment(trimmed) {
            continue;
        }

        let (key, value) = split_key_value(trimmed);
        map.insert(unescape(key), unescape(value));
    }

    map
}

/// Serializes a map so that [`parse`] reads back the same entries.
#[must_use]
pub fn serialize(map: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in map {
        let _ = writeln!(out, "{}={}", escape(key, true), escape(value, false));
    }
    out
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with('!')
}

/// Joins continuation lines. A line continues when it ends in an odd number of backslashes.
///
/// Comment lines never continue.
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut continuing = false;

    for raw in content.lines() {
        if !continuing && is_comment(raw.trim_start()) {
            lines.push(raw.to_string());
            continue;
        }

        let part = if continuing { raw.trim_start() } else { raw };
        let trailing = part.chars().rev().take_while(|c| *c == '\\').count();

        if trailing % 2 == 1 {
            current.push_str(&part[..part.len() - 1]);
            continuing = true;
        } else {
            current.push_str(part);
            lines.push(std::mem::take(&mut current));
            continuing = false;
        }
    }

    if continuing {
        lines.push(current);
    }
    lines
}

/// Splits at the first unescaped `=`, `:` or whitespace; the value keeps its escapes.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            key_end = index;
            break;
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start();
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start();
    }
    (key, rest)
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());

    for (index, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' if is_key || index == 0 => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || index == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }

    out
}
