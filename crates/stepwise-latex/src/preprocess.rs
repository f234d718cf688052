//! Input normalization applied before parsing.

/// Spacing commands removed from the input, longest first.
const SPACING_WORDS: [&str; 2] = ["\\qquad", "\\quad"];

/// Spacing commands made of a backslash and one symbol.
const SPACING_SYMBOLS: [char; 4] = [',', ':', ';', '!'];

/// Strips spacing escapes and normalizes `{=}` to `=`.
#[must_use]
pub fn preprocess(input: &str) -> String {
    let stripped = strip_spacing(input);
    normalize_braced_equals(&stripped).trim().to_string()
}

fn strip_spacing(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    'outer: while let Some(c) = rest.chars().next() {
        if c == '\\' {
            for word in SPACING_WORDS {
                if let Some(after) = rest.strip_prefix(word) {
                    if !after.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
                        out.push(' ');
                        rest = after;
                        continue 'outer;
                    }
                }
            }
            let mut chars = rest[1..].chars();
            if let Some(next) = chars.next() {
                if SPACING_SYMBOLS.contains(&next) {
                    out.push(' ');
                    rest = &rest[1 + next.len_utf8()..];
                    continue;
                }
                // Keep escaped pairs together so `\\,` is not read as `\` + `\,`.
                out.push(c);
                out.push(next);
                rest = &rest[1 + next.len_utf8()..];
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn normalize_braced_equals(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        if c == '{' {
            let inner = rest[1..].trim_start();
            if let Some(after_eq) = inner.strip_prefix('=') {
                if let Some(after) = after_eq.trim_start().strip_prefix('}') {
                    out.push('=');
                    rest = after;
                    continue;
                }
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Splits at the only `=` outside of braces, if there is exactly one.
#[must_use]
pub fn split_top_level_equals(input: &str) -> Option<(&str, &str)> {
    let mut depth: i32 = 0;
    let mut found = None;
    for (i, c) in input.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            '=' if depth == 0 => {
                if found.is_some() {
                    return None;
                }
                found = Some(i);
            }
            _ => {}
        }
    }
    found.map(|i| (&input[..i], &input[i + 1..]))
}
