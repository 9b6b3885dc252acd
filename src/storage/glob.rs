//! Glob matching of object keys
//!
//! A location such as `s3a://bucket/song_data/*/*/*/*.json` is split at its
//! first segment holding a glob character. The part before becomes a
//! [`StorageLocation`](super::StorageLocation) to list; the rest is compiled
//! to a [`GlobPattern`] matched against keys relative to that base.

use crate::error::{Error, Result};
use regex::Regex;

const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// Split a location into its literal base and its glob pattern, if any
///
/// The bucket or container of a cloud URL must be literal.
pub fn split_glob(location: &str) -> Result<(String, Option<String>)> {
    let (head, path) = match location.split_once("://") {
        Some((scheme, rest)) => {
            let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
            if bucket.contains(GLOB_CHARS) {
                return Err(glob_error(location, "bucket name cannot contain glob characters"));
            }
            (format!("{scheme}://{bucket}"), key)
        }
        None => (String::new(), location),
    };

    let segments: Vec<&str> = path.split('/').collect();
    let Some(first_glob) = segments.iter().position(|s| s.contains(GLOB_CHARS)) else {
        return Ok((location.trim_end_matches('/').to_string(), None));
    };

    let literal = segments[..first_glob].join("/");
    let pattern = segments[first_glob..].join("/");

    let base = if head.is_empty() {
        match literal.as_str() {
            "" if path.starts_with('/') => "/".to_string(),
            "" => ".".to_string(),
            _ => literal,
        }
    } else if literal.is_empty() {
        head
    } else {
        format!("{head}/{literal}")
    };

    Ok((base, Some(pattern)))
}

/// A compiled glob over `/`-separated relative keys
///
/// Supports `*` and `?` within one segment, `**` as a whole segment for any
/// depth, `[...]` / `[!...]` classes and `{a,b}` alternation.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    pattern: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&glob_to_regex(pattern)?)?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Matches every key at any depth
    pub fn any() -> Result<Self> {
        Self::new("**")
    }

    /// Matches exactly one key, with no glob interpretation
    pub fn literal(key: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^{}$", regex::escape(key)))?;
        Ok(Self {
            pattern: key.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, relative_key: &str) -> bool {
        self.regex.is_match(relative_key)
    }
}

/// Whether any segment of a relative key starts with `_` or `.`
///
/// Such objects are bookkeeping files (`_SUCCESS`, `.crc`, ...) rather than
/// data.
pub fn is_hidden(relative_key: &str) -> bool {
    relative_key
        .split('/')
        .any(|segment| segment.starts_with('_') || segment.starts_with('.'))
}

fn glob_to_regex(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut in_braces = false;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let segment_start = i == 0 || chars[i - 1] == '/';
                match chars.get(i + 2) {
                    Some('/') if segment_start => {
                        out.push_str("(?:[^/]*/)*");
                        i += 3;
                    }
                    None if segment_start => {
                        out.push_str(".*");
                        i += 2;
                    }
                    _ => return Err(glob_error(pattern, "'**' must be a whole path segment")),
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|offset| i + 1 + offset)
                    .ok_or_else(|| glob_error(pattern, "unterminated character class"))?;
                let mut class = &chars[i + 1..close];
                out.push('[');
                if let Some(('!' | '^', rest)) = class.split_first() {
                    out.push('^');
                    class = rest;
                }
                if class.is_empty() {
                    return Err(glob_error(pattern, "empty character class"));
                }
                for &c in class {
                    if matches!(c, '\\' | '[' | '&' | '~') {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push(']');
                i = close + 1;
                continue;
            }
            '{' if in_braces => return Err(glob_error(pattern, "nested '{' is not supported")),
            '{' => {
                in_braces = true;
                out.push_str("(?:");
            }
            '}' if in_braces => {
                in_braces = false;
                out.push(')');
            }
            ',' if in_braces => out.push('|'),
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    if in_braces {
        return Err(glob_error(pattern, "unterminated '{'"));
    }
    out.push('$');
    Ok(out)
}

fn glob_error(pattern: &str, message: &str) -> Error {
    Error::Glob {
        pattern: pattern.to_string(),
        message: message.to_string(),
    }
}
