//! Shared URL/form parsing utilities for route handlers.

use std::str::FromStr;

use crate::error::{GameError, Result};

/// Parse URL-encoded form body into key-value pairs.
/// Handles `key=value&key2=value2` format (from HTMX POST bodies).
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let val = parts.next().unwrap_or("");
            Some((percent_decode(key), percent_decode(val)))
        })
        .collect()
}

/// Percent-decode a URL-encoded value.
pub fn percent_decode(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut bytes = input.bytes();
    while let Some(b) = bytes.next() {
        match b {
            b'%' => {
                let hi = bytes.next().unwrap_or(b'0');
                let lo = bytes.next().unwrap_or(b'0');
                match (hex_val(hi), hex_val(lo)) {
                    (Some(h), Some(l)) => result.push((h << 4 | l) as char),
                    _ => {
                        result.push('%');
                        result.push(hi as char);
                        result.push(lo as char);
                    }
                }
            }
            b'+' => result.push(' '),
            _ => result.push(b as char),
        }
    }
    result
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Helper to get a value by key from a list of key-value pairs.
pub fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Escape text for insertion into an HTML fragment.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Fetch and parse a required parameter.
pub fn parse_param<T: FromStr>(params: &[(String, String)], key: &'static str) -> Result<T> {
    let raw = get_param(params, key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(GameError::MissingParam(key))?;
    raw.parse().map_err(|_| GameError::InvalidParam {
        name: key,
        value: raw.to_string(),
    })
}

/// Read the host clock (`now`, milliseconds). `performance.now()` may arrive
/// with a fractional part, which is truncated.
pub fn parse_clock(params: &[(String, String)]) -> Result<u64> {
    match parse_param::<u64>(params, "now") {
        Ok(now) => Ok(now),
        Err(GameError::InvalidParam { name, value }) => match value.parse::<f64>() {
            Ok(ms) if ms.is_finite() && ms >= 0.0 => Ok(ms as u64),
            _ => Err(GameError::InvalidParam { name, value }),
        },
        Err(e) => Err(e),
    }
}
