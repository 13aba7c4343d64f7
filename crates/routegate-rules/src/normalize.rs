//! Field normalizers
//!
//! Turn raw text input into the value stored in the form. Numeric parsing
//! follows the lenient "leading integer" convention: surrounding whitespace
//! and trailing garbage are ignored, so `"80px"` reads as `80`.

use serde::Serialize;

/// Parse the leading integer of `value`, if any
fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // saturate instead of failing on absurdly long input
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Clamp a port into `0..=65535`; `None` when the input is not a number
pub fn normalize_port(value: &str) -> Option<u16> {
    parse_leading_int(value).map(|port| port.clamp(0, u16::MAX as i64) as u16)
}

pub fn normalize_number(value: &str) -> Option<i64> {
    parse_leading_int(value)
}

/// Empty CPU quantities mean "unset"
pub fn normalize_cpu(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

/// Strip leading zeros; an empty or all-zero quantity means "unset"
pub fn normalize_memory(value: &str) -> Option<String> {
    let stripped = value.trim_start_matches('0');
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.to_string())
}

/// Checkbox text values are truthy when non-empty
pub fn normalize_boolean(value: &str) -> bool {
    !value.is_empty()
}

/// Keep the previous host list when the input is not a list
pub fn normalize_hosts(values: Option<Vec<String>>, previous: &[String]) -> Vec<String> {
    values.unwrap_or_else(|| previous.to_vec())
}

/// A value that is either a positive number or a purely alphabetic name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NumberOrAlphabet {
    Number(i64),
    Alphabet(String),
    Empty,
}

/// Accept positive numbers (e.g. a port) or alphabetic names (e.g. a named port)
pub fn normalize_number_or_alphabet(value: &str) -> NumberOrAlphabet {
    if let Some(number) = parse_leading_int(value).filter(|n| *n > 0) {
        return NumberOrAlphabet::Number(number);
    }

    if value.chars().all(|c| c.is_ascii_alphabetic()) {
        return NumberOrAlphabet::Alphabet(value.to_string());
    }

    NumberOrAlphabet::Empty
}
