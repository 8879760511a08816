//! Locale money parsing and formatting.
//!
//! Amounts use the source locale convention: `.` groups thousands and `,`
//! separates decimals, always with a `$` prefix (`$1.435`, `$159,40`).

use serde::{Deserialize, Serialize};

/// Input to [`parse`]: either free text typed by the user or an already numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawAmount<'a> {
    Text(&'a str),
    Number(f64),
}

impl<'a> From<&'a str> for RawAmount<'a> {
    fn from(text: &'a str) -> Self {
        RawAmount::Text(text)
    }
}

impl<'a> From<&'a String> for RawAmount<'a> {
    fn from(text: &'a String) -> Self {
        RawAmount::Text(text.as_str())
    }
}

impl From<f64> for RawAmount<'_> {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

/// Input could not be read as a money amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("not a money amount: {input:?}")]
pub struct ParseFailure {
    pub input: String,
}

/// Parse a locale-formatted amount.
///
/// Strips `$` and whitespace, drops `.` thousands separators and reads `,`
/// as the decimal point. Numbers pass through unchanged. Non-finite values
/// are rejected.
pub fn parse<'a>(input: impl Into<RawAmount<'a>>) -> Result<f64, ParseFailure> {
    match input.into() {
        RawAmount::Number(value) if value.is_finite() => Ok(value),
        RawAmount::Number(value) => Err(ParseFailure {
            input: value.to_string(),
        }),
        RawAmount::Text(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| *c != '$' && *c != '.' && !c.is_whitespace())
                .map(|c| if c == ',' { '.' } else { c })
                .collect();

            match cleaned.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(ParseFailure {
                    input: text.to_string(),
                }),
            }
        }
    }
}

/// Parse an amount, falling back to 0.0 on failure.
pub fn parse_or_zero<'a>(input: impl Into<RawAmount<'a>>) -> f64 {
    parse(input).unwrap_or(0.0)
}

/// Format an amount for display.
///
/// Values of at least 1000 in magnitude are shown without decimals, smaller
/// ones with two. Non-finite values render as a `$`-prefixed literal.
pub fn format(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }

    let decimals = if value.abs() >= 1000.0 { 0 } else { 2 };
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::with_capacity(rendered.len() + 4);
    out.push('$');
    // Rounding can turn -0.001 into "0.00"; keep the sign off zero.
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Format user text: parseable text is normalized, anything else is echoed with a `$` prefix.
pub fn format_text(text: &str) -> String {
    match parse(text) {
        Ok(value) => format(value),
        Err(_) => format!("${}", text),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
