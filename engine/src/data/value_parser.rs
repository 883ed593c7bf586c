// Locale-aware parsing of pt-BR currency cells ("R$ 1.200,50", "$-", "").
use std::str::FromStr;

/// Anything that may show up where an amount is expected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawAmount<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

impl<'a> From<&'a str> for RawAmount<'a> {
    fn from(text: &'a str) -> Self {
        RawAmount::Text(text)
    }
}

impl From<f64> for RawAmount<'_> {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl<'a> From<Option<&'a str>> for RawAmount<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(RawAmount::Missing, RawAmount::Text)
    }
}

/// Outcome of [`parse`]. Never an error: unusable input is reported as `Invalid`
/// and counts as zero wherever an amount is needed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedAmount {
    Value(f64),
    /// Blank cell, lone dash or missing value.
    Blank,
    /// Text that is not a number once separators and currency glyphs are removed.
    Invalid { raw: String },
}

impl ParsedAmount {
    pub fn amount(&self) -> f64 {
        match self {
            ParsedAmount::Value(value) => *value,
            ParsedAmount::Blank | ParsedAmount::Invalid { .. } => 0.0,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ParsedAmount::Invalid { .. })
    }
}

/// Strips currency glyphs and whitespace, drops every thousands "." and turns the
/// decimal "," into ".". Separators are handled in that order so "1.200,50" and
/// "1.200" both read as thousands.
pub fn normalize(text: &str) -> String {
    text.replace("R$", "")
        .chars()
        .filter(|c| *c != '$' && !c.is_whitespace())
        .filter(|c| *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

pub fn parse<'a>(raw: impl Into<RawAmount<'a>>) -> ParsedAmount {
    match raw.into() {
        RawAmount::Missing => ParsedAmount::Blank,
        RawAmount::Number(value) if value.is_finite() => ParsedAmount::Value(value),
        RawAmount::Number(value) => ParsedAmount::Invalid { raw: value.to_string() },
        RawAmount::Text(text) => {
            let normalized = normalize(text);
            if normalized.is_empty() || normalized == "-" {
                return ParsedAmount::Blank;
            }
            match f64::from_str(&normalized) {
                Ok(value) if value.is_finite() => ParsedAmount::Value(value),
                _ => ParsedAmount::Invalid { raw: text.to_string() },
            }
        }
    }
}
