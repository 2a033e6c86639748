//! Axis-label number formatting
//!
//! Axis formats arrive as D3 format descriptors (the configuration surface
//! offers the usual `,d` / `.2f` / `.1%` style patterns) or the adaptive
//! `SMART_NUMBER` pseudo-format. The supported D3 subset is
//! `[$][,][.precision][~](d|f|%|s)`; anything unrecognized degrades to the
//! adaptive format rather than failing the transform.

use regex::Regex;
use std::sync::OnceLock;

/// SI prefixes by engineering exponent, ascending from 10^-9.
const SI_PREFIXES: &[(i32, &str)] = &[
    (-9, "n"),
    (-6, "µ"),
    (-3, "m"),
    (0, ""),
    (3, "k"),
    (6, "M"),
    (9, "G"),
    (12, "T"),
];

fn format_pattern_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\$)?(,)?(?:\.(\d+))?(~)?([dfs%])$").expect("valid regex"))
}

/// Numeric kind of a parsed D3 descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatKind {
    /// `d`: rounded integer
    Integer,
    /// `f`: fixed decimals
    Fixed,
    /// `%`: percentage of 1.0
    Percent,
    /// `s`: SI-prefixed
    Si,
}

/// Parsed D3 format descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct D3Format {
    dollar: bool,
    comma: bool,
    precision: Option<usize>,
    trim: bool,
    kind: FormatKind,
}

/// A resolved number formatter for axis labels and point labels.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberFormatter {
    /// Adaptive formatting: SI suffix (with `B` for billions) at three
    /// significant digits, trailing zeros trimmed.
    Smart,
    /// Parsed D3 descriptor.
    D3(D3Format),
}

impl NumberFormatter {
    /// Resolve a format descriptor. Empty, `SMART_NUMBER` and unparseable
    /// descriptors all resolve to the adaptive formatter.
    pub fn resolve(pattern: &str) -> Self {
        let trimmed = pattern.trim();
        if trimmed.is_empty() || trimmed == "SMART_NUMBER" {
            return NumberFormatter::Smart;
        }
        match format_pattern_re().captures(trimmed) {
            Some(caps) => {
                let kind = match caps.get(5).map(|m| m.as_str()) {
                    Some("d") => FormatKind::Integer,
                    Some("f") => FormatKind::Fixed,
                    Some("%") => FormatKind::Percent,
                    Some("s") => FormatKind::Si,
                    _ => return NumberFormatter::Smart,
                };
                NumberFormatter::D3(D3Format {
                    dollar: caps.get(1).is_some(),
                    comma: caps.get(2).is_some(),
                    precision: caps.get(3).and_then(|m| m.as_str().parse().ok()),
                    trim: caps.get(4).is_some(),
                    kind,
                })
            }
            None => NumberFormatter::Smart,
        }
    }

    /// Format one value.
    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        match self {
            NumberFormatter::Smart => smart_number(value),
            NumberFormatter::D3(descriptor) => descriptor.format(value),
        }
    }
}

impl D3Format {
    fn format(&self, value: f64) -> String {
        let body = match self.kind {
            FormatKind::Integer => {
                let rounded = format!("{:.0}", value);
                if self.comma {
                    group_thousands(&rounded)
                } else {
                    rounded
                }
            }
            FormatKind::Fixed => {
                let fixed = format!("{:.*}", self.precision.unwrap_or(6), value);
                if self.comma {
                    group_thousands(&fixed)
                } else {
                    fixed
                }
            }
            FormatKind::Percent => {
                let fixed = format!("{:.*}", self.precision.unwrap_or(6), value * 100.0);
                let grouped = if self.comma {
                    group_thousands(&fixed)
                } else {
                    fixed
                };
                format!("{}%", grouped)
            }
            FormatKind::Si => si_number(value, self.precision.unwrap_or(6), self.trim, false),
        };
        if self.dollar {
            prefix_currency(&body)
        } else {
            body
        }
    }
}

/// The adaptive `SMART_NUMBER` format: `.3~s` semantics with `B` standing in
/// for the giga prefix.
fn smart_number(value: f64) -> String {
    si_number(value, 3, true, true)
}

/// SI-prefixed rendering at `digits` significant digits.
fn si_number(value: f64, digits: usize, trim: bool, billions: bool) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return value.to_string();
    }
    let exponent = {
        let raw = (value.abs().log10() / 3.0).floor() as i32 * 3;
        raw.clamp(SI_PREFIXES[0].0, SI_PREFIXES[SI_PREFIXES.len() - 1].0)
    };
    let prefix = SI_PREFIXES
        .iter()
        .find(|(e, _)| *e == exponent)
        .map(|(_, p)| *p)
        .unwrap_or("");
    let scaled = value / 10f64.powi(exponent);
    let mut body = to_significant(scaled, digits);
    if trim {
        body = trim_trailing_zeros(&body);
    }
    let prefix = if billions && prefix == "G" { "B" } else { prefix };
    format!("{}{}", body, prefix)
}

/// Format to a fixed count of significant digits.
fn to_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, value)
}

fn trim_trailing_zeros(body: &str) -> String {
    if !body.contains('.') {
        return body.to_string();
    }
    body.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Insert thousands separators into the integer part of a plain decimal
/// rendering (sign and fraction preserved).
fn group_thousands(body: &str) -> String {
    let (sign, unsigned) = match body.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", body),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// `$` goes between the sign and the digits.
fn prefix_currency(body: &str) -> String {
    match body.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", body),
    }
}
