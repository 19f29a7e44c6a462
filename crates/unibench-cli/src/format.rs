//! Shared display helpers for table output.

use serde::Serialize;

/// Render a count with thousands separators, e.g. `593,000`.
pub(crate) fn fmt_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render an optional count, returning `"N/A"` when unknown.
pub(crate) fn fmt_optional(value: Option<u64>) -> String {
    value.map_or_else(|| "N/A".to_string(), fmt_count)
}

/// Signed difference with separators, e.g. `+578,000` or `-3,000`.
pub(crate) fn fmt_signed(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let magnitude = fmt_count(value.abs().round() as u64);
    if value < 0.0 {
        format!("-{magnitude}")
    } else {
        format!("+{magnitude}")
    }
}

pub(crate) fn fmt_percent(value: f64) -> String {
    format!("{value:+.1}%")
}

pub(crate) fn fmt_ratio(value: f64) -> String {
    format!("{value:.2}x")
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
