use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Malformed number: '{0}'")]
    Malformed(String),
}

/// Parses an amount written with `.` as thousands separator and `,` as the
/// fraction separator, e.g. `-1.500,00` → `-1500.0`.
///
/// Anything that does not normalise to a plain signed decimal is rejected
/// instead of being coerced to zero.
pub fn parse_locale_number(s: &str) -> Result<f64, AmountError> {
    let trimmed = s.trim();
    let normalized = trimmed.replace('.', "").replace(',', ".");

    let has_digit = normalized.bytes().any(|b| b.is_ascii_digit());
    let plain = normalized
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+'));
    if !has_digit || !plain {
        return Err(AmountError::Malformed(trimmed.to_string()));
    }

    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AmountError::Malformed(trimmed.to_string()))
}

/// Renders a value in the same convention `parse_locale_number` reads, with
/// two fraction digits: `-1500.0` → `-1.500,00`.
pub fn format_locale_number(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped},{frac:02}")
}
