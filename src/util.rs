// Utility helpers for number parsing and fixed-locale formatting.
//
// Everything that turns loosely typed farmer input into numbers, or numbers
// into report text, lives here so the engine and compiler can assume clean
// `f64` values.
use num_format::{Locale, ToFormattedString};

/// Currency prefix used throughout the report.
pub const CURRENCY_SYMBOL: &str = "R";

/// `chrono` format string for the generation timestamp on the title page.
pub const DATE_FORMAT: &str = "%d %B %Y %H:%M";

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in hand-entered budgets.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed or is not finite.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a formatted report amount back into a number, e.g. `R 1,250.00`,
/// `-R 40.00` or `94.00%`.
pub fn parse_amount(s: &str) -> Option<f64> {
    let s = s.trim();
    let (neg, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let rest = rest.trim_start_matches(CURRENCY_SYMBOL).trim_end_matches('%');
    let v = parse_f64_safe(Some(rest))?;
    Some(if neg { -v } else { v })
}

/// Replace `NaN` and the infinities with zero so nothing non-finite reaches
/// a summary or a rendered document.
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// `part` as a percentage of `whole`, or zero when `whole` is zero.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    finite_or_zero(part * 100.0 / whole)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let n = finite_or_zero(n);
    let s = format!("{:.*}", decimals, n.abs());
    // `-0.001` rounds to zero; print it without a sign.
    let neg = n < 0.0 && s.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = group_digits(int_part);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

// Groups an unsigned digit string with the locale's separator. Works on the
// text directly, so magnitudes past any integer type keep every digit.
fn group_digits(digits: &str) -> String {
    let sep = Locale::en.separator();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}

/// Two-decimal currency, sign in front of the symbol: `-R 1,250.00`.
pub fn format_currency(n: f64) -> String {
    let body = format_number(n, 2);
    match body.strip_prefix('-') {
        Some(abs) => format!("-{} {}", CURRENCY_SYMBOL, abs),
        None => format!("{} {}", CURRENCY_SYMBOL, body),
    }
}

/// Percentage with a fixed number of decimals: `94.00%`.
pub fn format_percent(n: f64, decimals: usize) -> String {
    format!("{}%", format_number(n, decimals))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
