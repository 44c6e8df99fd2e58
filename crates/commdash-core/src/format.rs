//! Display formatting for dashboard figures: currency, percentages, compact
//! numbers, and period-over-period change.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places used by [`format_percentage`] when the caller has no preference.
pub const DEFAULT_PERCENT_DECIMALS: usize = 1;

/// Fraction digits shown by [`format_number`] below the `K` threshold.
const PLAIN_NUMBER_MAX_DECIMALS: usize = 3;

/// Number and currency conventions for a display locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// BCP 47 tag, informational (e.g. `"en-ZA"`).
    pub tag: String,
    pub currency_symbol: String,
    /// Inserted between the currency symbol and the digits.
    pub symbol_separator: String,
    pub group_separator: String,
    pub decimal_separator: String,
    pub currency_decimals: usize,
}

impl Locale {
    /// South African Rand, as rendered by `en-ZA`: `R 1 234,56` with
    /// non-breaking spaces.
    pub fn en_za() -> Self {
        Self {
            tag: "en-ZA".into(),
            currency_symbol: "R".into(),
            symbol_separator: "\u{a0}".into(),
            group_separator: "\u{a0}".into(),
            decimal_separator: ",".into(),
            currency_decimals: 2,
        }
    }

    /// US dollars: `$1,234.56`.
    pub fn en_us() -> Self {
        Self {
            tag: "en-US".into(),
            currency_symbol: "$".into(),
            symbol_separator: String::new(),
            group_separator: ",".into(),
            decimal_separator: ".".into(),
            currency_decimals: 2,
        }
    }

    /// Pounds sterling: `£1,234.56`.
    pub fn en_gb() -> Self {
        Self {
            tag: "en-GB".into(),
            currency_symbol: "£".into(),
            symbol_separator: String::new(),
            group_separator: ",".into(),
            decimal_separator: ".".into(),
            currency_decimals: 2,
        }
    }

    /// Look up a built-in preset by tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "en-za" => Some(Self::en_za()),
            "en-us" => Some(Self::en_us()),
            "en-gb" => Some(Self::en_gb()),
            _ => None,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_za()
    }
}

/// Format an amount as currency in the given locale.
///
/// NaN renders as the symbol followed by `NaN`, infinities as `∞`. Amounts
/// that round to zero never carry a minus sign.
pub fn format_currency(amount: f64, locale: &Locale) -> String {
    let prefix = format!("{}{}", locale.currency_symbol, locale.symbol_separator);
    if amount.is_nan() {
        return format!("{prefix}NaN");
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{sign}{prefix}∞");
    }

    let (negative, body) = render_fixed(amount, locale.currency_decimals, locale, false);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{prefix}{body}")
}

/// Fixed-point percentage: `format_percentage(12.345, 1)` → `"12.3%"`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{}%", to_fixed(value, decimals))
}

/// Compact number: `B`/`M`/`K` suffix with one decimal at the inclusive
/// thresholds 1e9/1e6/1e3, grouped digits below.
pub fn format_number(num: f64, locale: &Locale) -> String {
    if num >= 1e9 {
        format!("{}B", to_fixed(num / 1e9, 1))
    } else if num >= 1e6 {
        format!("{}M", to_fixed(num / 1e6, 1))
    } else if num >= 1e3 {
        format!("{}K", to_fixed(num / 1e3, 1))
    } else if num.is_nan() {
        "NaN".into()
    } else if num.is_infinite() {
        // Only -∞ reaches this branch.
        "-∞".into()
    } else {
        let (negative, body) = render_fixed(num, PLAIN_NUMBER_MAX_DECIMALS, locale, true);
        if negative { format!("-{body}") } else { body }
    }
}

/// Percentage change from `previous` to `current`.
///
/// A zero baseline has no defined ratio; the dashboard reports `100` when the
/// figure grew from nothing and `0` otherwise.
#[allow(clippy::float_cmp)]
pub fn calculate_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Render `|value|` with `decimals` fraction digits using the locale's
/// separators. Returns whether a minus sign is due.
fn render_fixed(value: f64, decimals: usize, locale: &Locale, trim: bool) -> (bool, String) {
    let fixed = to_fixed_shortest(value.abs(), decimals);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = if trim {
        frac_part.trim_end_matches('0')
    } else {
        frac_part
    };

    let mut out = group_integer(int_part, &locale.group_separator);
    if !frac.is_empty() {
        out.push_str(&locale.decimal_separator);
        out.push_str(frac);
    }

    let nonzero = fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    (value < 0.0 && nonzero, out)
}

/// `value` with exactly `decimals` fraction digits, rounding the exact binary
/// value. Exact midpoints round away from zero, so `0.125` becomes `0.13`
/// where `{:.2}` would give `0.12`, while `1.005` (stored just below the
/// midpoint) becomes `1.00`.
fn to_fixed(value: f64, decimals: usize) -> String {
    round_half_away(Decimal::from_f64_retain(value), value, decimals)
}

/// Like [`to_fixed`] but rounds the shortest decimal that reads back as
/// `value`, the way locale-aware number formatting does: `1.005` becomes
/// `1.01`.
fn to_fixed_shortest(value: f64, decimals: usize) -> String {
    round_half_away(value.to_string().parse().ok(), value, decimals)
}

/// Magnitudes outside `Decimal`'s range keep the standard formatter.
fn round_half_away(decimal: Option<Decimal>, value: f64, decimals: usize) -> String {
    let Some(decimal) = decimal else {
        return format!("{value:.decimals$}");
    };
    let scale = u32::try_from(decimals).unwrap_or(u32::MAX);
    let rounded = decimal.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.decimals$}")
}

/// Insert `separator` between every group of three digits, right to left.
fn group_integer(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + (len / 3) * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
