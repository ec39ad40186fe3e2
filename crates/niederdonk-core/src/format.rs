//! Presentation adapters shared by both calculators.
//!
//! All formatters take `Decimal`, which has no NaN or infinity, so the only
//! failure mode a float-based formatter would have is ruled out by the type.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

const ONE_MILLION: Decimal = dec!(1000000);

/// Number formatting convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// `1.234.567 €`, `36,7 %`, `22,33 Mio. €`
    #[default]
    De,
    /// `€1,234,567`, `36.7%`, `€22.33m`
    En,
}

impl Locale {
    fn thousands_separator(self) -> char {
        match self {
            Locale::De => '.',
            Locale::En => ',',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            Locale::De => ',',
            Locale::En => '.',
        }
    }
}

/// Format a number with grouping and a fixed number of decimals.
///
/// Rounds half away from zero. A value that rounds to zero is printed
/// without a sign.
pub fn format_number(value: Decimal, decimals: u32, locale: Locale) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.*}", decimals as usize, rounded.abs());

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, locale.thousands_separator()));
    if let Some(frac) = frac_part.filter(|f| !f.is_empty()) {
        out.push(locale.decimal_separator());
        out.push_str(frac);
    }
    out
}

/// Whole-euro currency: `1.234.567 €` / `€1,234,567`.
pub fn format_currency(value: Money, locale: Locale) -> String {
    let number = format_number(value, 0, locale);
    match locale {
        Locale::De => format!("{number} €"),
        Locale::En => prefix_symbol(&number, "€"),
    }
}

/// Currency per square metre, used for sale price, build cost and break-even.
pub fn format_currency_per_m2(value: Money, locale: Locale) -> String {
    format!("{}/m²", format_currency(value, locale))
}

/// Percentage with one decimal: `36,7 %` / `36.7%`.
pub fn format_percent(value: Percent, locale: Locale) -> String {
    format_percent_dp(value, 1, locale)
}

pub fn format_percent_dp(value: Percent, decimals: u32, locale: Locale) -> String {
    let number = format_number(value, decimals, locale);
    match locale {
        Locale::De => format!("{number} %"),
        Locale::En => format!("{number}%"),
    }
}

/// Millions with two decimals: `22,33 Mio. €` / `€22.33m`.
pub fn format_millions(value: Money, locale: Locale) -> String {
    let number = format_number(value / ONE_MILLION, 2, locale);
    match locale {
        Locale::De => format!("{number} Mio. €"),
        Locale::En => format!("{}m", prefix_symbol(&number, "€")),
    }
}

fn prefix_symbol(number: &str, symbol: &str) -> String {
    match number.strip_prefix('-') {
        Some(abs) => format!("-{symbol}{abs}"),
        None => format!("{symbol}{number}"),
    }
}

fn group_digits(int_part: &str, separator: char) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
