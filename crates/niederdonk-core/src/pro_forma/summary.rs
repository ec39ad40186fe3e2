//! Plain-text summary of a quick-model run, as copied to the clipboard.

use rust_decimal_macros::dec;

use super::engine::{ProFormaAssumptions, ProFormaResult};
use crate::format::{
    format_currency, format_currency_per_m2, format_number, format_percent, format_percent_dp,
    Locale,
};

struct Labels {
    title: &'static str,
    sale_price: &'static str,
    build_cost: &'static str,
    equity_ratio: &'static str,
    interest_rate: &'static str,
    duration: &'static str,
    years: &'static str,
    revenue: &'static str,
    total_investment: &'static str,
    of_which_financing: &'static str,
    ebt: &'static str,
    roi: &'static str,
    break_even: &'static str,
    buffer: &'static str,
    confidence: &'static str,
}

static DE: Labels = Labels {
    title: "Quartier Niederdonk Living: Schnellkalkulation",
    sale_price: "Verkaufspreis",
    build_cost: "Baukosten",
    equity_ratio: "Eigenkapitalquote",
    interest_rate: "Zinssatz",
    duration: "Laufzeit",
    years: "Jahre",
    revenue: "Erlös",
    total_investment: "Gesamtinvestition",
    of_which_financing: "davon Finanzierung",
    ebt: "Ergebnis vor Steuern",
    roi: "Rendite (ROI)",
    break_even: "Break-even-Preis",
    buffer: "Puffer",
    confidence: "Konfidenz (indikativ)",
};

static EN: Labels = Labels {
    title: "Quartier Niederdonk Living: quick model",
    sale_price: "Sale price",
    build_cost: "Build cost",
    equity_ratio: "Equity ratio",
    interest_rate: "Interest rate",
    duration: "Duration",
    years: "years",
    revenue: "Revenue",
    total_investment: "Total investment",
    of_which_financing: "of which financing",
    ebt: "EBT",
    roi: "ROI",
    break_even: "Break-even price",
    buffer: "Buffer",
    confidence: "Confidence (indicative)",
};

/// Build the multi-line summary: assumptions first, then results.
pub fn pro_forma_summary(
    assumptions: &ProFormaAssumptions,
    result: &ProFormaResult,
    locale: Locale,
) -> String {
    let l = match locale {
        Locale::De => &DE,
        Locale::En => &EN,
    };

    let lines = [
        l.title.to_string(),
        String::new(),
        format!("{}: {}", l.sale_price, format_currency_per_m2(assumptions.sale_price_per_m2, locale)),
        format!("{}: {}", l.build_cost, format_currency_per_m2(assumptions.build_cost_per_m2, locale)),
        format!("{}: {}", l.equity_ratio, format_percent(assumptions.equity_ratio_pct, locale)),
        format!("{}: {}", l.interest_rate, format_percent(assumptions.interest_rate_pct, locale)),
        format!(
            "{}: {} {}",
            l.duration,
            format_number(assumptions.duration_years, 1, locale),
            l.years
        ),
        String::new(),
        format!("{}: {}", l.revenue, format_currency(result.revenue, locale)),
        format!(
            "{}: {} ({} {})",
            l.total_investment,
            format_currency(result.total_investment, locale),
            l.of_which_financing,
            format_currency(result.financing_cost, locale)
        ),
        format!("{}: {}", l.ebt, format_currency(result.ebt, locale)),
        format!("{}: {}", l.roi, format_percent(result.roi_pct, locale)),
        format!("{}: {}", l.break_even, format_currency_per_m2(result.break_even_price_per_m2, locale)),
        format!("{}: {}", l.buffer, format_currency_per_m2(result.buffer_per_m2, locale)),
        format!(
            "{}: {}",
            l.confidence,
            format_percent_dp(result.confidence * dec!(100), 0, locale)
        ),
    ];

    lines.join("\n")
}
