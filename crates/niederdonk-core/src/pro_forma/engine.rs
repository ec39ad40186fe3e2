use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::base_case::ProFormaBaseCase;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};
use crate::NiederdonkResult;

// ---------------------------------------------------------------------------
// Model constants
// ---------------------------------------------------------------------------

/// Debt share never exceeds 95%: at least 5% equity is assumed for
/// financing cost, however low the slider goes.
pub const MAX_DEBT_SHARE: Decimal = dec!(0.95);

/// Average outstanding balance over the drawdown period as a share of the
/// full loan (straight-line assumption, not an amortisation schedule).
pub const AVERAGE_BALANCE_FACTOR: Decimal = dec!(0.5);

/// Buffer per m² at which the indicative confidence score saturates.
pub const CONFIDENCE_BUFFER_SCALE: Money = dec!(2000);

const CONFIDENCE_EXPONENT: Decimal = dec!(0.8);
const HUNDRED: Decimal = dec!(100);

/// Slider ranges of the quick model. The engine computes outside them too;
/// they only drive warnings.
pub const SALE_PRICE_RANGE: (Money, Money) = (dec!(5000), dec!(8000));
pub const BUILD_COST_RANGE: (Money, Money) = (dec!(2400), dec!(3400));
pub const EQUITY_RATIO_RANGE: (Percent, Percent) = (dec!(10), dec!(50));
pub const INTEREST_RATE_RANGE: (Percent, Percent) = (dec!(2.0), dec!(7.0));
pub const DURATION_RANGE: (Years, Years) = (dec!(1.0), dec!(4.0));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The five sliders of the quick profitability model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProFormaAssumptions {
    pub sale_price_per_m2: Money,
    pub build_cost_per_m2: Money,
    pub equity_ratio_pct: Percent,
    pub interest_rate_pct: Percent,
    pub duration_years: Years,
}

impl Default for ProFormaAssumptions {
    fn default() -> Self {
        Self {
            sale_price_per_m2: dec!(6500),
            build_cost_per_m2: dec!(2800),
            equity_ratio_pct: dec!(30),
            interest_rate_pct: dec!(3.5),
            duration_years: dec!(2.0),
        }
    }
}

impl ProFormaAssumptions {
    /// Sliders sitting at the base case's own sale price and build cost.
    pub fn at_base_case(base: &ProFormaBaseCase) -> Self {
        Self {
            sale_price_per_m2: base.base_sale_price_per_m2,
            build_cost_per_m2: base.base_construction_per_m2,
            ..Self::default()
        }
    }

    /// Names and values of assumptions outside the slider ranges.
    pub fn out_of_range(&self) -> Vec<String> {
        let checks = [
            ("sale_price_per_m2", self.sale_price_per_m2, SALE_PRICE_RANGE),
            ("build_cost_per_m2", self.build_cost_per_m2, BUILD_COST_RANGE),
            ("equity_ratio_pct", self.equity_ratio_pct, EQUITY_RATIO_RANGE),
            ("interest_rate_pct", self.interest_rate_pct, INTEREST_RATE_RANGE),
            ("duration_years", self.duration_years, DURATION_RANGE),
        ];
        checks
            .iter()
            .filter(|(_, value, (lo, hi))| value < lo || value > hi)
            .map(|(name, value, (lo, hi))| format!("{name} = {value} is outside {lo}..{hi}"))
            .collect()
    }
}

/// Derived profitability figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProFormaResult {
    pub revenue: Money,
    /// Base GKI without financing, with the construction line rescaled
    pub non_financing_cost: Money,
    pub financing_cost: Money,
    pub total_investment: Money,
    /// Earnings before tax
    pub ebt: Money,
    /// EBT / total investment * 100; zero when the investment is not positive
    pub roi_pct: Percent,
    /// Sale price per m² at which EBT is exactly zero
    pub break_even_price_per_m2: Money,
    /// Sale price minus break-even price, per m²
    pub buffer_per_m2: Money,
    /// Debt share after the 95% cap
    pub debt_share: Decimal,
    /// Indicative only, in [0, 1]; not a financial metric
    pub confidence: Decimal,
}

/// Input for [`analyze_pro_forma`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProFormaInput {
    /// Project base case; Niederdonk when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_case: Option<ProFormaBaseCase>,
    #[serde(default)]
    pub assumptions: ProFormaAssumptions,
}

/// Pro-forma engine bound to a validated base case.
///
/// Construction is the only fallible step; [`ProFormaEngine::compute`]
/// handles every slider value through clamps and guards.
#[derive(Debug, Clone)]
pub struct ProFormaEngine {
    base: ProFormaBaseCase,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl ProFormaEngine {
    pub fn new(base: ProFormaBaseCase) -> NiederdonkResult<Self> {
        if let Err(e) = base.validate() {
            log::warn!("rejecting pro-forma base case: {e}");
            return Err(e);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &ProFormaBaseCase {
        &self.base
    }

    pub fn compute(&self, a: &ProFormaAssumptions) -> ProFormaResult {
        let base = &self.base;

        let revenue = base
            .living_area_m2
            .saturating_mul(a.sale_price_per_m2)
            .saturating_add(base.parking_revenue);

        // Multiply before dividing so whole-euro ratios stay exact.
        let scaled_construction = saturating_div(
            base.base_construction_total.saturating_mul(a.build_cost_per_m2),
            base.base_construction_per_m2,
        );
        let non_financing_cost = base
            .base_non_financing_cost()
            .saturating_sub(base.base_construction_total)
            .saturating_add(scaled_construction);

        let debt_share = debt_share(a.equity_ratio_pct);
        let financing_cost = non_financing_cost
            .saturating_mul(debt_share)
            .saturating_mul(a.interest_rate_pct / HUNDRED)
            .saturating_mul(a.duration_years)
            .saturating_mul(AVERAGE_BALANCE_FACTOR);

        let total_investment = non_financing_cost.saturating_add(financing_cost);
        let ebt = revenue.saturating_sub(total_investment);

        let roi_pct = if total_investment > Decimal::ZERO {
            saturating_div(ebt, total_investment).saturating_mul(HUNDRED)
        } else {
            Decimal::ZERO
        };

        let break_even_price_per_m2 = saturating_div(
            total_investment.saturating_sub(base.parking_revenue),
            base.living_area_m2,
        );
        let buffer_per_m2 = a.sale_price_per_m2.saturating_sub(break_even_price_per_m2);

        ProFormaResult {
            revenue,
            non_financing_cost,
            financing_cost,
            total_investment,
            ebt,
            roi_pct,
            break_even_price_per_m2,
            buffer_per_m2,
            debt_share,
            confidence: confidence_score(buffer_per_m2),
        }
    }
}

/// Division that pins to `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
/// Callers guarantee a non-zero divisor.
fn saturating_div(numerator: Decimal, divisor: Decimal) -> Decimal {
    numerator.checked_div(divisor).unwrap_or_else(|| {
        if numerator.is_sign_negative() == divisor.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

impl Default for ProFormaEngine {
    fn default() -> Self {
        Self {
            base: ProFormaBaseCase::niederdonk(),
        }
    }
}

/// One-shot convenience: validate `base` and compute.
pub fn compute_pro_forma(
    base: &ProFormaBaseCase,
    assumptions: &ProFormaAssumptions,
) -> NiederdonkResult<ProFormaResult> {
    Ok(ProFormaEngine::new(base.clone())?.compute(assumptions))
}

/// `1 - equity/100`, clamped to `[0, MAX_DEBT_SHARE]`.
pub fn debt_share(equity_ratio_pct: Percent) -> Decimal {
    Decimal::ONE
        .saturating_sub(equity_ratio_pct / HUNDRED)
        .clamp(Decimal::ZERO, MAX_DEBT_SHARE)
}

/// `clamp(buffer / 2000, 0, 1) ^ 0.8`, a cosmetic gauge value.
pub fn confidence_score(buffer_per_m2: Money) -> Decimal {
    let ratio = (buffer_per_m2 / CONFIDENCE_BUFFER_SCALE).clamp(Decimal::ZERO, Decimal::ONE);
    if ratio.is_zero() || ratio == Decimal::ONE {
        return ratio;
    }
    ratio.checked_powd(CONFIDENCE_EXPONENT).unwrap_or(ratio)
}

/// Run the quick model and wrap it in the computation envelope.
pub fn analyze_pro_forma(input: &ProFormaInput) -> NiederdonkResult<ComputationOutput<ProFormaResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let engine = match &input.base_case {
        Some(base) => ProFormaEngine::new(base.clone())?,
        None => ProFormaEngine::default(),
    };
    let a = &input.assumptions;

    for out_of_range in a.out_of_range() {
        warnings.push(format!("Assumption {out_of_range}; result is extrapolated"));
    }
    if Decimal::ONE.saturating_sub(a.equity_ratio_pct / HUNDRED) > MAX_DEBT_SHARE {
        warnings.push(format!(
            "Equity ratio {}% is below the 5% floor; financing cost uses a {} debt share",
            a.equity_ratio_pct, MAX_DEBT_SHARE
        ));
    }

    let result = engine.compute(a);

    if result.ebt < Decimal::ZERO {
        warnings.push(format!(
            "Negative EBT: sale price {} is below the break-even price {}",
            a.sale_price_per_m2,
            result.break_even_price_per_m2.round_dp(0)
        ));
    }

    log::debug!(
        "pro forma on {} m²: revenue {}, investment {}, roi {}%",
        engine.base().living_area_m2,
        result.revenue,
        result.total_investment.round_dp(0),
        result.roi_pct.round_dp(2)
    );

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Pro-Forma Profitability (scaled construction cost, average-balance financing)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NiederdonkError;

    fn engine() -> ProFormaEngine {
        ProFormaEngine::new(ProFormaBaseCase::niederdonk()).unwrap()
    }

    #[test]
    fn test_default_assumptions() {
        let r = engine().compute(&ProFormaAssumptions::default());

        assert_eq!(r.revenue, dec!(22325000));
        assert_eq!(r.non_financing_cost, dec!(15944000));
        assert_eq!(r.debt_share, dec!(0.70));
        // 15,944,000 * 0.70 * 0.035 * 2.0 * 0.5
        assert_eq!(r.financing_cost, dec!(390628));
        assert_eq!(r.total_investment, dec!(16334628));
        assert_eq!(r.ebt, dec!(5990372));
        assert!((r.roi_pct - dec!(36.6728)).abs() < dec!(0.001), "roi {}", r.roi_pct);
    }

    #[test]
    fn test_break_even_and_buffer() {
        let r = engine().compute(&ProFormaAssumptions::default());
        // (16,334,628 - 1,200,000) / 3250
        let expected = dec!(15134628) / dec!(3250);
        assert!((r.break_even_price_per_m2 - expected).abs() < dec!(0.000000001));
        assert!((r.buffer_per_m2 - (dec!(6500) - expected)).abs() < dec!(0.000000001));
        assert!((r.break_even_price_per_m2 - dec!(4656.81)).abs() < dec!(0.01));
    }

    #[test]
    fn test_construction_scales_linearly() {
        let a = ProFormaAssumptions {
            build_cost_per_m2: dec!(3000),
            ..Default::default()
        };
        let r = engine().compute(&a);
        // 9,100,000 * 3000 / 2800 = 9,750,000
        assert_eq!(r.non_financing_cost, dec!(15944000) + dec!(650000));
    }

    #[test]
    fn test_debt_share_clamps() {
        assert_eq!(debt_share(dec!(0)), dec!(0.95));
        assert_eq!(debt_share(dec!(5)), dec!(0.95));
        assert_eq!(debt_share(dec!(10)), dec!(0.9));
        assert_eq!(debt_share(dec!(100)), Decimal::ZERO);
        assert_eq!(debt_share(dec!(150)), Decimal::ZERO);
    }

    #[test]
    fn test_full_equity_has_no_financing_cost() {
        let a = ProFormaAssumptions {
            equity_ratio_pct: dec!(100),
            ..Default::default()
        };
        let r = engine().compute(&a);
        assert_eq!(r.financing_cost, Decimal::ZERO);
        assert_eq!(r.total_investment, r.non_financing_cost);
    }

    #[test]
    fn test_confidence_score() {
        assert_eq!(confidence_score(dec!(-500)), Decimal::ZERO);
        assert_eq!(confidence_score(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(confidence_score(dec!(2000)), Decimal::ONE);
        assert_eq!(confidence_score(dec!(5000)), Decimal::ONE);
        // 0.5 ^ 0.8 = 0.574349...
        let half = confidence_score(dec!(1000));
        assert!((half - dec!(0.574349)).abs() < dec!(0.0001), "confidence {half}");
    }

    #[test]
    fn test_invalid_base_case_rejected_at_construction() {
        let base = ProFormaBaseCase {
            living_area_m2: Decimal::ZERO,
            ..ProFormaBaseCase::niederdonk()
        };
        assert!(matches!(
            ProFormaEngine::new(base),
            Err(NiederdonkError::Configuration { .. })
        ));
    }

    #[test]
    fn test_analyze_default_has_no_warnings() {
        let out = analyze_pro_forma(&ProFormaInput::default()).unwrap();
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert_eq!(out.result.ebt, dec!(5990372));
    }

    #[test]
    fn test_analyze_warns_on_extreme_sliders() {
        let input = ProFormaInput {
            base_case: None,
            assumptions: ProFormaAssumptions {
                sale_price_per_m2: dec!(4000),
                equity_ratio_pct: dec!(2),
                ..Default::default()
            },
        };
        let out = analyze_pro_forma(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("sale_price_per_m2")));
        assert!(out.warnings.iter().any(|w| w.contains("5% floor")));
        assert!(out.warnings.iter().any(|w| w.contains("Negative EBT")));
        assert_eq!(out.result.debt_share, MAX_DEBT_SHARE);
    }

    #[test]
    fn test_analyze_rejects_invalid_base_case() {
        let input = ProFormaInput {
            base_case: Some(ProFormaBaseCase {
                base_construction_per_m2: dec!(-1),
                ..ProFormaBaseCase::niederdonk()
            }),
            assumptions: ProFormaAssumptions::default(),
        };
        assert!(analyze_pro_forma(&input).is_err());
    }

    #[test]
    fn test_huge_sliders_saturate_instead_of_overflowing() {
        let sale = engine().compute(&ProFormaAssumptions {
            sale_price_per_m2: Decimal::from_i128_with_scale(10_i128.pow(26), 0),
            ..Default::default()
        });
        assert_eq!(sale.revenue, Decimal::MAX);
        assert_eq!(sale.ebt, Decimal::MAX - sale.total_investment);
        assert_eq!(sale.confidence, Decimal::ONE);

        let cost = engine().compute(&ProFormaAssumptions {
            build_cost_per_m2: Decimal::from_i128_with_scale(10_i128.pow(23), 0),
            interest_rate_pct: Decimal::MAX,
            duration_years: Decimal::MAX,
            ..Default::default()
        });
        // the financing product pins at Decimal::MAX before the 0.5 factor
        assert_eq!(cost.financing_cost, Decimal::MAX * AVERAGE_BALANCE_FACTOR);
        assert!(cost.total_investment > cost.revenue);
        assert!(cost.ebt < Decimal::ZERO);
        assert!(cost.roi_pct <= Decimal::ZERO);
        assert_eq!(cost.confidence, Decimal::ZERO);
    }

    #[test]
    fn test_analyze_survives_huge_build_cost() {
        let input = ProFormaInput {
            base_case: None,
            assumptions: ProFormaAssumptions {
                build_cost_per_m2: Decimal::from_i128_with_scale(10_i128.pow(23), 0),
                ..Default::default()
            },
        };
        let out = analyze_pro_forma(&input).unwrap();
        assert!(out.result.ebt < Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("Negative EBT")));
    }

    #[test]
    fn test_engine_exposes_its_base_case() {
        let base = ProFormaBaseCase {
            parking_revenue: Decimal::ZERO,
            ..ProFormaBaseCase::niederdonk()
        };
        let model = ProFormaEngine::new(base.clone()).unwrap();
        assert_eq!(model.base(), &base);
        let r = model.compute(&ProFormaAssumptions::at_base_case(model.base()));
        assert_eq!(r.revenue, dec!(21125000));
    }

    #[test]
    fn test_out_of_range_lists_each_field() {
        let a = ProFormaAssumptions {
            duration_years: dec!(5),
            interest_rate_pct: dec!(1.5),
            ..Default::default()
        };
        let names = a.out_of_range();
        assert_eq!(names.len(), 2);
        assert!(names[0].starts_with("interest_rate_pct"));
        assert!(names[1].starts_with("duration_years"));
    }
}
