use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::aggregate::{aggregate_portfolio, PortfolioTotals};
use super::catalog::BuildingCatalog;
use super::leverage::{compute_leverage, LeverageAssumptions, LeverageResult};
use super::selection::Selection;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::NiederdonkResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the site-plan calculator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterplanInput {
    /// Building groups; the Niederdonk catalog when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<BuildingCatalog>,
    /// Selected group ids; every group when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
    /// Equity ratio and interest rate sliders
    #[serde(default)]
    pub leverage: LeverageAssumptions,
}

/// Output of the site-plan calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterplanOutput {
    /// Ids that contributed to the totals, in catalog order
    pub selected_groups: Vec<String>,
    pub totals: PortfolioTotals,
    pub leverage: LeverageResult,
    /// Total price / total area, zero for an empty selection
    pub average_price_per_m2: Money,
    /// Annual rent / total price * 100, zero when the price is zero
    pub gross_yield_pct: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Aggregate the selected building groups and derive loan and cashflow.
pub fn calculate_masterplan(
    input: &MasterplanInput,
) -> NiederdonkResult<ComputationOutput<MasterplanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.leverage.validate()?;

    let catalog = input.catalog.clone().unwrap_or_default();
    let selection = input
        .selection
        .clone()
        .unwrap_or_else(|| Selection::all(&catalog));

    let unknown = selection.unknown_ids(&catalog);
    if !unknown.is_empty() {
        warnings.push(format!(
            "Ignoring ids not present in the catalog: {}",
            unknown.join(", ")
        ));
    }

    let selected_groups: Vec<String> = catalog
        .ids()
        .filter(|id| selection.contains(id))
        .map(String::from)
        .collect();
    if selected_groups.is_empty() {
        warnings.push("No building groups selected, all totals are zero".into());
    }

    let totals = aggregate_portfolio(&catalog, &selection);
    let leverage = compute_leverage(&totals, &input.leverage);

    if leverage.net_cashflow < Decimal::ZERO {
        warnings.push(format!(
            "Net cashflow is negative ({}): financing cost exceeds rental income",
            leverage.net_cashflow.round_dp(0)
        ));
    }

    let gross_yield_pct = if totals.total_price.is_zero() {
        Decimal::ZERO
    } else {
        totals
            .total_annual_rent
            .checked_div(totals.total_price)
            .unwrap_or(Decimal::MAX)
            .saturating_mul(dec!(100))
    };

    log::debug!(
        "masterplan: {} groups, price {}, net cashflow {}",
        selected_groups.len(),
        totals.total_price,
        leverage.net_cashflow
    );

    let output = MasterplanOutput {
        selected_groups,
        average_price_per_m2: totals.average_price_per_m2(),
        gross_yield_pct,
        totals,
        leverage,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Masterplan Portfolio Aggregation with Leverage",
        input,
        warnings,
        elapsed,
        output,
    ))
}
