use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::aggregate::PortfolioTotals;
use crate::error::NiederdonkError;
use crate::types::{Money, Percent};
use crate::NiederdonkResult;

const HUNDRED: Decimal = dec!(100);

/// Financing sliders of the masterplan calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageAssumptions {
    /// Equity share of the purchase price, 0 to 100
    pub equity_ratio_pct: Percent,
    /// Annual interest on the loan, 0 to 8 on the slider
    pub interest_rate_pct: Percent,
}

impl LeverageAssumptions {
    pub fn new(equity_ratio_pct: Percent, interest_rate_pct: Percent) -> NiederdonkResult<Self> {
        let assumptions = Self {
            equity_ratio_pct,
            interest_rate_pct,
        };
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Boundary check for values that did not come through [`Self::new`]
    /// (deserialised input).
    pub fn validate(&self) -> NiederdonkResult<()> {
        if self.equity_ratio_pct < Decimal::ZERO || self.equity_ratio_pct > HUNDRED {
            return Err(NiederdonkError::invalid_input(
                "equity_ratio_pct",
                format!("Equity ratio must be between 0 and 100, got {}", self.equity_ratio_pct),
            ));
        }
        if self.interest_rate_pct < Decimal::ZERO {
            return Err(NiederdonkError::invalid_input(
                "interest_rate_pct",
                format!("Interest rate cannot be negative, got {}", self.interest_rate_pct),
            ));
        }
        Ok(())
    }
}

impl Default for LeverageAssumptions {
    fn default() -> Self {
        Self {
            equity_ratio_pct: dec!(30),
            interest_rate_pct: dec!(4.0),
        }
    }
}

/// Loan and cashflow derived from the selected portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageResult {
    pub loan_amount: Money,
    pub annual_financing_cost: Money,
    /// Rent minus financing cost; negative values are reported as-is
    pub net_cashflow: Money,
}

/// Derive loan, interest and net cashflow.
///
/// No clamping happens here: equity ratio bounds belong to the input
/// boundary ([`LeverageAssumptions::validate`]).
pub fn compute_leverage(totals: &PortfolioTotals, assumptions: &LeverageAssumptions) -> LeverageResult {
    let loan_amount = totals
        .total_price
        .saturating_mul(Decimal::ONE.saturating_sub(assumptions.equity_ratio_pct / HUNDRED));
    let annual_financing_cost = loan_amount.saturating_mul(assumptions.interest_rate_pct) / HUNDRED;
    let net_cashflow = totals.total_annual_rent.saturating_sub(annual_financing_cost);

    LeverageResult {
        loan_amount,
        annual_financing_cost,
        net_cashflow,
    }
}
