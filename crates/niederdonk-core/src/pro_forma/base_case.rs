use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::NiederdonkError;
use crate::types::{Area, Money};
use crate::NiederdonkResult;

/// Reference economics of the whole project.
///
/// `base_financing_cost` is already contained in `base_total_investment`
/// (GKI). Zoning, legal and date fields are descriptive and never enter the
/// calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProFormaBaseCase {
    /// Sellable living area in m²
    pub living_area_m2: Area,
    /// Revenue from parking spaces, independent of the m² price
    pub parking_revenue: Money,
    /// Sale price per m² the base case was planned with
    pub base_sale_price_per_m2: Money,
    /// Total investment cost (GKI), financing included
    pub base_total_investment: Money,
    /// Construction line item of the GKI
    pub base_construction_total: Money,
    /// Construction cost per m² behind `base_construction_total`
    pub base_construction_per_m2: Money,
    /// Financing line item of the GKI
    pub base_financing_cost: Money,
    pub unit_count: u32,
    /// Site coverage ratio (GRZ)
    pub site_coverage_ratio: Decimal,
    /// Floor area ratio (GFZ)
    pub floor_area_ratio: Decimal,
    /// Planning-law basis of the building permit
    pub legal_basis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_submitted: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permit_expected: Option<NaiveDate>,
}

impl ProFormaBaseCase {
    /// Base case of Quartier Niederdonk Living.
    pub fn niederdonk() -> Self {
        Self {
            living_area_m2: dec!(3250),
            parking_revenue: dec!(1200000),
            base_sale_price_per_m2: dec!(6500),
            base_total_investment: dec!(16544000),
            base_construction_total: dec!(9100000),
            base_construction_per_m2: dec!(2800),
            base_financing_cost: dec!(600000),
            unit_count: 42,
            site_coverage_ratio: dec!(0.4),
            floor_area_ratio: dec!(1.2),
            legal_basis: "§ 34 BauGB".into(),
            application_submitted: NaiveDate::from_ymd_opt(2024, 9, 30),
            permit_expected: NaiveDate::from_ymd_opt(2025, 6, 30),
        }
    }

    /// Structural preconditions of the engine. Violations are configuration
    /// errors, not user-input errors.
    pub fn validate(&self) -> NiederdonkResult<()> {
        if self.base_construction_per_m2 <= Decimal::ZERO {
            return Err(NiederdonkError::configuration(
                "base_construction_per_m2",
                "Base construction cost per m² must be positive (used as scaling divisor)",
            ));
        }
        if self.living_area_m2 <= Decimal::ZERO {
            return Err(NiederdonkError::configuration(
                "living_area_m2",
                "Living area must be positive (used for the break-even price)",
            ));
        }
        if self.base_total_investment < self.base_financing_cost {
            return Err(NiederdonkError::configuration(
                "base_total_investment",
                format!(
                    "Total investment ({}) cannot be below the financing cost it includes ({})",
                    self.base_total_investment, self.base_financing_cost
                ),
            ));
        }
        Ok(())
    }

    /// GKI without financing: land, construction, fees and the rest.
    pub fn base_non_financing_cost(&self) -> Money {
        self.base_total_investment.saturating_sub(self.base_financing_cost)
    }

    /// Base-case revenue at the planned sale price.
    pub fn base_revenue(&self) -> Money {
        self.living_area_m2
            .saturating_mul(self.base_sale_price_per_m2)
            .saturating_add(self.parking_revenue)
    }
}

impl Default for ProFormaBaseCase {
    fn default() -> Self {
        Self::niederdonk()
    }
}
