use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::{BuildingCatalog, BuildingGroup};
use super::selection::Selection;
use crate::types::{Area, Money};

/// Sums over the selected building groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub total_price: Money,
    pub total_area: Area,
    pub total_annual_rent: Money,
    pub total_units: u32,
}

impl PortfolioTotals {
    fn with_group(mut self, group: &BuildingGroup) -> Self {
        self.total_price = self.total_price.saturating_add(group.sale_price);
        self.total_area = self.total_area.saturating_add(group.living_area_m2);
        self.total_annual_rent = self.total_annual_rent.saturating_add(group.annual_rent);
        self.total_units = self.total_units.saturating_add(group.unit_count);
        self
    }

    /// Sale price per m² of the selection, zero when nothing is selected.
    pub fn average_price_per_m2(&self) -> Money {
        if self.total_area.is_zero() {
            Decimal::ZERO
        } else {
            self.total_price
                .checked_div(self.total_area)
                .unwrap_or(Decimal::MAX)
        }
    }
}

/// Aggregate the catalog over a selection.
///
/// Walks the catalog rather than the selection, so ids the catalog does not
/// contain contribute nothing.
pub fn aggregate_portfolio(catalog: &BuildingCatalog, selection: &Selection) -> PortfolioTotals {
    catalog
        .groups()
        .iter()
        .filter(|g| selection.contains(&g.id))
        .fold(PortfolioTotals::default(), PortfolioTotals::with_group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_all_selected_equals_catalog_sum() {
        let catalog = BuildingCatalog::niederdonk();
        let totals = aggregate_portfolio(&catalog, &Selection::all(&catalog));
        assert_eq!(
            totals,
            PortfolioTotals {
                total_price: dec!(21125000),
                total_area: dec!(3250),
                total_annual_rent: dec!(780000),
                total_units: 42,
            }
        );
    }

    #[test]
    fn test_empty_selection_is_zero() {
        let catalog = BuildingCatalog::niederdonk();
        let totals = aggregate_portfolio(&catalog, &Selection::empty());
        assert_eq!(totals, PortfolioTotals::default());
        assert_eq!(totals.average_price_per_m2(), Decimal::ZERO);
    }

    #[test]
    fn test_subset_sums_only_selected_groups() {
        let catalog = BuildingCatalog::niederdonk();
        let selection = Selection::from_ids(["haus-a", "stadtvillen"]);
        let totals = aggregate_portfolio(&catalog, &selection);
        assert_eq!(totals.total_price, dec!(6370000) + dec!(3250000));
        assert_eq!(totals.total_area, dec!(1480));
        assert_eq!(totals.total_annual_rent, dec!(355200));
        assert_eq!(totals.total_units, 22);
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let catalog = BuildingCatalog::niederdonk();
        let with_ghost = Selection::from_ids(["haus-b", "ghost"]);
        let without = Selection::from_ids(["haus-b"]);
        assert_eq!(
            aggregate_portfolio(&catalog, &with_ghost),
            aggregate_portfolio(&catalog, &without)
        );
    }

    #[test]
    fn test_oversized_catalog_saturates() {
        let huge = |id: &str| BuildingGroup {
            id: id.into(),
            label: id.into(),
            unit_count: u32::MAX,
            living_area_m2: dec!(0.0001),
            sale_price: Decimal::MAX,
            annual_rent: Decimal::MAX,
        };
        let catalog = BuildingCatalog::new(vec![huge("a"), huge("b")]).unwrap();
        let totals = aggregate_portfolio(&catalog, &Selection::all(&catalog));
        assert_eq!(totals.total_units, u32::MAX);
        assert_eq!(totals.total_price, Decimal::MAX);
        assert_eq!(totals.total_annual_rent, Decimal::MAX);
        assert_eq!(totals.average_price_per_m2(), Decimal::MAX);
    }

    #[test]
    fn test_average_price_per_m2() {
        let catalog = BuildingCatalog::niederdonk();
        let totals = aggregate_portfolio(&catalog, &Selection::all(&catalog));
        assert_eq!(totals.average_price_per_m2(), dec!(6500));
    }
}
