use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::NiederdonkError;
use crate::types::{Area, Money};
use crate::NiederdonkResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named cluster of units sharing economics (e.g. one apartment building).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingGroup {
    /// Stable key used by selections
    pub id: String,
    /// Display label
    pub label: String,
    /// Number of residential units in the group
    pub unit_count: u32,
    /// Total living area of the group in m²
    pub living_area_m2: Area,
    /// Total sale price of the group (not per unit)
    pub sale_price: Money,
    /// Total annual rent of the group
    pub annual_rent: Money,
}

/// The fixed, validated catalog of building groups for a project.
///
/// Deserialisation runs the same validation as [`BuildingCatalog::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BuildingGroup>", into = "Vec<BuildingGroup>")]
pub struct BuildingCatalog {
    groups: Vec<BuildingGroup>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl BuildingCatalog {
    /// Validate and wrap a list of building groups.
    ///
    /// Rejects empty or duplicate ids and negative area or money fields.
    pub fn new(groups: Vec<BuildingGroup>) -> NiederdonkResult<Self> {
        let mut seen = HashSet::with_capacity(groups.len());
        for group in &groups {
            if group.id.trim().is_empty() {
                return Err(NiederdonkError::invalid_input(
                    "id",
                    "Building group id must not be empty",
                ));
            }
            if !seen.insert(group.id.as_str()) {
                return Err(NiederdonkError::invalid_input(
                    "id",
                    format!("Duplicate building group id '{}'", group.id),
                ));
            }
            check_non_negative(&group.id, "living_area_m2", group.living_area_m2)?;
            check_non_negative(&group.id, "sale_price", group.sale_price)?;
            check_non_negative(&group.id, "annual_rent", group.annual_rent)?;
        }
        Ok(Self { groups })
    }

    /// Building groups of Quartier Niederdonk Living.
    ///
    /// 42 units on 3,250 m² living area, priced at 6,500 €/m² and let at
    /// 20 €/m² per month.
    pub fn niederdonk() -> Self {
        Self {
            groups: vec![
                group("reihenhaeuser", "Reihenhäuser", 6, dec!(810), dec!(5265000), dec!(194400)),
                group("haus-a", "Mehrfamilienhaus A", 14, dec!(980), dec!(6370000), dec!(235200)),
                group("haus-b", "Mehrfamilienhaus B", 14, dec!(960), dec!(6240000), dec!(230400)),
                group("stadtvillen", "Stadtvillen", 8, dec!(500), dec!(3250000), dec!(120000)),
            ],
        }
    }

    pub fn groups(&self) -> &[BuildingGroup] {
        &self.groups
    }

    pub fn get(&self, id: &str) -> Option<&BuildingGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for BuildingCatalog {
    fn default() -> Self {
        Self::niederdonk()
    }
}

impl TryFrom<Vec<BuildingGroup>> for BuildingCatalog {
    type Error = NiederdonkError;

    fn try_from(groups: Vec<BuildingGroup>) -> Result<Self, Self::Error> {
        Self::new(groups)
    }
}

impl From<BuildingCatalog> for Vec<BuildingGroup> {
    fn from(catalog: BuildingCatalog) -> Self {
        catalog.groups
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn group(
    id: &str,
    label: &str,
    unit_count: u32,
    living_area_m2: Area,
    sale_price: Money,
    annual_rent: Money,
) -> BuildingGroup {
    BuildingGroup {
        id: id.into(),
        label: label.into(),
        unit_count,
        living_area_m2,
        sale_price,
        annual_rent,
    }
}

fn check_non_negative(id: &str, field: &str, value: Decimal) -> NiederdonkResult<()> {
    if value < Decimal::ZERO {
        return Err(NiederdonkError::invalid_input(
            field,
            format!("Building group '{id}' has negative {field} ({value})"),
        ));
    }
    Ok(())
}
