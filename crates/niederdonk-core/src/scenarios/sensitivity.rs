use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::NiederdonkError;
use crate::pro_forma::base_case::ProFormaBaseCase;
use crate::pro_forma::engine::{ProFormaAssumptions, ProFormaEngine};
use crate::types::*;
use crate::NiederdonkResult;

const MAX_POINTS_PER_AXIS: usize = 200;

/// Inclusive sweep from `min` to `max` in `step` increments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

impl SweepRange {
    pub fn sale_price_default() -> Self {
        Self {
            min: dec!(5000),
            max: dec!(8000),
            step: dec!(500),
        }
    }

    pub fn build_cost_default() -> Self {
        Self {
            min: dec!(2400),
            max: dec!(3400),
            step: dec!(200),
        }
    }
}

/// Input for the sale price x build cost grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProFormaSensitivityInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_case: Option<ProFormaBaseCase>,
    /// Equity, interest and duration are held at these values; the two swept
    /// fields also mark the highlighted cell
    #[serde(default)]
    pub assumptions: ProFormaAssumptions,
    #[serde(default = "SweepRange::sale_price_default")]
    pub sale_price_per_m2: SweepRange,
    #[serde(default = "SweepRange::build_cost_default")]
    pub build_cost_per_m2: SweepRange,
}

impl Default for ProFormaSensitivityInput {
    fn default() -> Self {
        Self {
            base_case: None,
            assumptions: ProFormaAssumptions::default(),
            sale_price_per_m2: SweepRange::sale_price_default(),
            build_cost_per_m2: SweepRange::build_cost_default(),
        }
    }
}

/// Output of the sale price x build cost grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProFormaSensitivityOutput {
    pub sale_price_values: Vec<Money>,
    pub build_cost_values: Vec<Money>,
    /// ebt_matrix[i][j] = EBT at sale_price_values[i], build_cost_values[j]
    pub ebt_matrix: Vec<Vec<Money>>,
    pub roi_matrix: Vec<Vec<Percent>>,
    /// EBT at the current assumptions (not snapped to the grid)
    pub current_ebt: Money,
    /// Grid cell closest to the current assumptions (row, col)
    pub current_position: (usize, usize),
    /// Number of cells with negative EBT
    pub loss_cells: usize,
}

/// Generate the sweep values from min to max with step; max is always included.
fn generate_sweep_values(name: &str, range: &SweepRange) -> NiederdonkResult<Vec<Decimal>> {
    if range.step <= Decimal::ZERO {
        return Err(NiederdonkError::invalid_input(name, "Step must be positive"));
    }
    if range.min > range.max {
        return Err(NiederdonkError::invalid_input(name, "Min must be <= max"));
    }

    let mut values = Vec::new();
    let mut current = range.min;
    while current <= range.max {
        if values.len() == MAX_POINTS_PER_AXIS {
            return Err(NiederdonkError::invalid_input(
                name,
                format!("Sweep exceeds {MAX_POINTS_PER_AXIS} points, use a larger step"),
            ));
        }
        values.push(current);
        match current.checked_add(range.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    if let Some(&last) = values.last() {
        if last < range.max {
            values.push(range.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| v.saturating_sub(target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Evaluate EBT and ROI over a sale price x build cost grid.
pub fn pro_forma_sensitivity(
    input: &ProFormaSensitivityInput,
) -> NiederdonkResult<ComputationOutput<ProFormaSensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let engine = match &input.base_case {
        Some(base) => ProFormaEngine::new(base.clone())?,
        None => ProFormaEngine::default(),
    };

    let sale_price_values = generate_sweep_values("sale_price_per_m2", &input.sale_price_per_m2)?;
    let build_cost_values = generate_sweep_values("build_cost_per_m2", &input.build_cost_per_m2)?;

    let mut ebt_matrix = Vec::with_capacity(sale_price_values.len());
    let mut roi_matrix = Vec::with_capacity(sale_price_values.len());
    let mut loss_cells = 0;

    for &sale_price in &sale_price_values {
        let mut ebt_row = Vec::with_capacity(build_cost_values.len());
        let mut roi_row = Vec::with_capacity(build_cost_values.len());
        for &build_cost in &build_cost_values {
            let point = ProFormaAssumptions {
                sale_price_per_m2: sale_price,
                build_cost_per_m2: build_cost,
                ..input.assumptions.clone()
            };
            let r = engine.compute(&point);
            if r.ebt < Decimal::ZERO {
                loss_cells += 1;
            }
            ebt_row.push(r.ebt);
            roi_row.push(r.roi_pct);
        }
        ebt_matrix.push(ebt_row);
        roi_matrix.push(roi_row);
    }

    if loss_cells > 0 {
        warnings.push(format!(
            "{loss_cells} of {} scenarios produce negative EBT",
            sale_price_values.len() * build_cost_values.len()
        ));
    }

    let current_ebt = engine.compute(&input.assumptions).ebt;
    let current_position = (
        closest_index(&sale_price_values, input.assumptions.sale_price_per_m2),
        closest_index(&build_cost_values, input.assumptions.build_cost_per_m2),
    );

    let output = ProFormaSensitivityOutput {
        sale_price_values,
        build_cost_values,
        ebt_matrix,
        roi_matrix,
        current_ebt,
        current_position,
        loss_cells,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Pro-Forma Sensitivity (sale price x build cost)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_values_include_max() {
        let range = SweepRange {
            min: dec!(2400),
            max: dec!(3400),
            step: dec!(300),
        };
        let values = generate_sweep_values("x", &range).unwrap();
        assert_eq!(
            values,
            vec![dec!(2400), dec!(2700), dec!(3000), dec!(3300), dec!(3400)]
        );
    }

    #[test]
    fn test_sweep_single_point() {
        let range = SweepRange {
            min: dec!(6500),
            max: dec!(6500),
            step: dec!(100),
        };
        assert_eq!(generate_sweep_values("x", &range).unwrap(), vec![dec!(6500)]);
    }

    #[test]
    fn test_sweep_rejects_bad_ranges() {
        let zero_step = SweepRange {
            min: dec!(1),
            max: dec!(2),
            step: Decimal::ZERO,
        };
        assert!(generate_sweep_values("x", &zero_step).is_err());

        let inverted = SweepRange {
            min: dec!(3),
            max: dec!(2),
            step: dec!(1),
        };
        assert!(generate_sweep_values("x", &inverted).is_err());

        let too_fine = SweepRange {
            min: dec!(5000),
            max: dec!(8000),
            step: dec!(1),
        };
        assert!(generate_sweep_values("x", &too_fine).is_err());
    }

    #[test]
    fn test_sweep_stops_at_decimal_max() {
        let range = SweepRange {
            min: Decimal::MAX - dec!(1),
            max: Decimal::MAX,
            step: Decimal::MAX,
        };
        assert_eq!(
            generate_sweep_values("x", &range).unwrap(),
            vec![Decimal::MAX - dec!(1), Decimal::MAX]
        );
    }

    #[test]
    fn test_default_grid_shape_and_position() {
        let out = pro_forma_sensitivity(&ProFormaSensitivityInput::default()).unwrap();
        let res = &out.result;
        assert_eq!(res.sale_price_values.len(), 7);
        assert_eq!(res.build_cost_values.len(), 6);
        assert_eq!(res.ebt_matrix.len(), 7);
        assert!(res.ebt_matrix.iter().all(|row| row.len() == 6));
        // 6500 is index 3 of 5000..8000/500, 2800 is index 2 of 2400..3400/200
        assert_eq!(res.current_position, (3, 2));
        assert_eq!(res.ebt_matrix[3][2], res.current_ebt);
        assert_eq!(res.current_ebt, dec!(5990372));
    }

    #[test]
    fn test_grid_monotone() {
        let out = pro_forma_sensitivity(&ProFormaSensitivityInput::default()).unwrap();
        let m = &out.result.ebt_matrix;
        for i in 0..m.len() {
            for j in 0..m[i].len() {
                if j + 1 < m[i].len() {
                    assert!(m[i][j + 1] < m[i][j], "EBT must fall with build cost");
                }
                if i + 1 < m.len() {
                    assert!(m[i + 1][j] > m[i][j], "EBT must rise with sale price");
                }
            }
        }
    }

    #[test]
    fn test_loss_cells_warned() {
        let input = ProFormaSensitivityInput {
            sale_price_per_m2: SweepRange {
                min: dec!(3000),
                max: dec!(4000),
                step: dec!(500),
            },
            ..Default::default()
        };
        let out = pro_forma_sensitivity(&input).unwrap();
        assert!(out.result.loss_cells > 0);
        assert!(!out.warnings.is_empty());
    }
}
