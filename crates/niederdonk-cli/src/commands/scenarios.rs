use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use niederdonk_core::scenarios::sensitivity::{self, ProFormaSensitivityInput, SweepRange};

use super::pro_forma::{load_base_case, AssumptionFlags};
use crate::input;

/// Arguments for the sale price x build cost sensitivity grid
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub assumptions: AssumptionFlags,

    /// Lowest sale price per m² in the sweep
    #[arg(long)]
    pub sale_min: Option<Decimal>,

    /// Highest sale price per m² in the sweep
    #[arg(long)]
    pub sale_max: Option<Decimal>,

    /// Sale price step
    #[arg(long)]
    pub sale_step: Option<Decimal>,

    /// Lowest build cost per m² in the sweep
    #[arg(long)]
    pub cost_min: Option<Decimal>,

    /// Highest build cost per m² in the sweep
    #[arg(long)]
    pub cost_max: Option<Decimal>,

    /// Build cost step
    #[arg(long)]
    pub cost_step: Option<Decimal>,

    /// Path to a JSON base case replacing the Niederdonk figures
    #[arg(long)]
    pub base_case: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

fn sweep(
    defaults: SweepRange,
    min: Option<Decimal>,
    max: Option<Decimal>,
    step: Option<Decimal>,
) -> SweepRange {
    SweepRange {
        min: min.unwrap_or(defaults.min),
        max: max.unwrap_or(defaults.max),
        step: step.unwrap_or(defaults.step),
    }
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sens_input: ProFormaSensitivityInput = match input::load_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => ProFormaSensitivityInput {
            base_case: load_base_case(args.base_case.as_deref())?,
            assumptions: args.assumptions.to_assumptions(),
            sale_price_per_m2: sweep(
                SweepRange::sale_price_default(),
                args.sale_min,
                args.sale_max,
                args.sale_step,
            ),
            build_cost_per_m2: sweep(
                SweepRange::build_cost_default(),
                args.cost_min,
                args.cost_max,
                args.cost_step,
            ),
        },
    };

    let result = sensitivity::pro_forma_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}
