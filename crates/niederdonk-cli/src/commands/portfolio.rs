use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use niederdonk_core::portfolio::catalog::BuildingCatalog;
use niederdonk_core::portfolio::leverage::LeverageAssumptions;
use niederdonk_core::portfolio::masterplan::{self, MasterplanInput};
use niederdonk_core::portfolio::selection::Selection;

use crate::input;

/// Arguments for listing the building catalog
#[derive(Args)]
pub struct CatalogArgs {
    /// Path to a JSON catalog to validate and list instead of the project catalog
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the site-plan calculator
#[derive(Args)]
pub struct MasterplanArgs {
    /// Building group ids to include, comma-separated (default: all)
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Building group ids to leave out of the full selection
    #[arg(long, value_delimiter = ',', conflicts_with = "select")]
    pub exclude: Vec<String>,

    /// Equity ratio in percent, 0 to 100 (e.g. 30)
    #[arg(long)]
    pub equity_ratio: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 4.0)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_catalog(args: CatalogArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog: BuildingCatalog =
        input::load_input(args.input.as_deref())?.unwrap_or_else(BuildingCatalog::niederdonk);
    Ok(serde_json::to_value(catalog)?)
}

pub fn run_masterplan(args: MasterplanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mp_input: MasterplanInput = match input::load_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let catalog = BuildingCatalog::niederdonk();
            let selection = if !args.select.is_empty() {
                Some(Selection::from_ids(args.select))
            } else if !args.exclude.is_empty() {
                Some(Selection::from_ids(
                    catalog.ids().filter(|id| !args.exclude.iter().any(|x| x == id)),
                ))
            } else {
                None
            };

            let defaults = LeverageAssumptions::default();
            let leverage = LeverageAssumptions::new(
                args.equity_ratio.unwrap_or(defaults.equity_ratio_pct),
                args.interest_rate.unwrap_or(defaults.interest_rate_pct),
            )?;

            MasterplanInput {
                catalog: Some(catalog),
                selection,
                leverage,
            }
        }
    };

    let result = masterplan::calculate_masterplan(&mp_input)?;
    Ok(serde_json::to_value(result)?)
}
