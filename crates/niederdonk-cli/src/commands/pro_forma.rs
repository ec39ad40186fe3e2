use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use niederdonk_core::format::Locale;
use niederdonk_core::pro_forma::base_case::ProFormaBaseCase;
use niederdonk_core::pro_forma::engine::{self, ProFormaAssumptions, ProFormaEngine, ProFormaInput};
use niederdonk_core::pro_forma::summary::pro_forma_summary;

use crate::input;

/// The five quick-model sliders; unset flags keep the project defaults
#[derive(Args)]
pub struct AssumptionFlags {
    /// Sale price per m² in EUR (slider 5000 to 8000)
    #[arg(long)]
    pub sale_price: Option<Decimal>,

    /// Build cost per m² in EUR (slider 2400 to 3400)
    #[arg(long)]
    pub build_cost: Option<Decimal>,

    /// Equity ratio in percent (slider 10 to 50)
    #[arg(long)]
    pub equity_ratio: Option<Decimal>,

    /// Interest rate in percent (slider 2.0 to 7.0)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Project duration in years (slider 1.0 to 4.0)
    #[arg(long)]
    pub duration: Option<Decimal>,
}

impl AssumptionFlags {
    pub fn to_assumptions(&self) -> ProFormaAssumptions {
        let defaults = ProFormaAssumptions::default();
        ProFormaAssumptions {
            sale_price_per_m2: self.sale_price.unwrap_or(defaults.sale_price_per_m2),
            build_cost_per_m2: self.build_cost.unwrap_or(defaults.build_cost_per_m2),
            equity_ratio_pct: self.equity_ratio.unwrap_or(defaults.equity_ratio_pct),
            interest_rate_pct: self.interest_rate.unwrap_or(defaults.interest_rate_pct),
            duration_years: self.duration.unwrap_or(defaults.duration_years),
        }
    }
}

/// Arguments for the quick profitability model
#[derive(Args)]
pub struct ProFormaArgs {
    #[command(flatten)]
    pub assumptions: AssumptionFlags,

    /// Path to a JSON base case replacing the Niederdonk figures
    #[arg(long)]
    pub base_case: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LocaleArg {
    De,
    En,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::De => Locale::De,
            LocaleArg::En => Locale::En,
        }
    }
}

/// Arguments for the clipboard summary
#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub pro_forma: ProFormaArgs,

    /// Number formatting and label language
    #[arg(long, value_enum, default_value = "de")]
    pub locale: LocaleArg,
}

pub(crate) fn load_base_case(
    path: Option<&str>,
) -> Result<Option<ProFormaBaseCase>, Box<dyn std::error::Error>> {
    path.map(input::read_json_file::<ProFormaBaseCase>).transpose()
}

fn resolve_input(args: &ProFormaArgs) -> Result<ProFormaInput, Box<dyn std::error::Error>> {
    if let Some(parsed) = input::load_input(args.input.as_deref())? {
        return Ok(parsed);
    }
    Ok(ProFormaInput {
        base_case: load_base_case(args.base_case.as_deref())?,
        assumptions: args.assumptions.to_assumptions(),
    })
}

pub fn run_pro_forma(args: ProFormaArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pf_input = resolve_input(&args)?;
    let result = engine::analyze_pro_forma(&pf_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_summary(args: SummaryArgs) -> Result<String, Box<dyn std::error::Error>> {
    let pf_input = resolve_input(&args.pro_forma)?;
    let model = match pf_input.base_case {
        Some(base) => ProFormaEngine::new(base)?,
        None => ProFormaEngine::default(),
    };
    let result = model.compute(&pf_input.assumptions);
    Ok(pro_forma_summary(
        &pf_input.assumptions,
        &result,
        args.locale.into(),
    ))
}
