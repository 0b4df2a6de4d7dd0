use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use prop_deal_core::market::{analyze_market, SimulatedTransactions, DEFAULT_LOOKBACK_MONTHS};

use crate::commands::CategoryArg;

/// Arguments for the market comparison
#[derive(Args)]
pub struct MarketArgs {
    /// Target asking price in SGD
    #[arg(long)]
    pub price: Decimal,

    /// Target floor area in square feet
    #[arg(long)]
    pub area: Decimal,

    /// Postal district (1-28)
    #[arg(long)]
    pub district: u8,

    /// Property category of the comparables
    #[arg(long, default_value = "condo")]
    pub category: CategoryArg,

    /// Lookback window in months
    #[arg(long, default_value_t = DEFAULT_LOOKBACK_MONTHS)]
    pub lookback: u32,
}

pub fn run_market(args: MarketArgs) -> Result<Value, Box<dyn std::error::Error>> {
    // No live feed is wired up yet; the deterministic simulator stands in.
    let source = SimulatedTransactions::default();
    let result = analyze_market(
        args.price,
        args.area,
        args.district,
        args.category.into(),
        &source,
        args.lookback,
    )?;
    Ok(serde_json::to_value(result)?)
}
