use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use prop_deal_core::config::AnalyzerConfig;
use prop_deal_core::deal::analyze_deal;
use prop_deal_core::{PropertyCategory, PropertyListing};

use crate::commands::{BuyerArg, CategoryArg};
use crate::input;

/// Arguments for the full deal analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON file with the property listing
    #[arg(long)]
    pub input: Option<String>,

    /// Asking price in SGD
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Floor area in square feet
    #[arg(long)]
    pub area: Option<Decimal>,

    /// Postal district (1-28)
    #[arg(long)]
    pub district: Option<u8>,

    /// Property category
    #[arg(long)]
    pub category: Option<CategoryArg>,

    /// Remaining lease years for leasehold properties
    #[arg(long)]
    pub lease_years: Option<u32>,

    /// Monthly maintenance fee, if known
    #[arg(long)]
    pub maintenance: Option<Decimal>,

    /// Buyer profile for additional duty and the LTV tier
    #[arg(long, default_value = "citizen-first")]
    pub buyer: BuyerArg,

    /// Treat as a public-housing purchase (waives agent commission, may grant)
    #[arg(long)]
    pub public_housing: bool,

    /// Annual mortgage interest rate override (e.g. 0.035)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan tenure override in years
    #[arg(long)]
    pub tenure_years: Option<u32>,

    /// Legal fee estimate override
    #[arg(long)]
    pub legal_fees: Option<Decimal>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let listing: PropertyListing = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PropertyListing {
            price: Some(
                args.price
                    .ok_or("--price is required (or provide --input)")?,
            ),
            floor_area_sqft: args.area,
            lease_years_remaining: args.lease_years,
            category: args.category.map(Into::into),
            district: args.district,
            maintenance_fee: args.maintenance,
            ..Default::default()
        }
    };

    let mut config = AnalyzerConfig::from_env()?;
    if let Some(rate) = args.interest_rate {
        config.interest_rate = rate;
    }
    if let Some(years) = args.tenure_years {
        config.loan_tenure_years = years;
    }
    if let Some(fees) = args.legal_fees {
        config.legal_fees = fees;
    }

    let is_public_housing = args.public_housing
        || matches!(listing.category, Some(PropertyCategory::PublicHousing));

    let result = analyze_deal(&listing, args.buyer.into(), is_public_housing, &config)?;
    Ok(serde_json::to_value(result)?)
}
