use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use prop_deal_core::config::AnalyzerConfig;
use prop_deal_core::financing::{
    debt_servicing_ratio, monthly_mortgage_payment, qualifies_for_loan, TDSR_UNSERVICEABLE,
};
use prop_deal_core::stamp_duty::{additional_stamp_duty, buyer_stamp_duty};

use crate::commands::BuyerArg;

/// Arguments for the stamp duty breakdown
#[derive(Args)]
pub struct StampDutyArgs {
    /// Purchase price in SGD
    #[arg(long)]
    pub price: Decimal,

    /// Buyer profile; adds the additional duty when given
    #[arg(long)]
    pub buyer: Option<BuyerArg>,
}

/// Arguments for the mortgage payment calculation
#[derive(Args)]
pub struct MortgageArgs {
    /// Loan principal in SGD
    #[arg(long)]
    pub loan: Decimal,

    /// Loan tenure in years (defaults to the configured tenure)
    #[arg(long)]
    pub years: Option<u32>,

    /// Annual interest rate, e.g. 0.035 (defaults to the configured rate)
    #[arg(long)]
    pub rate: Option<Decimal>,
}

/// Arguments for the debt servicing check
#[derive(Args)]
pub struct TdsrArgs {
    /// Monthly mortgage payment
    #[arg(long)]
    pub mortgage: Decimal,

    /// Other monthly debt obligations
    #[arg(long, default_value = "0")]
    pub debts: Decimal,

    /// Gross monthly income
    #[arg(long)]
    pub income: Decimal,

    /// Qualification ceiling in percent
    #[arg(long, default_value = "55")]
    pub max_ratio: Decimal,
}

pub fn run_stamp_duty(args: StampDutyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = AnalyzerConfig::from_env()?;
    let (duty, breakdown) = buyer_stamp_duty(args.price, &config.duty_tiers);

    let mut out = json!({
        "price": args.price,
        "stamp_duty": duty,
        "breakdown": breakdown,
    });

    if let Some(buyer) = args.buyer {
        let (additional, description) = additional_stamp_duty(args.price, buyer.into(), &config);
        out["additional_duty"] = serde_json::to_value(additional)?;
        out["additional_duty_description"] = Value::String(description);
        out["total_duty"] = serde_json::to_value(duty + additional)?;
    }

    Ok(out)
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = AnalyzerConfig::from_env()?;
    let years = args.years.unwrap_or(config.loan_tenure_years);
    let rate = args.rate.unwrap_or(config.interest_rate);

    let payment = monthly_mortgage_payment(args.loan, years, rate)?;
    let total_paid = payment * Decimal::from(years * 12);

    Ok(json!({
        "loan_amount": args.loan,
        "tenure_years": years,
        "annual_rate": rate,
        "monthly_payment": payment.round_dp(2),
        "total_paid": total_paid.round_dp(2),
        "total_interest": (total_paid - args.loan).round_dp(2),
    }))
}

pub fn run_tdsr(args: TdsrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ratio = debt_servicing_ratio(args.mortgage, args.debts, args.income);
    let qualifies = qualifies_for_loan(ratio, args.max_ratio);

    let ratio_field = if ratio == TDSR_UNSERVICEABLE {
        Value::String("unserviceable".to_string())
    } else {
        serde_json::to_value(ratio.round_dp(2))?
    };

    Ok(json!({
        "tdsr_pct": ratio_field,
        "max_tdsr_pct": args.max_ratio,
        "qualifies": qualifies,
        "headroom_pct": if qualifies && ratio != TDSR_UNSERVICEABLE {
            serde_json::to_value((args.max_ratio - ratio).round_dp(2).max(dec!(0)))?
        } else {
            Value::Null
        },
    }))
}
