use std::collections::HashMap;
use std::env;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropDealError;
use crate::types::{BuyerCategory, LoanTier, Money, Rate};
use crate::PropDealResult;

/// One band of the progressive stamp duty schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyTier {
    pub lower: Money,
    /// `None` marks the final, unbounded tier.
    pub upper: Option<Money>,
    pub rate: Rate,
    pub label: String,
}

impl DutyTier {
    fn new(lower: Money, upper: Option<Money>, rate: Rate, label: &str) -> Self {
        DutyTier {
            lower,
            upper,
            rate,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalDutyRate {
    pub rate: Rate,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LtvLimit {
    pub ratio: Rate,
    pub description: String,
}

/// Public-housing grant schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HousingGrants {
    pub ehg_singles: Money,
    pub ehg_families: Money,
    pub proximity: Money,
    pub family: Money,
}

/// All externally adjustable rates and estimates, injected by reference into
/// every calculation. Built once at process start; never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Annual mortgage interest rate.
    pub interest_rate: Rate,
    pub loan_tenure_years: u32,
    pub legal_fees: Money,
    /// Ordered, contiguous from zero; the last tier is unbounded.
    pub duty_tiers: Vec<DutyTier>,
    pub additional_duty_rates: HashMap<BuyerCategory, AdditionalDutyRate>,
    pub ltv_limits: HashMap<LoanTier, LtvLimit>,
    pub grants: HousingGrants,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        let duty_tiers = vec![
            DutyTier::new(dec!(0), Some(dec!(180_000)), dec!(0.01), "1% on first $180,000"),
            DutyTier::new(dec!(180_000), Some(dec!(640_000)), dec!(0.02), "2% on next $460,000"),
            DutyTier::new(dec!(640_000), Some(dec!(1_000_000)), dec!(0.03), "3% on next $360,000"),
            DutyTier::new(dec!(1_000_000), Some(dec!(1_500_000)), dec!(0.04), "4% on next $500,000"),
            DutyTier::new(dec!(1_500_000), Some(dec!(3_000_000)), dec!(0.05), "5% on next $1.5M"),
            DutyTier::new(dec!(3_000_000), None, dec!(0.06), "6% on remaining"),
        ];

        let additional_duty_rates = HashMap::from([
            (
                BuyerCategory::CitizenFirst,
                additional(dec!(0), "0% - No additional duty for first property"),
            ),
            (
                BuyerCategory::CitizenSecond,
                additional(dec!(0.20), "20% - Second property"),
            ),
            (
                BuyerCategory::CitizenThirdPlus,
                additional(dec!(0.30), "30% - Third property onwards"),
            ),
            (
                BuyerCategory::PermanentResidentFirst,
                additional(dec!(0.05), "5% - PR buying first property"),
            ),
            (
                BuyerCategory::PermanentResidentSecond,
                additional(dec!(0.30), "30% - PR buying second property"),
            ),
            (
                BuyerCategory::Foreigner,
                additional(dec!(0.60), "60% - Foreigner"),
            ),
            (
                BuyerCategory::Entity,
                additional(dec!(0.65), "65% - Company/Trust"),
            ),
        ]);

        let ltv_limits = HashMap::from([
            (
                LoanTier::First,
                LtvLimit {
                    ratio: dec!(0.75),
                    description: "75% - First property loan".to_string(),
                },
            ),
            (
                LoanTier::Second,
                LtvLimit {
                    ratio: dec!(0.45),
                    description: "45% - Second property loan".to_string(),
                },
            ),
            (
                LoanTier::ThirdOrLater,
                LtvLimit {
                    ratio: dec!(0.35),
                    description: "35% - Third property loan".to_string(),
                },
            ),
        ]);

        AnalyzerConfig {
            interest_rate: dec!(0.035),
            loan_tenure_years: 25,
            legal_fees: dec!(3000),
            duty_tiers,
            additional_duty_rates,
            ltv_limits,
            grants: HousingGrants {
                ehg_singles: dec!(40_000),
                ehg_families: dec!(80_000),
                proximity: dec!(30_000),
                family: dec!(50_000),
            },
        }
    }
}

fn additional(rate: Rate, description: &str) -> AdditionalDutyRate {
    AdditionalDutyRate {
        rate,
        description: description.to_string(),
    }
}

impl AnalyzerConfig {
    /// Defaults with `INTEREST_RATE`, `LOAN_TENURE` and `LEGAL_FEES`
    /// environment overrides applied. Call once at process start.
    pub fn from_env() -> PropDealResult<Self> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("INTEREST_RATE") {
            config.interest_rate = parse_override("INTEREST_RATE", &raw)?;
        }
        if let Ok(raw) = env::var("LOAN_TENURE") {
            config.loan_tenure_years =
                raw.trim()
                    .parse()
                    .map_err(|_| PropDealError::InvalidInput {
                        field: "LOAN_TENURE".to_string(),
                        reason: format!("'{raw}' is not a whole number of years"),
                    })?;
        }
        if let Ok(raw) = env::var("LEGAL_FEES") {
            config.legal_fees = parse_override("LEGAL_FEES", &raw)?;
        }

        Ok(config)
    }

    /// Rate lookup never fails: a category missing from the table pays no
    /// additional duty.
    pub fn additional_duty_rate(&self, buyer: BuyerCategory) -> AdditionalDutyRate {
        self.additional_duty_rates
            .get(&buyer)
            .cloned()
            .unwrap_or_else(|| AdditionalDutyRate {
                rate: Decimal::ZERO,
                description: String::new(),
            })
    }

    /// LTV lookup never fails: an unconfigured tier falls back to the
    /// first-loan limit.
    pub fn ltv_limit(&self, tier: LoanTier) -> LtvLimit {
        self.ltv_limits
            .get(&tier)
            .or_else(|| self.ltv_limits.get(&LoanTier::First))
            .cloned()
            .unwrap_or_else(|| LtvLimit {
                ratio: dec!(0.75),
                description: "75% - First property loan".to_string(),
            })
    }
}

fn parse_override(field: &str, raw: &str) -> PropDealResult<Decimal> {
    raw.trim()
        .parse()
        .map_err(|_| PropDealError::InvalidInput {
            field: field.to_string(),
            reason: format!("'{raw}' is not a valid decimal"),
        })
}
