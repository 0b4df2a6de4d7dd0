use std::time::Instant;

use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropDealError;
use crate::types::{with_metadata, ComputationOutput, Money, PropertyCategory, Rate, Tenure};
use crate::PropDealResult;

pub const DEFAULT_LOOKBACK_MONTHS: u32 = 6;

/// Transactions newer than this many days count as "recent" when detecting
/// a price trend.
const TREND_WINDOW_DAYS: i64 = 90;

/// One comparable sale record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub address: String,
    pub category: PropertyCategory,
    pub floor_area_sqft: Decimal,
    pub price: Money,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure: Option<Tenure>,
    pub is_simulated: bool,
}

impl Transaction {
    /// Price per square foot; zero when the recorded area is non-positive,
    /// guarding the division.
    pub fn price_per_sqft(&self) -> Decimal {
        if self.floor_area_sqft > Decimal::ZERO {
            self.price / self.floor_area_sqft
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Rising,
    Falling,
    Stable,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealRating {
    StrongDeal,
    FairPrice,
    MarketRate,
    AboveMarket,
    Overpriced,
}

/// Aggregated comparison of a target property against a transaction sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub target_psf: Decimal,
    pub avg_psf: Decimal,
    pub median_psf: Decimal,
    pub min_psf: Decimal,
    pub max_psf: Decimal,
    pub transactions: Vec<Transaction>,
    pub price_trend: PriceTrend,
    pub is_simulated: bool,
    pub data_source: String,
    /// Deviation of the target from the sample average, in percent.
    pub vs_market_pct: Rate,
    pub deal_rating: DealRating,
}

/// Supplies comparable transactions, most recent first. A live feed, a cache
/// or the deterministic simulator; callers never inspect which.
pub trait TransactionSource {
    fn label(&self) -> &'static str;

    fn fetch(
        &self,
        district: u8,
        category: PropertyCategory,
        lookback_months: u32,
    ) -> PropDealResult<Vec<Transaction>>;
}

/// Deterministic stand-in for a live transaction feed.
///
/// Every record's price variance comes from an rng seeded by
/// (district, category, index), so repeated fetches with the same inputs
/// return identical samples and tests stay reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedTransactions {
    /// Record dates are generated relative to this day; `None` means today.
    pub as_of: Option<NaiveDate>,
}

impl SimulatedTransactions {
    pub fn as_of(date: NaiveDate) -> Self {
        SimulatedTransactions { as_of: Some(date) }
    }

    fn base_psf(category: PropertyCategory) -> Decimal {
        match category {
            PropertyCategory::Condominium => dec!(1400),
            PropertyCategory::PublicHousing => dec!(500),
            PropertyCategory::Landed => dec!(1200),
        }
    }

    fn district_multiplier(district: u8) -> Decimal {
        match district {
            9 => dec!(2.0),
            10 => dec!(1.9),
            11 => dec!(1.7),
            1 => dec!(1.6),
            2 | 15 => dec!(1.5),
            4 | 21 => dec!(1.4),
            16 | 20 => dec!(1.3),
            18 | 19 => dec!(1.2),
            22 => dec!(1.1),
            24 | 25 | 26 | 27 => dec!(0.9),
            _ => dec!(1.0),
        }
    }

    fn seed(district: u8, category: PropertyCategory, index: u64) -> u64 {
        let category_tag = match category {
            PropertyCategory::PublicHousing => 1u64,
            PropertyCategory::Condominium => 2,
            PropertyCategory::Landed => 3,
        };
        ((district as u64) << 24) | (category_tag << 16) | index
    }
}

impl TransactionSource for SimulatedTransactions {
    fn label(&self) -> &'static str {
        "simulated"
    }

    fn fetch(
        &self,
        district: u8,
        category: PropertyCategory,
        lookback_months: u32,
    ) -> PropDealResult<Vec<Transaction>> {
        const SIZES: [i64; 7] = [800, 900, 1000, 1100, 1200, 1300, 1500];
        const STREETS: [&str; 5] = ["Street 1", "Street 2", "Avenue 3", "Road 4", "Drive 5"];

        let today = self.as_of.unwrap_or_else(|| Utc::now().date_naive());
        let avg_psf = Self::base_psf(category) * Self::district_multiplier(district);
        let window_days = i64::from(lookback_months.max(1)) * 30;

        let mut records = Vec::with_capacity(10);
        for index in 0..10u64 {
            let size = Decimal::from(SIZES[index as usize % SIZES.len()]);
            let mut rng = StdRng::seed_from_u64(Self::seed(district, category, index));
            // whole-percent variance in [-10%, +10%)
            let variance = Decimal::new(rng.gen_range(-10i64..10), 2);
            let psf = avg_psf * (Decimal::ONE + variance);
            let days_ago = (index as i64 * 15) % window_days;

            records.push(Transaction {
                address: format!(
                    "Block {} {}, District {district}",
                    100 + index * 10,
                    STREETS[index as usize % STREETS.len()]
                ),
                category,
                floor_area_sqft: size,
                price: psf * size,
                date: today - Duration::days(days_ago),
                tenure: Some(match category {
                    PropertyCategory::Condominium => Tenure::Lease99,
                    _ => Tenure::Freehold,
                }),
                is_simulated: true,
            });
        }

        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }
}

/// Compare a target property's price per square foot against comparable
/// transactions from `source`. Source failure falls back to the simulator;
/// only invalid inputs or a sample with no usable areas fail.
pub fn analyze_market(
    target_price: Money,
    target_area: Decimal,
    district: u8,
    category: PropertyCategory,
    source: &dyn TransactionSource,
    lookback_months: u32,
) -> PropDealResult<ComputationOutput<MarketAnalysis>> {
    analyze_market_as_of(
        target_price,
        target_area,
        district,
        category,
        source,
        lookback_months,
        Utc::now().date_naive(),
    )
}

/// [`analyze_market`] with an explicit "today" for the trend partition.
/// The seam for deterministic tests and backdated comparisons.
#[allow(clippy::too_many_arguments)]
pub fn analyze_market_as_of(
    target_price: Money,
    target_area: Decimal,
    district: u8,
    category: PropertyCategory,
    source: &dyn TransactionSource,
    lookback_months: u32,
    as_of: NaiveDate,
) -> PropDealResult<ComputationOutput<MarketAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if target_area <= Decimal::ZERO {
        return Err(PropDealError::InvalidInput {
            field: "target_area".to_string(),
            reason: "Floor area must be positive".to_string(),
        });
    }
    if !(1..=28).contains(&district) {
        return Err(PropDealError::InvalidInput {
            field: "district".to_string(),
            reason: "District must be between 1 and 28".to_string(),
        });
    }

    let target_psf = target_price / target_area;

    let (transactions, data_source) = match source.fetch(district, category, lookback_months) {
        Ok(records) => (records, source.label().to_string()),
        Err(err) => {
            warnings.push(format!(
                "Transaction source failed ({err}); falling back to simulated data"
            ));
            let fallback = SimulatedTransactions::as_of(as_of);
            (
                fallback.fetch(district, category, lookback_months)?,
                fallback.label().to_string(),
            )
        }
    };

    if transactions.is_empty() {
        warnings.push("No comparable transactions in the lookback window".to_string());
        let elapsed = start.elapsed().as_micros() as u64;
        return Ok(with_metadata(
            METHODOLOGY,
            warnings,
            elapsed,
            MarketAnalysis {
                target_psf,
                avg_psf: Decimal::ZERO,
                median_psf: Decimal::ZERO,
                min_psf: Decimal::ZERO,
                max_psf: Decimal::ZERO,
                transactions,
                price_trend: PriceTrend::Unknown,
                is_simulated: true,
                data_source,
                vs_market_pct: Decimal::ZERO,
                deal_rating: classify_deal(Decimal::ZERO),
            },
        ));
    }

    let psf_values: Vec<Decimal> = transactions
        .iter()
        .map(Transaction::price_per_sqft)
        .filter(|psf| *psf > Decimal::ZERO)
        .collect();
    if psf_values.is_empty() {
        return Err(PropDealError::InsufficientData(
            "No valid price-per-area data in transaction sample".to_string(),
        ));
    }

    let avg_psf = psf_values.iter().sum::<Decimal>() / Decimal::from(psf_values.len() as u64);
    let mut sorted = psf_values;
    sorted.sort();
    // Upper-median convention: element n/2 of the ascending sample even for
    // even lengths, kept for compatibility with historical reports.
    let median_psf = sorted[sorted.len() / 2];
    let min_psf = sorted[0];
    let max_psf = sorted[sorted.len() - 1];

    let price_trend = classify_trend(&transactions, as_of);

    let vs_market_pct = if avg_psf > Decimal::ZERO {
        (target_psf - avg_psf) / avg_psf * dec!(100)
    } else {
        Decimal::ZERO
    };
    let deal_rating = classify_deal(vs_market_pct);

    let is_simulated = transactions.iter().any(|t| t.is_simulated);
    if is_simulated {
        warnings.push(
            "Sample contains simulated transactions; connect a live feed for real data"
                .to_string(),
        );
    }

    let analysis = MarketAnalysis {
        target_psf,
        avg_psf,
        median_psf,
        min_psf,
        max_psf,
        transactions,
        price_trend,
        is_simulated,
        data_source,
        vs_market_pct,
        deal_rating,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(METHODOLOGY, warnings, elapsed, analysis))
}

const METHODOLOGY: &str = "comparable-transaction PSF aggregation with 90-day trend partition";

/// Compare mean PSF of transactions inside the trend window against the
/// rest. A partition with no members on either side reads as stable; only a
/// wholly empty sample is unknown (handled by the caller).
fn classify_trend(transactions: &[Transaction], as_of: NaiveDate) -> PriceTrend {
    let cutoff = as_of - Duration::days(TREND_WINDOW_DAYS);
    let (recent, older): (Vec<&Transaction>, Vec<&Transaction>) =
        transactions.iter().partition(|t| t.date >= cutoff);

    if recent.is_empty() || older.is_empty() {
        return PriceTrend::Stable;
    }

    let recent_avg = mean_psf(&recent);
    let older_avg = mean_psf(&older);

    if recent_avg > older_avg * dec!(1.05) {
        PriceTrend::Rising
    } else if recent_avg < older_avg * dec!(0.95) {
        PriceTrend::Falling
    } else {
        PriceTrend::Stable
    }
}

fn mean_psf(transactions: &[&Transaction]) -> Decimal {
    let sum: Decimal = transactions.iter().map(|t| t.price_per_sqft()).sum();
    sum / Decimal::from(transactions.len() as u64)
}

/// Half-open rating bands over the vs-market percentage, total over the
/// real line.
fn classify_deal(vs_market_pct: Rate) -> DealRating {
    if vs_market_pct < dec!(-10) {
        DealRating::StrongDeal
    } else if vs_market_pct < dec!(-5) {
        DealRating::FairPrice
    } else if vs_market_pct < dec!(5) {
        DealRating::MarketRate
    } else if vs_market_pct < dec!(15) {
        DealRating::AboveMarket
    } else {
        DealRating::Overpriced
    }
}
