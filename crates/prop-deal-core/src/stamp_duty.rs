use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{AnalyzerConfig, DutyTier};
use crate::types::{BuyerCategory, Money};

/// One tier's contribution to the progressive duty total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyLine {
    pub label: String,
    pub amount: Money,
}

/// Progressive buyer's stamp duty on the purchase price.
///
/// Each dollar is taxed at exactly one tier's rate; the tiers are contiguous
/// so the total is continuous and monotonic in price. The breakdown carries
/// one line per tier that actually contributed. A non-positive price yields
/// zero duty and an empty breakdown.
pub fn buyer_stamp_duty(price: Money, tiers: &[DutyTier]) -> (Money, Vec<DutyLine>) {
    let mut total = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for tier in tiers {
        if price <= tier.lower {
            continue;
        }
        let ceiling = tier.upper.map_or(price, |upper| price.min(upper));
        let amount = (ceiling - tier.lower) * tier.rate;
        total += amount;
        if amount > Decimal::ZERO {
            breakdown.push(DutyLine {
                label: tier.label.clone(),
                amount,
            });
        }
    }

    (total, breakdown)
}

/// Flat additional duty determined by the buyer's category.
pub fn additional_stamp_duty(
    price: Money,
    buyer: BuyerCategory,
    config: &AnalyzerConfig,
) -> (Money, String) {
    let entry = config.additional_duty_rate(buyer);
    (price * entry.rate, entry.description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tiers() -> Vec<DutyTier> {
        AnalyzerConfig::default().duty_tiers
    }

    #[test]
    fn duty_at_1_2m_matches_published_schedule() {
        let (total, breakdown) = buyer_stamp_duty(dec!(1_200_000), &tiers());
        // 1800 + 9200 + 10800 + 8000
        assert_eq!(total, dec!(29_800));
        assert_eq!(breakdown.len(), 4);
        assert_eq!(breakdown[0].amount, dec!(1800));
        assert_eq!(breakdown[3].amount, dec!(8000));
    }

    #[test]
    fn breakdown_sums_to_total() {
        for price in [dec!(100_000), dec!(640_000), dec!(2_345_678), dec!(9_000_000)] {
            let (total, breakdown) = buyer_stamp_duty(price, &tiers());
            let sum: Decimal = breakdown.iter().map(|line| line.amount).sum();
            assert_eq!(sum, total, "breakdown mismatch at price {price}");
        }
    }

    #[test]
    fn duty_is_continuous_at_tier_boundaries() {
        let (at_boundary, _) = buyer_stamp_duty(dec!(640_000), &tiers());
        assert_eq!(at_boundary, dec!(11_000));

        let (just_above, _) = buyer_stamp_duty(dec!(640_001), &tiers());
        assert_eq!(just_above, dec!(11_000.03));
    }

    #[test]
    fn non_positive_price_yields_nothing() {
        let (zero, lines) = buyer_stamp_duty(Decimal::ZERO, &tiers());
        assert_eq!(zero, Decimal::ZERO);
        assert!(lines.is_empty());

        let (negative, lines) = buyer_stamp_duty(dec!(-100), &tiers());
        assert_eq!(negative, Decimal::ZERO);
        assert!(lines.is_empty());
    }

    #[test]
    fn additional_duty_by_buyer_category() {
        let config = AnalyzerConfig::default();
        let price = dec!(1_000_000);

        let (none, _) = additional_stamp_duty(price, BuyerCategory::CitizenFirst, &config);
        assert_eq!(none, Decimal::ZERO);

        let (second, description) =
            additional_stamp_duty(price, BuyerCategory::CitizenSecond, &config);
        assert_eq!(second, dec!(200_000));
        assert!(description.contains("20%"));

        let (foreigner, _) = additional_stamp_duty(price, BuyerCategory::Foreigner, &config);
        assert_eq!(foreigner, dec!(600_000));

        let (entity, _) = additional_stamp_duty(price, BuyerCategory::Entity, &config);
        assert_eq!(entity, dec!(650_000));
    }
}
