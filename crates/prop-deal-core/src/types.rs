use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.035 = 3.5%) unless a name says `_pct`.
pub type Rate = Decimal;

/// Buyer classification driving additional duty and the loan-to-value tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerCategory {
    CitizenFirst,
    CitizenSecond,
    CitizenThirdPlus,
    PermanentResidentFirst,
    PermanentResidentSecond,
    Foreigner,
    Entity,
}

impl BuyerCategory {
    /// Loan-sequence position implied by the buyer's ownership count.
    pub fn loan_tier(self) -> LoanTier {
        match self {
            BuyerCategory::CitizenSecond | BuyerCategory::PermanentResidentSecond => {
                LoanTier::Second
            }
            BuyerCategory::CitizenThirdPlus => LoanTier::ThirdOrLater,
            _ => LoanTier::First,
        }
    }
}

/// Position of this loan in the buyer's borrowing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanTier {
    First,
    Second,
    ThirdOrLater,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCategory {
    PublicHousing,
    Condominium,
    Landed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tenure {
    Freehold,
    #[serde(rename = "999_year")]
    Lease999,
    #[serde(rename = "99_year")]
    Lease99,
    #[default]
    Unspecified,
}

/// One property under evaluation. Constructed once from an external listing
/// provider and immutable thereafter; validated on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyListing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_area_sqft: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub tenure: Tenure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_years_remaining: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<PropertyCategory>,
    /// Postal district, 1 to 28.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_fee: Option<Money>,
}

impl PropertyListing {
    /// Price per square foot, when both price and a positive area are known.
    pub fn price_per_sqft(&self) -> Option<Decimal> {
        match (self.price, self.floor_area_sqft) {
            (Some(price), Some(area)) if area > Decimal::ZERO => Some(price / area),
            _ => None,
        }
    }

    /// Every violated invariant, not just the first. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if let Some(price) = self.price {
            if price <= Decimal::ZERO {
                violations.push("price must be positive".to_string());
            } else if price > Decimal::from(100_000_000u64) {
                violations.push("price seems unrealistic (over $100M)".to_string());
            }
        }

        if let Some(area) = self.floor_area_sqft {
            if area <= Decimal::ZERO {
                violations.push("floor area must be positive".to_string());
            } else if area > Decimal::from(50_000u64) {
                violations.push("floor area seems unrealistic (over 50,000 sqft)".to_string());
            }
        }

        if let Some(district) = self.district {
            if !(1..=28).contains(&district) {
                violations.push("district must be between 1 and 28".to_string());
            }
        }

        violations
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Standard computation envelope: the result plus the caveats a report
/// should surface and provenance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T> {
    pub result: T,
    pub methodology: String,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub generated_at: DateTime<Utc>,
}

pub fn with_metadata<T>(
    methodology: &str,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            generated_at: Utc::now(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn condo_listing() -> PropertyListing {
        PropertyListing {
            price: Some(dec!(1_200_000)),
            floor_area_sqft: Some(dec!(1000)),
            district: Some(19),
            category: Some(PropertyCategory::Condominium),
            ..Default::default()
        }
    }

    #[test]
    fn psf_requires_positive_area() {
        let mut listing = condo_listing();
        assert_eq!(listing.price_per_sqft(), Some(dec!(1200)));

        listing.floor_area_sqft = Some(Decimal::ZERO);
        assert_eq!(listing.price_per_sqft(), None);

        listing.floor_area_sqft = None;
        assert_eq!(listing.price_per_sqft(), None);
    }

    #[test]
    fn validate_collects_every_violation() {
        let listing = PropertyListing {
            price: Some(dec!(-5)),
            floor_area_sqft: Some(Decimal::ZERO),
            district: Some(40),
            ..Default::default()
        };
        let violations = listing.validate();
        assert_eq!(violations.len(), 3);
        assert!(violations[0].contains("price"));
        assert!(!listing.is_valid());
    }

    #[test]
    fn absent_fields_are_not_violations() {
        assert!(PropertyListing::default().is_valid());
    }

    #[test]
    fn loan_tier_mapping_is_explicit() {
        assert_eq!(BuyerCategory::CitizenFirst.loan_tier(), LoanTier::First);
        assert_eq!(BuyerCategory::CitizenSecond.loan_tier(), LoanTier::Second);
        assert_eq!(
            BuyerCategory::PermanentResidentSecond.loan_tier(),
            LoanTier::Second
        );
        assert_eq!(
            BuyerCategory::CitizenThirdPlus.loan_tier(),
            LoanTier::ThirdOrLater
        );
        assert_eq!(BuyerCategory::Foreigner.loan_tier(), LoanTier::First);
        assert_eq!(BuyerCategory::Entity.loan_tier(), LoanTier::First);
    }
}
