use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::AnalyzerConfig;
use crate::error::PropDealError;
use crate::financing::monthly_mortgage_payment;
use crate::stamp_duty::{additional_stamp_duty, buyer_stamp_duty, DutyLine};
use crate::types::{
    with_metadata, BuyerCategory, ComputationOutput, Money, PropertyCategory, PropertyListing,
    Rate,
};
use crate::PropDealResult;

/// Annual property tax as a flat fraction of price, monthlized downstream.
const PROPERTY_TAX_ANNUAL_RATE: Decimal = dec!(0.0004);

/// Buyer-side agent commission; waived for public housing where the seller
/// conventionally bears it.
const AGENT_COMMISSION_RATE: Decimal = dec!(0.01);

/// Maintenance and rent estimates need a district; listings without one are
/// priced as an outside-central-region district.
const FALLBACK_DISTRICT: u8 = 19;

const PREMIUM_DISTRICTS: [u8; 6] = [1, 2, 4, 9, 10, 11];

/// Complete upfront and monthly cost picture for one (listing, buyer) pair.
/// Computed once, never mutated; consumed by reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealAnalysis {
    pub price: Money,
    pub stamp_duty: Money,
    pub stamp_duty_breakdown: Vec<DutyLine>,
    pub additional_duty: Money,
    pub additional_duty_description: String,
    pub legal_fees: Money,
    pub agent_commission: Money,
    pub down_payment: Money,
    pub loan_amount: Money,
    pub ltv_description: String,
    pub total_upfront: Money,
    pub monthly_mortgage: Money,
    pub monthly_maintenance: Money,
    pub monthly_property_tax: Money,
    pub total_monthly: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_sqft: Option<Decimal>,
    pub housing_grant: Money,
    pub is_public_housing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_monthly_rent: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_rental_yield_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_benchmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_cashflow: Option<Money>,
}

/// Full financial analysis of a property deal: statutory duties, financing
/// split under the buyer's LTV tier, monthly holding costs, grants, and the
/// rental-yield picture when floor area is known.
pub fn analyze_deal(
    listing: &PropertyListing,
    buyer: BuyerCategory,
    is_public_housing: bool,
    config: &AnalyzerConfig,
) -> PropDealResult<ComputationOutput<DealAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let violations = listing.validate();
    if !violations.is_empty() {
        return Err(PropDealError::InvalidInput {
            field: "listing".to_string(),
            reason: violations.join("; "),
        });
    }

    let price = listing.price.ok_or_else(|| PropDealError::InvalidInput {
        field: "price".to_string(),
        reason: "Price is required for analysis".to_string(),
    })?;

    let (stamp_duty, stamp_duty_breakdown) = buyer_stamp_duty(price, &config.duty_tiers);
    let (additional_duty, additional_duty_description) =
        additional_stamp_duty(price, buyer, config);

    let legal_fees = config.legal_fees;
    let agent_commission = if is_public_housing {
        Decimal::ZERO
    } else {
        price * AGENT_COMMISSION_RATE
    };

    let ltv = config.ltv_limit(buyer.loan_tier());
    let loan_amount = price * ltv.ratio;
    let down_payment = price - loan_amount;
    let monthly_mortgage =
        monthly_mortgage_payment(loan_amount, config.loan_tenure_years, config.interest_rate)?
            .round_dp(2);

    let district = listing.district.unwrap_or(FALLBACK_DISTRICT);
    let monthly_maintenance = listing
        .maintenance_fee
        .unwrap_or_else(|| estimate_maintenance(listing.category, district));
    let monthly_property_tax = price * PROPERTY_TAX_ANNUAL_RATE / dec!(12);

    let total_upfront = down_payment + stamp_duty + additional_duty + legal_fees + agent_commission;
    let total_monthly = monthly_mortgage + monthly_maintenance + monthly_property_tax;

    let housing_grant = if is_public_housing && buyer == BuyerCategory::CitizenFirst {
        config.grants.ehg_families
    } else {
        Decimal::ZERO
    };

    let estimated_monthly_rent = estimate_market_rent(listing);
    let gross_rental_yield_pct =
        estimated_monthly_rent.map(|rent| gross_rental_yield(price, rent));
    let monthly_cashflow = estimated_monthly_rent.map(|rent| rent - total_monthly);
    let yield_benchmark =
        estimated_monthly_rent.map(|_| yield_benchmark(listing.category).to_string());

    if let Some(years) = listing.lease_years_remaining {
        if years < 60 {
            warnings.push(format!("Lease decay: only {years} years remaining"));
        } else if years < 80 {
            warnings.push(format!("Lease remaining: {years} years"));
        }
    }
    if additional_duty > Decimal::ZERO {
        let share = (additional_duty / price * dec!(100)).round_dp(0);
        warnings.push(format!(
            "High additional duty: {share}% of price ({additional_duty_description})"
        ));
    }
    if let Some(cashflow) = monthly_cashflow {
        if cashflow < Decimal::ZERO {
            let shortfall = -cashflow;
            warnings.push(format!(
                "Negative cashflow: {} needed monthly from other income",
                shortfall.round_dp(0)
            ));
        }
    }

    let analysis = DealAnalysis {
        price,
        stamp_duty,
        stamp_duty_breakdown,
        additional_duty,
        additional_duty_description,
        legal_fees,
        agent_commission,
        down_payment,
        loan_amount,
        ltv_description: ltv.description,
        total_upfront,
        monthly_mortgage,
        monthly_maintenance,
        monthly_property_tax,
        total_monthly,
        price_per_sqft: listing.price_per_sqft(),
        housing_grant,
        is_public_housing,
        estimated_monthly_rent,
        gross_rental_yield_pct,
        yield_benchmark,
        monthly_cashflow,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "progressive stamp duty + LTV-constrained amortized financing",
        warnings,
        elapsed,
        analysis,
    ))
}

/// Gross rental yield in percent: annual rent over purchase price. Zero for
/// a non-positive price.
pub fn gross_rental_yield(price: Money, monthly_rent: Money) -> Rate {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    monthly_rent * dec!(12) / price * dec!(100)
}

fn estimate_maintenance(category: Option<PropertyCategory>, district: u8) -> Money {
    match category {
        Some(PropertyCategory::PublicHousing) => dec!(80),
        Some(PropertyCategory::Condominium) => {
            if PREMIUM_DISTRICTS.contains(&district) {
                dec!(400)
            } else {
                dec!(300)
            }
        }
        Some(PropertyCategory::Landed) => Decimal::ZERO,
        None => dec!(300),
    }
}

/// Rough market rent from category- and district-level rent per square foot.
/// Unknowable without a positive floor area.
fn estimate_market_rent(listing: &PropertyListing) -> Option<Money> {
    let area = listing.floor_area_sqft.filter(|a| *a > Decimal::ZERO)?;
    let central = matches!(listing.district, Some(9) | Some(10) | Some(11));
    let rent_psf = match listing.category {
        Some(PropertyCategory::PublicHousing) => dec!(2.5),
        Some(PropertyCategory::Condominium) => {
            if central {
                dec!(4.0)
            } else {
                dec!(3.5)
            }
        }
        Some(PropertyCategory::Landed) => dec!(2.0),
        None => dec!(3.0),
    };
    Some(area * rent_psf)
}

fn yield_benchmark(category: Option<PropertyCategory>) -> &'static str {
    match category {
        Some(PropertyCategory::PublicHousing) => "3.5-4.5%",
        Some(PropertyCategory::Condominium) => "3.0-3.5%",
        Some(PropertyCategory::Landed) => "2.0-2.5%",
        None => "3.0-4.0%",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_estimate_by_category_and_district() {
        assert_eq!(
            estimate_maintenance(Some(PropertyCategory::PublicHousing), 19),
            dec!(80)
        );
        assert_eq!(
            estimate_maintenance(Some(PropertyCategory::Condominium), 9),
            dec!(400)
        );
        assert_eq!(
            estimate_maintenance(Some(PropertyCategory::Condominium), 19),
            dec!(300)
        );
        assert_eq!(
            estimate_maintenance(Some(PropertyCategory::Landed), 10),
            Decimal::ZERO
        );
        assert_eq!(estimate_maintenance(None, 5), dec!(300));
    }

    #[test]
    fn rental_yield_guards_non_positive_price() {
        assert_eq!(gross_rental_yield(Decimal::ZERO, dec!(3000)), Decimal::ZERO);
        // 3500 * 12 / 1.2M * 100 = 3.5%
        assert_eq!(
            gross_rental_yield(dec!(1_200_000), dec!(3500)),
            dec!(3.5)
        );
    }

    #[test]
    fn rent_estimate_needs_area() {
        let mut listing = PropertyListing {
            category: Some(PropertyCategory::Condominium),
            district: Some(10),
            ..Default::default()
        };
        assert_eq!(estimate_market_rent(&listing), None);

        listing.floor_area_sqft = Some(dec!(1000));
        assert_eq!(estimate_market_rent(&listing), Some(dec!(4000.0)));

        listing.district = Some(19);
        assert_eq!(estimate_market_rent(&listing), Some(dec!(3500.0)));
    }
}
