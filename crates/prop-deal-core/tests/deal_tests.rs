use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use prop_deal_core::config::AnalyzerConfig;
use prop_deal_core::deal::analyze_deal;
use prop_deal_core::financing::{debt_servicing_ratio, qualifies_for_loan, DEFAULT_MAX_TDSR};
use prop_deal_core::{BuyerCategory, PropDealError, PropertyCategory, PropertyListing};

fn sample_condo() -> PropertyListing {
    // A $1.2M, 1000 sqft condominium in an outside-central district
    PropertyListing {
        address: Some("123 Example Avenue".to_string()),
        price: Some(dec!(1_200_000)),
        floor_area_sqft: Some(dec!(1000)),
        bedrooms: Some(3),
        bathrooms: Some(2),
        category: Some(PropertyCategory::Condominium),
        district: Some(19),
        ..Default::default()
    }
}

#[test]
fn citizen_first_condo_cost_breakdown() {
    let config = AnalyzerConfig::default();
    let output = analyze_deal(&sample_condo(), BuyerCategory::CitizenFirst, false, &config).unwrap();
    let deal = &output.result;

    assert_eq!(deal.stamp_duty, dec!(29_800));
    assert_eq!(deal.additional_duty, Decimal::ZERO);
    assert_eq!(deal.legal_fees, dec!(3000));
    assert_eq!(deal.agent_commission, dec!(12_000));

    // 75% LTV on first loan
    assert_eq!(deal.loan_amount, dec!(900_000));
    assert_eq!(deal.down_payment, dec!(300_000));

    // 300k + 29.8k + 0 + 3k + 12k
    assert_eq!(deal.total_upfront, dec!(344_800));

    // 900k over 25 years at 3.5% amortizes to roughly $4,506/month
    assert!(deal.monthly_mortgage > dec!(4400) && deal.monthly_mortgage < dec!(4600));

    assert_eq!(deal.monthly_maintenance, dec!(300));
    assert_eq!(deal.monthly_property_tax, dec!(40));
    assert_eq!(
        deal.total_monthly,
        deal.monthly_mortgage + dec!(300) + dec!(40)
    );

    assert_eq!(deal.price_per_sqft, Some(dec!(1200)));
    assert_eq!(deal.housing_grant, Decimal::ZERO);
}

#[test]
fn second_property_buyer_gets_tighter_ltv() {
    let config = AnalyzerConfig::default();
    let output =
        analyze_deal(&sample_condo(), BuyerCategory::CitizenSecond, false, &config).unwrap();
    let deal = &output.result;

    // 45% LTV on second loan
    assert_eq!(deal.loan_amount, dec!(540_000));
    assert_eq!(deal.down_payment, dec!(660_000));
    assert_eq!(deal.additional_duty, dec!(240_000));

    // the 20% surtax must be flagged
    assert!(output
        .warnings
        .iter()
        .any(|w| w.contains("High additional duty")));
}

#[test]
fn foreigner_pays_sixty_percent_surtax() {
    let config = AnalyzerConfig::default();
    let output = analyze_deal(&sample_condo(), BuyerCategory::Foreigner, false, &config).unwrap();
    assert_eq!(output.result.additional_duty, dec!(720_000));
    // foreigners still borrow at the first-loan LTV
    assert_eq!(output.result.loan_amount, dec!(900_000));
}

#[test]
fn public_housing_waives_commission_and_grants_citizen_first() {
    let config = AnalyzerConfig::default();
    let listing = PropertyListing {
        price: Some(dec!(600_000)),
        floor_area_sqft: Some(dec!(900)),
        category: Some(PropertyCategory::PublicHousing),
        district: Some(23),
        ..Default::default()
    };

    let output = analyze_deal(&listing, BuyerCategory::CitizenFirst, true, &config).unwrap();
    let deal = &output.result;

    assert_eq!(deal.agent_commission, Decimal::ZERO);
    assert_eq!(deal.housing_grant, dec!(80_000));
    assert_eq!(deal.monthly_maintenance, dec!(80));

    // no grant for a second-property buyer
    let output = analyze_deal(&listing, BuyerCategory::CitizenSecond, true, &config).unwrap();
    assert_eq!(output.result.housing_grant, Decimal::ZERO);
}

#[test]
fn missing_price_is_rejected() {
    let config = AnalyzerConfig::default();
    let listing = PropertyListing {
        floor_area_sqft: Some(dec!(1000)),
        ..Default::default()
    };

    let err = analyze_deal(&listing, BuyerCategory::CitizenFirst, false, &config).unwrap_err();
    match err {
        PropDealError::InvalidInput { field, reason } => {
            assert_eq!(field, "price");
            assert!(reason.contains("required"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_listing_reports_every_violation() {
    let config = AnalyzerConfig::default();
    let listing = PropertyListing {
        price: Some(dec!(-1)),
        district: Some(99),
        ..Default::default()
    };

    let err = analyze_deal(&listing, BuyerCategory::CitizenFirst, false, &config).unwrap_err();
    match err {
        PropDealError::InvalidInput { reason, .. } => {
            assert!(reason.contains("price must be positive"));
            assert!(reason.contains("district must be between 1 and 28"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn lease_decay_is_surfaced_as_warning() {
    let config = AnalyzerConfig::default();
    let mut listing = sample_condo();

    listing.lease_years_remaining = Some(55);
    let output = analyze_deal(&listing, BuyerCategory::CitizenFirst, false, &config).unwrap();
    assert!(output.warnings.iter().any(|w| w.contains("Lease decay")));

    listing.lease_years_remaining = Some(75);
    let output = analyze_deal(&listing, BuyerCategory::CitizenFirst, false, &config).unwrap();
    assert!(output.warnings.iter().any(|w| w.contains("Lease remaining")));

    listing.lease_years_remaining = Some(95);
    let output = analyze_deal(&listing, BuyerCategory::CitizenFirst, false, &config).unwrap();
    assert!(!output.warnings.iter().any(|w| w.contains("Lease")));
}

#[test]
fn rental_metrics_present_when_area_known() {
    let config = AnalyzerConfig::default();
    let output = analyze_deal(&sample_condo(), BuyerCategory::CitizenFirst, false, &config).unwrap();
    let deal = &output.result;

    // 1000 sqft condo outside central region rents at ~3.5/sqft
    assert_eq!(deal.estimated_monthly_rent, Some(dec!(3500.0)));
    assert_eq!(deal.gross_rental_yield_pct, Some(dec!(3.5)));
    assert_eq!(deal.yield_benchmark.as_deref(), Some("3.0-3.5%"));

    // rent does not cover the mortgage here
    let cashflow = deal.monthly_cashflow.unwrap();
    assert!(cashflow < Decimal::ZERO);
    assert!(output
        .warnings
        .iter()
        .any(|w| w.contains("Negative cashflow")));
}

#[test]
fn rental_metrics_absent_without_area() {
    let config = AnalyzerConfig::default();
    let mut listing = sample_condo();
    listing.floor_area_sqft = None;

    let output = analyze_deal(&listing, BuyerCategory::CitizenFirst, false, &config).unwrap();
    assert_eq!(output.result.estimated_monthly_rent, None);
    assert_eq!(output.result.gross_rental_yield_pct, None);
    assert_eq!(output.result.monthly_cashflow, None);
    assert_eq!(output.result.price_per_sqft, None);
}

#[test]
fn mortgage_figure_feeds_tdsr_without_drift() {
    let config = AnalyzerConfig::default();
    let output = analyze_deal(&sample_condo(), BuyerCategory::CitizenFirst, false, &config).unwrap();

    // reading the immutable result twice must qualify identically
    let first = debt_servicing_ratio(output.result.monthly_mortgage, dec!(500), dec!(12_000));
    let second = debt_servicing_ratio(output.result.monthly_mortgage, dec!(500), dec!(12_000));
    assert_eq!(first, second);
    assert_eq!(
        qualifies_for_loan(first, DEFAULT_MAX_TDSR),
        qualifies_for_loan(second, DEFAULT_MAX_TDSR)
    );
}

#[test]
fn injected_config_overrides_apply() {
    let mut config = AnalyzerConfig::default();
    config.interest_rate = Decimal::ZERO;
    config.loan_tenure_years = 30;
    config.legal_fees = dec!(2500);

    let output = analyze_deal(&sample_condo(), BuyerCategory::CitizenFirst, false, &config).unwrap();
    // 900k over 360 zero-interest payments
    assert_eq!(output.result.monthly_mortgage, dec!(2500));
    assert_eq!(output.result.legal_fees, dec!(2500));
}
