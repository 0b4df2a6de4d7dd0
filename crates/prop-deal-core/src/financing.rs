use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::PropDealError;
use crate::types::{Money, Rate};
use crate::PropDealResult;

/// Regulatory ceiling on the total debt servicing ratio, in percent.
pub const DEFAULT_MAX_TDSR: Decimal = dec!(55.0);

/// Sentinel ratio for a borrower with no income. `Decimal` carries no
/// infinity, so the maximum representable value stands in: it fails any
/// realistic qualification threshold while "cannot qualify" stays an
/// ordinary domain outcome rather than an error.
pub const TDSR_UNSERVICEABLE: Decimal = Decimal::MAX;

/// Fixed-rate amortized monthly payment: P·r(1+r)ⁿ / ((1+r)ⁿ − 1) with
/// r = annual_rate/12 and n = years·12. A zero rate degenerates to straight
/// division of principal over the payment count.
pub fn monthly_mortgage_payment(
    loan_amount: Money,
    years: u32,
    annual_rate: Rate,
) -> PropDealResult<Money> {
    if years == 0 {
        return Err(PropDealError::InvalidInput {
            field: "years".to_string(),
            reason: "Loan tenure must be at least 1 year".to_string(),
        });
    }

    let payments = Decimal::from(years * 12);
    let monthly_rate = annual_rate / dec!(12);

    if monthly_rate.is_zero() {
        return Ok(loan_amount / payments);
    }

    let growth = (Decimal::ONE + monthly_rate).powd(payments);
    let annuity = growth - Decimal::ONE;
    if annuity.is_zero() {
        return Err(PropDealError::DivisionByZero {
            context: "amortization annuity factor".to_string(),
        });
    }

    Ok(loan_amount * monthly_rate * growth / annuity)
}

/// Total debt servicing ratio in percent. Zero or negative income returns
/// [`TDSR_UNSERVICEABLE`].
pub fn debt_servicing_ratio(
    monthly_mortgage: Money,
    other_monthly_debts: Money,
    monthly_income: Money,
) -> Rate {
    if monthly_income <= Decimal::ZERO {
        return TDSR_UNSERVICEABLE;
    }
    (monthly_mortgage + other_monthly_debts) / monthly_income * dec!(100)
}

/// Loan qualification against a TDSR ceiling. The ratio is rounded to two
/// decimal places before comparison so a borderline value computed as, say,
/// 55.004999% still qualifies at the 55% limit.
pub fn qualifies_for_loan(ratio: Rate, max_ratio: Rate) -> bool {
    ratio.round_dp(2) <= max_ratio
}
