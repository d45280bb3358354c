//! Validation rules for charge and use requests.
//!
//! Every rule is a pure check with no side effects. A failing rule returns an
//! [`InvalidRequest`] describing the offending values.

use serde_json::Value;

use crate::error::InvalidRequest;

/// Maximum balance a user may hold.
pub const MAX_BALANCE: i64 = 1_000_000;

/// Smallest amount accepted by a charge.
pub const MIN_CHARGE_AMOUNT: i64 = 5_000;

/// Smallest amount accepted by a use.
pub const MIN_USE_AMOUNT: i64 = 500;

/// Largest magnitude a float can carry while still being an exact integer.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

type Result<T> = std::result::Result<T, InvalidRequest>;

/// Check that an amount is strictly positive.
///
/// # Errors
///
/// Returns `InvalidRequest::NonPositive` if `amount <= 0`.
pub const fn validate_amount(amount: i64) -> Result<()> {
    if amount <= 0 {
        return Err(InvalidRequest::NonPositive);
    }
    Ok(())
}

/// Check a floating-point amount and convert it to an integer amount.
///
/// # Errors
///
/// Returns `InvalidRequest::NotInteger` for NaN, infinities, fractional
/// values and magnitudes beyond exact float precision, and
/// `InvalidRequest::NonPositive` for values `<= 0`.
#[allow(clippy::cast_possible_truncation)] // range and fraction checked above the cast
pub fn validate_amount_f64(amount: f64) -> Result<i64> {
    if !amount.is_finite() || amount.fract() != 0.0 || amount.abs() > MAX_EXACT_FLOAT {
        return Err(InvalidRequest::NotInteger);
    }
    let amount = amount as i64;
    validate_amount(amount)?;
    Ok(amount)
}

/// Parse an untyped JSON amount into a validated integer amount.
///
/// # Errors
///
/// Returns `InvalidRequest::NotNumeric` for anything but a JSON number,
/// otherwise the errors of [`validate_amount`] and [`validate_amount_f64`].
pub fn parse_amount(value: &Value) -> Result<i64> {
    let Value::Number(number) = value else {
        return Err(InvalidRequest::NotNumeric);
    };

    if let Some(amount) = number.as_i64() {
        validate_amount(amount)?;
        return Ok(amount);
    }

    number
        .as_f64()
        .map_or(Err(InvalidRequest::NotInteger), validate_amount_f64)
}

/// Check that a charge meets the minimum charge amount.
///
/// # Errors
///
/// Returns `InvalidRequest::BelowMinimumCharge` if `amount < MIN_CHARGE_AMOUNT`.
pub const fn validate_min_charge_amount(amount: i64) -> Result<()> {
    if amount < MIN_CHARGE_AMOUNT {
        return Err(InvalidRequest::BelowMinimumCharge {
            amount,
            minimum: MIN_CHARGE_AMOUNT,
        });
    }
    Ok(())
}

/// Check that a use meets the minimum use amount.
///
/// # Errors
///
/// Returns `InvalidRequest::BelowMinimumUse` if `amount < MIN_USE_AMOUNT`.
pub const fn validate_min_use_amount(amount: i64) -> Result<()> {
    if amount < MIN_USE_AMOUNT {
        return Err(InvalidRequest::BelowMinimumUse {
            amount,
            minimum: MIN_USE_AMOUNT,
        });
    }
    Ok(())
}

/// Check that adding `amount` keeps the balance within `MAX_BALANCE`.
///
/// # Errors
///
/// Returns `InvalidRequest::ExceedsMaxBalance` if the sum is over the maximum.
pub fn validate_max_balance(balance: i64, amount: i64) -> Result<()> {
    match balance.checked_add(amount) {
        Some(total) if total <= MAX_BALANCE => Ok(()),
        _ => Err(InvalidRequest::ExceedsMaxBalance {
            balance,
            amount,
            maximum: MAX_BALANCE,
        }),
    }
}

/// Check that the balance covers a deduction of `amount`.
///
/// # Errors
///
/// Returns `InvalidRequest::InsufficientBalance` if `balance < amount`.
pub const fn validate_sufficient_balance(balance: i64, amount: i64) -> Result<()> {
    if balance < amount {
        return Err(InvalidRequest::InsufficientBalance {
            balance,
            required: amount,
        });
    }
    Ok(())
}
