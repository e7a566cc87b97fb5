use crate::error::ValidationError;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Checks a spending entry before it is accepted.
///
/// The emptiness check passes as soon as any one of date, industry, business
/// or items is present. The other three may be empty.
pub fn validate(
    cost: Decimal,
    industry: &str,
    business: &str,
    items: &str,
    date: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if cost < Decimal::ZERO {
        return Err(ValidationError::NegativeCost);
    }

    let any_present =
        date.is_some() || !industry.is_empty() || !business.is_empty() || !items.is_empty();
    if !any_present {
        return Err(ValidationError::EmptyFields);
    }

    Ok(())
}
