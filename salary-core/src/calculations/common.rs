//! Small decimal helpers shared by the calculators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole currency unit, halves away from zero.
///
/// The calculator never calls this; it exists for presentation layers that
/// display whole units.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use salary_core::calculations::common::round_to_unit;
///
/// assert_eq!(round_to_unit(dec!(250000.1)), dec!(250000));
/// assert_eq!(round_to_unit(dec!(0.5)), dec!(1));
/// assert_eq!(round_to_unit(dec!(-0.5)), dec!(-1));
/// ```
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smaller of two values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}
