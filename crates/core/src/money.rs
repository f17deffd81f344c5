//! Exact decimal money and percentage values.
//!
//! Amounts are kept as `rust_decimal::Decimal` in their natural form (`44.99`,
//! not cents) so discounted line totals stay exact while they are summed.
//! Rounding to cents happens only when an amount is displayed.

use core::iter::Sum;
use core::ops::{Add, AddAssign};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Decimal places shown to customers and admins.
pub const DISPLAY_DP: u32 = 2;

/// A non-rounded monetary amount.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// A price: rejects negative amounts.
    pub fn price(amount: Decimal) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation(format!(
                "price must not be negative (got {amount})"
            )));
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `self * quantity`, unrounded. Saturates at the largest representable
    /// amount; use [`checked_times`](Self::checked_times) to detect that.
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// The amount left after taking `discount` off, unrounded.
    ///
    /// The fraction is at most one, so this never grows the amount.
    pub fn discounted(self, discount: Percent) -> Self {
        Self(self.0 * discount.remaining_fraction())
    }

    /// Amount rounded half away from zero to cents.
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Display form: always two decimals (`9.00`).
impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

impl ValueObject for Money {}

/// A percentage in `[0, 100]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percent(Decimal);

impl Percent {
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(DomainError::validation(format!(
                "percentage must be within 0..=100 (got {value})"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `1 - value/100`.
    pub fn remaining_fraction(&self) -> Decimal {
        (Decimal::ONE_HUNDRED - self.0) / Decimal::ONE_HUNDRED
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Percent::new(value)
    }
}

impl From<Percent> for Decimal {
    fn from(value: Percent) -> Self {
        value.0
    }
}

impl core::fmt::Display for Percent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl ValueObject for Percent {}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn ten_percent_off_ten_dollars_is_nine() {
        let price = Money::price(dec("10")).unwrap();
        let total = price.times(1).discounted(Percent::new(dec("10")).unwrap());
        assert_eq!(total.to_string(), "9.00");
    }

    #[test]
    fn display_rounds_half_away_from_zero() {
        assert_eq!(Money::new(dec("0.125")).to_string(), "0.13");
        assert_eq!(Money::new(dec("0.124")).to_string(), "0.12");
    }

    #[test]
    fn summing_keeps_sub_cent_precision() {
        // Three lines of 0.333...: rounding each first would give 0.99.
        let third = Money::new(dec("1")).discounted(Percent::new(dec("66.6666")).unwrap());
        let total: Money = [third, third, third].iter().sum();
        assert_eq!(total.to_string(), "1.00");
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(matches!(
            Money::price(dec("-0.01")),
            Err(DomainError::Validation(_))
        ));
        assert!(Money::price(Decimal::ZERO).is_ok());
    }

    #[test]
    fn percent_bounds() {
        assert!(Percent::new(dec("0")).is_ok());
        assert!(Percent::new(dec("100")).is_ok());
        assert!(Percent::new(dec("100.01")).is_err());
        assert!(Percent::new(dec("-1")).is_err());
    }

    #[test]
    fn percent_deserialization_validates_range() {
        let ok: Percent = serde_json::from_str("15").unwrap();
        assert_eq!(ok.value(), dec("15"));
        assert!(serde_json::from_str::<Percent>("150").is_err());
    }

    #[test]
    fn arithmetic_past_the_decimal_range_saturates_or_reports() {
        let huge = Money::new(dec("100000000000000000000"));
        assert_eq!(huge.checked_times(u32::MAX), None);
        assert_eq!(huge.times(u32::MAX).amount(), Decimal::MAX);
        assert_eq!(Money::new(Decimal::MAX).checked_add(huge), None);
        assert_eq!((Money::new(Decimal::MAX) + huge).amount(), Decimal::MAX);
        assert!(!Money::new(Decimal::MAX).to_string().is_empty());
    }

    #[test]
    fn full_discount_is_free() {
        let total = Money::new(dec("12.50"))
            .times(3)
            .discounted(Percent::new(Decimal::ONE_HUNDRED).unwrap());
        assert!(total.is_zero());
    }
}
