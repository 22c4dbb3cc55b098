//! Monetary amounts tagged with a currency.
//!
//! All payroll arithmetic is fixed-point decimal. Rounding is always explicit:
//! currency amounts round to 2 decimals and certain tax figures to whole
//! units, only at the points the calculation rules state, never implicitly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

/// The currency unit a monetary amount is denominated in.
///
/// A payroll computation uses a single currency throughout; the euro is the
/// only unit the encoded tax rules apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// Euro.
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// The ISO 4217 code for this currency.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A decimal amount tagged with its [`Currency`].
///
/// Arithmetic between two amounts requires matching currencies; mixing
/// currencies is a programming error and panics.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Currency, Money};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let wage = Money::new(Decimal::from_str("461.538").unwrap(), Currency::Eur);
/// let rounded = wage.round_dp(2);
/// assert_eq!(rounded.amount(), Decimal::from_str("461.54").unwrap());
/// assert_eq!(rounded + Money::zero(Currency::Eur), rounded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates an amount in the given currency.
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// The zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// The numeric amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency the amount is denominated in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Rounds the amount to `dp` decimal places using banker's rounding.
    pub fn round_dp(self, dp: u32) -> Self {
        Self::new(self.amount.round_dp(dp), self.currency)
    }

    /// The smaller of two amounts in the same currency.
    pub fn min(self, other: Self) -> Self {
        assert_eq!(self.currency, other.currency, "currency mismatch");
        if self.amount <= other.amount { self } else { other }
    }

    /// The larger of two amounts in the same currency.
    pub fn max(self, other: Self) -> Self {
        assert_eq!(self.currency, other.currency, "currency mismatch");
        if self.amount >= other.amount { self } else { other }
    }

    /// Whether the amount is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        assert_eq!(self.currency, rhs.currency, "currency mismatch");
        Money::new(self.amount + rhs.amount, self.currency)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        assert_eq!(self.currency, rhs.currency, "currency mismatch");
        Money::new(self.amount - rhs.amount, self.currency)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, rhs: Decimal) -> Money {
        Money::new(self.amount * rhs, self.currency)
    }
}
