//! Money value object
//!
//! An amount paired with an ISO-4217 style currency code. Amounts are never
//! negative and always carry two fractional digits; arithmetic between
//! different currencies is rejected rather than converted.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const SCALE: u32 = 2;

/// A non-negative monetary amount in a single currency.
///
/// # Invariants
///
/// - `amount >= 0`, rounded half away from zero to 2 decimals
/// - `currency` is three upper-case ASCII letters
///
/// # Example
///
/// ```
/// use eventia_domain::Money;
///
/// let price = Money::new(10, "eur").unwrap();
/// let total = price.add(&Money::new(5, "EUR").unwrap()).unwrap();
///
/// assert_eq!(total.to_string(), "15.00 EUR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyWireFormat", into = "MoneyWireFormat")]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    /// Create a validated amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the amount is negative or the
    /// currency is not a three-letter code.
    pub fn new(amount: impl Into<Decimal>, currency: impl AsRef<str>) -> Result<Self, DomainError> {
        let amount = round(amount.into());
        if amount < Decimal::ZERO {
            return Err(DomainError::validation("El monto no puede ser negativo"));
        }
        let currency = normalize_currency(currency.as_ref())?;
        Ok(Self { amount, currency })
    }

    /// Zero in the given currency.
    pub fn zero(currency: impl AsRef<str>) -> Result<Self, DomainError> {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// # Errors
    ///
    /// Fails when the currencies differ or the sum is out of range.
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other, "sumar")?;
        let sum = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(out_of_range)?;
        Ok(Self {
            amount: round(sum),
            currency: self.currency.clone(),
        })
    }

    /// # Errors
    ///
    /// Fails when the currencies differ or the result would be negative.
    pub fn subtract(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other, "restar")?;
        let difference = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(out_of_range)?;
        let amount = round(difference);
        if amount < Decimal::ZERO {
            return Err(DomainError::validation(
                "El resultado de la resta no puede ser negativo",
            ));
        }
        Ok(Self {
            amount,
            currency: self.currency.clone(),
        })
    }

    /// # Errors
    ///
    /// Fails when the factor is negative or the product is out of range.
    pub fn multiply(&self, factor: impl Into<Decimal>) -> Result<Money, DomainError> {
        let factor = factor.into();
        if factor < Decimal::ZERO {
            return Err(DomainError::validation(
                "El factor de multiplicación no puede ser negativo",
            ));
        }
        let product = self.amount.checked_mul(factor).ok_or_else(out_of_range)?;
        Ok(Self {
            amount: round(product),
            currency: self.currency.clone(),
        })
    }

    /// # Errors
    ///
    /// Fails when the currencies differ.
    pub fn compare(&self, other: &Money) -> Result<Ordering, DomainError> {
        self.ensure_same_currency(other, "comparar")?;
        Ok(self.amount.cmp(&other.amount))
    }

    pub fn greater_than(&self, other: &Money) -> Result<bool, DomainError> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    pub fn less_than(&self, other: &Money) -> Result<bool, DomainError> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    fn ensure_same_currency(&self, other: &Money, operation: &str) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::validation(format!(
                "No se pueden {} montos de diferentes monedas ({} y {})",
                operation, self.currency, other.currency
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

fn round(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

fn out_of_range() -> DomainError {
    DomainError::validation("El resultado excede el rango permitido")
}

fn normalize_currency(code: &str) -> Result<String, DomainError> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::validation(format!(
            "Código de moneda inválido: '{}'",
            code
        )));
    }
    Ok(code.to_ascii_uppercase())
}

#[derive(Serialize, Deserialize)]
struct MoneyWireFormat {
    amount: Decimal,
    currency: String,
}

impl TryFrom<MoneyWireFormat> for Money {
    type Error = DomainError;

    fn try_from(wire: MoneyWireFormat) -> Result<Self, Self::Error> {
        Money::new(wire.amount, wire.currency)
    }
}

impl From<Money> for MoneyWireFormat {
    fn from(money: Money) -> Self {
        Self {
            amount: money.amount,
            currency: money.currency,
        }
    }
}
