//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency.
    #[must_use]
    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Format for display, rounded to two decimal places (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        format!("{}{:.2}", self.currency_code.symbol(), rounded)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::usd(Decimal::new(1999, 2)).display(), "$19.99");
        assert_eq!(Price::usd(Decimal::new(5, 0)).display(), "$5.00");
        assert_eq!(Price::usd(Decimal::ZERO).display(), "$0.00");
    }

    #[test]
    fn test_display_rounds() {
        assert_eq!(Price::usd(Decimal::new(19_995, 3)).display(), "$20.00");
    }

    #[test]
    fn test_display_other_currency() {
        let price = Price::new(Decimal::new(1050, 2), CurrencyCode::GBP);
        assert_eq!(price.display(), "£10.50");
    }
}
