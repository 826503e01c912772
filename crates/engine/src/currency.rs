use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

/// ISO-like currency code used by an event and its money values.
///
/// Events are effectively mono-currency (default `VND`), but the engine models
/// currency explicitly to keep the data model future-proof.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of **minor units**
/// (see `Money`). `minor_units()` returns how many decimal digits are used
/// when converting between:
/// - major units (human input/output, e.g. `10.50 EUR`)
/// - minor units (stored integers, e.g. `1050`)
///
/// VND has 0 minor units, so amounts are stored as whole đồng.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Vnd,
    Eur,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Vnd => "VND",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    ///
    /// Example: EUR uses 2 fraction digits (cents), VND uses none.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Vnd => 0,
            Currency::Eur | Currency::Usd => 2,
        }
    }

    /// Format an amount for display, e.g. `300000 VND` or `-10.50 EUR`.
    ///
    /// Display-only; never feed formatted strings back into computation.
    #[must_use]
    pub fn format_amount(self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let abs = amount.minor().unsigned_abs();
        match self.minor_units() {
            0 => format!("{sign}{abs} {}", self.code()),
            digits => {
                let scale = 10u64.pow(u32::from(digits));
                let major = abs / scale;
                let frac = abs % scale;
                format!(
                    "{sign}{major}.{frac:0width$} {}",
                    self.code(),
                    width = digits as usize
                )
            }
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "VND" => Ok(Currency::Vnd),
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            other => Err(EngineError::Validation(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_by_minor_units() {
        assert_eq!(
            Currency::Vnd.format_amount(Money::new(300_000)),
            "300000 VND"
        );
        assert_eq!(Currency::Eur.format_amount(Money::new(1050)), "10.50 EUR");
        assert_eq!(Currency::Usd.format_amount(Money::new(-5)), "-0.05 USD");
    }

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::try_from("vnd").unwrap(), Currency::Vnd);
        assert_eq!(Currency::try_from(" EUR ").unwrap(), Currency::Eur);
        assert!(Currency::try_from("GBP").is_err());
    }
}
