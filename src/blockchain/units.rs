//! Conversion between human amounts and smallest-denomination integers.
//!
//! Only the three scales used by the supported tokens are accepted:
//! 6 (`mwei`), 9 (`gwei`) and 18 (`ether`). Anything else is rejected.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;
use thiserror::Error;

/// Errors raised by unit conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("unsupported decimal scale {0} (expected 6, 9 or 18)")]
    UnsupportedDecimals(u8),

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}

/// Decimal scales understood by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDecimals {
    Six,
    Nine,
    Eighteen,
}

impl TokenDecimals {
    pub fn value(self) -> u8 {
        match self {
            TokenDecimals::Six => 6,
            TokenDecimals::Nine => 9,
            TokenDecimals::Eighteen => 18,
        }
    }
}

impl TryFrom<u8> for TokenDecimals {
    type Error = UnitError;

    fn try_from(decimals: u8) -> Result<Self, Self::Error> {
        match decimals {
            6 => Ok(TokenDecimals::Six),
            9 => Ok(TokenDecimals::Nine),
            18 => Ok(TokenDecimals::Eighteen),
            other => Err(UnitError::UnsupportedDecimals(other)),
        }
    }
}

/// Convert a human amount into its smallest-unit integer.
///
/// Fractional digits beyond the scale are truncated.
pub fn to_smallest_unit(amount: f64, decimals: u8) -> Result<U256, UnitError> {
    let scale = TokenDecimals::try_from(decimals)?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(UnitError::InvalidAmount(amount.to_string()));
    }

    // f64 Display never uses exponent notation.
    let text = amount.to_string();
    let truncated = match text.split_once('.') {
        Some((whole, fraction)) => {
            let keep = fraction.len().min(scale.value() as usize);
            format!("{}.{}", whole, &fraction[..keep])
        }
        None => text,
    };

    parse_units(&truncated, scale.value())
        .map(|parsed| parsed.get_absolute())
        .map_err(|e| UnitError::InvalidAmount(format!("{truncated}: {e}")))
}

/// Convert a smallest-unit integer back into a human amount.
pub fn from_smallest_unit(value: U256, decimals: u8) -> Result<f64, UnitError> {
    let text = format_amount(value, decimals)?;
    text.parse::<f64>()
        .map_err(|e| UnitError::InvalidAmount(format!("{text}: {e}")))
}

/// Render a smallest-unit integer as an exact decimal string.
pub fn format_amount(value: U256, decimals: u8) -> Result<String, UnitError> {
    let scale = TokenDecimals::try_from(decimals)?;
    format_units(value, scale.value()).map_err(|e| UnitError::InvalidAmount(e.to_string()))
}
