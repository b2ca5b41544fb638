//! Utility functions for the wallet core
//!
//! Amount handling is exact integer arithmetic on `U256`; nothing here goes through floating point.

use ethers::utils::{format_units, parse_units};

use crate::shared::error::{ValidationError, WalletError};
use crate::shared::types::{Address, U256};

/// Every value with at most this many digits fits in 256 bits.
const MAX_AMOUNT_DIGITS: usize = 77;

/// Allowance below which the factory gets re-approved.
pub fn approval_threshold() -> U256 {
    U256::MAX >> 1
}

/// Allowance granted when approving the factory.
pub fn unlimited_allowance() -> U256 {
    U256::MAX
}

/// `10^decimals`, or `None` when it does not fit in 256 bits.
pub fn pow10(decimals: u32) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(decimals))
}

/// `raw_supply * 10^decimals`, or `None` on overflow.
pub fn scale_supply(raw_supply: U256, decimals: u32) -> Option<U256> {
    pow10(decimals).and_then(|factor| raw_supply.checked_mul(factor))
}

/// Parse a non-empty string of ASCII digits into a `U256`.
pub fn parse_integer(value: &str) -> Option<U256> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    U256::from_dec_str(value).ok()
}

/// Parse a decimal amount in whole units into smallest units.
///
/// Accepts `"1"`, `"1.5"`, `".5"`, `"1."`. Rejects signs, exponents, more fractional digits than
/// `decimals` and anything that overflows.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, WalletError> {
    let amount = amount.trim();
    let invalid = || WalletError::Validation(ValidationError::InvalidAmount);

    // parse_units truncates excess fraction digits, accepts `-` and `_`, and panics on overflow
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !digits_only(whole) || !digits_only(fraction) || fraction.len() > decimals as usize {
        return Err(invalid());
    }
    if whole.trim_start_matches('0').len() + decimals as usize > MAX_AMOUNT_DIGITS {
        return Err(invalid());
    }

    parse_units(amount, u32::from(decimals))
        .map(U256::from)
        .map_err(|_| invalid())
}

/// Parse a strictly positive amount, as required by wrap and unwrap.
pub fn parse_positive_amount(amount: &str, decimals: u8) -> Result<U256, WalletError> {
    let value = parse_amount(amount, decimals)?;
    if value.is_zero() {
        return Err(WalletError::Validation(ValidationError::InvalidAmount));
    }
    Ok(value)
}

/// Render smallest units as a decimal string with trailing zeros trimmed: `2000000000000000000` → `"2"`.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    match format_units(amount, u32::from(decimals)) {
        Ok(formatted) => match formatted.split_once('.') {
            Some((whole, fraction)) if !fraction.trim_end_matches('0').is_empty() => {
                format!("{}.{}", whole, fraction.trim_end_matches('0'))
            }
            Some((whole, _)) => whole.to_string(),
            None => formatted,
        },
        Err(_) => amount.to_string(),
    }
}

/// Render smallest units with exactly `places` decimals, rounded half-up.
pub fn format_fixed(amount: U256, decimals: u8, places: u32) -> String {
    let decimals = decimals as u32;
    let scaled = if places >= decimals {
        amount.saturating_mul(pow10(places - decimals).unwrap_or(U256::MAX))
    } else {
        let divisor = pow10(decimals - places).unwrap_or(U256::MAX);
        let half = divisor / 2;
        amount.saturating_add(half) / divisor
    };

    let digits = scaled.to_string();
    if places == 0 {
        return digits;
    }
    let places = places as usize;
    let padded = if digits.len() <= places {
        format!("{}{}", "0".repeat(places - digits.len() + 1), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - places);
    format!("{}.{}", whole, fraction)
}

/// `0x742d35Cc...d8b6` style shortening for display.
pub fn shorten_address(address: &Address) -> String {
    let full = format!("{:?}", address);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Validate Ethereum address format
pub fn is_valid_hex_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex_part) => hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

pub fn parse_address(address: &str) -> Result<Address, WalletError> {
    if !is_valid_hex_address(address) {
        return Err(WalletError::config(format!(
            "Invalid address '{}'. Expected format: 0x followed by 40 hex characters",
            address
        )));
    }
    address
        .parse::<Address>()
        .map_err(|e| WalletError::config(format!("Invalid address '{}': {}", address, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * pow10(18).unwrap()
    }

    #[test]
    fn test_scale_supply_concrete() {
        let scaled = scale_supply(U256::from(1_000_000u64), 18).unwrap();
        assert_eq!(scaled.to_string(), "1000000000000000000000000");
    }

    #[test]
    fn test_scale_supply_overflow() {
        assert!(scale_supply(U256::MAX, 1).is_none());
        assert_eq!(scale_supply(U256::MAX, 0), Some(U256::MAX));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Some(U256::from(42)));
        assert_eq!(parse_integer(" 7 "), Some(U256::from(7)));
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("-1"), None);
        assert_eq!(parse_integer("1.5"), None);
        assert_eq!(parse_integer("1e6"), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1", 18).unwrap(), ether(1));
        assert_eq!(parse_amount("1.5", 18).unwrap(), ether(3) / 2);
        assert_eq!(parse_amount(".5", 1).unwrap(), U256::from(5));
        assert_eq!(parse_amount("2.", 0).unwrap(), U256::from(2));
        assert_eq!(parse_amount("0", 18).unwrap(), U256::zero());
    }

    #[test]
    fn test_parse_amount_rejects_malformed() {
        for input in ["", ".", "-1", "+1", "1e18", "abc", "1.2.3", "1,5"] {
            assert!(parse_amount(input, 18).is_err(), "accepted {:?}", input);
        }
        // More precision than the token carries
        assert!(parse_amount("0.0000001", 6).is_err());
        assert!(parse_amount("1_000", 18).is_err());
    }

    #[test]
    fn test_parse_amount_overflow_is_invalid() {
        let huge = "9".repeat(70);
        assert_eq!(parse_amount(&huge, 18), Err(WalletError::Validation(ValidationError::InvalidAmount)));
        assert!(parse_amount(&"9".repeat(59), 18).is_ok());
        assert_eq!(parse_amount("0007", 0).unwrap(), U256::from(7));
    }

    #[test]
    fn test_amount_helpers_agree_with_ethers_units() {
        for (input, decimals) in [("1", 18u8), ("1.5", 18), ("0.000000000000000001", 18), ("2", 0), ("123.456", 6)] {
            let expected: U256 = parse_units(input, u32::from(decimals)).unwrap().into();
            assert_eq!(parse_amount(input, decimals).unwrap(), expected, "{input}@{decimals}");
            assert_eq!(format_amount(expected, decimals), input);
        }
    }

    #[test]
    fn test_parse_positive_amount_rejects_zero() {
        assert_eq!(
            parse_positive_amount("0.000", 18),
            Err(WalletError::Validation(ValidationError::InvalidAmount))
        );
        assert!(parse_positive_amount("0.1", 18).is_ok());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(ether(2), 18), "2");
        assert_eq!(format_amount(ether(3) / 2, 18), "1.5");
        assert_eq!(format_amount(U256::from(1), 18), "0.000000000000000001");
        assert_eq!(format_amount(U256::zero(), 18), "0");
        assert_eq!(format_amount(U256::from(1234), 0), "1234");
        assert_eq!(format_amount(U256::from(1000), 0), "1000");
        assert_eq!(format_amount(U256::from(123_456_000u64), 6), "123.456");
    }

    #[test]
    fn test_format_fixed_rounds_half_up() {
        assert_eq!(format_fixed(ether(2), 18, 4), "2.0000");
        // 1.23456 -> 1.2346
        assert_eq!(format_fixed(U256::from(123456u64) * pow10(13).unwrap(), 18, 4), "1.2346");
        // 0.00004 -> 0.0000
        assert_eq!(format_fixed(U256::from(4u64) * pow10(13).unwrap(), 18, 4), "0.0000");
        assert_eq!(format_fixed(U256::from(5), 0, 2), "5.00");
    }

    #[test]
    fn test_shorten_address() {
        let address: Address = "0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6".parse().unwrap();
        assert_eq!(shorten_address(&address), "0x742d...d8b6");
    }

    #[test]
    fn test_hex_address_validation() {
        assert!(is_valid_hex_address("0x715513b13Aa8118827167Dc5B51E3d6DE492417E"));
        assert!(!is_valid_hex_address("715513b13Aa8118827167Dc5B51E3d6DE492417E"));
        assert!(!is_valid_hex_address("0x715513b13Aa8118827167Dc5B51E3d6DE49241"));
        assert!(!is_valid_hex_address("0x715513b13Aa8118827167Dc5B51E3d6DE492417G"));
        assert!(parse_address("0x").is_err());
    }

    proptest! {
        #[test]
        fn scaled_supply_divides_back(raw in 1u128.., decimals in 0u32..=18) {
            let raw = U256::from(raw);
            let scaled = scale_supply(raw, decimals).unwrap();
            let factor = pow10(decimals).unwrap();
            prop_assert_eq!(scaled / factor, raw);
            prop_assert!((scaled % factor).is_zero());
        }
    }
}
