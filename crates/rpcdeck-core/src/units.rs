//! Hex quantity and ether/wei conversions used by catalog descriptors.
//!
//! Quantities are unsigned 256-bit integers, the width of an EVM word.

use crate::error::{CoreError, CoreResult};
use primitive_types::U256;

/// Wei per ether, as a power of ten
pub const ETHER_DECIMALS: u32 = 18;

/// Fractional digits shown for ether balances
pub const ETH_DISPLAY_DECIMALS: u32 = 6;

/// Encode a non-negative integer as a `0x`-prefixed lowercase hex quantity
pub fn to_hex(value: U256) -> String {
    if value.is_zero() {
        return "0x0".to_string();
    }
    format!("0x{:x}", value)
}

/// Decode a hex quantity; the `0x` prefix is optional
pub fn from_hex(hex: &str) -> CoreResult<U256> {
    let trimmed = hex.trim();
    let digits = strip_hex_prefix(trimmed).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CoreError::Invalid(format!("'{}' is not a hex quantity", hex)));
    }
    digits
        .chars()
        .try_fold(U256::zero(), |acc, c| {
            let nibble = U256::from(c.to_digit(16)?);
            acc.checked_mul(U256::from(16u8))?.checked_add(nibble)
        })
        .ok_or_else(|| CoreError::Invalid(format!("hex quantity '{}' is out of range", hex)))
}

/// Parse a quantity given either as decimal (`"12"`) or `0x` hex (`"0xc"`)
pub fn parse_quantity(text: &str) -> CoreResult<U256> {
    let trimmed = text.trim();
    if strip_hex_prefix(trimmed).is_some() {
        return from_hex(trimmed);
    }
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::Invalid(format!("'{}' is not a non-negative integer", text)));
    }
    U256::from_dec_str(trimmed).map_err(|e| {
        CoreError::Invalid(format!("'{}' is not a non-negative integer: {}", text, e))
    })
}

/// Parse a decimal ether amount into wei. Digits beyond 18 decimals are truncated.
pub fn eth_to_wei(eth: &str) -> CoreResult<U256> {
    let trimmed = eth.trim();
    let invalid = || CoreError::Invalid(format!("'{}' is not a valid ether amount", eth));
    let out_of_range = || CoreError::Invalid(format!("ether amount '{}' is out of range", eth));

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let unit = U256::exp10(ETHER_DECIMALS as usize);
    let whole = if int_part.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(int_part).map_err(|_| out_of_range())?
    };

    let kept = &frac_part[..frac_part.len().min(ETHER_DECIMALS as usize)];
    let fraction = if kept.is_empty() {
        U256::zero()
    } else {
        let scale = U256::exp10(ETHER_DECIMALS as usize - kept.len());
        U256::from_dec_str(kept).map_err(|_| invalid())? * scale
    };

    whole
        .checked_mul(unit)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(out_of_range)
}

/// Decimal ether amount to a hex wei quantity
pub fn eth_to_wei_hex(eth: &str) -> CoreResult<String> {
    eth_to_wei(eth).map(to_hex)
}

/// Render wei as ether with exactly `decimals` fractional digits, rounding half up
pub fn wei_to_eth(wei: U256, decimals: u32) -> String {
    let decimals = decimals.min(ETHER_DECIMALS);
    let divisor = U256::exp10((ETHER_DECIMALS - decimals) as usize);
    let remainder = wei % divisor;
    let mut scaled = wei / divisor;
    if divisor > U256::one() && remainder >= divisor - remainder {
        scaled += U256::one();
    }

    if decimals == 0 {
        return scaled.to_string();
    }
    let unit = U256::exp10(decimals as usize);
    let fraction = (scaled % unit).to_string();
    format!("{}.{:0>width$}", scaled / unit, fraction, width = decimals as usize)
}

/// Hex wei quantity to a display ether string (6 fractional digits)
pub fn wei_hex_to_eth(wei_hex: &str) -> CoreResult<String> {
    from_hex(wei_hex).map(|wei| wei_to_eth(wei, ETH_DISPLAY_DECIMALS))
}

pub(crate) fn strip_hex_prefix(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(n: u128) -> U256 {
        U256::from(n)
    }

    #[test]
    fn hex_round_trip() {
        for n in [0u128, 1, 15, 16, 255, 1_000_000, 1_000_000_000_000_000_000, u128::MAX] {
            assert_eq!(from_hex(&to_hex(wei(n))).unwrap(), wei(n));
        }
        assert_eq!(from_hex(&to_hex(U256::MAX)).unwrap(), U256::MAX);
        assert_eq!(to_hex(wei(255)), "0xff");
        assert_eq!(to_hex(U256::zero()), "0x0");
    }

    #[test]
    fn from_hex_accepts_case_and_missing_prefix() {
        assert_eq!(from_hex("0xDE0B6B3A7640000").unwrap(), wei(1_000_000_000_000_000_000));
        assert_eq!(from_hex("ff").unwrap(), wei(255));
        assert_eq!(from_hex("0XfF").unwrap(), wei(255));
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(from_hex("").is_err());
        assert!(from_hex("0x").is_err());
        assert!(from_hex("0xzz").is_err());
        // 65 digits do not fit in 256 bits
        assert!(from_hex(&format!("0x1{}", "0".repeat(64))).is_err());
    }

    #[test]
    fn quantities_wider_than_128_bits_are_kept() {
        let two_pow_130 = U256::from(2u8).pow(U256::from(130u32));
        assert_eq!(from_hex("0x400000000000000000000000000000000").unwrap(), two_pow_130);
        assert_eq!(to_hex(two_pow_130), "0x400000000000000000000000000000000");
        assert_eq!(
            parse_quantity("1361129467683753853853498429727072845824").unwrap(),
            two_pow_130
        );
        // 2^130 wei = 1361129467683753853853.498429727072845824 ether
        assert_eq!(
            wei_hex_to_eth("0x400000000000000000000000000000000").unwrap(),
            "1361129467683753853853.498430"
        );
    }

    #[test]
    fn quantity_accepts_decimal_or_hex() {
        assert_eq!(parse_quantity("10").unwrap(), wei(10));
        assert_eq!(parse_quantity(" 0x0a ").unwrap(), wei(10));
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("1.5").is_err());
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn ether_to_wei_is_exact() {
        assert_eq!(eth_to_wei("1").unwrap(), wei(1_000_000_000_000_000_000));
        assert_eq!(eth_to_wei("0.5").unwrap(), wei(500_000_000_000_000_000));
        assert_eq!(eth_to_wei(".25").unwrap(), wei(250_000_000_000_000_000));
        assert_eq!(eth_to_wei("0.0000000000000000019").unwrap(), wei(1));
        assert_eq!(eth_to_wei_hex("1").unwrap(), "0xde0b6b3a7640000");
        assert!(eth_to_wei("abc").is_err());
        assert!(eth_to_wei(".").is_err());
        assert!(eth_to_wei("1e18").is_err());
    }

    #[test]
    fn ether_amounts_beyond_the_word_size_are_rejected() {
        // 10^60 ether is 10^78 wei, above 2^256
        let huge = format!("1{}", "0".repeat(60));
        let err = eth_to_wei(&huge).unwrap_err();
        assert_eq!(err.to_string(), format!("ether amount '{}' is out of range", huge));
    }

    #[test]
    fn wei_renders_with_fixed_decimals() {
        assert_eq!(wei_hex_to_eth("0xDE0B6B3A7640000").unwrap(), "1.000000");
        assert_eq!(wei_to_eth(U256::zero(), 6), "0.000000");
        assert_eq!(wei_to_eth(wei(1_234_567_890_000_000_000), 6), "1.234568");
        assert_eq!(wei_to_eth(wei(1_499_999_999_999_999_999), 0), "1");
        assert_eq!(wei_to_eth(wei(1_500_000_000_000_000_000), 0), "2");
        assert_eq!(wei_to_eth(wei(1), 18), "0.000000000000000001");
        assert_eq!(wei_to_eth(wei(50_000_000_000_000), 6), "0.000050");
    }

    #[test]
    fn conversion_errors_carry_only_the_reason() {
        let err = parse_quantity("ten").unwrap_err();
        assert_eq!(err.to_string(), "'ten' is not a non-negative integer");
    }
}
