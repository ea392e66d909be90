//! # Value Objects
//!
//! Immutable domain primitives for the tax ledger.
//! These types represent concepts that are defined by their value, not identity.

use primitive_types::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Basis-point denominator: `10_000` bps == 100%.
pub const MAX_BPS: u16 = 10_000;

/// Display decimals of the token (balances are stored in the smallest unit).
pub const DECIMALS: u8 = 9;

/// Token amount in the smallest unit.
pub type Balance = u128;

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account address.
///
/// Serialized as a `0x`-prefixed hex string so configuration and genesis
/// files stay human-editable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 20 {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Creates an address whose low 8 bytes hold `value` (big-endian).
    #[must_use]
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Parses a hex address, with or without the `0x` prefix.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).ok()?;
        Self::from_slice(&bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Full `0x`-prefixed lowercase hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for [u8; 20] {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

/// Error returned when a string is not a 20-byte hex address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address: {0}")]
pub struct ParseAddressError(pub String);

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| ParseAddressError(s.to_string()))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// BASIS POINTS
// =============================================================================

/// A rate or fraction expressed in basis points (1/10_000).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bps(pub u16);

impl Bps {
    /// 0%.
    pub const ZERO: Self = Self(0);

    /// 100%.
    pub const MAX: Self = Self(MAX_BPS);

    /// Raw basis-point value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// True when the value lies in `[0, MAX_BPS]`.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 <= MAX_BPS
    }

    /// `amount * self / MAX_BPS`, truncated toward zero.
    ///
    /// Saturates at `Balance::MAX`, which only a rate above 100% could reach.
    #[must_use]
    pub fn of(self, amount: Balance) -> Balance {
        mul_div(amount, u128::from(self.0), u128::from(MAX_BPS)).unwrap_or(Balance::MAX)
    }
}

impl fmt::Display for Bps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

impl From<u16> for Bps {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

/// `amount * numerator / denominator` with a 256-bit intermediate.
///
/// Returns `None` on a zero denominator or when the quotient does not fit
/// in a `Balance`.
#[must_use]
pub fn mul_div(amount: Balance, numerator: u128, denominator: u128) -> Option<Balance> {
    if denominator == 0 {
        return None;
    }
    let quotient = U256::from(amount) * U256::from(numerator) / U256::from(denominator);
    if quotient > U256::from(u128::MAX) {
        None
    } else {
        Some(quotient.low_u128())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_low_u64() {
        let addr = Address::from_low_u64(0x0102);
        assert_eq!(addr.0[18], 0x01);
        assert_eq!(addr.0[19], 0x02);
        assert!(addr.0[..12].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_address_hex_parsing() {
        let addr = Address::from_low_u64(0xabcd);
        let hex = addr.to_hex();
        assert_eq!(hex.len(), 42);
        assert_eq!(Address::from_hex(&hex), Some(addr));
        assert_eq!(Address::from_hex(&hex[2..]), Some(addr));
        assert!(Address::from_hex("0x1234").is_none());
        assert!("not-hex".parse::<Address>().is_err());
    }

    #[test]
    fn test_address_display_is_abbreviated() {
        let addr = Address::new([0xAB; 20]);
        assert_eq!(addr.to_string(), "0xabababab...abab");
    }

    #[test]
    fn test_address_serde_as_hex_string() {
        let addr = Address::from_low_u64(7);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_hex()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_bps_truncates_toward_zero() {
        assert_eq!(Bps(200).of(10_000), 200);
        assert_eq!(Bps(150).of(99), 1); // 1.485 -> 1
        assert_eq!(Bps(1).of(9_999), 0);
        assert_eq!(Bps::MAX.of(12_345), 12_345);
        assert_eq!(Bps::ZERO.of(12_345), 0);
    }

    #[test]
    fn test_bps_does_not_overflow_on_large_amounts() {
        assert_eq!(Bps::MAX.of(u128::MAX), u128::MAX);
        assert_eq!(Bps(5_000).of(u128::MAX), u128::MAX / 2);
    }

    #[test]
    fn test_bps_validity() {
        assert!(Bps(0).is_valid());
        assert!(Bps(MAX_BPS).is_valid());
        assert!(!Bps(MAX_BPS + 1).is_valid());
    }

    #[test]
    fn test_mul_div_edge_cases() {
        assert_eq!(mul_div(10, 3, 0), None);
        assert_eq!(mul_div(u128::MAX, 2, 1), None);
        assert_eq!(mul_div(7, 3, 2), Some(10));
    }
}
