//! Token amounts in JSON input.
//!
//! Accepted either as an integer or as a decimal string; the string form
//! carries values beyond the range of a JSON integer.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;
use tax_ledger::Balance;

/// `#[serde(deserialize_with = "amount::deserialize")]`
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Balance, D::Error> {
    deserializer.deserialize_any(AmountVisitor)
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Balance;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Balance, E> {
        Ok(Balance::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Balance, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Balance, E> {
        u64::try_from(v)
            .map(Balance::from)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Balance, E> {
        v.replace('_', "")
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "super::deserialize")]
        amount: u128,
    }

    fn parse(json: &str) -> Result<u128, serde_json::Error> {
        serde_json::from_str::<Wrapper>(json).map(|w| w.amount)
    }

    #[test]
    fn test_integer_and_string_forms() {
        assert_eq!(parse(r#"{"amount": 42}"#).unwrap(), 42);
        assert_eq!(parse(r#"{"amount": "1_000_000"}"#).unwrap(), 1_000_000);
        assert_eq!(
            parse(r#"{"amount": "340282366920938463463374607431768211455"}"#).unwrap(),
            u128::MAX
        );
    }

    #[test]
    fn test_rejects_negative_and_garbage() {
        assert!(parse(r#"{"amount": -1}"#).is_err());
        assert!(parse(r#"{"amount": "ten"}"#).is_err());
        assert!(parse(r#"{"amount": 1.5}"#).is_err());
    }
}
