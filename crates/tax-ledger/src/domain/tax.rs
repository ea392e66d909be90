//! # Tax Policy
//!
//! Buy/sell rates against registered pools, an optional ordinary rate, and
//! the master on/off switch.

use crate::domain::entities::TransferSide;
use crate::domain::value_objects::{Balance, Bps};
use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};

/// Current tax configuration.
///
/// Constructed inactive with every rate at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPolicy {
    active: bool,
    buy: Bps,
    sell: Bps,
    /// Wallet-to-wallet rate. Zero unless explicitly configured.
    ordinary: Bps,
}

impl TaxPolicy {
    /// Inactive policy with zero rates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a policy, validating every rate.
    pub fn with_rates(active: bool, buy: Bps, sell: Bps, ordinary: Bps) -> Result<Self, LedgerError> {
        let mut policy = Self::new();
        policy.set_rates(buy, sell)?;
        policy.set_ordinary_rate(ordinary)?;
        policy.set_active(active);
        Ok(policy)
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Replaces both pool rates. Neither changes if either is invalid.
    pub fn set_rates(&mut self, buy: Bps, sell: Bps) -> Result<(), LedgerError> {
        validate_rate(buy)?;
        validate_rate(sell)?;
        self.buy = buy;
        self.sell = sell;
        Ok(())
    }

    pub fn set_ordinary_rate(&mut self, ordinary: Bps) -> Result<(), LedgerError> {
        validate_rate(ordinary)?;
        self.ordinary = ordinary;
        Ok(())
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn buy_rate(&self) -> Bps {
        self.buy
    }

    #[must_use]
    pub const fn sell_rate(&self) -> Bps {
        self.sell
    }

    #[must_use]
    pub const fn ordinary_rate(&self) -> Bps {
        self.ordinary
    }

    /// Configured rate for `side`, regardless of the active flag.
    #[must_use]
    pub const fn rate_for(&self, side: TransferSide) -> Bps {
        match side {
            TransferSide::Buy => self.buy,
            TransferSide::Sell => self.sell,
            TransferSide::Ordinary => self.ordinary,
        }
    }

    /// Tax owed on `amount`; zero while inactive.
    #[must_use]
    pub fn tax_for(&self, side: TransferSide, amount: Balance) -> Balance {
        if !self.active {
            return 0;
        }
        self.rate_for(side).of(amount)
    }
}

fn validate_rate(rate: Bps) -> Result<(), LedgerError> {
    if rate.is_valid() {
        Ok(())
    } else {
        Err(LedgerError::InvalidRate { bps: rate.get() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::MAX_BPS;

    #[test]
    fn test_default_is_inactive_and_zero() {
        let policy = TaxPolicy::new();
        assert!(!policy.is_active());
        assert_eq!(policy.buy_rate(), Bps::ZERO);
        assert_eq!(policy.sell_rate(), Bps::ZERO);
        assert_eq!(policy.ordinary_rate(), Bps::ZERO);
    }

    #[test]
    fn test_inactive_policy_never_taxes() {
        let policy = TaxPolicy::with_rates(false, Bps(150), Bps(200), Bps(50)).unwrap();
        assert_eq!(policy.tax_for(TransferSide::Buy, 10_000), 0);
        assert_eq!(policy.tax_for(TransferSide::Sell, 10_000), 0);
        assert_eq!(policy.tax_for(TransferSide::Ordinary, 10_000), 0);
    }

    #[test]
    fn test_directional_rates() {
        let policy = TaxPolicy::with_rates(true, Bps(150), Bps(200), Bps::ZERO).unwrap();
        assert_eq!(policy.tax_for(TransferSide::Buy, 10_000), 150);
        assert_eq!(policy.tax_for(TransferSide::Sell, 10_000), 200);
        assert_eq!(policy.tax_for(TransferSide::Ordinary, 10_000), 0);
    }

    #[test]
    fn test_invalid_rate_leaves_policy_unchanged() {
        let mut policy = TaxPolicy::with_rates(true, Bps(100), Bps(100), Bps::ZERO).unwrap();
        let err = policy.set_rates(Bps(200), Bps(MAX_BPS + 1)).unwrap_err();
        assert_eq!(err, LedgerError::InvalidRate { bps: MAX_BPS + 1 });
        assert_eq!(policy.buy_rate(), Bps(100));
        assert_eq!(policy.sell_rate(), Bps(100));

        assert!(policy.set_ordinary_rate(Bps(MAX_BPS + 1)).is_err());
        assert_eq!(policy.ordinary_rate(), Bps::ZERO);
    }

    #[test]
    fn test_full_rate_is_accepted() {
        let mut policy = TaxPolicy::new();
        policy.set_rates(Bps::MAX, Bps::MAX).unwrap();
        policy.set_active(true);
        assert_eq!(policy.tax_for(TransferSide::Sell, 777), 777);
    }
}
