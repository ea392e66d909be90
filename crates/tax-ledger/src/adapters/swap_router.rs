//! # Swap Router Adapters
//!
//! Stand-ins for the external pool's swap endpoint. The real pool is an
//! outside collaborator; these adapters cover local runs and tests.

use crate::domain::value_objects::{mul_div, Address, Balance, MAX_BPS};
use crate::errors::SwapError;
use crate::ports::outbound::SwapRouter;
use serde::{Deserialize, Serialize};

/// One completed swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub amount_in: Balance,
    pub output: Balance,
    pub recipient: Address,
}

/// Pays a constant `rate_bps / 10_000` reference units per token, out of a
/// finite reference reserve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedRateRouter {
    rate_bps: u32,
    reserve: Balance,
    swaps: Vec<SwapRecord>,
}

impl FixedRateRouter {
    /// Router with an unbounded reserve.
    #[must_use]
    pub fn new(rate_bps: u32) -> Self {
        Self::with_reserve(rate_bps, Balance::MAX)
    }

    #[must_use]
    pub fn with_reserve(rate_bps: u32, reserve: Balance) -> Self {
        Self {
            rate_bps,
            reserve,
            swaps: Vec::new(),
        }
    }

    /// Output for `amount_in` at the current rate.
    #[must_use]
    pub fn quote(&self, amount_in: Balance) -> Balance {
        mul_div(amount_in, u128::from(self.rate_bps), u128::from(MAX_BPS)).unwrap_or(Balance::MAX)
    }

    #[must_use]
    pub fn reserve(&self) -> Balance {
        self.reserve
    }

    /// Completed swaps, oldest first.
    #[must_use]
    pub fn swaps(&self) -> &[SwapRecord] {
        &self.swaps
    }

    pub fn set_rate(&mut self, rate_bps: u32) {
        self.rate_bps = rate_bps;
    }
}

impl SwapRouter for FixedRateRouter {
    fn swap_exact_tokens_for_reference(
        &mut self,
        amount_in: Balance,
        min_output: Balance,
        recipient: Address,
    ) -> Result<Balance, SwapError> {
        let output = self.quote(amount_in);
        if output > self.reserve {
            return Err(SwapError::InsufficientLiquidity);
        }
        if output < min_output {
            return Err(SwapError::InsufficientOutput {
                min_output,
                actual: output,
            });
        }

        self.reserve -= output;
        self.swaps.push(SwapRecord {
            amount_in,
            output,
            recipient,
        });
        Ok(output)
    }
}

/// Router for deployments without a swap pool. Every call fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoSwapRouter;

impl SwapRouter for NoSwapRouter {
    fn swap_exact_tokens_for_reference(
        &mut self,
        _amount_in: Balance,
        _min_output: Balance,
        _recipient: Address,
    ) -> Result<Balance, SwapError> {
        Err(SwapError::Unavailable("no swap router configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_rate_swap() {
        let mut router = FixedRateRouter::new(5_000);
        let recipient = Address::from_low_u64(1);
        let out = router
            .swap_exact_tokens_for_reference(1_000, 400, recipient)
            .unwrap();
        assert_eq!(out, 500);
        assert_eq!(router.swaps().len(), 1);
        assert_eq!(router.swaps()[0].recipient, recipient);
    }

    #[test]
    fn test_slippage_leaves_router_untouched() {
        let mut router = FixedRateRouter::with_reserve(5_000, 10_000);
        let err = router
            .swap_exact_tokens_for_reference(1_000, 501, Address::ZERO)
            .unwrap_err();
        assert_eq!(
            err,
            SwapError::InsufficientOutput {
                min_output: 501,
                actual: 500
            }
        );
        assert!(router.swaps().is_empty());
        assert_eq!(router.reserve(), 10_000);
    }

    #[test]
    fn test_reserve_exhaustion() {
        let mut router = FixedRateRouter::with_reserve(10_000, 100);
        assert_eq!(
            router.swap_exact_tokens_for_reference(101, 0, Address::ZERO),
            Err(SwapError::InsufficientLiquidity)
        );
        assert_eq!(router.swap_exact_tokens_for_reference(100, 0, Address::ZERO), Ok(100));
        assert_eq!(router.reserve(), 0);
    }

    #[test]
    fn test_no_swap_router_always_fails() {
        let mut router = NoSwapRouter;
        assert!(matches!(
            router.swap_exact_tokens_for_reference(1, 0, Address::ZERO),
            Err(SwapError::Unavailable(_))
        ));
    }
}
