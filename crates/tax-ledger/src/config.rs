//! Ledger configuration.
//!
//! Loaded from `TL_*` environment variables or deserialized from JSON, then
//! validated with the same rules the engine's setters apply.

use crate::domain::value_objects::{Address, Bps, MAX_BPS};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Initial state of a transfer engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Deployer/owner. Always privileged; the default authorizer admits only it.
    pub owner: Address,
    /// The ledger's own address. Always privileged.
    pub ledger_address: Address,
    /// Tax accumulator address. Always privileged.
    pub accumulator: Address,
    /// Receiver of liquidation proceeds. Defaults to `owner`.
    pub proceeds_recipient: Option<Address>,
    /// Pool used for liquidation. Registered as a pool as well.
    pub swap_pool: Option<Address>,
    /// Additional pools.
    pub pools: Vec<Address>,
    /// Additional privileged accounts.
    pub privileged: Vec<Address>,
    pub tax_active: bool,
    pub buy_tax_bps: u16,
    pub sell_tax_bps: u16,
    /// Wallet-to-wallet rate; zero keeps ordinary transfers untaxed.
    pub ordinary_tax_bps: u16,
    pub max_tx_bps: u16,
    pub max_wallet_bps: u16,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            owner: Address::from_low_u64(1),
            ledger_address: Address::from_low_u64(2),
            accumulator: Address::from_low_u64(3),
            proceeds_recipient: None,
            swap_pool: None,
            pools: Vec::new(),
            privileged: Vec::new(),
            tax_active: false,
            buy_tax_bps: 0,
            sell_tax_bps: 0,
            ordinary_tax_bps: 0,
            max_tx_bps: MAX_BPS,
            max_wallet_bps: MAX_BPS,
        }
    }
}

impl LedgerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TL_OWNER`, `TL_LEDGER_ADDRESS`, `TL_ACCUMULATOR`: hex addresses
    /// - `TL_PROCEEDS_RECIPIENT`, `TL_SWAP_POOL`: optional hex addresses
    /// - `TL_POOLS`, `TL_PRIVILEGED`: comma-separated hex addresses
    /// - `TL_TAX_ACTIVE`: `true`/`1` to enable tax (default: false)
    /// - `TL_BUY_TAX_BPS`, `TL_SELL_TAX_BPS`, `TL_ORDINARY_TAX_BPS` (default: 0)
    /// - `TL_MAX_TX_BPS`, `TL_MAX_WALLET_BPS` (default: 10000)
    ///
    /// Unset variables keep their default; malformed ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            owner: address_var(&lookup, "TL_OWNER")?.unwrap_or(defaults.owner),
            ledger_address: address_var(&lookup, "TL_LEDGER_ADDRESS")?
                .unwrap_or(defaults.ledger_address),
            accumulator: address_var(&lookup, "TL_ACCUMULATOR")?.unwrap_or(defaults.accumulator),
            proceeds_recipient: address_var(&lookup, "TL_PROCEEDS_RECIPIENT")?,
            swap_pool: address_var(&lookup, "TL_SWAP_POOL")?,
            pools: address_list_var(&lookup, "TL_POOLS")?,
            privileged: address_list_var(&lookup, "TL_PRIVILEGED")?,
            tax_active: lookup("TL_TAX_ACTIVE")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.tax_active),
            buy_tax_bps: bps_var(&lookup, "TL_BUY_TAX_BPS")?.unwrap_or(defaults.buy_tax_bps),
            sell_tax_bps: bps_var(&lookup, "TL_SELL_TAX_BPS")?.unwrap_or(defaults.sell_tax_bps),
            ordinary_tax_bps: bps_var(&lookup, "TL_ORDINARY_TAX_BPS")?
                .unwrap_or(defaults.ordinary_tax_bps),
            max_tx_bps: bps_var(&lookup, "TL_MAX_TX_BPS")?.unwrap_or(defaults.max_tx_bps),
            max_wallet_bps: bps_var(&lookup, "TL_MAX_WALLET_BPS")?
                .unwrap_or(defaults.max_wallet_bps),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects rates above 100% and limits outside `1..=10000`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, bps) in [
            ("buy_tax_bps", self.buy_tax_bps),
            ("sell_tax_bps", self.sell_tax_bps),
            ("ordinary_tax_bps", self.ordinary_tax_bps),
        ] {
            if !Bps(bps).is_valid() {
                return Err(ConfigError::InvalidRate { field, bps });
            }
        }

        for (field, bps) in [
            ("max_tx_bps", self.max_tx_bps),
            ("max_wallet_bps", self.max_wallet_bps),
        ] {
            if bps == 0 || !Bps(bps).is_valid() {
                return Err(ConfigError::InvalidLimit { field, bps });
            }
        }

        Ok(())
    }

    /// Where liquidation proceeds go.
    #[must_use]
    pub fn proceeds_recipient(&self) -> Address {
        self.proceeds_recipient.unwrap_or(self.owner)
    }

    /// Accounts that are privileged from construction.
    #[must_use]
    pub fn initial_privileged(&self) -> Vec<Address> {
        let mut accounts = vec![self.owner, self.ledger_address, self.accumulator];
        accounts.extend(self.privileged.iter().copied());
        accounts
    }
}

fn address_var<F>(lookup: &F, var: &'static str) -> Result<Option<Address>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => Address::from_hex(value.trim())
            .map(Some)
            .ok_or(ConfigError::InvalidAddress { var, value }),
    }
}

fn address_list_var<F>(lookup: &F, var: &'static str) -> Result<Vec<Address>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(Vec::new());
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Address::from_hex(s).ok_or_else(|| ConfigError::InvalidAddress {
                var,
                value: s.to_string(),
            })
        })
        .collect()
}

fn bps_var<F>(lookup: &F, var: &'static str) -> Result<Option<u16>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
