//! Stake custody abstraction: `lock`/`unlock`/`reward` hooks that decouple
//! the Staking Manager from any one concrete asset backend. Only a
//! native-coin backend is implemented here; a CW20 backend is a named
//! extension point, not a concrete custody backend in scope for this core.

use cosmwasm_std::{Addr, BankMsg, Coin, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssetError {
    #[error("must send '{0}' to stake")]
    MissingDenom(String),

    #[error("sent unsupported denoms, must send only '{0}' to stake")]
    ExtraDenoms(String),

    #[error("no funds sent")]
    NoFunds {},

    #[error("sent amount {sent} does not match requested stake amount {requested}")]
    AmountMismatch { sent: Uint128, requested: Uint128 },
}

pub trait AssetHandler {
    /// Validates the funds attached to a staking call against the caller's
    /// requested `stake_amount`, returning the value actually locked. A
    /// decimals-normalizing backend (e.g. one that wraps a token with
    /// non-trivial exponent) may legitimately return less than `requested`.
    fn lock(&self, funds: &[Coin], requested: Uint128) -> Result<Uint128, AssetError>;

    /// Release previously locked `value` to `to`. Returned as a bare
    /// `BankMsg` rather than a `CosmosMsg<C>` so callers embedding a custom
    /// chain message type (e.g. `WarpMsg`) can fold it into their own
    /// `Response<C>` via `Into<CosmosMsg<C>>` without a manual match.
    fn unlock(&self, to: &Addr, value: Uint128) -> BankMsg;

    /// Mint or transfer `amount` of reward to `to`.
    fn reward(&self, to: &Addr, amount: Uint128) -> BankMsg;
}

/// Reference backend: stake and rewards both move as a single native bank
/// denom, validated against `info.funds` the way bond/unbond handlers
/// typically check sent coins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeCoinHandler {
    pub denom: String,
}

impl NativeCoinHandler {
    pub fn new(denom: impl Into<String>) -> Self {
        NativeCoinHandler {
            denom: denom.into(),
        }
    }
}

impl AssetHandler for NativeCoinHandler {
    fn lock(&self, funds: &[Coin], requested: Uint128) -> Result<Uint128, AssetError> {
        let sent = validate_funds(funds, &self.denom)?;
        if sent != requested {
            return Err(AssetError::AmountMismatch {
                sent,
                requested,
            });
        }
        Ok(sent)
    }

    fn unlock(&self, to: &Addr, value: Uint128) -> BankMsg {
        BankMsg::Send {
            to_address: to.to_string(),
            amount: vec![Coin {
                denom: self.denom.clone(),
                amount: value,
            }],
        }
    }

    fn reward(&self, to: &Addr, amount: Uint128) -> BankMsg {
        self.unlock(to, amount)
    }
}

fn validate_funds(funds: &[Coin], denom: &str) -> Result<Uint128, AssetError> {
    match funds {
        [] => Err(AssetError::NoFunds {}),
        [Coin { denom: d, amount }] if d == denom => Ok(*amount),
        [Coin { denom: d, .. }] => Err(AssetError::MissingDenom(d.clone())),
        _ => Err(AssetError::ExtraDenoms(denom.to_string())),
    }
}
