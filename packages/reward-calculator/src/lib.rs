//! The pluggable reward calculator strategy: a pure function mapping
//! `(stake_amount, validator_start_time, staking_start_time,
//! staking_end_time, uptime_seconds) -> reward`. Kept to this minimal,
//! five-argument shape so unit testing any implementation is trivial.

use cosmwasm_std::Uint256;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Determinism is required: for identical inputs, every implementation must
/// return identical output across calls, nodes, and time.
pub trait RewardCalculator {
    fn calculate_reward(
        &self,
        stake_amount: Uint256,
        validator_start_time: u64,
        staking_start_time: u64,
        staking_end_time: u64,
        uptime_seconds: u64,
    ) -> Uint256;
}

/// Accrues reward linearly over `[staking_start_time, staking_end_time)` at
/// `reward_basis_points` annualized, discounted by the fraction of that
/// interval the validator was actually observed up
/// (`uptime_seconds / (staking_end_time - staking_start_time)`, clamped to
/// `[0, 1]`). `validator_start_time` is accepted for interface parity with
/// calculators that key decay off the validator's own tenure, but this
/// implementation does not use it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
pub struct LinearUptimeRewardCalculator {
    /// Annualized reward rate, in basis points (10_000 = 100%).
    pub reward_basis_points: u32,
}

const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;
const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

impl RewardCalculator for LinearUptimeRewardCalculator {
    fn calculate_reward(
        &self,
        stake_amount: Uint256,
        _validator_start_time: u64,
        staking_start_time: u64,
        staking_end_time: u64,
        uptime_seconds: u64,
    ) -> Uint256 {
        if staking_end_time <= staking_start_time {
            return Uint256::zero();
        }
        let duration = staking_end_time - staking_start_time;
        let uptime = uptime_seconds.min(duration);

        // full_period_reward = stake * bips * duration / (10_000 * seconds_per_year)
        let full_period_reward = stake_amount
            * Uint256::from(self.reward_basis_points)
            * Uint256::from(duration)
            / Uint256::from(BASIS_POINTS_DENOMINATOR * SECONDS_PER_YEAR);

        // discount by observed uptime fraction of the staking interval
        full_period_reward * Uint256::from(uptime) / Uint256::from(duration)
    }
}
