use std::cmp::{max, min};

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Uint128, Uint256};

use crate::{EmissionSchedule, ACC_REWARD_PRECISION};

#[cw_serde]
pub struct Pool {
    /// Share of the emission relative to the sum of all pool weights.
    pub weight: u64,
    /// Height up to which rewards have been accounted for.
    pub last_reward_block: u64,
    /// Cumulative reward per staked unit, scaled by `ACC_REWARD_PRECISION`.
    pub acc_reward_per_share: Uint256,
    pub total_staked: Uint128,
    /// Reward minted for this pool and not paid out yet.
    pub undistributed: Uint128,
}

impl Pool {
    pub fn new(weight: u64, last_reward_block: u64) -> Self {
        Self {
            weight,
            last_reward_block,
            acc_reward_per_share: Uint256::zero(),
            total_staked: Uint128::zero(),
            undistributed: Uint128::zero(),
        }
    }

    /// Brings the accumulator up to `height` and returns the amount of
    /// reward that must be minted into the farm's custody to back it.
    ///
    /// Intervals with nothing staked are skipped without minting, so that
    /// reward is forfeited rather than carried over.
    pub fn update(
        &mut self,
        schedule: &EmissionSchedule,
        total_weight: u64,
        height: u64,
    ) -> StdResult<Uint128> {
        if height <= self.last_reward_block {
            return Ok(Uint128::zero());
        }

        let effective_end = min(height, schedule.end_block);
        let effective_start = max(self.last_reward_block, schedule.start_block);

        if self.total_staked.is_zero() || total_weight == 0 || effective_end <= effective_start {
            self.last_reward_block = max(self.last_reward_block, effective_end);
            return Ok(Uint128::zero());
        }

        let reward: Uint128 = schedule
            .reward_per_block
            .full_mul(effective_end - effective_start)
            .checked_mul(Uint256::from(self.weight))?
            .checked_div(Uint256::from(total_weight))?
            .try_into()?;

        let increment = reward
            .full_mul(ACC_REWARD_PRECISION)
            .checked_div(Uint256::from(self.total_staked))?;
        self.acc_reward_per_share = self.acc_reward_per_share.checked_add(increment)?;
        self.last_reward_block = effective_end;
        self.undistributed = self.undistributed.checked_add(reward)?;

        Ok(reward)
    }

    /// Takes up to `owed` out of the undistributed reward and returns the
    /// amount that may be paid. Owed amounts are truncated per staker, so
    /// their sum can run a few units past what was minted; that excess is
    /// never paid.
    pub fn release(&mut self, owed: Uint128) -> Uint128 {
        let paid = min(owed, self.undistributed);
        self.undistributed -= paid;
        paid
    }

    /// Read-only view of `update`, used by pending-reward queries.
    pub fn updated(
        &self,
        schedule: &EmissionSchedule,
        total_weight: u64,
        height: u64,
    ) -> StdResult<Self> {
        let mut pool = self.clone();
        pool.update(schedule, total_weight, height)?;
        Ok(pool)
    }
}
