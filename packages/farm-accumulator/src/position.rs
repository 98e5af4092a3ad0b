use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Uint128, Uint256};

use crate::ACC_REWARD_PRECISION;

/// A staker's holding in one pool.
#[cw_serde]
#[derive(Default)]
pub struct Position {
    pub amount: Uint128,
    /// `amount * acc_reward_per_share / ACC_REWARD_PRECISION` as of the last
    /// interaction.
    pub reward_debt: Uint128,
    /// Reward settled on deposit or withdraw but not paid out yet.
    pub claimable: Uint128,
}

impl Position {
    fn accumulated(&self, acc_reward_per_share: Uint256) -> StdResult<Uint128> {
        Ok(Uint256::from(self.amount)
            .checked_mul(acc_reward_per_share)?
            .checked_div(Uint256::from(ACC_REWARD_PRECISION))?
            .try_into()?)
    }

    /// Reward earned since the last checkpoint.
    pub fn pending(&self, acc_reward_per_share: Uint256) -> StdResult<Uint128> {
        Ok(self
            .accumulated(acc_reward_per_share)?
            .checked_sub(self.reward_debt)?)
    }

    /// Everything owed to the staker: pending plus previously settled reward.
    pub fn owed(&self, acc_reward_per_share: Uint256) -> StdResult<Uint128> {
        Ok(self
            .pending(acc_reward_per_share)?
            .checked_add(self.claimable)?)
    }

    /// Re-bases `reward_debt` on the current amount. Must be called after
    /// every change to `amount`.
    pub fn checkpoint(&mut self, acc_reward_per_share: Uint256) -> StdResult<()> {
        self.reward_debt = self.accumulated(acc_reward_per_share)?;
        Ok(())
    }

    /// Moves pending reward into `claimable` and returns the amount moved.
    pub fn accrue(&mut self, acc_reward_per_share: Uint256) -> StdResult<Uint128> {
        let pending = self.pending(acc_reward_per_share)?;
        self.claimable = self.claimable.checked_add(pending)?;
        self.checkpoint(acc_reward_per_share)?;
        Ok(pending)
    }

    /// Drains pending and claimable reward, returning the total to pay.
    pub fn take_owed(&mut self, acc_reward_per_share: Uint256) -> StdResult<Uint128> {
        let owed = self.owed(acc_reward_per_share)?;
        self.claimable = Uint128::zero();
        self.checkpoint(acc_reward_per_share)?;
        Ok(owed)
    }
}
