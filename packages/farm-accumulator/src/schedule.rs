use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScheduleError {
    #[error("Emission window must end after it starts (start: {start}, end: {end})")]
    InvalidWindow { start: u64, end: u64 },

    #[error("Reward per block must be greater than zero")]
    ZeroRewardRate {},
}

/// Bounded emission window. Rewards accrue for every block height `h`
/// with `start_block <= h < end_block`.
#[cw_serde]
pub struct EmissionSchedule {
    pub reward_per_block: Uint128,
    pub start_block: u64,
    pub end_block: u64,
}

impl EmissionSchedule {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.start_block >= self.end_block {
            return Err(ScheduleError::InvalidWindow {
                start: self.start_block,
                end: self.end_block,
            });
        }
        if self.reward_per_block.is_zero() {
            return Err(ScheduleError::ZeroRewardRate {});
        }
        Ok(())
    }

    pub fn has_started(&self, height: u64) -> bool {
        height >= self.start_block
    }

    pub fn has_ended(&self, height: u64) -> bool {
        height >= self.end_block
    }

    /// Upper bound on everything the window can ever emit.
    pub fn total_emission(&self) -> Uint128 {
        self.reward_per_block
            .saturating_mul(Uint128::from(self.end_block.saturating_sub(self.start_block)))
    }
}
