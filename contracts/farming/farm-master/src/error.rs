use cosmwasm_std::{OverflowError, StdError, Uint128};
use cw_utils::PaymentError;
use farm_accumulator::ScheduleError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error(transparent)]
    Overflow(#[from] OverflowError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Staking period has not started")]
    StakingNotStarted {},

    #[error("Staking period has ended")]
    StakingEnded {},

    #[error("Staking period is in progress")]
    StakingInProgress {},

    #[error("No tokens staked")]
    NoTokensStaked {},

    #[error("Can not withdraw more than is staked (staked: {staked}, requested: {requested})")]
    InsufficientStake { staked: Uint128, requested: Uint128 },

    #[error("No rewards to claim")]
    NoRewardsToClaim {},

    #[error("Amount must be greater than zero")]
    InvalidZeroAmount {},

    #[error("Invalid migration. Expected contract {expected}, got {actual}")]
    InvalidMigration { expected: String, actual: String },
}
