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
    Ownable(#[from] cw_ownable::OwnershipError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Pool {pool_id} does not exist")]
    PoolNotFound { pool_id: u64 },

    #[error("A pool for {stake_token} already exists")]
    DuplicatePool { stake_token: String },

    #[error("Deposit fee of {bp} basis points exceeds 10000")]
    InvalidDepositFee { bp: u16 },

    #[error("Referral bonus of {bp} basis points exceeds 10000")]
    InvalidReferralBonus { bp: u16 },

    #[error("Staking period has not started")]
    StakingNotStarted {},

    #[error("Staking period has ended")]
    StakingEnded {},

    #[error("No tokens staked")]
    NoTokensStaked {},

    #[error("Can not withdraw more than is staked (staked: {staked}, requested: {requested})")]
    InsufficientStake { staked: Uint128, requested: Uint128 },

    #[error("Amount must be greater than zero")]
    InvalidZeroAmount {},

    #[error("Invalid migration. Expected contract {expected}, got {actual}")]
    InvalidMigration { expected: String, actual: String },
}
