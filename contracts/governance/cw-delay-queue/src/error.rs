use cosmwasm_std::StdError;
use cw_invoke::InvokeError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    InvalidSignature(#[from] InvokeError),

    #[error("Call must come from admin.")]
    NotAdmin {},

    #[error("Call must come from pendingAdmin.")]
    NotPendingAdmin {},

    #[error("Call must come from Timelock.")]
    NotTimelock {},

    #[error("Delay of {delay} seconds is outside [{min}, {max}]")]
    DelayOutOfRange { delay: u64, min: u64, max: u64 },

    #[error("Estimated execution block must satisfy delay.")]
    EtaBelowDelay {},

    #[error("Estimated execution block exceeds maximum delay.")]
    EtaAboveMaximum {},

    #[error("Transaction hasn't been queued.")]
    NotQueued {},

    #[error("Transaction hasn't surpassed time lock.")]
    TimelockNotSurpassed {},

    #[error("Transaction is stale.")]
    Stale {},

    #[error("Transaction execution reverted: {reason}")]
    ExecutionReverted { reason: String },

    #[error("Invalid migration. Expected contract {expected}, got {actual}")]
    InvalidMigration { expected: String, actual: String },
}
