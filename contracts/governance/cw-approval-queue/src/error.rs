use cosmwasm_std::{Addr, StdError};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("Call must come from wallet")]
    NotWallet {},

    #[error("Owner does not exist: {address}")]
    OwnerDoesNotExist { address: Addr },

    #[error("Owner already exists: {address}")]
    OwnerExists { address: Addr },

    #[error("Invalid requirement of {required} for {owner_count} owners")]
    InvalidRequirement { required: u32, owner_count: u32 },

    #[error("Transaction {id} does not exist")]
    TransactionNotFound { id: u64 },

    #[error("Transaction already executed")]
    AlreadyExecuted {},

    #[error("Transaction is being executed")]
    ExecutionInProgress {},

    #[error("Transaction already confirmed by {address}")]
    AlreadyConfirmed { address: Addr },

    #[error("Not confirmed")]
    NotConfirmed {},

    #[error("Transaction has {confirmations} of {required} required confirmations")]
    NotEnoughConfirmations { confirmations: u32, required: u32 },

    #[error("low level call failed: {reason}")]
    CallFailed { id: u64, reason: String },

    #[error("Invalid migration. Expected contract {expected}, got {actual}")]
    InvalidMigration { expected: String, actual: String },
}
