use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error(transparent)]
    Cw20(#[from] cw20_base::ContractError),

    #[error(transparent)]
    Ownable(#[from] cw_ownable::OwnershipError),

    #[error("only master farmer can mint")]
    NotMaster {},

    #[error("mint amount exceeds cap (cap: {cap}, supply after mint: {supply})")]
    CapExceeded { cap: Uint128, supply: Uint128 },

    #[error("Invalid migration. Expected contract {expected}, got {actual}")]
    InvalidMigration { expected: String, actual: String },
}
