use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin, Uint128};
use cw_invoke::Call;

use crate::state::Status;

#[cw_serde]
pub struct InstantiateMsg {
    pub owners: Vec<String>,
    pub required: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Accepts native funds into the wallet.
    Deposit {},
    /// Stores a call and confirms it for the sender. An empty `data` sends
    /// `value` to `destination` as a plain bank transfer.
    SubmitTransaction {
        destination: String,
        value: Vec<Coin>,
        data: Binary,
    },
    /// Executes the transaction if this confirmation reaches the threshold.
    ConfirmTransaction { id: u64 },
    RevokeConfirmation { id: u64 },
    ExecuteTransaction { id: u64 },

    // Wallet only.
    AddOwner { owner: String },
    /// Lowers `required` if it would exceed the remaining owner count.
    RemoveOwner { owner: String },
    ReplaceOwner { owner: String, new_owner: String },
    ChangeRequirement { required: u32 },
    /// Pays out up to `amount`, capped at the wallet's balance, to an owner.
    WithdrawNative {
        to: String,
        denom: String,
        amount: Uint128,
    },
    /// Pays out up to `amount`, capped at the wallet's balance, to an owner.
    WithdrawToken {
        token: String,
        to: String,
        amount: Uint128,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Vec<Addr>)]
    Owners {},
    #[returns(bool)]
    IsOwner { address: String },
    #[returns(u32)]
    Required {},
    #[returns(TransactionResponse)]
    Transaction { id: u64 },
    /// Number of transactions matching the filters.
    #[returns(u64)]
    TransactionCount { pending: bool, executed: bool },
    #[returns(u32)]
    ConfirmationCount { id: u64 },
    #[returns(bool)]
    IsConfirmed { id: u64 },
    /// Owners who confirmed `id`, in owner order.
    #[returns(Vec<Addr>)]
    Confirmations { id: u64 },
    /// Ids of matching transactions, sliced to `[from, to)` after filtering.
    #[returns(Vec<u64>)]
    TransactionIds {
        from: u64,
        to: u64,
        pending: bool,
        executed: bool,
    },
}

#[cw_serde]
pub struct TransactionResponse {
    pub id: u64,
    pub call: Call,
    pub status: Status,
}

#[cw_serde]
pub struct MigrateMsg {}
