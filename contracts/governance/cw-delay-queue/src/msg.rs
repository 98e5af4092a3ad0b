use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin};

use crate::state::QueuedCall;

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
    /// Seconds.
    pub delay: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Admin only. `eta` must be at least `delay` seconds away.
    QueueTransaction {
        target: String,
        value: Vec<Coin>,
        signature: String,
        data: Binary,
        eta: u64,
    },
    /// Admin only.
    CancelTransaction {
        target: String,
        value: Vec<Coin>,
        signature: String,
        data: Binary,
        eta: u64,
    },
    /// Admin only. Runs a queued call between `eta` and `eta + GRACE_PERIOD`.
    /// Funds sent along are kept by the timelock and can back `value`.
    ExecuteTransaction {
        target: String,
        value: Vec<Coin>,
        signature: String,
        data: Binary,
        eta: u64,
    },
    /// Only callable by the timelock itself.
    SetDelay { delay: u64 },
    /// Callable by the admin the first time, afterwards only by the
    /// timelock itself.
    SetPendingAdmin { pending_admin: String },
    AcceptAdmin {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(Option<QueuedCall>)]
    QueuedTransaction { digest: String },
    /// Digest a call would be queued under.
    #[returns(String)]
    TransactionDigest {
        target: String,
        value: Vec<Coin>,
        signature: String,
        data: Binary,
        eta: u64,
    },
    #[returns(Vec<QueuedResponse>)]
    ListQueued {
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub pending_admin: Option<Addr>,
    pub delay: u64,
    pub grace_period: u64,
    pub minimum_delay: u64,
    pub maximum_delay: u64,
}

#[cw_serde]
pub struct QueuedResponse {
    pub digest: String,
    pub call: QueuedCall,
}

#[cw_serde]
pub struct MigrateMsg {}
