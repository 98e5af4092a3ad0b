use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};
use cw_ownable::{cw_ownable_execute, cw_ownable_query};

use crate::state::{PoolInfo, Settlement};

#[cw_serde]
pub struct InstantiateMsg {
    pub reward_token: String,
    pub reward_per_block: Uint128,
    pub start_block: u64,
    pub end_block: u64,
    pub fee_sink: String,
    pub settlement: Settlement,
    pub referral_bonus_bp: Option<u16>,
    /// Defaults to the instantiator.
    pub owner: Option<String>,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Stakes `amount` into a pool, less the pool's deposit fee. The farm
    /// must have an allowance on the pool's stake token. `referrer` is only
    /// recorded on the sender's first deposit.
    Deposit {
        pool_id: u64,
        amount: Uint128,
        referrer: Option<String>,
    },
    Withdraw {
        pool_id: u64,
        amount: Uint128,
    },
    /// Pays out everything owed for a pool. Does nothing if nothing is owed.
    Harvest {
        pool_id: u64,
    },
    UpdatePool {
        pool_id: u64,
    },
    MassUpdatePools {},

    /// Registers a pool. Owner only.
    Add {
        weight: u64,
        stake_token: String,
        deposit_fee_bp: u16,
        with_update: bool,
    },
    /// Changes a pool's weight and deposit fee. Owner only.
    Set {
        pool_id: u64,
        weight: u64,
        deposit_fee_bp: u16,
        with_update: bool,
    },
    UpdateReferralBonus {
        bonus_bp: u16,
    },
    UpdateFeeSink {
        fee_sink: String,
    },
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(crate::state::Config)]
    Config {},
    #[returns(PoolResponse)]
    PoolInfo { pool_id: u64 },
    #[returns(Vec<PoolResponse>)]
    ListPools {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(u64)]
    PoolLength {},
    #[returns(u64)]
    TotalWeight {},
    #[returns(farm_accumulator::Position)]
    UserInfo { pool_id: u64, address: String },
    /// Reward `address` would receive if it harvested at the current block.
    #[returns(PendingRewardResponse)]
    PendingReward { pool_id: u64, address: String },
    #[returns(Option<Addr>)]
    Referrer { address: String },
}

#[cw_serde]
pub struct PoolResponse {
    pub pool_id: u64,
    pub info: PoolInfo,
}

#[cw_serde]
pub struct PendingRewardResponse {
    pub pending: Uint128,
}

#[cw_serde]
pub struct MigrateMsg {}
