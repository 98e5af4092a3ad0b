use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

#[cw_serde]
pub struct InstantiateMsg {
    /// Capped farm token this contract will be master of.
    pub reward_token: String,
    /// cw20 token stakers lock in the farm.
    pub stake_token: String,
    pub reward_per_block: Uint128,
    pub start_block: u64,
    pub end_block: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Stakes `amount` of the stake token. The farm must have an allowance
    /// for at least that much.
    Deposit { amount: Uint128 },
    /// Unstakes `amount`. Reward earned so far is kept as claimable.
    Withdraw { amount: Uint128 },
    /// After the window closes, pays all owed reward and returns the stake.
    Harvest {},
    /// Brings the pool's accumulator up to the current block.
    UpdatePool {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(crate::state::Config)]
    Config {},
    #[returns(farm_accumulator::Pool)]
    Pool {},
    #[returns(farm_accumulator::Position)]
    UserInfo { address: String },
    /// Reward `address` would receive if it harvested at the current block.
    #[returns(PendingRewardResponse)]
    PendingReward { address: String },
}

#[cw_serde]
pub struct PendingRewardResponse {
    pub pending: Uint128,
}

#[cw_serde]
pub struct MigrateMsg {}
