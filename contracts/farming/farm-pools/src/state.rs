use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};
use farm_accumulator::{EmissionSchedule, Pool, Position};

/// When reward earned before a deposit or withdrawal is handed out.
#[cw_serde]
pub enum Settlement {
    /// Kept as claimable until the staker harvests.
    Accrue,
    /// Paid out as part of the deposit or withdrawal.
    Immediate,
}

#[cw_serde]
pub struct Config {
    pub reward_token: Addr,
    pub schedule: EmissionSchedule,
    /// Receives deposit fees.
    pub fee_sink: Addr,
    pub settlement: Settlement,
    /// Extra reward minted to a staker's referrer, in basis points of each
    /// payout.
    pub referral_bonus_bp: u16,
}

#[cw_serde]
pub struct PoolInfo {
    pub stake_token: Addr,
    pub deposit_fee_bp: u16,
    pub pool: Pool,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Sum of the weights of all pools.
pub const TOTAL_WEIGHT: Item<u64> = Item::new("total_weight");

pub const POOL_COUNT: Item<u64> = Item::new("pool_count");
pub const POOLS: Map<u64, PoolInfo> = Map::new("pools");

/// Stake token -> pool id. A stake token can back at most one pool.
pub const STAKE_TOKENS: Map<&Addr, u64> = Map::new("stake_tokens");

pub const POSITIONS: Map<(u64, &Addr), Position> = Map::new("positions");

/// Staker -> referrer, recorded on the staker's first deposit.
pub const REFERRERS: Map<&Addr, Addr> = Map::new("referrers");
