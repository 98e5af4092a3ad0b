use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};
use farm_accumulator::{EmissionSchedule, Pool, Position};

#[cw_serde]
pub struct Config {
    pub reward_token: Addr,
    pub stake_token: Addr,
    pub schedule: EmissionSchedule,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// The only pool. It carries the full emission so its weight is fixed at 1.
pub const POOL: Item<Pool> = Item::new("pool");

pub const POSITIONS: Map<&Addr, Position> = Map::new("positions");
