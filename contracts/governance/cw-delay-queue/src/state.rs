use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_vec, Addr, Binary, Coin, HexBinary, StdResult};
use cw_storage_plus::{Item, Map};
use sha2::{Digest, Sha256};

pub const GRACE_PERIOD: u64 = 14 * 24 * 60 * 60;
pub const MINIMUM_DELAY: u64 = 6 * 60 * 60;
pub const MAXIMUM_DELAY: u64 = 30 * 24 * 60 * 60;

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    pub pending_admin: Option<Addr>,
    /// Set once the admin has used its one direct `set_pending_admin`.
    pub admin_initialized: bool,
    /// Seconds.
    pub delay: u64,
}

/// A delayed call. `signature` names the execute message to send to
/// `target` and `data` holds its arguments. With an empty `signature`,
/// `data` is sent as is.
#[cw_serde]
pub struct QueuedCall {
    pub target: Addr,
    pub value: Vec<Coin>,
    pub signature: String,
    pub data: Binary,
    /// Earliest execution time, in seconds.
    pub eta: u64,
}

impl QueuedCall {
    /// Hex encoded sha256 of the call's JSON encoding.
    pub fn digest(&self) -> StdResult<String> {
        let hash = Sha256::digest(to_json_vec(self)?);
        Ok(HexBinary::from(hash.as_slice()).to_hex())
    }
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Digest -> queued call.
pub const QUEUED: Map<&str, QueuedCall> = Map::new("queued");
