use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Empty, StdResult, Storage};
use cw_invoke::Call;
use cw_storage_plus::{Item, Map};

pub const MAX_OWNER_COUNT: u32 = 50;

#[cw_serde]
pub enum Status {
    Pending,
    /// The call has been dispatched and its reply has not come back yet.
    Executing,
    Executed,
}

#[cw_serde]
pub struct Transaction {
    pub call: Call,
    pub status: Status,
}

/// Ordered owner list. Confirmations are reported in this order.
pub const OWNERS: Item<Vec<Addr>> = Item::new("owners");
pub const REQUIRED: Item<u32> = Item::new("required");

pub const TRANSACTION_COUNT: Item<u64> = Item::new("transaction_count");
pub const TRANSACTIONS: Map<u64, Transaction> = Map::new("transactions");
pub const CONFIRMATIONS: Map<(u64, &Addr), Empty> = Map::new("confirmations");

pub fn is_owner(storage: &dyn Storage, address: &Addr) -> StdResult<bool> {
    Ok(OWNERS.load(storage)?.contains(address))
}

/// Current owners who have confirmed `id`, in owner order.
pub fn confirmations(storage: &dyn Storage, id: u64) -> StdResult<Vec<Addr>> {
    Ok(OWNERS
        .load(storage)?
        .into_iter()
        .filter(|owner| CONFIRMATIONS.has(storage, (id, owner)))
        .collect())
}

pub fn is_confirmed(storage: &dyn Storage, id: u64) -> StdResult<bool> {
    Ok(confirmations(storage, id)?.len() as u32 >= REQUIRED.load(storage)?)
}
