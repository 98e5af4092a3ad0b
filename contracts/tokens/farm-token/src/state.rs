use cosmwasm_std::Uint128;
use cw_storage_plus::Item;

// Supply cap, `None` for an uncapped token. Kept outside of cw20-base's
// minter data so that it survives the master being cleared.
pub const CAP: Item<Option<Uint128>> = Item::new("cap");
