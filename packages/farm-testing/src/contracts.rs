use cosmwasm_std::Empty;

use cw_multi_test::{Contract, ContractWrapper};

pub fn farm_token_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        farm_token::contract::execute,
        farm_token::contract::instantiate,
        farm_token::contract::query,
    )
    .with_migrate(farm_token::contract::migrate);
    Box::new(contract)
}

pub fn farm_master_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        farm_master::contract::execute,
        farm_master::contract::instantiate,
        farm_master::contract::query,
    )
    .with_migrate(farm_master::contract::migrate);
    Box::new(contract)
}

pub fn farm_pools_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        farm_pools::contract::execute,
        farm_pools::contract::instantiate,
        farm_pools::contract::query,
    )
    .with_migrate(farm_pools::contract::migrate);
    Box::new(contract)
}

pub fn approval_queue_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw_approval_queue::contract::execute,
        cw_approval_queue::contract::instantiate,
        cw_approval_queue::contract::query,
    )
    .with_reply(cw_approval_queue::contract::reply)
    .with_migrate(cw_approval_queue::contract::migrate);
    Box::new(contract)
}

pub fn delay_queue_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw_delay_queue::contract::execute,
        cw_delay_queue::contract::instantiate,
        cw_delay_queue::contract::query,
    )
    .with_reply(cw_delay_queue::contract::reply)
    .with_migrate(cw_delay_queue::contract::migrate);
    Box::new(contract)
}
