use cosmwasm_std::{Addr, Uint128};
use cw20::Cw20Coin;
use cw_multi_test::{App, Executor};

use crate::contracts::farm_token_contract;

/// Instantiates a farm token owned by `owner`. `cap` of `None` gives an
/// uncapped token.
pub fn instantiate_farm_token(
    app: &mut App,
    owner: &str,
    symbol: &str,
    cap: Option<u128>,
    initial_balances: &[(&str, u128)],
) -> Addr {
    let code_id = app.store_code(farm_token_contract());
    let msg = farm_token::msg::InstantiateMsg {
        name: format!("{symbol} token"),
        symbol: symbol.to_string(),
        decimals: 6,
        initial_balances: initial_balances
            .iter()
            .map(|(address, amount)| Cw20Coin {
                address: address.to_string(),
                amount: Uint128::new(*amount),
            })
            .collect(),
        cap: cap.map(Uint128::new),
        master: None,
        owner: Some(owner.to_string()),
    };
    app.instantiate_contract(code_id, Addr::unchecked(owner), &msg, &[], symbol, None)
        .unwrap()
}

pub fn set_master(app: &mut App, token: &Addr, owner: &str, master: &Addr) {
    app.execute_contract(
        Addr::unchecked(owner),
        token.clone(),
        &farm_token::msg::ExecuteMsg::SetMaster {
            master: Some(master.to_string()),
        },
        &[],
    )
    .unwrap();
}

pub fn increase_allowance(app: &mut App, token: &Addr, owner: &str, spender: &Addr, amount: u128) {
    app.execute_contract(
        Addr::unchecked(owner),
        token.clone(),
        &cw20::Cw20ExecuteMsg::IncreaseAllowance {
            spender: spender.to_string(),
            amount: Uint128::new(amount),
            expires: None,
        },
        &[],
    )
    .unwrap();
}

pub fn cw20_balance(app: &App, token: &Addr, address: impl Into<String>) -> u128 {
    let res: cw20::BalanceResponse = app
        .wrap()
        .query_wasm_smart(
            token,
            &cw20::Cw20QueryMsg::Balance {
                address: address.into(),
            },
        )
        .unwrap();
    res.balance.u128()
}

pub fn cw20_total_supply(app: &App, token: &Addr) -> u128 {
    let res: cw20::TokenInfoResponse = app
        .wrap()
        .query_wasm_smart(token, &cw20::Cw20QueryMsg::TokenInfo {})
        .unwrap();
    res.total_supply.u128()
}

pub fn set_block_height(app: &mut App, height: u64) {
    app.update_block(|block| block.height = height);
}

pub fn advance_seconds(app: &mut App, seconds: u64) {
    app.update_block(|block| {
        block.time = block.time.plus_seconds(seconds);
        block.height += 1;
    });
}
