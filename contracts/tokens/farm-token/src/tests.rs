use cosmwasm_std::{
    testing::{mock_dependencies, mock_env, mock_info},
    Addr, Uint128,
};
use cw20::Cw20Coin;
use cw_multi_test::{App, Executor};
use cw_ownable::{Ownership, OwnershipError};
use farm_testing::{
    contracts::farm_token_contract,
    helpers::{cw20_balance, cw20_total_supply, instantiate_farm_token, set_master},
};

use crate::msg::{
    CapResponse, ExecuteMsg, InstantiateMsg, MasterResponse, MigrateMsg, QueryMsg,
    RemainingSupplyResponse,
};
use farm_token::ContractError;

const OWNER: &str = "owner";
const MASTER: &str = "master";
const ALICE: &str = "alice";
const BOB: &str = "bob";

fn mint(
    app: &mut App,
    token: &Addr,
    sender: &str,
    recipient: &str,
    amount: u128,
) -> anyhow::Result<()> {
    app.execute_contract(
        Addr::unchecked(sender),
        token.clone(),
        &ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount: Uint128::new(amount),
        },
        &[],
    )
    .map(|_| ())
}

fn remaining_supply(app: &App, token: &Addr) -> Option<Uint128> {
    let res: RemainingSupplyResponse = app
        .wrap()
        .query_wasm_smart(token, &QueryMsg::RemainingSupply {})
        .unwrap();
    res.remaining
}

#[test]
fn test_instantiate() {
    let mut app = App::default();
    let token = instantiate_farm_token(&mut app, OWNER, "ENOTE", Some(1_000), &[(ALICE, 100)]);

    let cap: CapResponse = app
        .wrap()
        .query_wasm_smart(&token, &QueryMsg::Cap {})
        .unwrap();
    assert_eq!(cap.cap, Some(Uint128::new(1_000)));

    let master: MasterResponse = app
        .wrap()
        .query_wasm_smart(&token, &QueryMsg::Master {})
        .unwrap();
    assert_eq!(master.master, None);

    let ownership: Ownership<Addr> = app
        .wrap()
        .query_wasm_smart(&token, &QueryMsg::Ownership {})
        .unwrap();
    assert_eq!(ownership.owner, Some(Addr::unchecked(OWNER)));

    assert_eq!(remaining_supply(&app, &token), Some(Uint128::new(900)));
    assert_eq!(cw20_balance(&app, &token, ALICE), 100);
}

#[test]
fn test_instantiate_over_cap() {
    let mut app = App::default();
    let code_id = app.store_code(farm_token_contract());

    let err: ContractError = app
        .instantiate_contract(
            code_id,
            Addr::unchecked(OWNER),
            &InstantiateMsg {
                name: "Enote".to_string(),
                symbol: "ENOTE".to_string(),
                decimals: 6,
                initial_balances: vec![
                    Cw20Coin {
                        address: ALICE.to_string(),
                        amount: Uint128::new(60),
                    },
                    Cw20Coin {
                        address: BOB.to_string(),
                        amount: Uint128::new(50),
                    },
                ],
                cap: Some(Uint128::new(100)),
                master: None,
                owner: None,
            },
            &[],
            "enote",
            None,
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(
        err,
        ContractError::CapExceeded {
            cap: Uint128::new(100),
            supply: Uint128::new(110)
        }
    );
}

#[test]
fn test_only_master_can_mint() {
    let mut app = App::default();
    let token = instantiate_farm_token(&mut app, OWNER, "ENOTE", Some(1_000), &[]);

    // Nobody can mint before a master is set, not even the owner.
    let err: ContractError = mint(&mut app, &token, OWNER, ALICE, 1)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::NotMaster {});

    // Only the owner can set the master.
    let err: ContractError = app
        .execute_contract(
            Addr::unchecked(ALICE),
            token.clone(),
            &ExecuteMsg::SetMaster {
                master: Some(ALICE.to_string()),
            },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::Ownable(OwnershipError::NotOwner));

    set_master(&mut app, &token, OWNER, &Addr::unchecked(MASTER));

    let err: ContractError = mint(&mut app, &token, ALICE, ALICE, 1)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::NotMaster {});

    mint(&mut app, &token, MASTER, ALICE, 250).unwrap();
    assert_eq!(cw20_balance(&app, &token, ALICE), 250);

    // The master is visible through the cw20 minter query as well.
    let minter: Option<cw20::MinterResponse> = app
        .wrap()
        .query_wasm_smart(&token, &QueryMsg::Minter {})
        .unwrap();
    assert_eq!(
        minter,
        Some(cw20::MinterResponse {
            minter: MASTER.to_string(),
            cap: Some(Uint128::new(1_000)),
        })
    );

    // Clearing the master disables minting.
    app.execute_contract(
        Addr::unchecked(OWNER),
        token.clone(),
        &ExecuteMsg::SetMaster { master: None },
        &[],
    )
    .unwrap();
    let err: ContractError = mint(&mut app, &token, MASTER, ALICE, 1)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::NotMaster {});
}

#[test]
fn test_mint_respects_cap() {
    let mut app = App::default();
    let token = instantiate_farm_token(&mut app, OWNER, "ENOTE", Some(1_000), &[(BOB, 400)]);
    set_master(&mut app, &token, OWNER, &Addr::unchecked(MASTER));

    mint(&mut app, &token, MASTER, ALICE, 600).unwrap();
    assert_eq!(remaining_supply(&app, &token), Some(Uint128::zero()));

    let err: ContractError = mint(&mut app, &token, MASTER, ALICE, 1)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(
        err,
        ContractError::CapExceeded {
            cap: Uint128::new(1_000),
            supply: Uint128::new(1_001)
        }
    );

    // Burning frees room under the cap.
    app.execute_contract(
        Addr::unchecked(BOB),
        token.clone(),
        &ExecuteMsg::Burn {
            amount: Uint128::new(100),
        },
        &[],
    )
    .unwrap();
    assert_eq!(remaining_supply(&app, &token), Some(Uint128::new(100)));
    mint(&mut app, &token, MASTER, ALICE, 100).unwrap();
    assert_eq!(cw20_total_supply(&app, &token), 1_000);
}

#[test]
fn test_uncapped_token() {
    let mut app = App::default();
    let token = instantiate_farm_token(&mut app, OWNER, "YNOTE", None, &[]);
    set_master(&mut app, &token, OWNER, &Addr::unchecked(MASTER));

    assert_eq!(remaining_supply(&app, &token), None);
    mint(&mut app, &token, MASTER, ALICE, u64::MAX as u128).unwrap();
    assert_eq!(cw20_balance(&app, &token, ALICE), u64::MAX as u128);

    let err: ContractError = mint(&mut app, &token, MASTER, ALICE, 0)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(
        err,
        ContractError::Cw20(cw20_base::ContractError::InvalidZeroAmount {})
    );
}

#[test]
fn test_cw20_passthrough() {
    let mut app = App::default();
    let token = instantiate_farm_token(&mut app, OWNER, "YNOTE", None, &[(ALICE, 100)]);

    app.execute_contract(
        Addr::unchecked(ALICE),
        token.clone(),
        &ExecuteMsg::IncreaseAllowance {
            spender: BOB.to_string(),
            amount: Uint128::new(40),
            expires: None,
        },
        &[],
    )
    .unwrap();
    app.execute_contract(
        Addr::unchecked(BOB),
        token.clone(),
        &ExecuteMsg::TransferFrom {
            owner: ALICE.to_string(),
            recipient: BOB.to_string(),
            amount: Uint128::new(40),
        },
        &[],
    )
    .unwrap();
    assert_eq!(cw20_balance(&app, &token, ALICE), 60);
    assert_eq!(cw20_balance(&app, &token, BOB), 40);

    // Allowance is used up.
    app.execute_contract(
        Addr::unchecked(BOB),
        token.clone(),
        &ExecuteMsg::TransferFrom {
            owner: ALICE.to_string(),
            recipient: BOB.to_string(),
            amount: Uint128::new(1),
        },
        &[],
    )
    .unwrap_err();
}

#[test]
fn test_ownership_transfer_moves_master_authority() {
    let mut app = App::default();
    let token = instantiate_farm_token(&mut app, OWNER, "ENOTE", Some(10), &[]);

    app.execute_contract(
        Addr::unchecked(OWNER),
        token.clone(),
        &ExecuteMsg::UpdateOwnership(cw_ownable::Action::TransferOwnership {
            new_owner: "timelock".to_string(),
            expiry: None,
        }),
        &[],
    )
    .unwrap();
    app.execute_contract(
        Addr::unchecked("timelock"),
        token.clone(),
        &ExecuteMsg::UpdateOwnership(cw_ownable::Action::AcceptOwnership),
        &[],
    )
    .unwrap();

    let err: ContractError = app
        .execute_contract(
            Addr::unchecked(OWNER),
            token.clone(),
            &ExecuteMsg::SetMaster {
                master: Some(MASTER.to_string()),
            },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::Ownable(OwnershipError::NotOwner));

    set_master(&mut app, &token, "timelock", &Addr::unchecked(MASTER));
}

#[test]
fn test_migrate() {
    let mut deps = mock_dependencies();
    crate::contract::instantiate(
        deps.as_mut(),
        mock_env(),
        mock_info(OWNER, &[]),
        InstantiateMsg {
            name: "Enote".to_string(),
            symbol: "ENOTE".to_string(),
            decimals: 6,
            initial_balances: vec![],
            cap: None,
            master: Some(MASTER.to_string()),
            owner: None,
        },
    )
    .unwrap();
    crate::contract::migrate(deps.as_mut(), mock_env(), MigrateMsg {}).unwrap();

    cw2::set_contract_version(deps.as_mut().storage, "crates.io:cw20-base", "1.1.0").unwrap();
    let err = crate::contract::migrate(deps.as_mut(), mock_env(), MigrateMsg {}).unwrap_err();
    assert_eq!(
        err,
        crate::ContractError::InvalidMigration {
            expected: "crates.io:farm-token".to_string(),
            actual: "crates.io:cw20-base".to_string(),
        }
    );
}
