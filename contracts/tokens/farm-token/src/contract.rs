#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdError, StdResult,
    Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use cw20_base::msg::InstantiateMsg as Cw20InstantiateMsg;
use cw20_base::state::{MinterData, TOKEN_INFO};

use crate::error::ContractError;
use crate::msg::{
    CapResponse, ExecuteMsg, InstantiateMsg, MasterResponse, MigrateMsg, QueryMsg,
    RemainingSupplyResponse,
};
use crate::state::CAP;

pub(crate) const CONTRACT_NAME: &str = "crates.io:farm-token";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let initial_supply = msg
        .initial_balances
        .iter()
        .try_fold(Uint128::zero(), |acc, c| acc.checked_add(c.amount))
        .map_err(StdError::from)?;
    if let Some(cap) = msg.cap {
        if initial_supply > cap {
            return Err(ContractError::CapExceeded {
                cap,
                supply: initial_supply,
            });
        }
    }

    let owner = msg.owner.unwrap_or_else(|| info.sender.to_string());

    // cw20-base keeps the master as its minter so that balances, supply
    // and the `minter` query stay in one place.
    cw20_base::contract::instantiate(
        deps.branch(),
        env,
        info,
        Cw20InstantiateMsg {
            name: msg.name,
            symbol: msg.symbol,
            decimals: msg.decimals,
            initial_balances: msg.initial_balances,
            mint: msg.master.map(|minter| cw20::MinterResponse {
                minter,
                cap: msg.cap,
            }),
            marketing: None,
        },
    )?;

    // cw20-base sets its own contract version, so overwrite it here.
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    cw_ownable::initialize_owner(deps.storage, deps.api, Some(&owner))?;
    CAP.save(deps.storage, &msg.cap)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute(
            "cap",
            msg.cap
                .map(|c| c.to_string())
                .unwrap_or_else(|| "None".to_string()),
        )
        .add_attribute("initial_supply", initial_supply))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Mint { recipient, amount } => execute_mint(deps, env, info, recipient, amount),
        ExecuteMsg::SetMaster { master } => execute_set_master(deps, info, master),
        ExecuteMsg::UpdateOwnership(action) => execute_update_owner(deps, info, env, action),

        ExecuteMsg::Transfer { recipient, amount } => Ok(
            cw20_base::contract::execute_transfer(deps, env, info, recipient, amount)?,
        ),
        ExecuteMsg::Burn { amount } => {
            Ok(cw20_base::contract::execute_burn(deps, env, info, amount)?)
        }
        ExecuteMsg::Send {
            contract,
            amount,
            msg,
        } => Ok(cw20_base::contract::execute_send(
            deps, env, info, contract, amount, msg,
        )?),
        ExecuteMsg::IncreaseAllowance {
            spender,
            amount,
            expires,
        } => Ok(cw20_base::allowances::execute_increase_allowance(
            deps, env, info, spender, amount, expires,
        )?),
        ExecuteMsg::DecreaseAllowance {
            spender,
            amount,
            expires,
        } => Ok(cw20_base::allowances::execute_decrease_allowance(
            deps, env, info, spender, amount, expires,
        )?),
        ExecuteMsg::TransferFrom {
            owner,
            recipient,
            amount,
        } => Ok(cw20_base::allowances::execute_transfer_from(
            deps, env, info, owner, recipient, amount,
        )?),
        ExecuteMsg::SendFrom {
            owner,
            contract,
            amount,
            msg,
        } => Ok(cw20_base::allowances::execute_send_from(
            deps, env, info, owner, contract, amount, msg,
        )?),
        ExecuteMsg::BurnFrom { owner, amount } => Ok(cw20_base::allowances::execute_burn_from(
            deps, env, info, owner, amount,
        )?),
    }
}

pub fn execute_mint(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let token_info = TOKEN_INFO.load(deps.storage)?;
    if token_info
        .mint
        .as_ref()
        .map_or(true, |m| m.minter != info.sender)
    {
        return Err(ContractError::NotMaster {});
    }

    if let Some(cap) = CAP.load(deps.storage)? {
        let supply = token_info
            .total_supply
            .checked_add(amount)
            .map_err(StdError::from)?;
        if supply > cap {
            return Err(ContractError::CapExceeded { cap, supply });
        }
    }

    Ok(cw20_base::contract::execute_mint(
        deps, env, info, recipient, amount,
    )?)
}

pub fn execute_set_master(
    deps: DepsMut,
    info: MessageInfo,
    master: Option<String>,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let master = master
        .map(|m| deps.api.addr_validate(&m))
        .transpose()?;
    let cap = CAP.load(deps.storage)?;

    let mut token_info = TOKEN_INFO.load(deps.storage)?;
    token_info.mint = master.clone().map(|minter| MinterData { minter, cap });
    TOKEN_INFO.save(deps.storage, &token_info)?;

    Ok(Response::new()
        .add_attribute("action", "set_master")
        .add_attribute(
            "master",
            master
                .map(Addr::into_string)
                .unwrap_or_else(|| "None".to_string()),
        ))
}

pub fn execute_update_owner(
    deps: DepsMut,
    info: MessageInfo,
    env: Env,
    action: cw_ownable::Action,
) -> Result<Response, ContractError> {
    let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
    Ok(Response::default().add_attributes(ownership.into_attributes()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Master {} => to_json_binary(&query_master(deps)?),
        QueryMsg::Cap {} => to_json_binary(&CapResponse {
            cap: CAP.load(deps.storage)?,
        }),
        QueryMsg::RemainingSupply {} => to_json_binary(&query_remaining_supply(deps)?),
        QueryMsg::Ownership {} => to_json_binary(&cw_ownable::get_ownership(deps.storage)?),

        QueryMsg::Balance { address } => {
            to_json_binary(&cw20_base::contract::query_balance(deps, address)?)
        }
        QueryMsg::TokenInfo {} => to_json_binary(&cw20_base::contract::query_token_info(deps)?),
        QueryMsg::Minter {} => to_json_binary(&cw20_base::contract::query_minter(deps)?),
        QueryMsg::Allowance { owner, spender } => to_json_binary(
            &cw20_base::allowances::query_allowance(deps, owner, spender)?,
        ),
        QueryMsg::AllAllowances {
            owner,
            start_after,
            limit,
        } => to_json_binary(&cw20_base::enumerable::query_owner_allowances(
            deps,
            owner,
            start_after,
            limit,
        )?),
        QueryMsg::AllSpenderAllowances {
            spender,
            start_after,
            limit,
        } => to_json_binary(&cw20_base::enumerable::query_spender_allowances(
            deps,
            spender,
            start_after,
            limit,
        )?),
        QueryMsg::AllAccounts { start_after, limit } => to_json_binary(
            &cw20_base::enumerable::query_all_accounts(deps, start_after, limit)?,
        ),
    }
}

pub fn query_master(deps: Deps) -> StdResult<MasterResponse> {
    let token_info = TOKEN_INFO.load(deps.storage)?;
    Ok(MasterResponse {
        master: token_info.mint.map(|m| m.minter),
    })
}

pub fn query_remaining_supply(deps: Deps) -> StdResult<RemainingSupplyResponse> {
    let total_supply = TOKEN_INFO.load(deps.storage)?.total_supply;
    Ok(RemainingSupplyResponse {
        remaining: CAP
            .load(deps.storage)?
            .map(|cap| cap.saturating_sub(total_supply)),
    })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::InvalidMigration {
            expected: CONTRACT_NAME.to_string(),
            actual: stored.contract,
        });
    }
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new().add_attribute("action", "migrate"))
}
