use std::cmp::min;

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Storage,
    Uint128, WasmMsg,
};
use cw2::{get_contract_version, set_contract_version};
use cw20::Cw20ExecuteMsg;
use cw_utils::nonpayable;
use farm_accumulator::{EmissionSchedule, Pool, Position};

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, PendingRewardResponse, QueryMsg};
use crate::state::{Config, CONFIG, POOL, POSITIONS};

pub(crate) const CONTRACT_NAME: &str = "crates.io:farm-master";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const POOL_WEIGHT: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let schedule = EmissionSchedule {
        reward_per_block: msg.reward_per_block,
        start_block: msg.start_block,
        end_block: msg.end_block,
    };
    schedule.validate()?;

    let config = Config {
        reward_token: deps.api.addr_validate(&msg.reward_token)?,
        stake_token: deps.api.addr_validate(&msg.stake_token)?,
        schedule,
    };
    CONFIG.save(deps.storage, &config)?;
    POOL.save(
        deps.storage,
        &Pool::new(POOL_WEIGHT, config.schedule.start_block),
    )?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("reward_token", config.reward_token)
        .add_attribute("stake_token", config.stake_token)
        .add_attribute("reward_per_block", config.schedule.reward_per_block)
        .add_attribute("start_block", config.schedule.start_block.to_string())
        .add_attribute("end_block", config.schedule.end_block.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    match msg {
        ExecuteMsg::Deposit { amount } => execute_deposit(deps, env, info, amount),
        ExecuteMsg::Withdraw { amount } => execute_withdraw(deps, env, info, amount),
        ExecuteMsg::Harvest {} => execute_harvest(deps, env, info),
        ExecuteMsg::UpdatePool {} => execute_update_pool(deps, env),
    }
}

/// Advances the pool to the current block, returning it along with the
/// message minting the newly accrued reward into the farm, if any.
fn update_pool(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
) -> StdResult<(Pool, Option<WasmMsg>)> {
    let mut pool = POOL.load(storage)?;
    let minted = pool.update(&config.schedule, POOL_WEIGHT, env.block.height)?;
    POOL.save(storage, &pool)?;

    let mint = if minted.is_zero() {
        None
    } else {
        Some(cw20_msg(
            &config.reward_token,
            &Cw20ExecuteMsg::Mint {
                recipient: env.contract.address.to_string(),
                amount: minted,
            },
        )?)
    };
    Ok((pool, mint))
}

fn cw20_msg(token: &Addr, msg: &Cw20ExecuteMsg) -> StdResult<WasmMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    })
}

pub fn execute_deposit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if !config.schedule.has_started(env.block.height) {
        return Err(ContractError::StakingNotStarted {});
    }
    if config.schedule.has_ended(env.block.height) {
        return Err(ContractError::StakingEnded {});
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let (mut pool, mint) = update_pool(deps.storage, &env, &config)?;

    let mut position = POSITIONS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    position.accrue(pool.acc_reward_per_share)?;
    position.amount = position.amount.checked_add(amount)?;
    position.checkpoint(pool.acc_reward_per_share)?;
    pool.total_staked = pool.total_staked.checked_add(amount)?;

    POSITIONS.save(deps.storage, &info.sender, &position)?;
    POOL.save(deps.storage, &pool)?;

    let transfer = cw20_msg(
        &config.stake_token,
        &Cw20ExecuteMsg::TransferFrom {
            owner: info.sender.to_string(),
            recipient: env.contract.address.to_string(),
            amount,
        },
    )?;

    Ok(Response::new()
        .add_messages(mint)
        .add_message(transfer)
        .add_attribute("action", "deposit")
        .add_attribute("sender", info.sender)
        .add_attribute("amount", amount)
        .add_attribute("claimable", position.claimable))
}

pub fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut position = POSITIONS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    if position.amount.is_zero() {
        return Err(ContractError::NoTokensStaked {});
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }
    if amount > position.amount {
        return Err(ContractError::InsufficientStake {
            staked: position.amount,
            requested: amount,
        });
    }

    let (mut pool, mint) = update_pool(deps.storage, &env, &config)?;

    position.accrue(pool.acc_reward_per_share)?;
    position.amount -= amount;
    position.checkpoint(pool.acc_reward_per_share)?;
    pool.total_staked = pool.total_staked.checked_sub(amount)?;

    POSITIONS.save(deps.storage, &info.sender, &position)?;
    POOL.save(deps.storage, &pool)?;

    let transfer = cw20_msg(
        &config.stake_token,
        &Cw20ExecuteMsg::Transfer {
            recipient: info.sender.to_string(),
            amount,
        },
    )?;

    Ok(Response::new()
        .add_messages(mint)
        .add_message(transfer)
        .add_attribute("action", "withdraw")
        .add_attribute("sender", info.sender)
        .add_attribute("amount", amount)
        .add_attribute("claimable", position.claimable))
}

pub fn execute_harvest(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if !config.schedule.has_ended(env.block.height) {
        return Err(ContractError::StakingInProgress {});
    }

    let (mut pool, mint) = update_pool(deps.storage, &env, &config)?;

    let mut position = POSITIONS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    let owed = position.take_owed(pool.acc_reward_per_share)?;
    if owed.is_zero() {
        return Err(ContractError::NoRewardsToClaim {});
    }
    let reward = pool.release(owed);

    let stake = position.amount;
    pool.total_staked = pool.total_staked.checked_sub(stake)?;
    POSITIONS.save(deps.storage, &info.sender, &Position::default())?;
    POOL.save(deps.storage, &pool)?;

    let mut msgs = vec![];
    if !reward.is_zero() {
        msgs.push(cw20_msg(
            &config.reward_token,
            &Cw20ExecuteMsg::Transfer {
                recipient: info.sender.to_string(),
                amount: reward,
            },
        )?);
    }
    if !stake.is_zero() {
        msgs.push(cw20_msg(
            &config.stake_token,
            &Cw20ExecuteMsg::Transfer {
                recipient: info.sender.to_string(),
                amount: stake,
            },
        )?);
    }

    Ok(Response::new()
        .add_messages(mint)
        .add_messages(msgs)
        .add_attribute("action", "harvest")
        .add_attribute("sender", info.sender)
        .add_attribute("reward", reward)
        .add_attribute("stake_returned", stake))
}

pub fn execute_update_pool(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let (pool, mint) = update_pool(deps.storage, &env, &config)?;

    Ok(Response::new()
        .add_messages(mint)
        .add_attribute("action", "update_pool")
        .add_attribute("last_reward_block", pool.last_reward_block.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::Pool {} => to_json_binary(&POOL.load(deps.storage)?),
        QueryMsg::UserInfo { address } => to_json_binary(&query_user_info(deps, address)?),
        QueryMsg::PendingReward { address } => {
            to_json_binary(&query_pending_reward(deps, env, address)?)
        }
    }
}

pub fn query_user_info(deps: Deps, address: String) -> StdResult<Position> {
    let address = deps.api.addr_validate(&address)?;
    Ok(POSITIONS
        .may_load(deps.storage, &address)?
        .unwrap_or_default())
}

pub fn query_pending_reward(
    deps: Deps,
    env: Env,
    address: String,
) -> StdResult<PendingRewardResponse> {
    let config = CONFIG.load(deps.storage)?;
    let pool = POOL
        .load(deps.storage)?
        .updated(&config.schedule, POOL_WEIGHT, env.block.height)?;
    let position = query_user_info(deps, address)?;
    let owed = position.owed(pool.acc_reward_per_share)?;
    Ok(PendingRewardResponse {
        pending: min(owed, pool.undistributed),
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
