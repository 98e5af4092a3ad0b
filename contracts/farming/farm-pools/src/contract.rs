use std::cmp::{max, min};

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Order, OverflowError,
    OverflowOperation, Response, StdResult, Storage, Uint128, Uint256, WasmMsg,
};
use cw2::{get_contract_version, set_contract_version};
use cw20::Cw20ExecuteMsg;
use cw_storage_plus::Bound;
use cw_utils::nonpayable;
use farm_accumulator::{basis_points_of, EmissionSchedule, Pool, Position, MAX_BASIS_POINTS};

use crate::error::ContractError;
use crate::msg::{
    ExecuteMsg, InstantiateMsg, MigrateMsg, PendingRewardResponse, PoolResponse, QueryMsg,
};
use crate::state::{
    Config, PoolInfo, Settlement, CONFIG, POOLS, POOL_COUNT, POSITIONS, REFERRERS, STAKE_TOKENS,
    TOTAL_WEIGHT,
};

pub(crate) const CONTRACT_NAME: &str = "crates.io:farm-pools";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

// Settings for pagination
const MAX_LIMIT: u32 = 30;
const DEFAULT_LIMIT: u32 = 10;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let schedule = EmissionSchedule {
        reward_per_block: msg.reward_per_block,
        start_block: msg.start_block,
        end_block: msg.end_block,
    };
    schedule.validate()?;

    let referral_bonus_bp = msg.referral_bonus_bp.unwrap_or_default();
    if referral_bonus_bp > MAX_BASIS_POINTS {
        return Err(ContractError::InvalidReferralBonus {
            bp: referral_bonus_bp,
        });
    }

    let config = Config {
        reward_token: deps.api.addr_validate(&msg.reward_token)?,
        schedule,
        fee_sink: deps.api.addr_validate(&msg.fee_sink)?,
        settlement: msg.settlement,
        referral_bonus_bp,
    };
    CONFIG.save(deps.storage, &config)?;
    TOTAL_WEIGHT.save(deps.storage, &0)?;
    POOL_COUNT.save(deps.storage, &0)?;

    let owner = msg.owner.unwrap_or_else(|| info.sender.to_string());
    cw_ownable::initialize_owner(deps.storage, deps.api, Some(&owner))?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute("reward_token", config.reward_token)
        .add_attribute("reward_per_block", config.schedule.reward_per_block)
        .add_attribute("start_block", config.schedule.start_block.to_string())
        .add_attribute("end_block", config.schedule.end_block.to_string())
        .add_attribute("fee_sink", config.fee_sink))
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
        ExecuteMsg::Deposit {
            pool_id,
            amount,
            referrer,
        } => execute_deposit(deps, env, info, pool_id, amount, referrer),
        ExecuteMsg::Withdraw { pool_id, amount } => {
            execute_withdraw(deps, env, info, pool_id, amount)
        }
        ExecuteMsg::Harvest { pool_id } => execute_harvest(deps, env, info, pool_id),
        ExecuteMsg::UpdatePool { pool_id } => execute_update_pool(deps, env, pool_id),
        ExecuteMsg::MassUpdatePools {} => execute_mass_update_pools(deps, env),
        ExecuteMsg::Add {
            weight,
            stake_token,
            deposit_fee_bp,
            with_update,
        } => execute_add(deps, env, info, weight, stake_token, deposit_fee_bp, with_update),
        ExecuteMsg::Set {
            pool_id,
            weight,
            deposit_fee_bp,
            with_update,
        } => execute_set(deps, env, info, pool_id, weight, deposit_fee_bp, with_update),
        ExecuteMsg::UpdateReferralBonus { bonus_bp } => {
            execute_update_referral_bonus(deps, info, bonus_bp)
        }
        ExecuteMsg::UpdateFeeSink { fee_sink } => execute_update_fee_sink(deps, info, fee_sink),
        ExecuteMsg::UpdateOwnership(action) => execute_update_owner(deps, info, env, action),
    }
}

fn load_pool(storage: &dyn Storage, pool_id: u64) -> Result<PoolInfo, ContractError> {
    POOLS
        .may_load(storage, pool_id)?
        .ok_or(ContractError::PoolNotFound { pool_id })
}

/// Advances one pool to the current block. Returns the updated pool and the
/// reward that must be minted to back it.
fn update_pool(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    pool_id: u64,
) -> Result<(PoolInfo, Uint128), ContractError> {
    let total_weight = TOTAL_WEIGHT.load(storage)?;
    let mut info = load_pool(storage, pool_id)?;
    let minted = info
        .pool
        .update(&config.schedule, total_weight, env.block.height)?;
    POOLS.save(storage, pool_id, &info)?;
    Ok((info, minted))
}

fn mass_update(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
) -> Result<Uint128, ContractError> {
    let pool_ids = POOLS
        .keys(storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<u64>>>()?;
    let mut minted = Uint128::zero();
    for pool_id in pool_ids {
        let (_, pool_minted) = update_pool(storage, env, config, pool_id)?;
        minted = minted.checked_add(pool_minted)?;
    }
    Ok(minted)
}

fn cw20_msg(token: &Addr, msg: &Cw20ExecuteMsg) -> StdResult<WasmMsg> {
    Ok(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    })
}

fn mint_msg(config: &Config, recipient: &Addr, amount: Uint128) -> StdResult<Option<WasmMsg>> {
    if amount.is_zero() {
        return Ok(None);
    }
    cw20_msg(
        &config.reward_token,
        &Cw20ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount,
        },
    )
    .map(Some)
}

/// Pays `amount` of reward out of custody to `recipient`, minting the
/// referral bonus if the recipient has a referrer.
fn payout_msgs(
    storage: &dyn Storage,
    config: &Config,
    recipient: &Addr,
    amount: Uint128,
) -> StdResult<Vec<WasmMsg>> {
    if amount.is_zero() {
        return Ok(vec![]);
    }
    let mut msgs = vec![cw20_msg(
        &config.reward_token,
        &Cw20ExecuteMsg::Transfer {
            recipient: recipient.to_string(),
            amount,
        },
    )?];
    if let Some(referrer) = REFERRERS.may_load(storage, recipient)? {
        let bonus = basis_points_of(amount, config.referral_bonus_bp);
        msgs.extend(mint_msg(config, &referrer, bonus)?);
    }
    Ok(msgs)
}

/// Settles reward earned by `position` before its amount changes. Returns
/// what has to be paid out now.
fn settle(
    settlement: &Settlement,
    position: &mut Position,
    acc_reward_per_share: Uint256,
) -> StdResult<Uint128> {
    match settlement {
        Settlement::Accrue => {
            position.accrue(acc_reward_per_share)?;
            Ok(Uint128::zero())
        }
        Settlement::Immediate => position.take_owed(acc_reward_per_share),
    }
}

fn checked_weight(total: u64, remove: u64, add: u64) -> Result<u64, ContractError> {
    total
        .checked_sub(remove)
        .ok_or_else(|| OverflowError::new(OverflowOperation::Sub, total, remove))?
        .checked_add(add)
        .ok_or_else(|| OverflowError::new(OverflowOperation::Add, total - remove, add).into())
}

pub fn execute_deposit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: u64,
    amount: Uint128,
    referrer: Option<String>,
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

    let (mut pool_info, minted) = update_pool(deps.storage, &env, &config, pool_id)?;
    let acc = pool_info.pool.acc_reward_per_share;

    if let Some(referrer) = referrer {
        let referrer = deps.api.addr_validate(&referrer)?;
        if referrer != info.sender && !REFERRERS.has(deps.storage, &info.sender) {
            REFERRERS.save(deps.storage, &info.sender, &referrer)?;
        }
    }

    let mut position = POSITIONS
        .may_load(deps.storage, (pool_id, &info.sender))?
        .unwrap_or_default();
    let owed = settle(&config.settlement, &mut position, acc)?;
    let payout = pool_info.pool.release(owed);

    let fee = basis_points_of(amount, pool_info.deposit_fee_bp);
    let staked = amount.checked_sub(fee)?;
    position.amount = position.amount.checked_add(staked)?;
    position.checkpoint(acc)?;
    pool_info.pool.total_staked = pool_info.pool.total_staked.checked_add(staked)?;

    POSITIONS.save(deps.storage, (pool_id, &info.sender), &position)?;
    POOLS.save(deps.storage, pool_id, &pool_info)?;

    let mut msgs: Vec<WasmMsg> = mint_msg(&config, &env.contract.address, minted)?
        .into_iter()
        .collect();
    msgs.push(cw20_msg(
        &pool_info.stake_token,
        &Cw20ExecuteMsg::TransferFrom {
            owner: info.sender.to_string(),
            recipient: env.contract.address.to_string(),
            amount,
        },
    )?);
    if !fee.is_zero() {
        msgs.push(cw20_msg(
            &pool_info.stake_token,
            &Cw20ExecuteMsg::Transfer {
                recipient: config.fee_sink.to_string(),
                amount: fee,
            },
        )?);
    }
    msgs.extend(payout_msgs(deps.storage, &config, &info.sender, payout)?);

    Ok(Response::new()
        .add_messages(msgs)
        .add_attribute("action", "deposit")
        .add_attribute("sender", info.sender)
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("amount", amount)
        .add_attribute("fee", fee)
        .add_attribute("reward_paid", payout))
}

pub fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut position = POSITIONS
        .may_load(deps.storage, (pool_id, &info.sender))?
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

    let (mut pool_info, minted) = update_pool(deps.storage, &env, &config, pool_id)?;
    let acc = pool_info.pool.acc_reward_per_share;

    let owed = settle(&config.settlement, &mut position, acc)?;
    let payout = pool_info.pool.release(owed);
    position.amount -= amount;
    position.checkpoint(acc)?;
    pool_info.pool.total_staked = pool_info.pool.total_staked.checked_sub(amount)?;

    POSITIONS.save(deps.storage, (pool_id, &info.sender), &position)?;
    POOLS.save(deps.storage, pool_id, &pool_info)?;

    let mut msgs: Vec<WasmMsg> = mint_msg(&config, &env.contract.address, minted)?
        .into_iter()
        .collect();
    msgs.push(cw20_msg(
        &pool_info.stake_token,
        &Cw20ExecuteMsg::Transfer {
            recipient: info.sender.to_string(),
            amount,
        },
    )?);
    msgs.extend(payout_msgs(deps.storage, &config, &info.sender, payout)?);

    Ok(Response::new()
        .add_messages(msgs)
        .add_attribute("action", "withdraw")
        .add_attribute("sender", info.sender)
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("amount", amount)
        .add_attribute("reward_paid", payout))
}

pub fn execute_harvest(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let (mut pool_info, minted) = update_pool(deps.storage, &env, &config, pool_id)?;

    let reward = match POSITIONS.may_load(deps.storage, (pool_id, &info.sender))? {
        Some(mut position) => {
            let owed = position.take_owed(pool_info.pool.acc_reward_per_share)?;
            POSITIONS.save(deps.storage, (pool_id, &info.sender), &position)?;
            let reward = pool_info.pool.release(owed);
            POOLS.save(deps.storage, pool_id, &pool_info)?;
            reward
        }
        None => Uint128::zero(),
    };

    Ok(Response::new()
        .add_messages(mint_msg(&config, &env.contract.address, minted)?)
        .add_messages(payout_msgs(deps.storage, &config, &info.sender, reward)?)
        .add_attribute("action", "harvest")
        .add_attribute("sender", info.sender)
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("amount", reward))
}

pub fn execute_update_pool(
    deps: DepsMut,
    env: Env,
    pool_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let (pool_info, minted) = update_pool(deps.storage, &env, &config, pool_id)?;

    Ok(Response::new()
        .add_messages(mint_msg(&config, &env.contract.address, minted)?)
        .add_attribute("action", "update_pool")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute(
            "last_reward_block",
            pool_info.pool.last_reward_block.to_string(),
        )
        .add_attribute("minted", minted))
}

pub fn execute_mass_update_pools(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let minted = mass_update(deps.storage, &env, &config)?;

    Ok(Response::new()
        .add_messages(mint_msg(&config, &env.contract.address, minted)?)
        .add_attribute("action", "mass_update_pools")
        .add_attribute("minted", minted))
}

pub fn execute_add(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    weight: u64,
    stake_token: String,
    deposit_fee_bp: u16,
    with_update: bool,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;
    if deposit_fee_bp > MAX_BASIS_POINTS {
        return Err(ContractError::InvalidDepositFee { bp: deposit_fee_bp });
    }
    let stake_token = deps.api.addr_validate(&stake_token)?;
    if STAKE_TOKENS.has(deps.storage, &stake_token) {
        return Err(ContractError::DuplicatePool {
            stake_token: stake_token.into_string(),
        });
    }

    let config = CONFIG.load(deps.storage)?;
    let minted = if with_update {
        mass_update(deps.storage, &env, &config)?
    } else {
        Uint128::zero()
    };

    let pool_id = POOL_COUNT.load(deps.storage)?;
    let last_reward_block = max(env.block.height, config.schedule.start_block);
    POOLS.save(
        deps.storage,
        pool_id,
        &PoolInfo {
            stake_token: stake_token.clone(),
            deposit_fee_bp,
            pool: Pool::new(weight, last_reward_block),
        },
    )?;
    POOL_COUNT.save(deps.storage, &(pool_id + 1))?;
    STAKE_TOKENS.save(deps.storage, &stake_token, &pool_id)?;

    let total_weight = checked_weight(TOTAL_WEIGHT.load(deps.storage)?, 0, weight)?;
    TOTAL_WEIGHT.save(deps.storage, &total_weight)?;

    Ok(Response::new()
        .add_messages(mint_msg(&config, &env.contract.address, minted)?)
        .add_attribute("action", "add_pool")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("stake_token", stake_token)
        .add_attribute("weight", weight.to_string())
        .add_attribute("deposit_fee_bp", deposit_fee_bp.to_string()))
}

pub fn execute_set(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: u64,
    weight: u64,
    deposit_fee_bp: u16,
    with_update: bool,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;
    if deposit_fee_bp > MAX_BASIS_POINTS {
        return Err(ContractError::InvalidDepositFee { bp: deposit_fee_bp });
    }

    let config = CONFIG.load(deps.storage)?;
    let minted = if with_update {
        mass_update(deps.storage, &env, &config)?
    } else {
        Uint128::zero()
    };

    let mut pool_info = load_pool(deps.storage, pool_id)?;
    let total_weight = checked_weight(
        TOTAL_WEIGHT.load(deps.storage)?,
        pool_info.pool.weight,
        weight,
    )?;
    TOTAL_WEIGHT.save(deps.storage, &total_weight)?;

    pool_info.pool.weight = weight;
    pool_info.deposit_fee_bp = deposit_fee_bp;
    POOLS.save(deps.storage, pool_id, &pool_info)?;

    Ok(Response::new()
        .add_messages(mint_msg(&config, &env.contract.address, minted)?)
        .add_attribute("action", "set_pool")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("weight", weight.to_string())
        .add_attribute("deposit_fee_bp", deposit_fee_bp.to_string()))
}

pub fn execute_update_referral_bonus(
    deps: DepsMut,
    info: MessageInfo,
    bonus_bp: u16,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;
    if bonus_bp > MAX_BASIS_POINTS {
        return Err(ContractError::InvalidReferralBonus { bp: bonus_bp });
    }

    CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
        config.referral_bonus_bp = bonus_bp;
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("action", "update_referral_bonus")
        .add_attribute("bonus_bp", bonus_bp.to_string()))
}

pub fn execute_update_fee_sink(
    deps: DepsMut,
    info: MessageInfo,
    fee_sink: String,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;
    let fee_sink = deps.api.addr_validate(&fee_sink)?;

    CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
        config.fee_sink = fee_sink.clone();
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("action", "update_fee_sink")
        .add_attribute("fee_sink", fee_sink))
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
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::PoolInfo { pool_id } => to_json_binary(&PoolResponse {
            pool_id,
            info: POOLS.load(deps.storage, pool_id)?,
        }),
        QueryMsg::ListPools { start_after, limit } => {
            to_json_binary(&query_list_pools(deps, start_after, limit)?)
        }
        QueryMsg::PoolLength {} => to_json_binary(&POOL_COUNT.load(deps.storage)?),
        QueryMsg::TotalWeight {} => to_json_binary(&TOTAL_WEIGHT.load(deps.storage)?),
        QueryMsg::UserInfo { pool_id, address } => {
            to_json_binary(&query_user_info(deps, pool_id, address)?)
        }
        QueryMsg::PendingReward { pool_id, address } => {
            to_json_binary(&query_pending_reward(deps, env, pool_id, address)?)
        }
        QueryMsg::Referrer { address } => {
            let address = deps.api.addr_validate(&address)?;
            to_json_binary(&REFERRERS.may_load(deps.storage, &address)?)
        }
        QueryMsg::Ownership {} => to_json_binary(&cw_ownable::get_ownership(deps.storage)?),
    }
}

pub fn query_list_pools(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<PoolResponse>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);
    POOLS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(pool_id, info)| PoolResponse { pool_id, info }))
        .collect()
}

pub fn query_user_info(deps: Deps, pool_id: u64, address: String) -> StdResult<Position> {
    let address = deps.api.addr_validate(&address)?;
    Ok(POSITIONS
        .may_load(deps.storage, (pool_id, &address))?
        .unwrap_or_default())
}

pub fn query_pending_reward(
    deps: Deps,
    env: Env,
    pool_id: u64,
    address: String,
) -> StdResult<PendingRewardResponse> {
    let config = CONFIG.load(deps.storage)?;
    let total_weight = TOTAL_WEIGHT.load(deps.storage)?;
    let pool = POOLS.load(deps.storage, pool_id)?.pool.updated(
        &config.schedule,
        total_weight,
        env.block.height,
    )?;
    let position = query_user_info(deps, pool_id, address)?;
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
