#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Coin, Deps, DepsMut, Env, MessageInfo, Order, Reply, Response,
    StdResult, SubMsg, SubMsgResult,
};
use cw2::{get_contract_version, set_contract_version};
use cw_invoke::{encode_named_call, Call};
use cw_storage_plus::Bound;
use cw_utils::nonpayable;

use crate::error::ContractError;
use crate::msg::{ConfigResponse, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, QueuedResponse};
use crate::state::{
    Config, QueuedCall, CONFIG, GRACE_PERIOD, MAXIMUM_DELAY, MINIMUM_DELAY, QUEUED,
};

pub(crate) const CONTRACT_NAME: &str = "crates.io:cw-delay-queue";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

// Settings for pagination
const MAX_LIMIT: u32 = 30;
const DEFAULT_LIMIT: u32 = 10;

const EXECUTE_REPLY_ID: u64 = 0;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    validate_delay(msg.delay)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    CONFIG.save(
        deps.storage,
        &Config {
            admin: admin.clone(),
            pending_admin: None,
            admin_initialized: false,
            delay: msg.delay,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("admin", admin)
        .add_attribute("delay", msg.delay.to_string()))
}

fn validate_delay(delay: u64) -> Result<(), ContractError> {
    if !(MINIMUM_DELAY..=MAXIMUM_DELAY).contains(&delay) {
        return Err(ContractError::DelayOutOfRange {
            delay,
            min: MINIMUM_DELAY,
            max: MAXIMUM_DELAY,
        });
    }
    Ok(())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    if !matches!(msg, ExecuteMsg::ExecuteTransaction { .. }) {
        nonpayable(&info)?;
    }
    match msg {
        ExecuteMsg::QueueTransaction {
            target,
            value,
            signature,
            data,
            eta,
        } => {
            let call = queued_call(deps.as_ref(), target, value, signature, data, eta)?;
            execute_queue_transaction(deps, env, info, call)
        }
        ExecuteMsg::CancelTransaction {
            target,
            value,
            signature,
            data,
            eta,
        } => {
            let call = queued_call(deps.as_ref(), target, value, signature, data, eta)?;
            execute_cancel_transaction(deps, info, call)
        }
        ExecuteMsg::ExecuteTransaction {
            target,
            value,
            signature,
            data,
            eta,
        } => {
            let call = queued_call(deps.as_ref(), target, value, signature, data, eta)?;
            execute_execute_transaction(deps, env, info, call)
        }
        ExecuteMsg::SetDelay { delay } => execute_set_delay(deps, env, info, delay),
        ExecuteMsg::SetPendingAdmin { pending_admin } => {
            execute_set_pending_admin(deps, env, info, pending_admin)
        }
        ExecuteMsg::AcceptAdmin {} => execute_accept_admin(deps, info),
    }
}

fn queued_call(
    deps: Deps,
    target: String,
    value: Vec<Coin>,
    signature: String,
    data: Binary,
    eta: u64,
) -> StdResult<QueuedCall> {
    Ok(QueuedCall {
        target: deps.api.addr_validate(&target)?,
        value,
        signature,
        data,
        eta,
    })
}

fn assert_admin(config: &Config, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::NotAdmin {});
    }
    Ok(())
}

fn assert_timelock(env: &Env, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != env.contract.address {
        return Err(ContractError::NotTimelock {});
    }
    Ok(())
}

pub fn execute_queue_transaction(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    call: QueuedCall,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    assert_admin(&config, &info)?;

    let now = env.block.time.seconds();
    if call.eta < now.saturating_add(config.delay) {
        return Err(ContractError::EtaBelowDelay {});
    }
    if call.eta > now.saturating_add(MAXIMUM_DELAY) {
        return Err(ContractError::EtaAboveMaximum {});
    }
    // Reject calls that could never be encoded.
    encode_named_call(&call.signature, &call.data)?;

    let digest = call.digest()?;
    QUEUED.save(deps.storage, &digest, &call)?;

    Ok(Response::new()
        .set_data(to_json_binary(&digest)?)
        .add_attribute("action", "queue_transaction")
        .add_attribute("digest", digest)
        .add_attribute("target", call.target)
        .add_attribute("signature", call.signature)
        .add_attribute("eta", call.eta.to_string()))
}

pub fn execute_cancel_transaction(
    deps: DepsMut,
    info: MessageInfo,
    call: QueuedCall,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    assert_admin(&config, &info)?;

    let digest = call.digest()?;
    QUEUED.remove(deps.storage, &digest);

    Ok(Response::new()
        .add_attribute("action", "cancel_transaction")
        .add_attribute("digest", digest)
        .add_attribute("target", call.target)
        .add_attribute("signature", call.signature)
        .add_attribute("eta", call.eta.to_string()))
}

pub fn execute_execute_transaction(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    call: QueuedCall,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    assert_admin(&config, &info)?;

    let digest = call.digest()?;
    if !QUEUED.has(deps.storage, &digest) {
        return Err(ContractError::NotQueued {});
    }
    let now = env.block.time.seconds();
    if now < call.eta {
        return Err(ContractError::TimelockNotSurpassed {});
    }
    if now > call.eta.saturating_add(GRACE_PERIOD) {
        return Err(ContractError::Stale {});
    }

    QUEUED.remove(deps.storage, &digest);

    let payload = encode_named_call(&call.signature, &call.data)?;
    let msg = Call::new(call.target.clone(), call.value, payload).into_cosmos_msg();

    Ok(Response::new()
        .add_submessage(SubMsg::reply_always(msg, EXECUTE_REPLY_ID))
        .add_attribute("action", "execute_transaction")
        .add_attribute("digest", digest)
        .add_attribute("target", call.target)
        .add_attribute("signature", call.signature)
        .add_attribute("eta", call.eta.to_string()))
}

pub fn execute_set_delay(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    delay: u64,
) -> Result<Response, ContractError> {
    assert_timelock(&env, &info)?;
    validate_delay(delay)?;

    CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
        config.delay = delay;
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("action", "set_delay")
        .add_attribute("delay", delay.to_string()))
}

pub fn execute_set_pending_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pending_admin: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if config.admin_initialized {
        assert_timelock(&env, &info)?;
    } else {
        assert_admin(&config, &info)?;
        config.admin_initialized = true;
    }

    let pending_admin = deps.api.addr_validate(&pending_admin)?;
    config.pending_admin = Some(pending_admin.clone());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_pending_admin")
        .add_attribute("pending_admin", pending_admin))
}

pub fn execute_accept_admin(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if config.pending_admin.as_ref() != Some(&info.sender) {
        return Err(ContractError::NotPendingAdmin {});
    }
    config.admin = info.sender.clone();
    config.pending_admin = None;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "accept_admin")
        .add_attribute("admin", info.sender))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.result {
        SubMsgResult::Ok(res) => {
            let response = Response::new().add_attribute("action", "execution");
            Ok(match res.data {
                Some(data) => response.set_data(data),
                None => response,
            })
        }
        SubMsgResult::Err(reason) => Err(ContractError::ExecutionReverted { reason }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::QueuedTransaction { digest } => {
            to_json_binary(&QUEUED.may_load(deps.storage, &digest)?)
        }
        QueryMsg::TransactionDigest {
            target,
            value,
            signature,
            data,
            eta,
        } => to_json_binary(&queued_call(deps, target, value, signature, data, eta)?.digest()?),
        QueryMsg::ListQueued { start_after, limit } => {
            to_json_binary(&query_list_queued(deps, start_after, limit)?)
        }
    }
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        pending_admin: config.pending_admin,
        delay: config.delay,
        grace_period: GRACE_PERIOD,
        minimum_delay: MINIMUM_DELAY,
        maximum_delay: MAXIMUM_DELAY,
    })
}

pub fn query_list_queued(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Vec<QueuedResponse>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);
    QUEUED
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(digest, call)| QueuedResponse { digest, call }))
        .collect()
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
