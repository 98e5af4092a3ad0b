use std::cmp::min;

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Api, BankMsg, Binary, Coin, Deps, DepsMut, Empty, Env, MessageInfo,
    Order, Reply, Response, StdResult, Storage, SubMsg, SubMsgResult, Uint128, WasmMsg,
};
use cw2::{get_contract_version, set_contract_version};
use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_invoke::Call;
use cw_utils::nonpayable;

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, TransactionResponse};
use crate::state::{
    confirmations, is_confirmed, is_owner, Status, Transaction, CONFIRMATIONS, MAX_OWNER_COUNT,
    OWNERS, REQUIRED, TRANSACTIONS, TRANSACTION_COUNT,
};

pub(crate) const CONTRACT_NAME: &str = "crates.io:cw-approval-queue";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owners = validate_owners(deps.api, &msg.owners)?;
    validate_requirement(owners.len(), msg.required)?;

    OWNERS.save(deps.storage, &owners)?;
    REQUIRED.save(deps.storage, &msg.required)?;
    TRANSACTION_COUNT.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("owner_count", owners.len().to_string())
        .add_attribute("required", msg.required.to_string()))
}

fn validate_owners(api: &dyn Api, owners: &[String]) -> Result<Vec<Addr>, ContractError> {
    let mut validated: Vec<Addr> = Vec::with_capacity(owners.len());
    for owner in owners {
        let owner = api.addr_validate(owner)?;
        if validated.contains(&owner) {
            return Err(ContractError::OwnerExists { address: owner });
        }
        validated.push(owner);
    }
    Ok(validated)
}

fn validate_requirement(owner_count: usize, required: u32) -> Result<(), ContractError> {
    let owner_count = owner_count as u32;
    if owner_count > MAX_OWNER_COUNT || required > owner_count || required == 0 {
        return Err(ContractError::InvalidRequirement {
            required,
            owner_count,
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
    if !matches!(msg, ExecuteMsg::Deposit {}) {
        nonpayable(&info)?;
    }
    match msg {
        ExecuteMsg::Deposit {} => execute_deposit(info),
        ExecuteMsg::SubmitTransaction {
            destination,
            value,
            data,
        } => execute_submit_transaction(deps, info, destination, value, data),
        ExecuteMsg::ConfirmTransaction { id } => execute_confirm_transaction(deps, info, id),
        ExecuteMsg::RevokeConfirmation { id } => execute_revoke_confirmation(deps, info, id),
        ExecuteMsg::ExecuteTransaction { id } => execute_execute_transaction(deps, info, id),
        ExecuteMsg::AddOwner { owner } => execute_add_owner(deps, env, info, owner),
        ExecuteMsg::RemoveOwner { owner } => execute_remove_owner(deps, env, info, owner),
        ExecuteMsg::ReplaceOwner { owner, new_owner } => {
            execute_replace_owner(deps, env, info, owner, new_owner)
        }
        ExecuteMsg::ChangeRequirement { required } => {
            execute_change_requirement(deps, env, info, required)
        }
        ExecuteMsg::WithdrawNative { to, denom, amount } => {
            execute_withdraw_native(deps, env, info, to, denom, amount)
        }
        ExecuteMsg::WithdrawToken { token, to, amount } => {
            execute_withdraw_token(deps, env, info, token, to, amount)
        }
    }
}

fn assert_owner(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    if !is_owner(storage, sender)? {
        return Err(ContractError::OwnerDoesNotExist {
            address: sender.clone(),
        });
    }
    Ok(())
}

fn assert_wallet(env: &Env, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != env.contract.address {
        return Err(ContractError::NotWallet {});
    }
    Ok(())
}

fn load_pending(storage: &dyn Storage, id: u64) -> Result<Transaction, ContractError> {
    let transaction = TRANSACTIONS
        .may_load(storage, id)?
        .ok_or(ContractError::TransactionNotFound { id })?;
    match transaction.status {
        Status::Pending => Ok(transaction),
        Status::Executing => Err(ContractError::ExecutionInProgress {}),
        Status::Executed => Err(ContractError::AlreadyExecuted {}),
    }
}

/// Marks the transaction as executing and builds the submessage that runs
/// it. `reply` decides the final status.
fn dispatch(
    storage: &mut dyn Storage,
    id: u64,
    mut transaction: Transaction,
) -> Result<SubMsg, ContractError> {
    transaction.status = Status::Executing;
    TRANSACTIONS.save(storage, id, &transaction)?;
    Ok(SubMsg::reply_always(transaction.call.into_cosmos_msg(), id))
}

/// Records `owner`'s confirmation and returns the execution submessage if
/// the threshold has been reached.
fn confirm(
    storage: &mut dyn Storage,
    id: u64,
    owner: &Addr,
) -> Result<Option<SubMsg>, ContractError> {
    let transaction = load_pending(storage, id)?;
    if CONFIRMATIONS.has(storage, (id, owner)) {
        return Err(ContractError::AlreadyConfirmed {
            address: owner.clone(),
        });
    }
    CONFIRMATIONS.save(storage, (id, owner), &Empty {})?;

    if is_confirmed(storage, id)? {
        dispatch(storage, id, transaction).map(Some)
    } else {
        Ok(None)
    }
}

pub fn execute_deposit(info: MessageInfo) -> Result<Response, ContractError> {
    let mut res = Response::new()
        .add_attribute("action", "deposit")
        .add_attribute("sender", info.sender);
    for coin in info.funds {
        res = res.add_attribute("amount", coin.to_string());
    }
    Ok(res)
}

pub fn execute_submit_transaction(
    deps: DepsMut,
    info: MessageInfo,
    destination: String,
    value: Vec<Coin>,
    data: Binary,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;
    let destination = deps.api.addr_validate(&destination)?;

    let id = TRANSACTION_COUNT.load(deps.storage)?;
    TRANSACTION_COUNT.save(deps.storage, &(id + 1))?;
    TRANSACTIONS.save(
        deps.storage,
        id,
        &Transaction {
            call: Call::new(destination.clone(), value, data),
            status: Status::Pending,
        },
    )?;

    let execution = confirm(deps.storage, id, &info.sender)?;

    Ok(Response::new()
        .add_submessages(execution)
        .set_data(to_json_binary(&id)?)
        .add_attribute("action", "submit_transaction")
        .add_attribute("sender", info.sender)
        .add_attribute("transaction_id", id.to_string())
        .add_attribute("destination", destination))
}

pub fn execute_confirm_transaction(
    deps: DepsMut,
    info: MessageInfo,
    id: u64,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;
    let execution = confirm(deps.storage, id, &info.sender)?;

    Ok(Response::new()
        .add_attribute("action", "confirm_transaction")
        .add_attribute("sender", info.sender)
        .add_attribute("transaction_id", id.to_string())
        .add_attribute("executing", execution.is_some().to_string())
        .add_submessages(execution))
}

pub fn execute_revoke_confirmation(
    deps: DepsMut,
    info: MessageInfo,
    id: u64,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;
    load_pending(deps.storage, id)?;
    if !CONFIRMATIONS.has(deps.storage, (id, &info.sender)) {
        return Err(ContractError::NotConfirmed {});
    }
    CONFIRMATIONS.remove(deps.storage, (id, &info.sender));

    Ok(Response::new()
        .add_attribute("action", "revoke_confirmation")
        .add_attribute("sender", info.sender)
        .add_attribute("transaction_id", id.to_string()))
}

pub fn execute_execute_transaction(
    deps: DepsMut,
    info: MessageInfo,
    id: u64,
) -> Result<Response, ContractError> {
    assert_owner(deps.storage, &info.sender)?;
    let transaction = load_pending(deps.storage, id)?;

    let confirmations = confirmations(deps.storage, id)?.len() as u32;
    let required = REQUIRED.load(deps.storage)?;
    if confirmations < required {
        return Err(ContractError::NotEnoughConfirmations {
            confirmations,
            required,
        });
    }

    Ok(Response::new()
        .add_submessage(dispatch(deps.storage, id, transaction)?)
        .add_attribute("action", "execute_transaction")
        .add_attribute("sender", info.sender)
        .add_attribute("transaction_id", id.to_string()))
}

pub fn execute_add_owner(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
) -> Result<Response, ContractError> {
    assert_wallet(&env, &info)?;
    let owner = deps.api.addr_validate(&owner)?;

    let mut owners = OWNERS.load(deps.storage)?;
    if owners.contains(&owner) {
        return Err(ContractError::OwnerExists { address: owner });
    }
    owners.push(owner.clone());
    validate_requirement(owners.len(), REQUIRED.load(deps.storage)?)?;
    OWNERS.save(deps.storage, &owners)?;

    Ok(Response::new()
        .add_attribute("action", "add_owner")
        .add_attribute("owner", owner))
}

pub fn execute_remove_owner(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
) -> Result<Response, ContractError> {
    assert_wallet(&env, &info)?;
    let owner = deps.api.addr_validate(&owner)?;

    let mut owners = OWNERS.load(deps.storage)?;
    let index = owners
        .iter()
        .position(|o| *o == owner)
        .ok_or_else(|| ContractError::OwnerDoesNotExist {
            address: owner.clone(),
        })?;
    owners.swap_remove(index);

    let required = min(REQUIRED.load(deps.storage)?, owners.len() as u32);
    validate_requirement(owners.len(), required)?;
    OWNERS.save(deps.storage, &owners)?;
    REQUIRED.save(deps.storage, &required)?;

    Ok(Response::new()
        .add_attribute("action", "remove_owner")
        .add_attribute("owner", owner)
        .add_attribute("required", required.to_string()))
}

pub fn execute_replace_owner(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    new_owner: String,
) -> Result<Response, ContractError> {
    assert_wallet(&env, &info)?;
    let owner = deps.api.addr_validate(&owner)?;
    let new_owner = deps.api.addr_validate(&new_owner)?;

    let mut owners = OWNERS.load(deps.storage)?;
    if owners.contains(&new_owner) {
        return Err(ContractError::OwnerExists { address: new_owner });
    }
    let slot = owners
        .iter_mut()
        .find(|o| **o == owner)
        .ok_or_else(|| ContractError::OwnerDoesNotExist {
            address: owner.clone(),
        })?;
    *slot = new_owner.clone();
    OWNERS.save(deps.storage, &owners)?;

    Ok(Response::new()
        .add_attribute("action", "replace_owner")
        .add_attribute("owner", owner)
        .add_attribute("new_owner", new_owner))
}

pub fn execute_change_requirement(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    required: u32,
) -> Result<Response, ContractError> {
    assert_wallet(&env, &info)?;
    validate_requirement(OWNERS.load(deps.storage)?.len(), required)?;
    REQUIRED.save(deps.storage, &required)?;

    Ok(Response::new()
        .add_attribute("action", "change_requirement")
        .add_attribute("required", required.to_string()))
}

fn validate_recipient(deps: Deps, to: &str) -> Result<Addr, ContractError> {
    let to = deps.api.addr_validate(to)?;
    assert_owner(deps.storage, &to)?;
    Ok(to)
}

pub fn execute_withdraw_native(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    to: String,
    denom: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    assert_wallet(&env, &info)?;
    let to = validate_recipient(deps.as_ref(), &to)?;

    let balance = deps
        .querier
        .query_balance(&env.contract.address, &denom)?
        .amount;
    let amount = min(amount, balance);

    let mut res = Response::new();
    if !amount.is_zero() {
        res = res.add_message(BankMsg::Send {
            to_address: to.to_string(),
            amount: vec![Coin { denom, amount }],
        });
    }
    Ok(res
        .add_attribute("action", "withdraw_native")
        .add_attribute("to", to)
        .add_attribute("amount", amount))
}

pub fn execute_withdraw_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    token: String,
    to: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    assert_wallet(&env, &info)?;
    let token = deps.api.addr_validate(&token)?;
    let to = validate_recipient(deps.as_ref(), &to)?;

    let balance: BalanceResponse = deps.querier.query_wasm_smart(
        &token,
        &Cw20QueryMsg::Balance {
            address: env.contract.address.to_string(),
        },
    )?;
    let amount = min(amount, balance.balance);

    let mut res = Response::new();
    if !amount.is_zero() {
        res = res.add_message(WasmMsg::Execute {
            contract_addr: token.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                recipient: to.to_string(),
                amount,
            })?,
            funds: vec![],
        });
    }
    Ok(res
        .add_attribute("action", "withdraw_token")
        .add_attribute("token", token)
        .add_attribute("to", to)
        .add_attribute("amount", amount))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    let id = msg.id;
    match msg.result {
        SubMsgResult::Ok(_) => {
            TRANSACTIONS.update(deps.storage, id, |transaction| match transaction {
                Some(mut transaction) => {
                    transaction.status = Status::Executed;
                    Ok(transaction)
                }
                None => Err(ContractError::TransactionNotFound { id }),
            })?;
            Ok(Response::new()
                .add_attribute("action", "execution")
                .add_attribute("transaction_id", id.to_string()))
        }
        // Failing here unwinds the whole execution, status included.
        SubMsgResult::Err(reason) => Err(ContractError::CallFailed { id, reason }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Owners {} => to_json_binary(&OWNERS.load(deps.storage)?),
        QueryMsg::IsOwner { address } => {
            let address = deps.api.addr_validate(&address)?;
            to_json_binary(&is_owner(deps.storage, &address)?)
        }
        QueryMsg::Required {} => to_json_binary(&REQUIRED.load(deps.storage)?),
        QueryMsg::Transaction { id } => {
            let transaction = TRANSACTIONS.load(deps.storage, id)?;
            to_json_binary(&TransactionResponse {
                id,
                call: transaction.call,
                status: transaction.status,
            })
        }
        QueryMsg::TransactionCount { pending, executed } => {
            to_json_binary(&query_transaction_count(deps, pending, executed)?)
        }
        QueryMsg::ConfirmationCount { id } => {
            to_json_binary(&(confirmations(deps.storage, id)?.len() as u32))
        }
        QueryMsg::IsConfirmed { id } => to_json_binary(&is_confirmed(deps.storage, id)?),
        QueryMsg::Confirmations { id } => to_json_binary(&confirmations(deps.storage, id)?),
        QueryMsg::TransactionIds {
            from,
            to,
            pending,
            executed,
        } => to_json_binary(&query_transaction_ids(deps, from, to, pending, executed)?),
    }
}

fn matches_filter(status: &Status, pending: bool, executed: bool) -> bool {
    match status {
        Status::Executed => executed,
        Status::Pending | Status::Executing => pending,
    }
}

pub fn query_transaction_count(deps: Deps, pending: bool, executed: bool) -> StdResult<u64> {
    let mut count = 0;
    for item in TRANSACTIONS.range(deps.storage, None, None, Order::Ascending) {
        let (_, transaction) = item?;
        if matches_filter(&transaction.status, pending, executed) {
            count += 1;
        }
    }
    Ok(count)
}

pub fn query_transaction_ids(
    deps: Deps,
    from: u64,
    to: u64,
    pending: bool,
    executed: bool,
) -> StdResult<Vec<u64>> {
    TRANSACTIONS
        .range(deps.storage, None, None, Order::Ascending)
        .filter(|item| {
            item.as_ref()
                .map_or(true, |(_, tx)| matches_filter(&tx.status, pending, executed))
        })
        .take(to as usize)
        .skip(from as usize)
        .map(|item| item.map(|(id, _)| id))
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
