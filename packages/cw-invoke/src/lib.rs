#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, BankMsg, Binary, Coin, CosmosMsg, StdError, WasmMsg};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InvokeError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Invalid message name ({name}). Expected lowercase letters, digits and underscores")]
    InvalidMessageName { name: String },

    #[error("Call arguments must be a JSON value: {reason}")]
    InvalidArguments { reason: String },
}

#[cw_serde]
pub struct Call {
    pub target: Addr,
    pub value: Vec<Coin>,
    pub payload: Binary,
}

impl Call {
    pub fn new(target: Addr, value: Vec<Coin>, payload: Binary) -> Self {
        Self {
            target,
            value,
            payload,
        }
    }

    /// True if the call moves native funds without executing anything.
    pub fn is_transfer(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn into_cosmos_msg(self) -> CosmosMsg {
        if self.is_transfer() {
            BankMsg::Send {
                to_address: self.target.into_string(),
                amount: self.value,
            }
            .into()
        } else {
            WasmMsg::Execute {
                contract_addr: self.target.into_string(),
                msg: self.payload,
                funds: self.value,
            }
            .into()
        }
    }
}

impl From<Call> for CosmosMsg {
    fn from(call: Call) -> Self {
        call.into_cosmos_msg()
    }
}

/// Wraps `args` as `{"<name>": args}`. An empty name passes `args` through
/// unchanged, and empty `args` encode as `{}`.
pub fn encode_named_call(name: &str, args: &Binary) -> Result<Binary, InvokeError> {
    if name.is_empty() {
        return Ok(args.clone());
    }
    if !name.starts_with(|c: char| c.is_ascii_lowercase())
        || !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(InvokeError::InvalidMessageName {
            name: name.to_string(),
        });
    }

    let args: serde_json::Value = if args.is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(args.as_slice()).map_err(|e| InvokeError::InvalidArguments {
            reason: e.to_string(),
        })?
    };

    let mut msg = serde_json::Map::new();
    msg.insert(name.to_string(), args);
    serde_json::to_vec(&msg)
        .map(Binary::from)
        .map_err(|e| InvokeError::InvalidArguments {
            reason: e.to_string(),
        })
}
