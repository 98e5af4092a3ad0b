use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};
use cw20::{Cw20Coin, Expiration};
use cw_ownable::{cw_ownable_execute, cw_ownable_query};

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub initial_balances: Vec<Cw20Coin>,
    /// Maximum total supply. `None` for an uncapped token.
    pub cap: Option<Uint128>,
    /// Contract allowed to mint. May be set later with `SetMaster`.
    pub master: Option<String>,
    /// Owner allowed to change the master.
    pub owner: Option<String>,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Mints `amount` new tokens to `recipient`. Only the master may call
    /// this, and total supply must stay at or below the cap.
    Mint { recipient: String, amount: Uint128 },
    /// Replaces the master. `None` disables minting. Owner only.
    SetMaster { master: Option<String> },

    Transfer {
        recipient: String,
        amount: Uint128,
    },
    Burn {
        amount: Uint128,
    },
    Send {
        contract: String,
        amount: Uint128,
        msg: Binary,
    },
    IncreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    DecreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    TransferFrom {
        owner: String,
        recipient: String,
        amount: Uint128,
    },
    SendFrom {
        owner: String,
        contract: String,
        amount: Uint128,
        msg: Binary,
    },
    BurnFrom {
        owner: String,
        amount: Uint128,
    },
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(MasterResponse)]
    Master {},
    #[returns(CapResponse)]
    Cap {},
    /// How many tokens can still be minted before the cap is hit.
    #[returns(RemainingSupplyResponse)]
    RemainingSupply {},

    #[returns(cw20::BalanceResponse)]
    Balance { address: String },
    #[returns(cw20::TokenInfoResponse)]
    TokenInfo {},
    #[returns(Option<cw20::MinterResponse>)]
    Minter {},
    #[returns(cw20::AllowanceResponse)]
    Allowance { owner: String, spender: String },
    #[returns(cw20::AllAllowancesResponse)]
    AllAllowances {
        owner: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(cw20::AllSpenderAllowancesResponse)]
    AllSpenderAllowances {
        spender: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(cw20::AllAccountsResponse)]
    AllAccounts {
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct MasterResponse {
    pub master: Option<Addr>,
}

#[cw_serde]
pub struct CapResponse {
    pub cap: Option<Uint128>,
}

#[cw_serde]
pub struct RemainingSupplyResponse {
    /// `None` when the token is uncapped.
    pub remaining: Option<Uint128>,
}

#[cw_serde]
pub struct MigrateMsg {}
