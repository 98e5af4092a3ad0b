use cosmwasm_schema::serde::de::DeserializeOwned;
use cosmwasm_std::{coins, Addr, Uint128};
use cw_multi_test::{App, AppResponse, BankSudo, Executor, SudoMsg};
use cw_utils::PaymentError;
use farm_accumulator::Position;
use farm_testing::{
    contracts::farm_pools_contract,
    helpers::{
        cw20_balance, cw20_total_supply, increase_allowance, instantiate_farm_token,
        set_block_height, set_master,
    },
};

use crate::msg::{
    ExecuteMsg, InstantiateMsg, MigrateMsg, PendingRewardResponse, PoolResponse, QueryMsg,
};
use crate::state::{Config, Settlement};
use farm_pools::ContractError;

const OWNER: &str = "owner";
const TREASURY: &str = "treasury";
const ALICE: &str = "alice";
const BOB: &str = "bob";
const CAROL: &str = "carol";
const DAVE: &str = "dave";

const STAKE_BALANCE: u128 = 1_000;

struct Suite {
    app: App,
    reward_token: Addr,
    stake_tokens: Vec<Addr>,
    farm: Addr,
}

impl Suite {
    /// Farm emitting 10 per block over [200, 300) with `pool_count` stake
    /// tokens available but no pools registered yet.
    fn new(settlement: Settlement, referral_bonus_bp: u16, pool_count: usize) -> Self {
        let mut app = App::default();
        set_block_height(&mut app, 100);
        let stakers = [ALICE, BOB, CAROL, DAVE];

        let reward_token =
            instantiate_farm_token(&mut app, OWNER, "ENOTE", Some(1_000_000), &[]);
        let balances: Vec<_> = stakers.iter().map(|s| (*s, STAKE_BALANCE)).collect();
        let stake_tokens: Vec<Addr> = (0..pool_count)
            .map(|i| instantiate_farm_token(&mut app, OWNER, &format!("LP{i}"), None, &balances))
            .collect();

        let code_id = app.store_code(farm_pools_contract());
        let farm = app
            .instantiate_contract(
                code_id,
                Addr::unchecked(OWNER),
                &InstantiateMsg {
                    reward_token: reward_token.to_string(),
                    reward_per_block: Uint128::new(10),
                    start_block: 200,
                    end_block: 300,
                    fee_sink: TREASURY.to_string(),
                    settlement,
                    referral_bonus_bp: Some(referral_bonus_bp),
                    owner: None,
                },
                &[],
                "farm",
                Some(OWNER.to_string()),
            )
            .unwrap();
        set_master(&mut app, &reward_token, OWNER, &farm);
        for token in &stake_tokens {
            for staker in stakers {
                increase_allowance(&mut app, token, staker, &farm, STAKE_BALANCE);
            }
        }

        Self {
            app,
            reward_token,
            stake_tokens,
            farm,
        }
    }

    fn execute(&mut self, sender: &str, msg: ExecuteMsg) -> anyhow::Result<AppResponse> {
        self.app
            .execute_contract(Addr::unchecked(sender), self.farm.clone(), &msg, &[])
    }

    fn add_pool(
        &mut self,
        token: usize,
        weight: u64,
        deposit_fee_bp: u16,
    ) -> anyhow::Result<AppResponse> {
        let stake_token = self.stake_tokens[token].to_string();
        self.execute(
            OWNER,
            ExecuteMsg::Add {
                weight,
                stake_token,
                deposit_fee_bp,
                with_update: true,
            },
        )
    }

    fn deposit_at(
        &mut self,
        height: u64,
        sender: &str,
        pool_id: u64,
        amount: u128,
        referrer: Option<&str>,
    ) -> anyhow::Result<AppResponse> {
        set_block_height(&mut self.app, height);
        self.execute(
            sender,
            ExecuteMsg::Deposit {
                pool_id,
                amount: Uint128::new(amount),
                referrer: referrer.map(str::to_string),
            },
        )
    }

    fn withdraw_at(
        &mut self,
        height: u64,
        sender: &str,
        pool_id: u64,
        amount: u128,
    ) -> anyhow::Result<AppResponse> {
        set_block_height(&mut self.app, height);
        self.execute(
            sender,
            ExecuteMsg::Withdraw {
                pool_id,
                amount: Uint128::new(amount),
            },
        )
    }

    fn harvest_at(
        &mut self,
        height: u64,
        sender: &str,
        pool_id: u64,
    ) -> anyhow::Result<AppResponse> {
        set_block_height(&mut self.app, height);
        self.execute(sender, ExecuteMsg::Harvest { pool_id })
    }

    fn reward_balance(&self, address: &str) -> u128 {
        cw20_balance(&self.app, &self.reward_token, address)
    }

    fn stake_balance(&self, token: usize, address: &str) -> u128 {
        cw20_balance(&self.app, &self.stake_tokens[token], address)
    }

    fn query<T: DeserializeOwned>(&self, msg: &QueryMsg) -> T {
        self.app.wrap().query_wasm_smart(&self.farm, msg).unwrap()
    }

    fn user_info(&self, pool_id: u64, address: &str) -> Position {
        self.query(&QueryMsg::UserInfo {
            pool_id,
            address: address.to_string(),
        })
    }
}

#[test]
fn test_instantiate() {
    let suite = Suite::new(Settlement::Accrue, 0, 0);

    let config: Config = suite.query(&QueryMsg::Config {});
    assert_eq!(config.reward_token, suite.reward_token);
    assert_eq!(config.fee_sink, Addr::unchecked(TREASURY));
    assert_eq!(config.settlement, Settlement::Accrue);

    let ownership: cw_ownable::Ownership<Addr> = suite.query(&QueryMsg::Ownership {});
    assert_eq!(ownership.owner, Some(Addr::unchecked(OWNER)));

    let length: u64 = suite.query(&QueryMsg::PoolLength {});
    assert_eq!(length, 0);

    let mut app = App::default();
    let code_id = app.store_code(farm_pools_contract());
    let err: ContractError = app
        .instantiate_contract(
            code_id,
            Addr::unchecked(OWNER),
            &InstantiateMsg {
                reward_token: "reward".to_string(),
                reward_per_block: Uint128::new(10),
                start_block: 200,
                end_block: 300,
                fee_sink: TREASURY.to_string(),
                settlement: Settlement::Accrue,
                referral_bonus_bp: Some(10_001),
                owner: None,
            },
            &[],
            "farm",
            None,
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::InvalidReferralBonus { bp: 10_001 });
}

#[test]
fn test_add_and_set_pools() {
    let mut suite = Suite::new(Settlement::Accrue, 0, 2);

    let stake_token = suite.stake_tokens[0].to_string();
    let err: ContractError = suite
        .execute(
            ALICE,
            ExecuteMsg::Add {
                weight: 1,
                stake_token,
                deposit_fee_bp: 0,
                with_update: false,
            },
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(
        err,
        ContractError::Ownable(cw_ownable::OwnershipError::NotOwner)
    );

    let err: ContractError = suite.add_pool(0, 1, 10_001).unwrap_err().downcast().unwrap();
    assert_eq!(err, ContractError::InvalidDepositFee { bp: 10_001 });

    suite.add_pool(0, 1, 0).unwrap();
    let err: ContractError = suite.add_pool(0, 2, 0).unwrap_err().downcast().unwrap();
    assert_eq!(
        err,
        ContractError::DuplicatePool {
            stake_token: suite.stake_tokens[0].to_string()
        }
    );
    suite.add_pool(1, 2, 400).unwrap();

    let err: ContractError = suite
        .execute(
            OWNER,
            ExecuteMsg::Set {
                pool_id: 5,
                weight: 1,
                deposit_fee_bp: 0,
                with_update: false,
            },
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::PoolNotFound { pool_id: 5 });

    suite
        .execute(
            OWNER,
            ExecuteMsg::Set {
                pool_id: 0,
                weight: 5,
                deposit_fee_bp: 100,
                with_update: false,
            },
        )
        .unwrap();

    let length: u64 = suite.query(&QueryMsg::PoolLength {});
    assert_eq!(length, 2);
    let total_weight: u64 = suite.query(&QueryMsg::TotalWeight {});
    assert_eq!(total_weight, 7);

    let pool: PoolResponse = suite.query(&QueryMsg::PoolInfo { pool_id: 0 });
    assert_eq!(pool.info.pool.weight, 5);
    assert_eq!(pool.info.deposit_fee_bp, 100);
    // Registered before the window opens, so accounting starts at its start.
    assert_eq!(pool.info.pool.last_reward_block, 200);

    let pools: Vec<PoolResponse> = suite.query(&QueryMsg::ListPools {
        start_after: Some(0),
        limit: None,
    });
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].pool_id, 1);
    assert_eq!(pools[0].info.stake_token, suite.stake_tokens[1]);
}

#[test]
fn test_deposit_fee_goes_to_sink() {
    let mut suite = Suite::new(Settlement::Accrue, 0, 1);
    suite.add_pool(0, 1, 1_000).unwrap();

    suite.deposit_at(200, BOB, 0, 100, None).unwrap();
    assert_eq!(suite.stake_balance(0, BOB), STAKE_BALANCE - 100);
    assert_eq!(suite.stake_balance(0, TREASURY), 10);
    assert_eq!(suite.stake_balance(0, suite.farm.as_str()), 90);
    assert_eq!(suite.user_info(0, BOB).amount, Uint128::new(90));

    // Withdrawals carry no fee.
    suite.withdraw_at(300, BOB, 0, 90).unwrap();
    assert_eq!(suite.stake_balance(0, BOB), STAKE_BALANCE - 10);
    assert_eq!(suite.stake_balance(0, suite.farm.as_str()), 0);
}

#[test]
fn test_accrue_settlement() {
    let mut suite = Suite::new(Settlement::Accrue, 0, 1);
    suite.add_pool(0, 1, 0).unwrap();
    suite.deposit_at(200, BOB, 0, 100, None).unwrap();

    suite.withdraw_at(250, BOB, 0, 50).unwrap();
    assert_eq!(suite.reward_balance(BOB), 0);
    assert_eq!(
        suite.user_info(0, BOB),
        Position {
            amount: Uint128::new(50),
            reward_debt: Uint128::new(250),
            claimable: Uint128::new(500),
        }
    );

    // Harvesting is allowed while the window is open.
    suite.harvest_at(260, BOB, 0).unwrap();
    assert_eq!(suite.reward_balance(BOB), 600);

    suite.harvest_at(300, BOB, 0).unwrap();
    assert_eq!(suite.reward_balance(BOB), 1_000);

    // Nothing left, harvest is a no-op rather than an error.
    let res = suite.harvest_at(310, BOB, 0).unwrap();
    let wasm = res.events.iter().find(|e| e.ty == "wasm").unwrap();
    assert!(wasm
        .attributes
        .iter()
        .any(|a| a.key == "amount" && a.value == "0"));
    assert_eq!(suite.reward_balance(BOB), 1_000);
    assert_eq!(cw20_total_supply(&suite.app, &suite.reward_token), 1_000);
}

#[test]
fn test_immediate_settlement() {
    let mut suite = Suite::new(Settlement::Immediate, 0, 1);
    suite.add_pool(0, 1, 0).unwrap();

    suite.deposit_at(200, BOB, 0, 100, None).unwrap();
    suite.deposit_at(210, BOB, 0, 100, None).unwrap();
    assert_eq!(suite.reward_balance(BOB), 100);

    suite.withdraw_at(220, BOB, 0, 200).unwrap();
    assert_eq!(suite.reward_balance(BOB), 200);
    assert_eq!(suite.stake_balance(0, BOB), STAKE_BALANCE);

    // Empty pool, nothing accrues and nothing is minted.
    suite.harvest_at(230, BOB, 0).unwrap();
    assert_eq!(suite.reward_balance(BOB), 200);
    assert_eq!(cw20_total_supply(&suite.app, &suite.reward_token), 200);
    assert_eq!(suite.reward_balance(suite.farm.as_str()), 0);
}

#[test]
fn test_referral_bonus() {
    let mut suite = Suite::new(Settlement::Accrue, 500, 1);
    suite.add_pool(0, 1, 0).unwrap();

    suite.deposit_at(200, BOB, 0, 100, Some(ALICE)).unwrap();
    // Referring yourself is ignored.
    suite.deposit_at(200, CAROL, 0, 100, Some(CAROL)).unwrap();
    // A referrer is only recorded once.
    suite.deposit_at(250, BOB, 0, 10, Some(DAVE)).unwrap();

    let referrer: Option<Addr> = suite.query(&QueryMsg::Referrer {
        address: BOB.to_string(),
    });
    assert_eq!(referrer, Some(Addr::unchecked(ALICE)));
    let referrer: Option<Addr> = suite.query(&QueryMsg::Referrer {
        address: CAROL.to_string(),
    });
    assert_eq!(referrer, None);

    suite.harvest_at(300, BOB, 0).unwrap();
    suite.harvest_at(300, CAROL, 0).unwrap();
    assert_eq!(suite.reward_balance(BOB), 511);
    assert_eq!(suite.reward_balance(CAROL), 488);
    assert_eq!(suite.reward_balance(ALICE), 25);
    assert_eq!(suite.reward_balance(DAVE), 0);

    // Bonus is minted on top of the emission.
    assert_eq!(cw20_total_supply(&suite.app, &suite.reward_token), 1_025);
    assert_eq!(suite.reward_balance(suite.farm.as_str()), 1);
}

#[test]
fn test_weights_and_mass_update() {
    let mut suite = Suite::new(Settlement::Accrue, 0, 2);
    suite.add_pool(0, 1, 0).unwrap();
    suite.add_pool(1, 1, 0).unwrap();

    suite.deposit_at(200, BOB, 0, 100, None).unwrap();
    suite.deposit_at(200, CAROL, 1, 100, None).unwrap();

    set_block_height(&mut suite.app, 250);
    suite
        .execute(
            OWNER,
            ExecuteMsg::Set {
                pool_id: 1,
                weight: 3,
                deposit_fee_bp: 0,
                with_update: true,
            },
        )
        .unwrap();
    assert_eq!(cw20_total_supply(&suite.app, &suite.reward_token), 500);

    set_block_height(&mut suite.app, 280);
    let pending: PendingRewardResponse = suite.query(&QueryMsg::PendingReward {
        pool_id: 1,
        address: CAROL.to_string(),
    });
    assert_eq!(pending.pending, Uint128::new(475));

    suite.execute(ALICE, ExecuteMsg::MassUpdatePools {}).unwrap();
    assert_eq!(cw20_total_supply(&suite.app, &suite.reward_token), 800);
    assert_eq!(suite.reward_balance(suite.farm.as_str()), 800);

    suite.harvest_at(300, BOB, 0).unwrap();
    suite.harvest_at(300, CAROL, 1).unwrap();
    assert_eq!(suite.reward_balance(BOB), 375);
    assert_eq!(suite.reward_balance(CAROL), 625);
    assert_eq!(suite.reward_balance(suite.farm.as_str()), 0);
}

#[test]
fn test_deposit_and_withdraw_errors() {
    let mut suite = Suite::new(Settlement::Accrue, 0, 1);
    suite.add_pool(0, 1, 0).unwrap();

    let err: ContractError = suite
        .deposit_at(199, BOB, 0, 100, None)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::StakingNotStarted {});

    let err: ContractError = suite
        .deposit_at(300, BOB, 0, 100, None)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::StakingEnded {});

    let err: ContractError = suite
        .deposit_at(250, BOB, 0, 0, None)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::InvalidZeroAmount {});

    let err: ContractError = suite
        .deposit_at(250, BOB, 7, 100, None)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::PoolNotFound { pool_id: 7 });

    let err: ContractError = suite
        .withdraw_at(250, BOB, 0, 10)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::NoTokensStaked {});

    suite.deposit_at(250, BOB, 0, 100, None).unwrap();
    let err: ContractError = suite
        .withdraw_at(260, BOB, 0, 101)
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(
        err,
        ContractError::InsufficientStake {
            staked: Uint128::new(100),
            requested: Uint128::new(101)
        }
    );

    suite
        .app
        .sudo(SudoMsg::Bank(BankSudo::Mint {
            to_address: BOB.to_string(),
            amount: coins(100, "ujuno"),
        }))
        .unwrap();
    let farm = suite.farm.clone();
    let err: ContractError = suite
        .app
        .execute_contract(
            Addr::unchecked(BOB),
            farm,
            &ExecuteMsg::Harvest { pool_id: 0 },
            &coins(100, "ujuno"),
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::Payment(PaymentError::NonPayable {}));
}

#[test]
fn test_owner_settings() {
    let mut suite = Suite::new(Settlement::Accrue, 0, 0);

    let err: ContractError = suite
        .execute(ALICE, ExecuteMsg::UpdateReferralBonus { bonus_bp: 100 })
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(
        err,
        ContractError::Ownable(cw_ownable::OwnershipError::NotOwner)
    );

    let err: ContractError = suite
        .execute(OWNER, ExecuteMsg::UpdateReferralBonus { bonus_bp: 10_001 })
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::InvalidReferralBonus { bp: 10_001 });

    suite
        .execute(OWNER, ExecuteMsg::UpdateReferralBonus { bonus_bp: 300 })
        .unwrap();
    suite
        .execute(
            OWNER,
            ExecuteMsg::UpdateFeeSink {
                fee_sink: DAVE.to_string(),
            },
        )
        .unwrap();
    let config: Config = suite.query(&QueryMsg::Config {});
    assert_eq!(config.referral_bonus_bp, 300);
    assert_eq!(config.fee_sink, Addr::unchecked(DAVE));

    suite
        .execute(
            OWNER,
            ExecuteMsg::UpdateOwnership(cw_ownable::Action::TransferOwnership {
                new_owner: CAROL.to_string(),
                expiry: None,
            }),
        )
        .unwrap();
    suite
        .execute(
            CAROL,
            ExecuteMsg::UpdateOwnership(cw_ownable::Action::AcceptOwnership),
        )
        .unwrap();
    suite
        .execute(CAROL, ExecuteMsg::UpdateReferralBonus { bonus_bp: 0 })
        .unwrap();
}

#[test]
fn test_migrate() {
    let mut suite = Suite::new(Settlement::Accrue, 0, 0);
    let farm = suite.farm.clone();
    let code_id = suite.app.store_code(farm_pools_contract());

    suite
        .app
        .migrate_contract(Addr::unchecked(OWNER), farm.clone(), &MigrateMsg {}, code_id)
        .unwrap();
    let version = cw2::query_contract_info(&suite.app.wrap(), farm).unwrap();
    assert_eq!(version.contract, "crates.io:farm-pools");
}
