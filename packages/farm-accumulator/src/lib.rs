#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod pool;
mod position;
mod schedule;


pub use pool::Pool;
pub use position::Position;
pub use schedule::{EmissionSchedule, ScheduleError};

use cosmwasm_std::Uint128;

/// Scale applied to `acc_reward_per_share`.
pub const ACC_REWARD_PRECISION: u128 = 1_000_000_000_000;

/// Denominator for deposit fees and referral bonuses.
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// Returns `amount * bp / 10_000`, truncated. `bp` must not exceed
/// `MAX_BASIS_POINTS`, which callers enforce when the rate is configured.
pub fn basis_points_of(amount: Uint128, bp: u16) -> Uint128 {
    amount.multiply_ratio(bp, MAX_BASIS_POINTS)
}
