pub const DECIMAL_PRECISION: u128 = 1_000_000_000_000_000_000;
pub const HALF: u128 = DECIMAL_PRECISION / 2;

// NICR carries two extra decimals so that small debts still sort well
pub const NICR_PRECISION: u128 = 100_000_000_000_000_000_000;

pub const MCR_PERCENT: u8 = 110;
pub const CCR_PERCENT: u8 = 150;
pub const MCR: u128 = DECIMAL_PRECISION / 100 * MCR_PERCENT as u128; // 1.1
pub const CCR: u128 = DECIMAL_PRECISION / 100 * CCR_PERCENT as u128; // 1.5

// 1 / 200 = 0.5% of the liquidated collateral goes to the liquidator
pub const PERCENT_DIVISOR: u128 = 200;

pub const BORROWING_FEE_FLOOR: u128 = DECIMAL_PRECISION / 1000 * 5; // 0.5%
pub const MAX_BORROWING_FEE: u128 = DECIMAL_PRECISION / 100 * 5; // 5%
pub const REDEMPTION_FEE_FLOOR: u128 = DECIMAL_PRECISION / 1000 * 5; // 0.5%

/*
 * Half-life of 12h. 12h = 720 min
 * (1/2) = d^720 => d = (1/2)^(1/720)
 */
pub const MINUTE_DECAY_FACTOR: u128 = 999_037_758_833_783_000;

// redemptions raise the base rate by redeemed_fraction / BETA
pub const BETA: u128 = 2;

pub const SECONDS_PER_MINUTE: u64 = 60;
// 1000 years, beyond that the decay factor is already zero
pub const MAX_DECAY_MINUTES: u64 = 525_600_000;

pub const DEFAULT_GAS_COMPENSATION: u128 = 200 * DECIMAL_PRECISION;
pub const DEFAULT_MIN_NET_DEBT: u128 = 1_800 * DECIMAL_PRECISION;
pub const DEFAULT_MAX_TROVES: u64 = 100_000;

pub const BOOTSTRAP_PERIOD: u64 = 14 * 24 * 60 * 60; // 14 days

pub const MARKET_STATE_VERSION: u8 = 1;
