use anchor_lang::prelude::*;
use num_derive::FromPrimitive;
use std::collections::BTreeMap;
use struct_arithmetic::StructArithmetic;

mod global_config;
mod ledger;
mod market_state;
mod pool_balances;
pub mod sorted_troves;
mod troves;


pub use ledger::Ledger;
pub use sorted_troves::SortedTroves;

#[account]
#[derive(Debug)]
pub struct GlobalConfig {
    pub version: u8,
    pub is_borrowing_allowed: bool,
    // zero means no ceiling
    pub debt_ceiling: u128,
    pub gas_compensation: u128,
    pub min_net_debt: u128,
    pub max_troves: u64,
    pub redemption_bootstrap_period: u64,
}

#[derive(FromPrimitive, PartialEq, Eq, Clone, Copy, Debug)]
pub enum GlobalConfigOption {
    IsBorrowingAllowed = 0,
    DebtCeiling = 1,
    GasCompensation = 2,
    MinNetDebt = 3,
    MaxTroves = 4,
    RedemptionBootstrapPeriod = 5,
}

#[account]
#[derive(Debug, Default)]
pub struct MarketState {
    pub version: u8,
    pub num_troves_ever: u64,

    // Mirrors of the pools, the collaborators hold the actual tokens
    pub active_pool: PoolBalances,
    pub default_pool: PoolBalances,
    pub surplus_coll: u128,

    // Fee decay
    pub base_rate: u128,
    pub last_fee_operation_time: u64,
    pub redemption_bootstrap_end: u64,

    // Stakes
    pub total_stakes: u128,
    pub total_stakes_snapshot: u128,
    pub total_collateral_snapshot: u128,

    // Reward per unit staked, 1e18 scaled, never decreasing
    pub l_coll: u128,
    pub l_debt: u128,
    pub last_coll_error_redistribution: u128,
    pub last_debt_error_redistribution: u128,
}

#[derive(
    AnchorSerialize,
    AnchorDeserialize,
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    StructArithmetic,
)]
pub struct PoolBalances {
    pub coll: u128,
    pub debt: u128,
}

#[account]
#[derive(Debug, Default)]
pub struct TroveData {
    pub owner: Pubkey,
    // see TroveStatus
    pub status: u8,
    // raw amounts, pending rewards not included
    pub coll: u128,
    pub debt: u128,
    pub stake: u128,
    // l_coll and l_debt at the last update
    pub snapshot_coll: u128,
    pub snapshot_debt: u128,
    pub array_index: u64,
}

#[derive(FromPrimitive, PartialEq, Eq, Clone, Copy, Debug)]
pub enum TroveStatus {
    NonExistent = 0,
    Active = 1,
    ClosedByOwner = 2,
    ClosedByLiquidation = 3,
    ClosedByRedemption = 4,
}

#[account]
#[derive(Debug, Default)]
pub struct Troves {
    pub entries: BTreeMap<Pubkey, TroveData>,
    // active owners, swap-removed on close
    pub owners: Vec<Pubkey>,
}
