use anchor_lang::prelude::Pubkey;
use struct_arithmetic::StructArithmetic;

use crate::PoolBalances;

#[derive(Debug, Clone, Copy)]
pub struct OpenTroveArgs {
    pub coll: u128,
    // debt the owner receives, fee and gas compensation come on top
    pub debt_amount: u128,
    pub max_fee_percentage: u128,
    pub upper_hint: Option<Pubkey>,
    pub lower_hint: Option<Pubkey>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenTroveEffects {
    pub coll_to_transfer_from_user: u128,
    pub amount_mint_to_user: u128,
    pub amount_mint_to_fee_recipient: u128,
    pub amount_mint_to_gas_pool: u128,
    pub composite_debt: u128,
    pub stake: u128,
    pub nicr: u128,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdjustTroveParams {
    pub coll_deposit: u128,
    pub coll_withdrawal: u128,
    pub debt_change: u128,
    pub is_debt_increase: bool,
    pub max_fee_percentage: u128,
    pub upper_hint: Option<Pubkey>,
    pub lower_hint: Option<Pubkey>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjustTroveEffects {
    // moved from the default pool to the active pool
    pub pending_rewards: PoolBalances,
    pub coll_to_transfer_from_user: u128,
    pub coll_to_transfer_to_user: u128,
    pub amount_mint_to_user: u128,
    pub amount_mint_to_fee_recipient: u128,
    pub amount_to_burn_from_user: u128,
    pub new_coll: u128,
    pub new_debt: u128,
    pub new_stake: u128,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloseTroveEffects {
    pub pending_rewards: PoolBalances,
    pub coll_to_transfer_to_user: u128,
    pub amount_to_burn_from_user: u128,
    pub amount_to_burn_from_gas_pool: u128,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, StructArithmetic)]
pub struct LiquidationTotals {
    pub coll_gas_compensation: u128,
    pub debt_gas_compensation: u128,
    pub coll_redistributed: u128,
    pub debt_redistributed: u128,
    pub coll_surplus: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidationEffects {
    pub owner: Pubkey,
    pub pending_rewards: PoolBalances,
    pub totals: LiquidationTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchLiquidationEffects {
    pub liquidated: Vec<LiquidationEffects>,
    pub totals: LiquidationTotals,
}

impl BatchLiquidationEffects {
    pub fn push(&mut self, effects: LiquidationEffects) {
        self.totals = self.totals.add(&effects.totals);
        self.liquidated.push(effects);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RedeemCollateralArgs {
    pub amount: u128,
    pub first_redemption_hint: Option<Pubkey>,
    pub upper_partial_redemption_hint: Option<Pubkey>,
    pub lower_partial_redemption_hint: Option<Pubkey>,
    pub partial_redemption_hint_nicr: u128,
    // zero means no limit
    pub max_iterations: u64,
    pub max_fee_percentage: u128,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedemptionEffects {
    pub pending_rewards: PoolBalances,
    pub debt_to_burn_from_redeemer: u128,
    pub debt_to_burn_from_gas_pool: u128,
    pub coll_to_transfer_to_redeemer: u128,
    pub coll_fee_to_fee_recipient: u128,
    // leftover collateral of troves closed by the redemption
    pub surplus: Vec<(Pubkey, u128)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedemptionHints {
    pub first_redemption_hint: Option<Pubkey>,
    pub partial_redemption_hint_nicr: u128,
    pub truncated_amount: u128,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApproxHint {
    pub hint: Option<Pubkey>,
    pub diff: u128,
}
