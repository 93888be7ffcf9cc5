use anchor_lang::prelude::{msg, Pubkey};

use crate::{
    token_operations::{self, CollateralPool, DebtToken, PriceFeed, SurplusPool},
    trove_manager::{
        liquidation,
        types::{LiquidationEffects, LiquidationTotals},
    },
    utils::oracle::get_price,
    PoolBalances, ProtocolAccounts, TroveError,
};

pub fn process<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    liquidator: Pubkey,
    owner: Pubkey,
) -> Result<LiquidationEffects, TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    msg!("ix=Liquidate");
    let price = get_price(&mut accounts.price_feed)?;

    let effects = liquidation::liquidate(&mut accounts.ledger, owner, price)?;

    move_liquidated_trove(accounts, &effects)?;
    pay_gas_compensation(accounts, liquidator, &effects.totals)?;

    msg!("Liquidation successful {:?}", effects);
    Ok(effects)
}

/// Replays one liquidation on the pools: pending rewards back to the active
/// pool, the redistributed part to the default pool, the surplus aside.
pub(crate) fn move_liquidated_trove<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    effects: &LiquidationEffects,
) -> Result<(), TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    token_operations::pool_to_pool(
        &mut accounts.default_pool,
        &mut accounts.active_pool,
        effects.pending_rewards,
    )?;
    token_operations::pool_to_pool(
        &mut accounts.active_pool,
        &mut accounts.default_pool,
        PoolBalances::new(
            effects.totals.coll_redistributed,
            effects.totals.debt_redistributed,
        ),
    )?;
    token_operations::pool_to_surplus(
        &mut accounts.active_pool,
        &mut accounts.surplus_pool,
        &effects.owner,
        effects.totals.coll_surplus,
    )
}

pub(crate) fn pay_gas_compensation<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    liquidator: Pubkey,
    totals: &LiquidationTotals,
) -> Result<(), TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    accounts
        .debt_token
        .transfer(&accounts.gas_pool, &liquidator, totals.debt_gas_compensation)?;
    accounts
        .active_pool
        .send_collateral(&liquidator, totals.coll_gas_compensation)
}
