use anchor_lang::prelude::{msg, Pubkey};

use crate::{
    token_operations::{self, CollateralPool, DebtToken, PriceFeed, SurplusPool},
    trove_manager::{
        redemption,
        types::{RedeemCollateralArgs, RedemptionEffects},
    },
    utils::oracle::get_price,
    ProtocolAccounts, TroveError,
};

pub fn process<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    redeemer: Pubkey,
    args: &RedeemCollateralArgs,
    now: u64,
) -> Result<RedemptionEffects, TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    msg!("ix=RedeemCollateral");
    let price = get_price(&mut accounts.price_feed)?;
    let total_debt_supply = accounts.debt_token.total_supply();
    let redeemer_balance = accounts.debt_token.balance_of(&redeemer);

    let effects = redemption::redeem_collateral(
        &mut accounts.ledger,
        redeemer,
        args,
        price,
        total_debt_supply,
        redeemer_balance,
        now,
    )?;

    token_operations::pool_to_pool(
        &mut accounts.default_pool,
        &mut accounts.active_pool,
        effects.pending_rewards,
    )?;

    for (owner, surplus) in effects.surplus.iter() {
        token_operations::pool_to_surplus(
            &mut accounts.active_pool,
            &mut accounts.surplus_pool,
            owner,
            *surplus,
        )?;
    }

    let debt_burned = effects
        .debt_to_burn_from_redeemer
        .checked_add(effects.debt_to_burn_from_gas_pool)
        .ok_or(TroveError::MathOverflow)?;
    accounts.active_pool.decrease_debt(debt_burned)?;
    accounts
        .debt_token
        .burn(&redeemer, effects.debt_to_burn_from_redeemer)?;
    accounts
        .debt_token
        .burn(&accounts.gas_pool, effects.debt_to_burn_from_gas_pool)?;

    accounts
        .active_pool
        .send_collateral(&accounts.fee_recipient, effects.coll_fee_to_fee_recipient)?;
    accounts
        .active_pool
        .send_collateral(&redeemer, effects.coll_to_transfer_to_redeemer)?;

    Ok(effects)
}
