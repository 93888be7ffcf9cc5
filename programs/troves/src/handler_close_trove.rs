use anchor_lang::prelude::{msg, Pubkey};

use crate::{
    token_operations::{self, CollateralPool, DebtToken, PriceFeed, SurplusPool},
    trove_manager::{trove_operations, types::CloseTroveEffects},
    utils::oracle::get_price,
    ProtocolAccounts, TroveError,
};

pub fn process<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    owner: Pubkey,
) -> Result<CloseTroveEffects, TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    msg!("ix=CloseTrove");
    let price = get_price(&mut accounts.price_feed)?;

    let effects = trove_operations::close_trove(&mut accounts.ledger, owner, price)?;

    // the net debt is repaid from the owner's own balance
    if accounts.debt_token.balance_of(&owner) < effects.amount_to_burn_from_user {
        return Err(TroveError::InsufficientDebtBalance);
    }

    token_operations::pool_to_pool(
        &mut accounts.default_pool,
        &mut accounts.active_pool,
        effects.pending_rewards,
    )?;

    let debt_repaid = effects
        .amount_to_burn_from_user
        .checked_add(effects.amount_to_burn_from_gas_pool)
        .ok_or(TroveError::MathOverflow)?;
    accounts.active_pool.decrease_debt(debt_repaid)?;
    accounts
        .debt_token
        .burn(&owner, effects.amount_to_burn_from_user)?;
    accounts
        .debt_token
        .burn(&accounts.gas_pool, effects.amount_to_burn_from_gas_pool)?;

    accounts
        .active_pool
        .send_collateral(&owner, effects.coll_to_transfer_to_user)?;

    Ok(effects)
}
