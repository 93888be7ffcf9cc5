use anchor_lang::prelude::{msg, Pubkey};

use crate::{
    token_operations::{self, CollateralPool, DebtToken, PriceFeed, SurplusPool},
    trove_manager::{
        trove_operations,
        types::{AdjustTroveEffects, AdjustTroveParams},
    },
    utils::oracle::get_price,
    ProtocolAccounts, TroveError,
};

pub fn process<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    owner: Pubkey,
    params: &AdjustTroveParams,
    now: u64,
) -> Result<AdjustTroveEffects, TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    msg!("ix=AdjustTrove");
    let price = get_price(&mut accounts.price_feed)?;

    if !params.is_debt_increase && accounts.debt_token.balance_of(&owner) < params.debt_change {
        return Err(TroveError::InsufficientDebtBalance);
    }

    let effects = trove_operations::adjust_trove(&mut accounts.ledger, owner, params, price, now)?;

    token_operations::pool_to_pool(
        &mut accounts.default_pool,
        &mut accounts.active_pool,
        effects.pending_rewards,
    )?;

    if effects.coll_to_transfer_from_user > 0 {
        accounts
            .active_pool
            .receive_collateral(effects.coll_to_transfer_from_user)?;
    }
    if effects.coll_to_transfer_to_user > 0 {
        accounts
            .active_pool
            .send_collateral(&owner, effects.coll_to_transfer_to_user)?;
    }

    if effects.amount_mint_to_user > 0 {
        let debt_increase = effects
            .amount_mint_to_user
            .checked_add(effects.amount_mint_to_fee_recipient)
            .ok_or(TroveError::MathOverflow)?;
        accounts.active_pool.increase_debt(debt_increase)?;
        accounts.debt_token.mint(&owner, effects.amount_mint_to_user)?;
        accounts
            .debt_token
            .mint(&accounts.fee_recipient, effects.amount_mint_to_fee_recipient)?;
    }
    if effects.amount_to_burn_from_user > 0 {
        accounts
            .active_pool
            .decrease_debt(effects.amount_to_burn_from_user)?;
        accounts
            .debt_token
            .burn(&owner, effects.amount_to_burn_from_user)?;
    }

    Ok(effects)
}
