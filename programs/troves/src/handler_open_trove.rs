use anchor_lang::prelude::{msg, Pubkey};

use crate::{
    token_operations::{CollateralPool, DebtToken, PriceFeed, SurplusPool},
    trove_manager::{
        trove_operations,
        types::{OpenTroveArgs, OpenTroveEffects},
    },
    utils::oracle::get_price,
    ProtocolAccounts, TroveError,
};

pub fn process<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    owner: Pubkey,
    args: &OpenTroveArgs,
    now: u64,
) -> Result<OpenTroveEffects, TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    msg!("ix=OpenTrove");
    let price = get_price(&mut accounts.price_feed)?;

    let effects = trove_operations::open_trove(&mut accounts.ledger, owner, args, price, now)?;

    accounts
        .active_pool
        .receive_collateral(effects.coll_to_transfer_from_user)?;
    accounts.active_pool.increase_debt(effects.composite_debt)?;

    accounts.debt_token.mint(&owner, effects.amount_mint_to_user)?;
    accounts
        .debt_token
        .mint(&accounts.fee_recipient, effects.amount_mint_to_fee_recipient)?;
    accounts
        .debt_token
        .mint(&accounts.gas_pool, effects.amount_mint_to_gas_pool)?;

    msg!(
        "Borrowed {} + fee {} against {}",
        effects.amount_mint_to_user,
        effects.amount_mint_to_fee_recipient,
        effects.coll_to_transfer_from_user
    );
    Ok(effects)
}
