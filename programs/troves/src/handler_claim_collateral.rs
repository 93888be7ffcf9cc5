use anchor_lang::prelude::{msg, Pubkey};

use crate::{
    token_operations::{CollateralPool, DebtToken, PriceFeed, SurplusPool},
    trove_manager::trove_operations,
    ProtocolAccounts, TroveError,
};

pub fn process<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    owner: Pubkey,
) -> Result<u128, TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    msg!("ix=ClaimCollateral");
    let amount = accounts.surplus_pool.surplus_of(&owner);
    trove_operations::claim_collateral(&mut accounts.ledger.market, amount)?;
    let claimed = accounts.surplus_pool.claim_coll(&owner)?;
    msg!("Claimed {} collateral for {}", claimed, owner);
    Ok(claimed)
}
