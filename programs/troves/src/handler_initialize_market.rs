use anchor_lang::prelude::msg;

use crate::{
    token_operations::{CollateralPool, DebtToken, PriceFeed, SurplusPool},
    trove_manager::trove_operations,
    ProtocolAccounts, TroveError,
};

pub fn process<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    now: u64,
) -> Result<(), TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    msg!("ix=InitializeMarket");
    trove_operations::initialize_market(&mut accounts.ledger, now)?;
    msg!(
        "Market initialized, redemptions open at {}",
        accounts.ledger.market.redemption_bootstrap_end
    );
    Ok(())
}
