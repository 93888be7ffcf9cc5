use anchor_lang::prelude::{msg, Pubkey};

use crate::{
    handler_liquidate::{move_liquidated_trove, pay_gas_compensation},
    token_operations::{CollateralPool, DebtToken, PriceFeed, SurplusPool},
    trove_manager::{liquidation, types::BatchLiquidationEffects},
    utils::oracle::get_price,
    ProtocolAccounts, TroveError,
};

pub enum BatchSelection<'a> {
    FromTail { max_iterations: u64 },
    ByOwner(&'a [Pubkey]),
}

pub fn process<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    liquidator: Pubkey,
    selection: BatchSelection<'_>,
) -> Result<BatchLiquidationEffects, TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    msg!("ix=BatchLiquidate");
    let price = get_price(&mut accounts.price_feed)?;

    let effects = match selection {
        BatchSelection::FromTail { max_iterations } => {
            liquidation::batch_liquidate_troves(&mut accounts.ledger, price, max_iterations)?
        }
        BatchSelection::ByOwner(owners) => {
            liquidation::liquidate_troves_by_id(&mut accounts.ledger, owners, price)?
        }
    };

    for liquidated in effects.liquidated.iter() {
        move_liquidated_trove(accounts, liquidated)?;
    }
    // the liquidator is paid once for the whole batch
    pay_gas_compensation(accounts, liquidator, &effects.totals)?;

    msg!(
        "Liquidated {} troves, totals {:?}",
        effects.liquidated.len(),
        effects.totals
    );
    Ok(effects)
}
