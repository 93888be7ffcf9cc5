use anchor_lang::prelude::msg;
use num::FromPrimitive;

use crate::{
    token_operations::{CollateralPool, DebtToken, PriceFeed, SurplusPool},
    utils::consts::DECIMAL_PRECISION,
    GlobalConfigOption, Ledger, ProtocolAccounts, TroveError,
};

/// Amount keys take whole debt tokens.
pub fn process<P, S, T, O>(
    accounts: &mut ProtocolAccounts<P, S, T, O>,
    key: u16,
    value: u64,
) -> Result<(), TroveError>
where
    P: CollateralPool,
    S: SurplusPool,
    T: DebtToken,
    O: PriceFeed,
{
    msg!("ix=UpdateGlobalConfig key {} value {}", key, value);
    let Ledger {
        market,
        troves,
        sorted_troves,
        config,
    } = &mut accounts.ledger;

    match GlobalConfigOption::from_u16(key) {
        Some(GlobalConfigOption::IsBorrowingAllowed) => {
            config.is_borrowing_allowed = value > 0;
            Ok(())
        }
        Some(GlobalConfigOption::DebtCeiling) => {
            config.debt_ceiling = whole_tokens(value);
            Ok(())
        }
        Some(GlobalConfigOption::GasCompensation) => {
            // open troves carry the old reserve in their debt
            if troves.count() > 0 {
                return Err(TroveError::GlobalConfigValueError);
            }
            config.gas_compensation = whole_tokens(value);
            Ok(())
        }
        Some(GlobalConfigOption::MinNetDebt) => {
            config.min_net_debt = whole_tokens(value);
            Ok(())
        }
        Some(GlobalConfigOption::MaxTroves) => {
            sorted_troves.set_max_size(value)?;
            config.max_troves = value;
            Ok(())
        }
        Some(GlobalConfigOption::RedemptionBootstrapPeriod) => {
            // the end of the bootstrap period is fixed at initialization
            if market.is_initialized() {
                return Err(TroveError::GlobalConfigValueError);
            }
            config.redemption_bootstrap_period = value;
            Ok(())
        }
        None => Err(TroveError::GlobalConfigKeyError),
    }
}

fn whole_tokens(value: u64) -> u128 {
    value as u128 * DECIMAL_PRECISION
}
