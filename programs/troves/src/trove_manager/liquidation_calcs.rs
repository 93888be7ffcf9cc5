use crate::{
    utils::{
        consts::{DECIMAL_PRECISION, MCR, PERCENT_DIVISOR},
        finance,
        math,
    },
    MarketState, TroveError,
};

use decimal_wad::decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidationDecision {
    // whole collateral minus gas compensation goes to the other troves
    Redistribute,
    // recovery mode with MCR <= ICR < CCR, collateral above MCR is kept
    // aside for the owner
    RedistributeCapped,
    DoNothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemMode {
    Normal,
    Recovery,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiquidationSplit {
    pub coll_gas_compensation: u128,
    pub debt_gas_compensation: u128,
    pub coll_to_redistribute: u128,
    pub debt_to_redistribute: u128,
    pub coll_surplus: u128,
}

pub fn calc_system_mode(
    market: &MarketState,
    price: u128,
) -> Result<(SystemMode, Decimal), TroveError> {
    let system = market.system_balances()?;
    let tcr = finance::coll_ratio(system.coll, system.debt, price);
    Ok((mode_for_tcr(tcr), tcr))
}

fn mode_for_tcr(tcr: Decimal) -> SystemMode {
    if tcr < finance::ccr() {
        SystemMode::Recovery
    } else {
        SystemMode::Normal
    }
}

pub fn calc_new_tcr(
    market: &MarketState,
    coll_change: u128,
    is_coll_increase: bool,
    debt_change: u128,
    is_debt_increase: bool,
    price: u128,
) -> Result<Decimal, TroveError> {
    let system = market.system_balances()?;
    let coll = apply_change(system.coll, coll_change, is_coll_increase)?;
    let debt = apply_change(system.debt, debt_change, is_debt_increase)?;
    Ok(finance::coll_ratio(coll, debt, price))
}

fn apply_change(value: u128, change: u128, is_increase: bool) -> Result<u128, TroveError> {
    let res = if is_increase {
        value.checked_add(change)
    } else {
        value.checked_sub(change)
    };
    res.ok_or(TroveError::MathOverflow)
}

pub fn require_icr_is_above_mcr(icr: Decimal) -> Result<(), TroveError> {
    if icr < finance::mcr() {
        return Err(TroveError::IcrBelowMcr);
    }
    Ok(())
}

pub fn require_icr_is_above_ccr(icr: Decimal) -> Result<(), TroveError> {
    if icr < finance::ccr() {
        return Err(TroveError::IcrBelowCcr);
    }
    Ok(())
}

pub fn require_new_tcr_is_above_ccr(new_tcr: Decimal) -> Result<(), TroveError> {
    if new_tcr < finance::ccr() {
        return Err(TroveError::TcrBelowCcr);
    }
    Ok(())
}

pub fn require_at_least_min_net_debt(net_debt: u128, min_net_debt: u128) -> Result<(), TroveError> {
    if net_debt < min_net_debt {
        return Err(TroveError::NetDebtBelowMinimum);
    }
    Ok(())
}

pub fn try_open(
    market: &MarketState,
    coll: u128,
    composite_debt: u128,
    mode: SystemMode,
    price: u128,
) -> Result<(), TroveError> {
    let icr = finance::coll_ratio(coll, composite_debt, price);
    match mode {
        SystemMode::Recovery => require_icr_is_above_ccr(icr),
        SystemMode::Normal => {
            require_icr_is_above_mcr(icr)?;
            let new_tcr = calc_new_tcr(market, coll, true, composite_debt, true, price)?;
            require_new_tcr_is_above_ccr(new_tcr)
        }
    }
}

pub fn require_valid_adjustment_in_current_mode(
    mode: SystemMode,
    coll_withdrawal: u128,
    is_debt_increase: bool,
    old_icr: Decimal,
    new_icr: Decimal,
    new_tcr: Decimal,
) -> Result<(), TroveError> {
    match mode {
        SystemMode::Recovery => {
            if coll_withdrawal > 0 {
                return Err(TroveError::CollWithdrawalInRecoveryMode);
            }
            if is_debt_increase {
                require_icr_is_above_ccr(new_icr)?;
                if new_icr < old_icr {
                    return Err(TroveError::IcrDecreaseInRecoveryMode);
                }
            }
            Ok(())
        }
        SystemMode::Normal => {
            require_icr_is_above_mcr(new_icr)?;
            require_new_tcr_is_above_ccr(new_tcr)
        }
    }
}

pub fn evaluate_liquidation_decision(mode: SystemMode, icr: Decimal) -> LiquidationDecision {
    let mcr = finance::mcr();
    match mode {
        SystemMode::Normal => {
            if icr < mcr {
                LiquidationDecision::Redistribute
            } else {
                LiquidationDecision::DoNothing
            }
        }
        SystemMode::Recovery => {
            if icr < mcr {
                LiquidationDecision::Redistribute
            } else if icr < finance::ccr() {
                LiquidationDecision::RedistributeCapped
            } else {
                LiquidationDecision::DoNothing
            }
        }
    }
}

pub fn get_coll_gas_compensation(entire_coll: u128) -> u128 {
    entire_coll / PERCENT_DIVISOR
}

pub fn calculate_liquidation_split(
    decision: LiquidationDecision,
    entire_coll: u128,
    entire_debt: u128,
    gas_compensation: u128,
    price: u128,
) -> Result<LiquidationSplit, TroveError> {
    let liquidated_coll = match decision {
        LiquidationDecision::DoNothing => return Err(TroveError::NothingToLiquidate),
        LiquidationDecision::Redistribute => entire_coll,
        LiquidationDecision::RedistributeCapped => {
            let capped = math::mul_div(entire_debt, MCR, price)?;
            u128::min(capped, entire_coll)
        }
    };

    let coll_gas_compensation = get_coll_gas_compensation(liquidated_coll);
    Ok(LiquidationSplit {
        coll_gas_compensation,
        debt_gas_compensation: gas_compensation,
        coll_to_redistribute: liquidated_coll - coll_gas_compensation,
        debt_to_redistribute: entire_debt,
        coll_surplus: entire_coll - liquidated_coll,
    })
}

/// `debt * 1e18 / price`, the collateral worth `debt` at `price`.
pub fn debt_to_coll(debt: u128, price: u128) -> Result<u128, TroveError> {
    math::mul_div(debt, DECIMAL_PRECISION, price)
}
