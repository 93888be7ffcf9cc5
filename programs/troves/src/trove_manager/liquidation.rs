use anchor_lang::prelude::{msg, Pubkey};
use decimal_wad::decimal::Decimal;

use crate::{
    state::{SortedTroves, TroveStatus},
    utils::{coretypes::CheckedAssign, finance},
    GlobalConfig, Ledger, MarketState, PoolBalances, TroveError, Troves,
};

use super::{
    liquidation_calcs::{self, LiquidationDecision, SystemMode},
    redistribution, trove_operations,
    types::{BatchLiquidationEffects, LiquidationEffects, LiquidationTotals},
};

pub fn liquidate(
    ledger: &mut Ledger,
    owner: Pubkey,
    price: u128,
) -> Result<LiquidationEffects, TroveError> {
    let Ledger {
        market,
        troves,
        sorted_troves,
        config,
    } = ledger;

    let (mode, tcr) = liquidation_calcs::calc_system_mode(market, price)?;
    msg!("Liquidating {} in {:?} mode, TCR {:?}", owner, mode, tcr);
    liquidate_single(market, troves, sorted_troves, config, owner, mode, price)
}

pub fn batch_liquidate_troves(
    ledger: &mut Ledger,
    price: u128,
    max_iterations: u64,
) -> Result<BatchLiquidationEffects, TroveError> {
    let Ledger {
        market,
        troves,
        sorted_troves,
        config,
    } = ledger;

    let mut effects = BatchLiquidationEffects::default();
    for _ in 0..max_iterations {
        let candidate = next_liquidation_candidate(market, troves, sorted_troves, price)?;
        let (owner, mode) = match candidate {
            Some(candidate) => candidate,
            None => break,
        };
        effects.push(liquidate_single(
            market,
            troves,
            sorted_troves,
            config,
            owner,
            mode,
            price,
        )?);
    }

    if effects.liquidated.is_empty() {
        fail!(TroveError::NothingToLiquidate);
    }
    msg!(
        "Batch liquidated {} troves, totals {:?}",
        effects.liquidated.len(),
        effects.totals
    );
    Ok(effects)
}

pub fn liquidate_troves_by_id(
    ledger: &mut Ledger,
    owners: &[Pubkey],
    price: u128,
) -> Result<BatchLiquidationEffects, TroveError> {
    let Ledger {
        market,
        troves,
        sorted_troves,
        config,
    } = ledger;

    let mut effects = BatchLiquidationEffects::default();
    'owners: for owner in owners {
        if troves.count() <= 1 {
            break;
        }
        let trove = some_or_continue!(troves.get(owner).filter(|t| t.is_active()), 'owners);

        let (mode, _) = liquidation_calcs::calc_system_mode(market, price)?;
        let icr = Decimal::from_scaled_val(redistribution::get_current_icr(market, trove, price)?);
        let decision = liquidation_calcs::evaluate_liquidation_decision(mode, icr);
        if decision == LiquidationDecision::DoNothing {
            continue;
        }

        effects.push(liquidate_single(
            market,
            troves,
            sorted_troves,
            config,
            *owner,
            mode,
            price,
        )?);
    }

    if effects.liquidated.is_empty() {
        fail!(TroveError::NothingToLiquidate);
    }
    Ok(effects)
}

fn next_liquidation_candidate(
    market: &MarketState,
    troves: &Troves,
    sorted_troves: &SortedTroves,
    price: u128,
) -> Result<Option<(Pubkey, SystemMode)>, TroveError> {
    if troves.count() <= 1 {
        return Ok(None);
    }
    let owner = match sorted_troves.last() {
        Some(owner) => owner,
        None => return Ok(None),
    };

    let (mode, _) = liquidation_calcs::calc_system_mode(market, price)?;
    let trove = troves.get(&owner).ok_or(TroveError::MissingTroveRecord)?;
    let icr = Decimal::from_scaled_val(redistribution::get_current_icr(market, trove, price)?);
    match liquidation_calcs::evaluate_liquidation_decision(mode, icr) {
        LiquidationDecision::DoNothing => Ok(None),
        _ => Ok(Some((owner, mode))),
    }
}

fn liquidate_single(
    market: &mut MarketState,
    troves: &mut Troves,
    sorted_troves: &mut SortedTroves,
    config: &GlobalConfig,
    owner: Pubkey,
    mode: SystemMode,
    price: u128,
) -> Result<LiquidationEffects, TroveError> {
    let trove = troves.active(&owner)?;
    if troves.count() <= 1 {
        fail!(TroveError::OnlyOneTroveInSystem);
    }

    let entire = redistribution::get_entire_debt_and_coll(market, trove)?;
    let icr = finance::coll_ratio(entire.coll, entire.debt, price);
    let decision = liquidation_calcs::evaluate_liquidation_decision(mode, icr);
    let split = liquidation_calcs::calculate_liquidation_split(
        decision,
        entire.coll,
        entire.debt,
        config.gas_compensation,
        price,
    )?;

    let pending_rewards = PoolBalances::new(entire.pending_coll_reward, entire.pending_debt_reward);
    redistribution::move_pending_rewards_to_active_pool(market, pending_rewards)?;
    redistribution::remove_stake(market, troves.active_mut(&owner)?)?;
    redistribution::redistribute(market, split.coll_to_redistribute, split.debt_to_redistribute)?;

    if split.coll_surplus > 0 {
        market.active_pool.coll.checked_sub_assign(split.coll_surplus)?;
        market.surplus_coll.checked_add_assign(split.coll_surplus)?;
    }

    trove_operations::close_trove_record(
        troves,
        sorted_troves,
        &owner,
        TroveStatus::ClosedByLiquidation,
    )?;
    redistribution::update_system_snapshots_exclude_coll_remainder(
        market,
        split.coll_gas_compensation,
    )?;
    // paid out to the liquidator
    market
        .active_pool
        .coll
        .checked_sub_assign(split.coll_gas_compensation)?;

    let totals = LiquidationTotals {
        coll_gas_compensation: split.coll_gas_compensation,
        debt_gas_compensation: split.debt_gas_compensation,
        coll_redistributed: split.coll_to_redistribute,
        debt_redistributed: split.debt_to_redistribute,
        coll_surplus: split.coll_surplus,
    };
    msg!("Liquidation effects {} {:?} {:?}", owner, decision, totals);

    Ok(LiquidationEffects {
        owner,
        pending_rewards,
        totals,
    })
}
