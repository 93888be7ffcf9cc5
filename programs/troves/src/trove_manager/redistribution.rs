use anchor_lang::prelude::{msg, Pubkey};

use crate::{
    utils::{consts::DECIMAL_PRECISION, coretypes::CheckedAssign, math},
    MarketState, PoolBalances, TroveData, TroveError, Troves,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntireDebtAndColl {
    pub debt: u128,
    pub coll: u128,
    pub pending_debt_reward: u128,
    pub pending_coll_reward: u128,
}

// Returns what moved from the default pool to the active pool.
pub fn apply_pending_rewards(
    market: &mut MarketState,
    trove: &mut TroveData,
) -> Result<PoolBalances, TroveError> {
    if !trove.is_active() {
        return Err(TroveError::RewardsOnInactiveTrove);
    }

    let mut pending = PoolBalances::default();
    if has_pending_rewards(market, trove) {
        pending = PoolBalances::new(
            get_pending_coll_reward(market, trove)?,
            get_pending_debt_reward(market, trove)?,
        );
        trove.coll.checked_add_assign(pending.coll)?;
        trove.debt.checked_add_assign(pending.debt)?;
    }

    update_trove_reward_snapshots(market, trove);

    if !pending.is_zero() {
        move_pending_rewards_to_active_pool(market, pending)?;
    }
    Ok(pending)
}

pub fn has_pending_rewards(market: &MarketState, trove: &TroveData) -> bool {
    trove.is_active()
        && (trove.snapshot_coll < market.l_coll || trove.snapshot_debt < market.l_debt)
}

pub fn get_pending_coll_reward(
    market: &MarketState,
    trove: &TroveData,
) -> Result<u128, TroveError> {
    pending_reward(market.l_coll, trove.snapshot_coll, trove)
}

pub fn get_pending_debt_reward(
    market: &MarketState,
    trove: &TroveData,
) -> Result<u128, TroveError> {
    pending_reward(market.l_debt, trove.snapshot_debt, trove)
}

fn pending_reward(l: u128, snapshot: u128, trove: &TroveData) -> Result<u128, TroveError> {
    if !trove.is_active() {
        return Ok(0);
    }
    let reward_per_unit_staked = l.checked_sub(snapshot).ok_or(TroveError::MathOverflow)?;
    if reward_per_unit_staked == 0 {
        return Ok(0);
    }
    math::mul_div(trove.stake, reward_per_unit_staked, DECIMAL_PRECISION)
}

pub fn get_entire_debt_and_coll(
    market: &MarketState,
    trove: &TroveData,
) -> Result<EntireDebtAndColl, TroveError> {
    let pending_coll_reward = get_pending_coll_reward(market, trove)?;
    let pending_debt_reward = get_pending_debt_reward(market, trove)?;
    Ok(EntireDebtAndColl {
        coll: trove
            .coll
            .checked_add(pending_coll_reward)
            .ok_or(TroveError::MathOverflow)?,
        debt: trove
            .debt
            .checked_add(pending_debt_reward)
            .ok_or(TroveError::MathOverflow)?,
        pending_coll_reward,
        pending_debt_reward,
    })
}

pub fn get_nominal_icr(market: &MarketState, trove: &TroveData) -> Result<u128, TroveError> {
    let entire = get_entire_debt_and_coll(market, trove)?;
    Ok(math::compute_nominal_cr(entire.coll, entire.debt))
}

pub fn get_current_icr(
    market: &MarketState,
    trove: &TroveData,
    price: u128,
) -> Result<u128, TroveError> {
    let entire = get_entire_debt_and_coll(market, trove)?;
    Ok(math::compute_cr(entire.coll, entire.debt, price))
}

// Unknown owners read as zero, overflowing balances saturate.
pub fn nicr_lookup<'a>(
    market: &'a MarketState,
    troves: &'a Troves,
) -> impl Fn(&Pubkey) -> u128 + 'a {
    move |owner| {
        troves
            .get(owner)
            .map(|trove| saturating_nominal_icr(market, trove))
            .unwrap_or(0)
    }
}

fn saturating_nominal_icr(market: &MarketState, trove: &TroveData) -> u128 {
    if let Ok(nicr) = get_nominal_icr(market, trove) {
        return nicr;
    }
    let pending = |l: u128, snapshot: u128| {
        if !trove.is_active() {
            return 0;
        }
        math::mul_div_saturating(trove.stake, l.saturating_sub(snapshot), DECIMAL_PRECISION)
    };
    let coll = trove
        .coll
        .saturating_add(pending(market.l_coll, trove.snapshot_coll));
    let debt = trove
        .debt
        .saturating_add(pending(market.l_debt, trove.snapshot_debt));
    math::compute_nominal_cr(coll, debt)
}

pub fn update_trove_reward_snapshots(market: &MarketState, trove: &mut TroveData) {
    trove.snapshot_coll = market.l_coll;
    trove.snapshot_debt = market.l_debt;
}

pub fn update_stake_and_total_stakes(
    market: &mut MarketState,
    trove: &mut TroveData,
) -> Result<u128, TroveError> {
    let new_stake = compute_new_stake(market, trove.coll)?;
    let old_stake = trove.stake;
    trove.stake = new_stake;

    market.total_stakes.checked_sub_assign(old_stake)?;
    market.total_stakes.checked_add_assign(new_stake)?;
    Ok(new_stake)
}

// Before the first liquidation stake equals collateral. Afterwards the
// snapshot ratio keeps new stakes from diluting rewards already earned.
fn compute_new_stake(market: &MarketState, coll: u128) -> Result<u128, TroveError> {
    if market.total_collateral_snapshot == 0 {
        return Ok(coll);
    }
    if market.total_stakes_snapshot == 0 {
        return Err(TroveError::ZeroTotalStakes);
    }
    math::mul_div(
        coll,
        market.total_stakes_snapshot,
        market.total_collateral_snapshot,
    )
}

pub fn remove_stake(market: &mut MarketState, trove: &mut TroveData) -> Result<(), TroveError> {
    market.total_stakes.checked_sub_assign(trove.stake)?;
    trove.stake = 0;
    Ok(())
}

pub fn redistribute(
    market: &mut MarketState,
    coll: u128,
    debt: u128,
) -> Result<PoolBalances, TroveError> {
    if debt == 0 {
        return Ok(PoolBalances::default());
    }
    if market.total_stakes == 0 {
        return Err(TroveError::ZeroTotalStakes);
    }

    let (coll_reward_per_unit_staked, coll_error) = math::split_per_unit_staked(
        coll,
        market.last_coll_error_redistribution,
        market.total_stakes,
    )?;
    let (debt_reward_per_unit_staked, debt_error) = math::split_per_unit_staked(
        debt,
        market.last_debt_error_redistribution,
        market.total_stakes,
    )?;

    market.last_coll_error_redistribution = coll_error;
    market.last_debt_error_redistribution = debt_error;
    market.l_coll.checked_add_assign(coll_reward_per_unit_staked)?;
    market.l_debt.checked_add_assign(debt_reward_per_unit_staked)?;

    let moved = PoolBalances::new(coll, debt);
    market.active_pool.checked_sub_assign(moved)?;
    market.default_pool.checked_add_assign(moved)?;

    msg!(
        "Redistributed coll {} debt {} over stakes {}, L_coll {} L_debt {}",
        coll,
        debt,
        market.total_stakes,
        market.l_coll,
        market.l_debt
    );
    Ok(moved)
}

pub fn move_pending_rewards_to_active_pool(
    market: &mut MarketState,
    pending: PoolBalances,
) -> Result<(), TroveError> {
    market.default_pool.checked_sub_assign(pending)?;
    market.active_pool.checked_add_assign(pending)?;
    Ok(())
}

// coll_remainder is the gas compensation still sitting in the active pool.
pub fn update_system_snapshots_exclude_coll_remainder(
    market: &mut MarketState,
    coll_remainder: u128,
) -> Result<(), TroveError> {
    market.total_stakes_snapshot = market.total_stakes;

    let active_coll = market
        .active_pool
        .coll
        .checked_sub(coll_remainder)
        .ok_or(TroveError::MathOverflow)?;
    market.total_collateral_snapshot = active_coll
        .checked_add(market.default_pool.coll)
        .ok_or(TroveError::MathOverflow)?;
    Ok(())
}
