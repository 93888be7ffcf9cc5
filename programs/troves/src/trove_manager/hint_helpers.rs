use num::integer::Roots;
use rand::Rng;

use crate::{
    utils::math,
    Ledger, TroveError,
};

use super::{
    liquidation_calcs, redemption, redistribution,
    types::{ApproxHint, RedemptionHints},
};

pub use crate::utils::math::{compute_cr, compute_nominal_cr};

pub fn get_approx_hint<R: Rng>(
    ledger: &Ledger,
    nicr: u128,
    num_trials: u64,
    rng: &mut R,
) -> Result<ApproxHint, TroveError> {
    let Ledger {
        market,
        troves,
        sorted_troves,
        ..
    } = ledger;

    let count = troves.count();
    let tail = match sorted_troves.last() {
        Some(tail) if count > 0 => tail,
        _ => return Ok(ApproxHint::default()),
    };

    let nicr_of = redistribution::nicr_lookup(market, troves);
    let mut hint = ApproxHint {
        hint: Some(tail),
        diff: math::abs_diff(nicr_of(&tail), nicr),
    };

    for _ in 0..num_trials {
        let index = rng.gen_range(0, count);
        let owner = troves
            .owner_at(index)
            .ok_or(TroveError::MissingTroveRecord)?;
        let diff = math::abs_diff(nicr_of(&owner), nicr);
        if diff < hint.diff {
            hint = ApproxHint {
                hint: Some(owner),
                diff,
            };
        }
    }
    Ok(hint)
}

pub fn recommended_num_trials(num_troves: u64) -> u64 {
    let root = num_troves.sqrt();
    if root * root < num_troves {
        root + 1
    } else {
        root
    }
}

pub fn get_redemption_hints(
    ledger: &Ledger,
    amount: u128,
    price: u128,
    max_iterations: u64,
) -> Result<RedemptionHints, TroveError> {
    let Ledger {
        market,
        troves,
        sorted_troves,
        config,
    } = ledger;

    let first_redemption_hint =
        redemption::first_redeemable_from_tail(market, troves, sorted_troves, price)?;

    let mut current = first_redemption_hint;
    let mut remaining = amount;
    let mut partial_redemption_hint_nicr = 0;
    let mut iterations_left = if max_iterations == 0 {
        u64::MAX
    } else {
        max_iterations
    };

    while let Some(owner) = current {
        if remaining == 0 || iterations_left == 0 {
            break;
        }
        iterations_left -= 1;

        let trove = troves.get(&owner).ok_or(TroveError::MissingTroveRecord)?;
        let entire = redistribution::get_entire_debt_and_coll(market, trove)?;
        let net_debt = entire
            .debt
            .checked_sub(config.gas_compensation)
            .ok_or(TroveError::MathOverflow)?;

        if net_debt > remaining {
            if net_debt > config.min_net_debt {
                let max_redeemable = u128::min(remaining, net_debt - config.min_net_debt);
                let new_coll = entire
                    .coll
                    .checked_sub(liquidation_calcs::debt_to_coll(max_redeemable, price)?)
                    .ok_or(TroveError::MathOverflow)?;
                let new_debt = (net_debt - max_redeemable)
                    .checked_add(config.gas_compensation)
                    .ok_or(TroveError::MathOverflow)?;
                partial_redemption_hint_nicr = math::compute_nominal_cr(new_coll, new_debt);
                remaining -= max_redeemable;
            }
            break;
        }

        remaining -= net_debt;
        current = sorted_troves.prev(&owner);
    }

    Ok(RedemptionHints {
        first_redemption_hint,
        partial_redemption_hint_nicr,
        truncated_amount: amount - remaining,
    })
}
