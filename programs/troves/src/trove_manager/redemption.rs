use anchor_lang::prelude::{msg, Pubkey};

use crate::{
    state::{SortedTroves, TroveStatus},
    utils::{
        consts::{DECIMAL_PRECISION, MCR, REDEMPTION_FEE_FLOOR},
        coretypes::CheckedAssign,
        finance, math,
    },
    GlobalConfig, Ledger, MarketState, PoolBalances, TroveError, Troves,
};

use super::{
    borrowing_rate, liquidation_calcs, redistribution, trove_operations,
    types::{RedeemCollateralArgs, RedemptionEffects},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SingleRedemption {
    debt_lot: u128,
    coll_lot: u128,
    closed: bool,
    coll_surplus: u128,
    cancelled_partial: bool,
}

pub fn redeem_collateral(
    ledger: &mut Ledger,
    redeemer: Pubkey,
    args: &RedeemCollateralArgs,
    price: u128,
    total_debt_supply: u128,
    redeemer_balance: u128,
    now: u64,
) -> Result<RedemptionEffects, TroveError> {
    let Ledger {
        market,
        troves,
        sorted_troves,
        config,
    } = ledger;

    if args.max_fee_percentage < REDEMPTION_FEE_FLOOR
        || args.max_fee_percentage > DECIMAL_PRECISION
    {
        fail!(TroveError::InvalidMaxFeePercentage);
    }
    if now < market.redemption_bootstrap_end {
        fail!(TroveError::CannotRedeemDuringBootstrapPeriod);
    }
    let (_, tcr) = liquidation_calcs::calc_system_mode(market, price)?;
    if tcr < finance::mcr() {
        fail!(TroveError::TcrBelowMcr);
    }
    if args.amount == 0 {
        fail!(TroveError::ZeroAmountInvalid);
    }
    if redeemer_balance < args.amount {
        fail!(TroveError::InsufficientDebtBalance);
    }

    let mut current = if is_valid_first_redemption_hint(
        market,
        troves,
        sorted_troves,
        args.first_redemption_hint,
        price,
    )? {
        args.first_redemption_hint
    } else {
        first_redeemable_from_tail(market, troves, sorted_troves, price)?
    };

    let mut effects = RedemptionEffects::default();
    let mut remaining = args.amount;
    let mut total_coll_drawn: u128 = 0;
    let mut iterations_left = if args.max_iterations == 0 {
        u64::MAX
    } else {
        args.max_iterations
    };

    while let Some(owner) = current {
        if remaining == 0 || iterations_left == 0 {
            break;
        }
        iterations_left -= 1;
        // the trove may be unlinked below
        let next_owner = sorted_troves.prev(&owner);

        let pending = redistribution::apply_pending_rewards(market, troves.active_mut(&owner)?)?;
        effects.pending_rewards.checked_add_assign(pending)?;

        let single = redeem_collateral_from_trove(
            market,
            troves,
            sorted_troves,
            config,
            owner,
            remaining,
            price,
            args,
        )?;
        if single.cancelled_partial {
            break;
        }

        effects
            .debt_to_burn_from_redeemer
            .checked_add_assign(single.debt_lot)?;
        total_coll_drawn.checked_add_assign(single.coll_lot)?;
        remaining.checked_sub_assign(single.debt_lot)?;
        if single.closed {
            effects
                .debt_to_burn_from_gas_pool
                .checked_add_assign(config.gas_compensation)?;
            if single.coll_surplus > 0 {
                effects.surplus.push((owner, single.coll_surplus));
            }
        }

        current = next_owner;
    }

    if total_coll_drawn == 0 {
        fail!(TroveError::UnableToRedeem);
    }

    borrowing_rate::update_base_rate_from_redemption(
        market,
        total_coll_drawn,
        price,
        total_debt_supply,
        now,
    )?;
    let fee = borrowing_rate::get_redemption_fee(market, total_coll_drawn)?;
    borrowing_rate::require_user_accepts_fee(fee, total_coll_drawn, args.max_fee_percentage)?;

    market.active_pool.checked_sub_assign(PoolBalances::new(
        total_coll_drawn,
        effects.debt_to_burn_from_redeemer,
    ))?;

    effects.coll_fee_to_fee_recipient = fee;
    effects.coll_to_transfer_to_redeemer = total_coll_drawn - fee;

    msg!(
        "Redeemed {} of {} for {} coll, fee {}, redeemer {}",
        effects.debt_to_burn_from_redeemer,
        args.amount,
        total_coll_drawn,
        fee,
        redeemer
    );
    Ok(effects)
}

#[allow(clippy::too_many_arguments)]
fn redeem_collateral_from_trove(
    market: &mut MarketState,
    troves: &mut Troves,
    sorted_troves: &mut SortedTroves,
    config: &GlobalConfig,
    owner: Pubkey,
    max_debt: u128,
    price: u128,
    args: &RedeemCollateralArgs,
) -> Result<SingleRedemption, TroveError> {
    let trove = troves.active(&owner)?;
    let net_debt = trove
        .debt
        .checked_sub(config.gas_compensation)
        .ok_or(TroveError::MathOverflow)?;

    let debt_lot = u128::min(max_debt, net_debt);
    let coll_lot = liquidation_calcs::debt_to_coll(debt_lot, price)?;
    let new_debt = trove.debt - debt_lot;
    let new_coll = trove
        .coll
        .checked_sub(coll_lot)
        .ok_or(TroveError::MathOverflow)?;

    if new_debt == config.gas_compensation {
        redistribution::remove_stake(market, troves.active_mut(&owner)?)?;
        trove_operations::close_trove_record(
            troves,
            sorted_troves,
            &owner,
            TroveStatus::ClosedByRedemption,
        )?;
        // gas compensation is burned from the gas pool, the rest of the
        // collateral waits in the surplus pool
        market
            .active_pool
            .checked_sub_assign(PoolBalances::new(new_coll, config.gas_compensation))?;
        market.surplus_coll.checked_add_assign(new_coll)?;

        return Ok(SingleRedemption {
            debt_lot,
            coll_lot,
            closed: true,
            coll_surplus: new_coll,
            cancelled_partial: false,
        });
    }

    // A stale hint or a dust sized leftover would make the re-insertion
    // expensive or leave an unliquidatable trove behind.
    let new_nicr = math::compute_nominal_cr(new_coll, new_debt);
    if new_nicr != args.partial_redemption_hint_nicr
        || new_debt - config.gas_compensation < config.min_net_debt
    {
        return Ok(SingleRedemption {
            cancelled_partial: true,
            ..SingleRedemption::default()
        });
    }

    {
        let nicr_of = redistribution::nicr_lookup(market, troves);
        sorted_troves.re_insert(
            owner,
            new_nicr,
            args.upper_partial_redemption_hint,
            args.lower_partial_redemption_hint,
            &nicr_of,
        )?;
    }

    let trove = troves.active_mut(&owner)?;
    trove.debt = new_debt;
    trove.coll = new_coll;
    redistribution::update_stake_and_total_stakes(market, trove)?;

    Ok(SingleRedemption {
        debt_lot,
        coll_lot,
        ..SingleRedemption::default()
    })
}

fn current_icr_of(
    market: &MarketState,
    troves: &Troves,
    owner: &Pubkey,
    price: u128,
) -> Result<u128, TroveError> {
    let trove = troves.get(owner).ok_or(TroveError::MissingTroveRecord)?;
    redistribution::get_current_icr(market, trove, price)
}

pub fn is_valid_first_redemption_hint(
    market: &MarketState,
    troves: &Troves,
    sorted_troves: &SortedTroves,
    hint: Option<Pubkey>,
    price: u128,
) -> Result<bool, TroveError> {
    let hint = match hint {
        Some(hint) if sorted_troves.contains(&hint) => hint,
        _ => return Ok(false),
    };
    if current_icr_of(market, troves, &hint, price)? < MCR {
        return Ok(false);
    }
    match sorted_troves.next(&hint) {
        None => Ok(true),
        Some(next) => Ok(current_icr_of(market, troves, &next, price)? < MCR),
    }
}

pub fn first_redeemable_from_tail(
    market: &MarketState,
    troves: &Troves,
    sorted_troves: &SortedTroves,
    price: u128,
) -> Result<Option<Pubkey>, TroveError> {
    for owner in sorted_troves.iter_from_tail() {
        if current_icr_of(market, troves, &owner, price)? >= MCR {
            return Ok(Some(owner));
        }
    }
    Ok(None)
}
