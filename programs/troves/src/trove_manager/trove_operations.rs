use anchor_lang::prelude::{msg, Pubkey};

use crate::{
    state::{SortedTroves, TroveStatus},
    utils::{coretypes::CheckedAssign, finance, math},
    GlobalConfig, Ledger, MarketState, PoolBalances, TroveError, Troves,
};

use super::{
    borrowing_rate::{self, BorrowSplit},
    liquidation_calcs::{self, SystemMode},
    redistribution,
    types::{
        AdjustTroveEffects, AdjustTroveParams, CloseTroveEffects, OpenTroveArgs, OpenTroveEffects,
    },
};

pub fn initialize_market(ledger: &mut Ledger, now: u64) -> Result<(), TroveError> {
    if ledger.market.is_initialized() {
        fail!(TroveError::MarketAlreadyInitialized);
    }
    ledger
        .sorted_troves
        .set_max_size(ledger.config.max_troves)?;
    ledger
        .market
        .initialize(now, ledger.config.redemption_bootstrap_period);
    Ok(())
}

pub fn open_trove(
    ledger: &mut Ledger,
    owner: Pubkey,
    args: &OpenTroveArgs,
    price: u128,
    now: u64,
) -> Result<OpenTroveEffects, TroveError> {
    let Ledger {
        market,
        troves,
        sorted_troves,
        config,
    } = ledger;

    if !config.is_borrowing_allowed {
        fail!(TroveError::BorrowingNotAllowed);
    }
    if owner == Pubkey::default() {
        fail!(TroveError::ZeroId);
    }
    if args.debt_amount == 0 {
        fail!(TroveError::ZeroAmountInvalid);
    }

    let (mode, _) = liquidation_calcs::calc_system_mode(market, price)?;
    borrowing_rate::require_valid_max_fee_percentage(args.max_fee_percentage, mode)?;

    if troves.is_active(&owner) {
        fail!(TroveError::TroveIsActive);
    }
    if sorted_troves.is_full() {
        fail!(TroveError::ListFull);
    }

    // no fee in recovery mode, borrowing is what gets the system out of it
    let split = match mode {
        SystemMode::Normal => borrowing_rate::trigger_borrowing_fee(
            market,
            args.debt_amount,
            args.max_fee_percentage,
            now,
        )?,
        SystemMode::Recovery => BorrowSplit {
            amount_to_borrow: args.debt_amount,
            fees_to_pay: 0,
        },
    };

    let net_debt = split.amount_to_borrow;
    liquidation_calcs::require_at_least_min_net_debt(net_debt, config.min_net_debt)?;
    let composite_debt = net_debt
        .checked_add(config.gas_compensation)
        .ok_or(TroveError::MathOverflow)?;
    require_within_debt_ceiling(market, config, composite_debt)?;
    liquidation_calcs::try_open(market, args.coll, composite_debt, mode, price)?;

    let nicr = math::compute_nominal_cr(args.coll, composite_debt);
    let stake = {
        let trove = troves.get_or_create(owner);
        trove.set_status(TroveStatus::Active);
        trove.coll = args.coll;
        trove.debt = composite_debt;
        redistribution::update_trove_reward_snapshots(market, trove);
        redistribution::update_stake_and_total_stakes(market, trove)?
    };

    {
        let nicr_of = redistribution::nicr_lookup(market, troves);
        sorted_troves.insert(owner, nicr, args.upper_hint, args.lower_hint, &nicr_of)?;
    }
    troves.add_owner(owner)?;
    market.num_troves_ever.checked_add_assign(1)?;
    market
        .active_pool
        .checked_add_assign(PoolBalances::new(args.coll, composite_debt))?;

    msg!(
        "Opened trove {} coll {} debt {} stake {} nicr {}",
        owner,
        args.coll,
        composite_debt,
        stake,
        nicr
    );

    Ok(OpenTroveEffects {
        coll_to_transfer_from_user: args.coll,
        amount_mint_to_user: args.debt_amount,
        amount_mint_to_fee_recipient: split.fees_to_pay,
        amount_mint_to_gas_pool: config.gas_compensation,
        composite_debt,
        stake,
        nicr,
    })
}

pub fn adjust_trove(
    ledger: &mut Ledger,
    owner: Pubkey,
    params: &AdjustTroveParams,
    price: u128,
    now: u64,
) -> Result<AdjustTroveEffects, TroveError> {
    let Ledger {
        market,
        troves,
        sorted_troves,
        config,
    } = ledger;

    let (mode, _) = liquidation_calcs::calc_system_mode(market, price)?;

    if params.is_debt_increase {
        borrowing_rate::require_valid_max_fee_percentage(params.max_fee_percentage, mode)?;
        if params.debt_change == 0 {
            fail!(TroveError::ZeroDebtChange);
        }
        if !config.is_borrowing_allowed {
            fail!(TroveError::BorrowingNotAllowed);
        }
    }
    if params.coll_deposit > 0 && params.coll_withdrawal > 0 {
        fail!(TroveError::SimultaneousCollChange);
    }
    if params.coll_deposit == 0 && params.coll_withdrawal == 0 && params.debt_change == 0 {
        fail!(TroveError::ZeroAdjustment);
    }
    if mode == SystemMode::Recovery && params.coll_withdrawal > 0 {
        fail!(TroveError::CollWithdrawalInRecoveryMode);
    }

    let trove = troves.active_mut(&owner)?;
    let pending_rewards = redistribution::apply_pending_rewards(market, trove)?;

    let fee = if params.is_debt_increase && mode == SystemMode::Normal {
        borrowing_rate::trigger_borrowing_fee(
            market,
            params.debt_change,
            params.max_fee_percentage,
            now,
        )?
        .fees_to_pay
    } else {
        0
    };
    let net_debt_change = params
        .debt_change
        .checked_add(fee)
        .ok_or(TroveError::MathOverflow)?;

    let (coll_change, is_coll_increase) = if params.coll_deposit > 0 {
        (params.coll_deposit, true)
    } else {
        (params.coll_withdrawal, false)
    };
    if !is_coll_increase && coll_change > trove.coll {
        fail!(TroveError::CollWithdrawalExceedsColl);
    }

    if !params.is_debt_increase && params.debt_change > 0 {
        let net_debt = trove
            .debt
            .checked_sub(config.gas_compensation)
            .ok_or(TroveError::MathOverflow)?;
        if params.debt_change > net_debt {
            fail!(TroveError::RepaymentExceedsDebt);
        }
        liquidation_calcs::require_at_least_min_net_debt(
            net_debt - params.debt_change,
            config.min_net_debt,
        )?;
    }

    let new_coll = apply_change(trove.coll, coll_change, is_coll_increase)?;
    let new_debt = apply_change(trove.debt, net_debt_change, params.is_debt_increase)?;

    let old_icr = finance::coll_ratio(trove.coll, trove.debt, price);
    let new_icr = finance::coll_ratio(new_coll, new_debt, price);
    let new_tcr = liquidation_calcs::calc_new_tcr(
        market,
        coll_change,
        is_coll_increase,
        net_debt_change,
        params.is_debt_increase,
        price,
    )?;
    liquidation_calcs::require_valid_adjustment_in_current_mode(
        mode,
        params.coll_withdrawal,
        params.is_debt_increase,
        old_icr,
        new_icr,
        new_tcr,
    )?;
    if params.is_debt_increase {
        require_within_debt_ceiling(market, config, net_debt_change)?;
    }

    trove.coll = new_coll;
    trove.debt = new_debt;
    let new_stake = redistribution::update_stake_and_total_stakes(market, trove)?;
    let new_nicr = math::compute_nominal_cr(new_coll, new_debt);

    {
        let nicr_of = redistribution::nicr_lookup(market, troves);
        sorted_troves.re_insert(
            owner,
            new_nicr,
            params.upper_hint,
            params.lower_hint,
            &nicr_of,
        )?;
    }

    market.active_pool.coll = apply_change(market.active_pool.coll, coll_change, is_coll_increase)?;
    market.active_pool.debt = apply_change(
        market.active_pool.debt,
        net_debt_change,
        params.is_debt_increase,
    )?;

    msg!(
        "Adjusted trove {} coll {} debt {} stake {} nicr {}",
        owner,
        new_coll,
        new_debt,
        new_stake,
        new_nicr
    );

    let (amount_mint_to_user, amount_to_burn_from_user) = if params.is_debt_increase {
        (params.debt_change, 0)
    } else {
        (0, params.debt_change)
    };

    Ok(AdjustTroveEffects {
        pending_rewards,
        coll_to_transfer_from_user: params.coll_deposit,
        coll_to_transfer_to_user: params.coll_withdrawal,
        amount_mint_to_user,
        amount_mint_to_fee_recipient: fee,
        amount_to_burn_from_user,
        new_coll,
        new_debt,
        new_stake,
    })
}

pub fn add_coll(
    ledger: &mut Ledger,
    owner: Pubkey,
    amount: u128,
    upper_hint: Option<Pubkey>,
    lower_hint: Option<Pubkey>,
    price: u128,
    now: u64,
) -> Result<AdjustTroveEffects, TroveError> {
    let params = AdjustTroveParams {
        coll_deposit: amount,
        upper_hint,
        lower_hint,
        ..AdjustTroveParams::default()
    };
    adjust_trove(ledger, owner, &params, price, now)
}

pub fn withdraw_coll(
    ledger: &mut Ledger,
    owner: Pubkey,
    amount: u128,
    upper_hint: Option<Pubkey>,
    lower_hint: Option<Pubkey>,
    price: u128,
    now: u64,
) -> Result<AdjustTroveEffects, TroveError> {
    let params = AdjustTroveParams {
        coll_withdrawal: amount,
        upper_hint,
        lower_hint,
        ..AdjustTroveParams::default()
    };
    adjust_trove(ledger, owner, &params, price, now)
}

#[allow(clippy::too_many_arguments)]
pub fn withdraw_debt(
    ledger: &mut Ledger,
    owner: Pubkey,
    amount: u128,
    max_fee_percentage: u128,
    upper_hint: Option<Pubkey>,
    lower_hint: Option<Pubkey>,
    price: u128,
    now: u64,
) -> Result<AdjustTroveEffects, TroveError> {
    let params = AdjustTroveParams {
        debt_change: amount,
        is_debt_increase: true,
        max_fee_percentage,
        upper_hint,
        lower_hint,
        ..AdjustTroveParams::default()
    };
    adjust_trove(ledger, owner, &params, price, now)
}

pub fn repay_debt(
    ledger: &mut Ledger,
    owner: Pubkey,
    amount: u128,
    upper_hint: Option<Pubkey>,
    lower_hint: Option<Pubkey>,
    price: u128,
    now: u64,
) -> Result<AdjustTroveEffects, TroveError> {
    let params = AdjustTroveParams {
        debt_change: amount,
        upper_hint,
        lower_hint,
        ..AdjustTroveParams::default()
    };
    adjust_trove(ledger, owner, &params, price, now)
}

pub fn close_trove(
    ledger: &mut Ledger,
    owner: Pubkey,
    price: u128,
) -> Result<CloseTroveEffects, TroveError> {
    let Ledger {
        market,
        troves,
        sorted_troves,
        config,
    } = ledger;

    let (mode, _) = liquidation_calcs::calc_system_mode(market, price)?;
    troves.active(&owner)?;
    if mode == SystemMode::Recovery {
        fail!(TroveError::OperationNotPermittedInRecoveryMode);
    }
    if troves.count() <= 1 {
        fail!(TroveError::OnlyOneTroveInSystem);
    }

    let trove = troves.active_mut(&owner)?;
    let pending_rewards = redistribution::apply_pending_rewards(market, trove)?;
    let coll = trove.coll;
    let debt = trove.debt;

    let new_tcr = liquidation_calcs::calc_new_tcr(market, coll, false, debt, false, price)?;
    liquidation_calcs::require_new_tcr_is_above_ccr(new_tcr)?;

    let amount_to_burn_from_user = debt
        .checked_sub(config.gas_compensation)
        .ok_or(TroveError::MathOverflow)?;

    redistribution::remove_stake(market, trove)?;
    close_trove_record(troves, sorted_troves, &owner, TroveStatus::ClosedByOwner)?;
    market
        .active_pool
        .checked_sub_assign(PoolBalances::new(coll, debt))?;

    msg!("Closed trove {} coll {} debt {}", owner, coll, debt);

    Ok(CloseTroveEffects {
        pending_rewards,
        coll_to_transfer_to_user: coll,
        amount_to_burn_from_user,
        amount_to_burn_from_gas_pool: config.gas_compensation,
    })
}

pub fn claim_collateral(market: &mut MarketState, amount: u128) -> Result<(), TroveError> {
    if amount == 0 {
        fail!(TroveError::NoCollateralToClaim);
    }
    market.surplus_coll.checked_sub_assign(amount)?;
    Ok(())
}

// The stake must already be removed.
pub(crate) fn close_trove_record(
    troves: &mut Troves,
    sorted_troves: &mut SortedTroves,
    owner: &Pubkey,
    closed_status: TroveStatus,
) -> Result<(), TroveError> {
    if troves.count() <= 1 {
        fail!(TroveError::OnlyOneTroveInSystem);
    }

    troves.remove_owner(owner)?;
    let trove = troves.active_mut(owner)?;
    trove.set_status(closed_status);
    trove.coll = 0;
    trove.debt = 0;
    trove.snapshot_coll = 0;
    trove.snapshot_debt = 0;

    sorted_troves.remove(owner)
}

fn require_within_debt_ceiling(
    market: &MarketState,
    config: &GlobalConfig,
    debt_increase: u128,
) -> Result<(), TroveError> {
    if config.debt_ceiling == 0 {
        return Ok(());
    }
    let system_debt = market
        .system_balances()?
        .debt
        .checked_add(debt_increase)
        .ok_or(TroveError::MathOverflow)?;
    if system_debt > config.debt_ceiling {
        fail!(TroveError::DebtCeilingExceeded);
    }
    Ok(())
}

fn apply_change(value: u128, change: u128, is_increase: bool) -> Result<u128, TroveError> {
    let res = if is_increase {
        value.checked_add(change)
    } else {
        value.checked_sub(change)
    };
    res.ok_or(TroveError::MathOverflow)
}
