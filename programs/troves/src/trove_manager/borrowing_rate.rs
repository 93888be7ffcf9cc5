use decimal_wad::{common::TryDiv, decimal::Decimal};

use crate::{
    utils::{
        consts::{
            BETA, BORROWING_FEE_FLOOR, DECIMAL_PRECISION, MAX_BORROWING_FEE, MINUTE_DECAY_FACTOR,
            REDEMPTION_FEE_FLOOR, SECONDS_PER_MINUTE,
        },
        math,
    },
    MarketState, TroveError,
};
use anchor_lang::prelude::msg;

use super::liquidation_calcs::SystemMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowSplit {
    // net debt of the trove, requested amount plus the fee
    pub amount_to_borrow: u128,
    pub fees_to_pay: u128,
}

impl BorrowSplit {
    pub fn split_fees(
        requested_amount: u128,
        borrowing_rate: u128,
    ) -> Result<BorrowSplit, TroveError> {
        let fee = math::mul_div(requested_amount, borrowing_rate, DECIMAL_PRECISION)?;
        Ok(BorrowSplit {
            amount_to_borrow: requested_amount
                .checked_add(fee)
                .ok_or(TroveError::MathOverflow)?,
            fees_to_pay: fee,
        })
    }
}

pub(crate) enum FeeEvent {
    Borrowing,
    Redemption {
        coll_drawn: u128,
        price: u128,
        total_debt_supply: u128,
    },
}

pub(crate) fn refresh_base_rate(
    market: &mut MarketState,
    event: FeeEvent,
    now: u64,
) -> Result<(), TroveError> {
    let mut new_rate =
        calc_decayed_base_rate(market.base_rate, market.last_fee_operation_time, now)?;
    if let FeeEvent::Redemption {
        coll_drawn,
        price,
        total_debt_supply,
    } = event
    {
        new_rate = increase_base_rate(new_rate, coll_drawn, price, total_debt_supply)?;
    }

    market.base_rate = new_rate;
    update_last_fee_operation_time(market, now);
    Ok(())
}

pub fn decay_base_rate_from_borrowing(
    market: &mut MarketState,
    now: u64,
) -> Result<(), TroveError> {
    refresh_base_rate(market, FeeEvent::Borrowing, now)
}

pub fn update_base_rate_from_redemption(
    market: &mut MarketState,
    coll_drawn: u128,
    price: u128,
    total_debt_supply: u128,
    now: u64,
) -> Result<u128, TroveError> {
    refresh_base_rate(
        market,
        FeeEvent::Redemption {
            coll_drawn,
            price,
            total_debt_supply,
        },
        now,
    )?;
    Ok(market.base_rate)
}

pub fn calc_decayed_base_rate(
    base_rate: u128,
    last_fee_operation_time: u64,
    now: u64,
) -> Result<u128, TroveError> {
    let minutes = minutes_passed_since(last_fee_operation_time, now);
    let decay_factor = math::dec_pow(MINUTE_DECAY_FACTOR, minutes)?;
    math::mul_div(base_rate, decay_factor, DECIMAL_PRECISION)
}

fn increase_base_rate(
    decayed_base_rate: u128,
    coll_drawn: u128,
    price: u128,
    total_debt_supply: u128,
) -> Result<u128, TroveError> {
    if total_debt_supply == 0 {
        return Err(TroveError::ZeroAmountInvalid);
    }
    let redeemed_debt_fraction = math::mul_div(coll_drawn, price, total_debt_supply)?;
    let new_base_rate = decayed_base_rate
        .checked_add(redeemed_debt_fraction / BETA)
        .ok_or(TroveError::MathOverflow)?;
    Ok(new_base_rate.min(DECIMAL_PRECISION))
}

fn minutes_passed_since(last_fee_operation_time: u64, now: u64) -> u64 {
    // cannot be negative
    now.saturating_sub(last_fee_operation_time) / SECONDS_PER_MINUTE
}

// The clock only moves on whole minutes, otherwise frequent operations
// would keep the rate from ever decaying.
fn update_last_fee_operation_time(market: &mut MarketState, now: u64) {
    if now.saturating_sub(market.last_fee_operation_time) >= SECONDS_PER_MINUTE {
        market.last_fee_operation_time = now;
    }
}

pub fn calc_borrowing_rate(base_rate: u128) -> u128 {
    // between 0.5% and 5%
    u128::min(u128::max(BORROWING_FEE_FLOOR, base_rate), MAX_BORROWING_FEE)
}

pub fn calc_redemption_rate(base_rate: u128) -> u128 {
    // between 0.5% and 100%
    u128::min(
        REDEMPTION_FEE_FLOOR.saturating_add(base_rate),
        DECIMAL_PRECISION,
    )
}

pub fn get_borrowing_rate(market: &MarketState) -> u128 {
    calc_borrowing_rate(market.base_rate)
}

pub fn get_borrowing_rate_with_decay(market: &MarketState, now: u64) -> Result<u128, TroveError> {
    let decayed = calc_decayed_base_rate(market.base_rate, market.last_fee_operation_time, now)?;
    Ok(calc_borrowing_rate(decayed))
}

pub fn get_borrowing_fee_with_decay(
    market: &MarketState,
    debt: u128,
    now: u64,
) -> Result<u128, TroveError> {
    math::mul_div(get_borrowing_rate_with_decay(market, now)?, debt, DECIMAL_PRECISION)
}

pub fn get_redemption_rate(market: &MarketState) -> u128 {
    calc_redemption_rate(market.base_rate)
}

pub fn get_redemption_rate_with_decay(market: &MarketState, now: u64) -> Result<u128, TroveError> {
    let decayed = calc_decayed_base_rate(market.base_rate, market.last_fee_operation_time, now)?;
    Ok(calc_redemption_rate(decayed))
}

pub fn get_redemption_fee(market: &MarketState, coll_drawn: u128) -> Result<u128, TroveError> {
    let fee = math::mul_div(get_redemption_rate(market), coll_drawn, DECIMAL_PRECISION)?;
    if fee >= coll_drawn {
        return Err(TroveError::RedemptionFeeTooLarge);
    }
    Ok(fee)
}

pub fn get_redemption_fee_with_decay(
    market: &MarketState,
    coll_drawn: u128,
    now: u64,
) -> Result<u128, TroveError> {
    math::mul_div(
        get_redemption_rate_with_decay(market, now)?,
        coll_drawn,
        DECIMAL_PRECISION,
    )
}

pub fn trigger_borrowing_fee(
    market: &mut MarketState,
    debt_amount: u128,
    max_fee_percentage: u128,
    now: u64,
) -> Result<BorrowSplit, TroveError> {
    decay_base_rate_from_borrowing(market, now)?;
    let split = BorrowSplit::split_fees(debt_amount, get_borrowing_rate(market))?;
    require_user_accepts_fee(split.fees_to_pay, debt_amount, max_fee_percentage)?;
    msg!(
        "Borrowing fee {} on {} at base rate {}",
        split.fees_to_pay,
        debt_amount,
        market.base_rate
    );
    Ok(split)
}

pub fn require_user_accepts_fee(
    fee: u128,
    amount: u128,
    max_fee_percentage: u128,
) -> Result<(), TroveError> {
    if amount == 0 {
        return Ok(());
    }
    let fee_percentage = Decimal::from_scaled_val(fee).try_div(Decimal::from_scaled_val(amount))?;
    if fee_percentage > Decimal::from_scaled_val(max_fee_percentage) {
        return Err(TroveError::ExcessiveFee);
    }
    Ok(())
}

pub fn require_valid_max_fee_percentage(
    max_fee_percentage: u128,
    mode: SystemMode,
) -> Result<(), TroveError> {
    let valid = match mode {
        SystemMode::Recovery => max_fee_percentage <= DECIMAL_PRECISION,
        SystemMode::Normal => {
            max_fee_percentage >= BORROWING_FEE_FLOOR && max_fee_percentage <= DECIMAL_PRECISION
        }
    };
    if !valid {
        return Err(TroveError::InvalidMaxFeePercentage);
    }
    Ok(())
}
