use decimal_wad::decimal::Decimal;

use super::{
    consts::{CCR_PERCENT, MCR_PERCENT},
    math,
};

/// Collateral ratio as a decimal, a debt free position reports the largest
/// representable ratio.
pub fn coll_ratio(coll: u128, debt: u128, price: u128) -> Decimal {
    Decimal::from_scaled_val(math::compute_cr(coll, debt, price))
}

pub fn mcr() -> Decimal {
    Decimal::from_percent(MCR_PERCENT)
}

pub fn ccr() -> Decimal {
    Decimal::from_percent(CCR_PERCENT)
}
