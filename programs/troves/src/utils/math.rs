use crate::{
    utils::{
        bn::U256,
        consts::{DECIMAL_PRECISION, HALF, MAX_DECAY_MINUTES, NICR_PRECISION},
    },
    TroveError,
};

/// `a * b / c` floored, with a 256 bit intermediate product.
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<u128, TroveError> {
    if c == 0 {
        return Err(TroveError::MathOverflow);
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(TroveError::MathOverflow)?;
    to_u128(product / U256::from(c))
}

pub fn mul_div_saturating(a: u128, b: u128, c: u128) -> u128 {
    if c == 0 {
        return u128::MAX;
    }
    let res = U256::from(a) * U256::from(b) / U256::from(c);
    if res > U256::from(u128::MAX) {
        u128::MAX
    } else {
        res.as_u128()
    }
}

pub fn to_u128(value: U256) -> Result<u128, TroveError> {
    if value > U256::from(u128::MAX) {
        return Err(TroveError::MathOverflow);
    }
    Ok(value.as_u128())
}

/// Fixed point multiplication over 1e18, rounding half up.
pub fn dec_mul(x: u128, y: u128) -> Result<u128, TroveError> {
    let product = U256::from(x) * U256::from(y) + U256::from(HALF);
    to_u128(product / U256::from(DECIMAL_PRECISION))
}

// exponent capped at MAX_DECAY_MINUTES
pub fn dec_pow(base: u128, minutes: u64) -> Result<u128, TroveError> {
    let mut n = minutes.min(MAX_DECAY_MINUTES);
    if n == 0 {
        return Ok(DECIMAL_PRECISION);
    }

    let mut x = base;
    let mut y = DECIMAL_PRECISION;
    while n > 1 {
        if n % 2 == 0 {
            x = dec_mul(x, x)?;
            n /= 2;
        } else {
            y = dec_mul(x, y)?;
            x = dec_mul(x, x)?;
            n = (n - 1) / 2;
        }
    }
    dec_mul(x, y)
}

pub fn compute_nominal_cr(coll: u128, debt: u128) -> u128 {
    if debt == 0 {
        return u128::MAX;
    }
    mul_div_saturating(coll, NICR_PRECISION, debt)
}

/// `coll * price / debt`, both price and result scaled by 1e18.
pub fn compute_cr(coll: u128, debt: u128, price: u128) -> u128 {
    if debt == 0 {
        return u128::MAX;
    }
    mul_div_saturating(coll, price, debt)
}

// Returns the reward per unit staked and the remainder to carry.
pub fn split_per_unit_staked(
    amount: u128,
    carried_error: u128,
    total_stakes: u128,
) -> Result<(u128, u128), TroveError> {
    if total_stakes == 0 {
        return Err(TroveError::ZeroTotalStakes);
    }
    let numerator = U256::from(amount)
        .checked_mul(U256::from(DECIMAL_PRECISION))
        .and_then(|n| n.checked_add(U256::from(carried_error)))
        .ok_or(TroveError::MathOverflow)?;
    let divisor = U256::from(total_stakes);
    let per_unit = numerator / divisor;
    let remainder = numerator - per_unit * divisor;
    Ok((to_u128(per_unit)?, to_u128(remainder)?))
}

pub fn abs_diff(a: u128, b: u128) -> u128 {
    if a > b {
        a - b
    } else {
        b - a
    }
}

#[cfg(test)]
pub fn decimal_to_u128(number: f64, factor: u128) -> u128 {
    let number = number * (factor as f64);
    number as u128
}

#[cfg(test)]
pub fn u128_to_decimal(number: u128, factor: u128) -> f64 {
    number as f64 / (factor as f64)
}
