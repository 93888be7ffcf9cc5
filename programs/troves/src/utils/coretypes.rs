use crate::TroveError;

#[cfg(test)]
use super::{consts::DECIMAL_PRECISION, math};

pub trait CheckedAssign {
    fn checked_add_assign(&mut self, rhs: Self) -> Result<(), TroveError>;
    fn checked_sub_assign(&mut self, rhs: Self) -> Result<(), TroveError>;
}

impl CheckedAssign for u64 {
    fn checked_add_assign(&mut self, rhs: Self) -> Result<(), TroveError> {
        *self = self.checked_add(rhs).ok_or(TroveError::MathOverflow)?;
        Ok(())
    }
    fn checked_sub_assign(&mut self, rhs: Self) -> Result<(), TroveError> {
        *self = self.checked_sub(rhs).ok_or(TroveError::MathOverflow)?;
        Ok(())
    }
}

impl CheckedAssign for u128 {
    fn checked_add_assign(&mut self, rhs: Self) -> Result<(), TroveError> {
        *self = self.checked_add(rhs).ok_or(TroveError::MathOverflow)?;
        Ok(())
    }
    fn checked_sub_assign(&mut self, rhs: Self) -> Result<(), TroveError> {
        *self = self.checked_sub(rhs).ok_or(TroveError::MathOverflow)?;
        Ok(())
    }
}

/// Collateral token, 18 decimals.
pub struct ETH;
/// Debt token, 18 decimals. Prices are quoted in it as well.
pub struct DEBT;

impl ETH {
    #[cfg(test)]
    pub fn from(amount: f64) -> u128 {
        math::decimal_to_u128(amount, DECIMAL_PRECISION)
    }
}

impl DEBT {
    #[cfg(test)]
    pub fn from(amount: f64) -> u128 {
        math::decimal_to_u128(amount, DECIMAL_PRECISION)
    }
}
