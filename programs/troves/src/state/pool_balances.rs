use super::PoolBalances;
use crate::{utils::coretypes::CheckedAssign, TroveError};

impl CheckedAssign for PoolBalances {
    fn checked_add_assign(&mut self, rhs: Self) -> Result<(), TroveError> {
        self.coll.checked_add_assign(rhs.coll)?;
        self.debt.checked_add_assign(rhs.debt)?;
        Ok(())
    }

    fn checked_sub_assign(&mut self, rhs: Self) -> Result<(), TroveError> {
        if self.coll < rhs.coll || self.debt < rhs.debt {
            return Err(TroveError::InsufficientPoolBalance);
        }
        self.coll -= rhs.coll;
        self.debt -= rhs.debt;
        Ok(())
    }
}
