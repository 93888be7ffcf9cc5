use super::{MarketState, PoolBalances};
use crate::{utils::consts::MARKET_STATE_VERSION, TroveError};

impl MarketState {
    pub fn is_initialized(&self) -> bool {
        self.version > 0
    }

    pub fn initialize(&mut self, now: u64, bootstrap_period: u64) {
        self.version = MARKET_STATE_VERSION;
        self.last_fee_operation_time = now;
        self.redemption_bootstrap_end = now.saturating_add(bootstrap_period);
    }

    /// Active plus default pool, i.e. everything backing open troves.
    pub fn system_balances(&self) -> Result<PoolBalances, TroveError> {
        Ok(PoolBalances {
            coll: self
                .active_pool
                .coll
                .checked_add(self.default_pool.coll)
                .ok_or(TroveError::MathOverflow)?,
            debt: self
                .active_pool
                .debt
                .checked_add(self.default_pool.debt)
                .ok_or(TroveError::MathOverflow)?,
        })
    }

    #[cfg(any(test, feature = "test-mutators"))]
    pub fn set_base_rate_for_test(&mut self, base_rate: u128) {
        self.base_rate = base_rate;
    }

    #[cfg(any(test, feature = "test-mutators"))]
    pub fn set_last_fee_operation_time_for_test(&mut self, timestamp: u64) {
        self.last_fee_operation_time = timestamp;
    }
}
