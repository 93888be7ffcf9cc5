use super::GlobalConfig;
use crate::utils::consts::{
    BOOTSTRAP_PERIOD, DEFAULT_GAS_COMPENSATION, DEFAULT_MAX_TROVES, DEFAULT_MIN_NET_DEBT,
};

impl Default for GlobalConfig {
    fn default() -> GlobalConfig {
        GlobalConfig {
            version: 0,
            is_borrowing_allowed: true,
            debt_ceiling: 0,
            gas_compensation: DEFAULT_GAS_COMPENSATION,
            min_net_debt: DEFAULT_MIN_NET_DEBT,
            max_troves: DEFAULT_MAX_TROVES,
            redemption_bootstrap_period: BOOTSTRAP_PERIOD,
        }
    }
}
