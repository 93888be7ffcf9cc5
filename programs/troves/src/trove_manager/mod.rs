pub mod borrowing_rate;
pub mod hint_helpers;
pub mod liquidation;
pub mod liquidation_calcs;
pub mod redemption;
pub mod redistribution;
pub mod trove_operations;
pub mod types;

#[cfg(test)]
pub mod tests_liquidation;
