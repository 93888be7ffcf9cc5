use anchor_lang::prelude::Pubkey;

use crate::{PoolBalances, TroveError};

mod price_feed;
mod soltoken;
mod stablecoin;
mod surplus;

pub use price_feed::FixedPriceFeed;
pub use soltoken::InMemoryPool;
pub use stablecoin::InMemoryDebtToken;
pub use surplus::InMemorySurplusPool;

pub trait CollateralPool {
    fn address(&self) -> Pubkey;
    fn collateral(&self) -> u128;
    fn debt(&self) -> u128;
    fn send_collateral(&mut self, to: &Pubkey, amount: u128) -> Result<(), TroveError>;
    fn receive_collateral(&mut self, amount: u128) -> Result<(), TroveError>;
    fn increase_debt(&mut self, amount: u128) -> Result<(), TroveError>;
    fn decrease_debt(&mut self, amount: u128) -> Result<(), TroveError>;
}

pub trait SurplusPool {
    fn address(&self) -> Pubkey;
    fn collateral(&self) -> u128;
    fn surplus_of(&self, owner: &Pubkey) -> u128;
    fn account_surplus(&mut self, owner: &Pubkey, amount: u128) -> Result<(), TroveError>;
    fn claim_coll(&mut self, owner: &Pubkey) -> Result<u128, TroveError>;
}

pub trait DebtToken {
    fn mint(&mut self, to: &Pubkey, amount: u128) -> Result<(), TroveError>;
    fn burn(&mut self, from: &Pubkey, amount: u128) -> Result<(), TroveError>;
    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<(), TroveError>;
    fn balance_of(&self, owner: &Pubkey) -> u128;
    fn total_supply(&self) -> u128;
}

// 1e18 scaled debt tokens per unit of collateral
pub trait PriceFeed {
    fn fetch_price(&mut self) -> Result<u128, TroveError>;
}

pub fn pool_to_pool<P: CollateralPool>(
    from: &mut P,
    to: &mut P,
    amounts: PoolBalances,
) -> Result<(), TroveError> {
    if amounts.is_zero() {
        return Ok(());
    }
    from.decrease_debt(amounts.debt)?;
    to.increase_debt(amounts.debt)?;
    from.send_collateral(&to.address(), amounts.coll)?;
    to.receive_collateral(amounts.coll)
}

pub fn pool_to_surplus<P: CollateralPool, S: SurplusPool>(
    pool: &mut P,
    surplus_pool: &mut S,
    owner: &Pubkey,
    amount: u128,
) -> Result<(), TroveError> {
    if amount == 0 {
        return Ok(());
    }
    pool.send_collateral(&surplus_pool.address(), amount)?;
    surplus_pool.account_surplus(owner, amount)
}
