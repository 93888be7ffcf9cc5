use std::collections::BTreeMap;

use anchor_lang::prelude::{msg, Pubkey};

use super::CollateralPool;
use crate::{utils::coretypes::CheckedAssign, TroveError};

/// Collateral pool kept in memory. Outflows are tallied per recipient so the
/// caller can see where collateral went.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPool {
    pub address: Pubkey,
    pub coll: u128,
    pub debt: u128,
    pub sent: BTreeMap<Pubkey, u128>,
}

impl InMemoryPool {
    pub fn new(address: Pubkey) -> Self {
        InMemoryPool {
            address,
            ..Default::default()
        }
    }

    pub fn sent_to(&self, to: &Pubkey) -> u128 {
        self.sent.get(to).copied().unwrap_or(0)
    }
}

impl CollateralPool for InMemoryPool {
    fn address(&self) -> Pubkey {
        self.address
    }

    fn collateral(&self) -> u128 {
        self.coll
    }

    fn debt(&self) -> u128 {
        self.debt
    }

    fn send_collateral(&mut self, to: &Pubkey, amount: u128) -> Result<(), TroveError> {
        if amount == 0 {
            return Ok(());
        }
        msg!(
            "Transferring collateral {} from {} to {} with balance {}",
            amount,
            self.address,
            to,
            self.coll
        );
        if self.coll < amount {
            return Err(TroveError::InsufficientPoolBalance);
        }
        self.coll -= amount;
        self.sent.entry(*to).or_insert(0).checked_add_assign(amount)
    }

    fn receive_collateral(&mut self, amount: u128) -> Result<(), TroveError> {
        self.coll.checked_add_assign(amount)
    }

    fn increase_debt(&mut self, amount: u128) -> Result<(), TroveError> {
        self.debt.checked_add_assign(amount)
    }

    fn decrease_debt(&mut self, amount: u128) -> Result<(), TroveError> {
        if self.debt < amount {
            return Err(TroveError::InsufficientPoolBalance);
        }
        self.debt -= amount;
        Ok(())
    }
}
