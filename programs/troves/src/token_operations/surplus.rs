use std::collections::BTreeMap;

use anchor_lang::prelude::{msg, Pubkey};

use super::SurplusPool;
use crate::{utils::coretypes::CheckedAssign, TroveError};

#[derive(Clone, Debug, Default)]
pub struct InMemorySurplusPool {
    pub address: Pubkey,
    pub coll: u128,
    pub owed: BTreeMap<Pubkey, u128>,
    pub claimed: BTreeMap<Pubkey, u128>,
}

impl InMemorySurplusPool {
    pub fn new(address: Pubkey) -> Self {
        InMemorySurplusPool {
            address,
            ..Default::default()
        }
    }
}

impl SurplusPool for InMemorySurplusPool {
    fn address(&self) -> Pubkey {
        self.address
    }

    fn collateral(&self) -> u128 {
        self.coll
    }

    fn surplus_of(&self, owner: &Pubkey) -> u128 {
        self.owed.get(owner).copied().unwrap_or(0)
    }

    fn account_surplus(&mut self, owner: &Pubkey, amount: u128) -> Result<(), TroveError> {
        msg!("Surplus of {} accounted to {}", amount, owner);
        self.coll.checked_add_assign(amount)?;
        self.owed.entry(*owner).or_insert(0).checked_add_assign(amount)
    }

    fn claim_coll(&mut self, owner: &Pubkey) -> Result<u128, TroveError> {
        let amount = self.owed.remove(owner).unwrap_or(0);
        if amount == 0 {
            return Err(TroveError::NoCollateralToClaim);
        }
        if self.coll < amount {
            return Err(TroveError::InsufficientPoolBalance);
        }
        self.coll -= amount;
        self.claimed.entry(*owner).or_insert(0).checked_add_assign(amount)?;
        Ok(amount)
    }
}
