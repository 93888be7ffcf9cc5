use std::collections::BTreeMap;

use anchor_lang::prelude::{msg, Pubkey};

use super::DebtToken;
use crate::{utils::coretypes::CheckedAssign, TroveError};

#[derive(Clone, Debug, Default)]
pub struct InMemoryDebtToken {
    pub balances: BTreeMap<Pubkey, u128>,
    pub supply: u128,
}

impl InMemoryDebtToken {
    pub fn new() -> Self {
        Self::default()
    }

    fn debit(&mut self, from: &Pubkey, amount: u128) -> Result<(), TroveError> {
        let balance = self.balances.get_mut(from);
        match balance {
            Some(balance) if *balance >= amount => {
                *balance -= amount;
                Ok(())
            }
            _ => Err(TroveError::InsufficientDebtBalance),
        }
    }
}

impl DebtToken for InMemoryDebtToken {
    fn mint(&mut self, to: &Pubkey, amount: u128) -> Result<(), TroveError> {
        if amount == 0 {
            return Ok(());
        }
        msg!("Minting {} stablecoin to {}", amount, to);
        self.supply.checked_add_assign(amount)?;
        self.balances.entry(*to).or_insert(0).checked_add_assign(amount)
    }

    fn burn(&mut self, from: &Pubkey, amount: u128) -> Result<(), TroveError> {
        if amount == 0 {
            return Ok(());
        }
        msg!("Burning {} stablecoin from {}", amount, from);
        self.debit(from, amount)?;
        self.supply -= amount;
        Ok(())
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<(), TroveError> {
        if amount == 0 {
            return Ok(());
        }
        msg!("Transferring {} stablecoin from {} to {}", amount, from, to);
        self.debit(from, amount)?;
        self.balances.entry(*to).or_insert(0).checked_add_assign(amount)
    }

    fn balance_of(&self, owner: &Pubkey) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.supply
    }
}
