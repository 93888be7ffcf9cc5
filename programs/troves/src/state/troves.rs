use anchor_lang::prelude::Pubkey;
use num::FromPrimitive;

use super::{TroveData, TroveStatus, Troves};
use crate::TroveError;

impl TroveData {
    pub fn status(&self) -> TroveStatus {
        TroveStatus::from_u8(self.status).unwrap_or(TroveStatus::NonExistent)
    }

    pub fn set_status(&mut self, status: TroveStatus) {
        self.status = status as u8;
    }

    pub fn is_active(&self) -> bool {
        self.status() == TroveStatus::Active
    }
}

impl Troves {
    pub fn get(&self, owner: &Pubkey) -> Option<&TroveData> {
        self.entries.get(owner)
    }

    pub fn status_of(&self, owner: &Pubkey) -> TroveStatus {
        self.entries
            .get(owner)
            .map(|trove| trove.status())
            .unwrap_or(TroveStatus::NonExistent)
    }

    pub fn is_active(&self, owner: &Pubkey) -> bool {
        self.status_of(owner) == TroveStatus::Active
    }

    pub fn active(&self, owner: &Pubkey) -> Result<&TroveData, TroveError> {
        match self.entries.get(owner) {
            Some(trove) if trove.is_active() => Ok(trove),
            _ => Err(TroveError::TroveNotActive),
        }
    }

    pub fn active_mut(&mut self, owner: &Pubkey) -> Result<&mut TroveData, TroveError> {
        match self.entries.get_mut(owner) {
            Some(trove) if trove.is_active() => Ok(trove),
            _ => Err(TroveError::TroveNotActive),
        }
    }

    /// Record for `owner`, created as `NonExistent` on first use.
    pub fn get_or_create(&mut self, owner: Pubkey) -> &mut TroveData {
        self.entries.entry(owner).or_insert_with(|| TroveData {
            owner,
            ..TroveData::default()
        })
    }

    pub fn count(&self) -> u64 {
        self.owners.len() as u64
    }

    pub fn owner_at(&self, index: u64) -> Option<Pubkey> {
        self.owners.get(index as usize).copied()
    }

    pub fn add_owner(&mut self, owner: Pubkey) -> Result<u64, TroveError> {
        let index = self.owners.len() as u64;
        let trove = self
            .entries
            .get_mut(&owner)
            .ok_or(TroveError::MissingTroveRecord)?;
        trove.array_index = index;
        self.owners.push(owner);
        Ok(index)
    }

    /// Swap-removes `owner`, the last owner takes its slot.
    pub fn remove_owner(&mut self, owner: &Pubkey) -> Result<(), TroveError> {
        let index = self
            .entries
            .get(owner)
            .ok_or(TroveError::MissingTroveRecord)?
            .array_index as usize;
        if self.owners.get(index) != Some(owner) {
            return Err(TroveError::MissingTroveRecord);
        }

        self.owners.swap_remove(index);
        if let Some(moved) = self.owners.get(index).copied() {
            self.entries
                .get_mut(&moved)
                .ok_or(TroveError::MissingTroveRecord)?
                .array_index = index as u64;
        }
        Ok(())
    }
}
