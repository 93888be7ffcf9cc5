use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::TroveError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Node {
    pub prev: Option<Pubkey>,
    pub next: Option<Pubkey>,
}

// Highest NICR at the head. NICRs move with every redistribution so they are
// not stored, callers pass a lookup.
#[account]
#[derive(Debug, Default)]
pub struct SortedTroves {
    pub head: Option<Pubkey>,
    pub tail: Option<Pubkey>,
    pub max_size: u64,
    pub size: u64,
    pub nodes: BTreeMap<Pubkey, Node>,
}

impl SortedTroves {
    pub fn new(max_size: u64) -> Self {
        SortedTroves {
            max_size,
            ..SortedTroves::default()
        }
    }

    pub fn set_max_size(&mut self, max_size: u64) -> Result<(), TroveError> {
        if max_size < self.size {
            return Err(TroveError::GlobalConfigValueError);
        }
        self.max_size = max_size;
        Ok(())
    }

    pub fn insert<F>(
        &mut self,
        id: Pubkey,
        nicr: u128,
        prev_hint: Option<Pubkey>,
        next_hint: Option<Pubkey>,
        nicr_of: &F,
    ) -> Result<(), TroveError>
    where
        F: Fn(&Pubkey) -> u128,
    {
        if self.is_full() {
            fail!(TroveError::ListFull);
        }
        if self.contains(&id) {
            fail!(TroveError::DuplicateId);
        }
        if id == Pubkey::default() {
            fail!(TroveError::ZeroId);
        }
        if nicr == 0 {
            fail!(TroveError::ZeroNicr);
        }

        let (prev, next) = if self.valid_insert_position(nicr, prev_hint, next_hint, nicr_of) {
            (prev_hint, next_hint)
        } else {
            self.find_insert_position(nicr, prev_hint, next_hint, nicr_of)?
        };

        self.link(id, prev, next)?;
        self.size += 1;
        Ok(())
    }

    pub fn remove(&mut self, id: &Pubkey) -> Result<(), TroveError> {
        let node = match self.nodes.remove(id) {
            Some(node) => node,
            None => {
                fail!(TroveError::NodeNotFound);
            }
        };

        match node.prev {
            Some(prev) => self.node_mut(&prev)?.next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(&next)?.prev = node.prev,
            None => self.tail = node.prev,
        }

        self.size -= 1;
        Ok(())
    }

    pub fn re_insert<F>(
        &mut self,
        id: Pubkey,
        new_nicr: u128,
        prev_hint: Option<Pubkey>,
        next_hint: Option<Pubkey>,
        nicr_of: &F,
    ) -> Result<(), TroveError>
    where
        F: Fn(&Pubkey) -> u128,
    {
        if !self.contains(&id) {
            fail!(TroveError::NodeNotFound);
        }
        if new_nicr == 0 {
            fail!(TroveError::ZeroNicr);
        }

        self.remove(&id)?;
        self.insert(id, new_nicr, prev_hint, next_hint, nicr_of)
    }

    pub fn valid_insert_position<F>(
        &self,
        nicr: u128,
        prev: Option<Pubkey>,
        next: Option<Pubkey>,
        nicr_of: &F,
    ) -> bool
    where
        F: Fn(&Pubkey) -> u128,
    {
        match (prev, next) {
            (None, None) => self.is_empty(),
            (None, Some(next)) => self.head == Some(next) && nicr >= nicr_of(&next),
            (Some(prev), None) => self.tail == Some(prev) && nicr <= nicr_of(&prev),
            (Some(prev), Some(next)) => {
                self.next(&prev) == Some(next)
                    && nicr_of(&prev) >= nicr
                    && nicr >= nicr_of(&next)
            }
        }
    }

    pub fn find_insert_position<F>(
        &self,
        nicr: u128,
        prev_hint: Option<Pubkey>,
        next_hint: Option<Pubkey>,
        nicr_of: &F,
    ) -> Result<(Option<Pubkey>, Option<Pubkey>), TroveError>
    where
        F: Fn(&Pubkey) -> u128,
    {
        // a hint is only usable if it is still listed and on the right side
        let prev = prev_hint.filter(|prev| self.contains(prev) && nicr <= nicr_of(prev));
        let next = next_hint.filter(|next| self.contains(next) && nicr >= nicr_of(next));

        match (prev, next) {
            (None, None) => self.descend_list(nicr, self.head, nicr_of),
            (None, Some(next)) => self.ascend_list(nicr, next, nicr_of),
            (Some(prev), _) => self.descend_list(nicr, Some(prev), nicr_of),
        }
    }

    fn descend_list<F>(
        &self,
        nicr: u128,
        start: Option<Pubkey>,
        nicr_of: &F,
    ) -> Result<(Option<Pubkey>, Option<Pubkey>), TroveError>
    where
        F: Fn(&Pubkey) -> u128,
    {
        let start = match start {
            Some(start) => start,
            None => return Ok((None, None)),
        };
        if self.head == Some(start) && nicr >= nicr_of(&start) {
            return Ok((None, Some(start)));
        }

        let mut prev = Some(start);
        let mut next = self.next(&start);
        let mut hops = 0;
        while let Some(current) = prev {
            if self.valid_insert_position(nicr, prev, next, nicr_of) {
                break;
            }
            hops += 1;
            if hops > self.size {
                fail!(TroveError::CorruptedSortedList);
            }
            prev = self.next(&current);
            next = prev.and_then(|p| self.next(&p));
        }
        Ok((prev, next))
    }

    fn ascend_list<F>(
        &self,
        nicr: u128,
        start: Pubkey,
        nicr_of: &F,
    ) -> Result<(Option<Pubkey>, Option<Pubkey>), TroveError>
    where
        F: Fn(&Pubkey) -> u128,
    {
        if self.tail == Some(start) && nicr <= nicr_of(&start) {
            return Ok((Some(start), None));
        }

        let mut next = Some(start);
        let mut prev = self.prev(&start);
        let mut hops = 0;
        while let Some(current) = next {
            if self.valid_insert_position(nicr, prev, next, nicr_of) {
                break;
            }
            hops += 1;
            if hops > self.size {
                fail!(TroveError::CorruptedSortedList);
            }
            next = self.prev(&current);
            prev = next.and_then(|n| self.prev(&n));
        }
        Ok((prev, next))
    }

    fn link(
        &mut self,
        id: Pubkey,
        prev: Option<Pubkey>,
        next: Option<Pubkey>,
    ) -> Result<(), TroveError> {
        match prev {
            Some(prev) => self.node_mut(&prev)?.next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(next) => self.node_mut(&next)?.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.nodes.insert(id, Node { prev, next });
        Ok(())
    }

    fn node_mut(&mut self, id: &Pubkey) -> Result<&mut Node, TroveError> {
        self.nodes
            .get_mut(id)
            .ok_or(TroveError::CorruptedSortedList)
    }

    pub fn contains(&self, id: &Pubkey) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn is_full(&self) -> bool {
        self.size >= self.max_size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn first(&self) -> Option<Pubkey> {
        self.head
    }

    pub fn last(&self) -> Option<Pubkey> {
        self.tail
    }

    pub fn next(&self, id: &Pubkey) -> Option<Pubkey> {
        self.nodes.get(id).and_then(|node| node.next)
    }

    pub fn prev(&self, id: &Pubkey) -> Option<Pubkey> {
        self.nodes.get(id).and_then(|node| node.prev)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
            towards_tail: true,
        }
    }

    pub fn iter_from_tail(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.tail,
            towards_tail: false,
        }
    }
}

pub struct Iter<'a> {
    list: &'a SortedTroves,
    cursor: Option<Pubkey>,
    towards_tail: bool,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Pubkey;

    fn next(&mut self) -> Option<Pubkey> {
        let current = self.cursor?;
        self.cursor = if self.towards_tail {
            self.list.next(&current)
        } else {
            self.list.prev(&current)
        };
        Some(current)
    }
}
