// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element storage: generational slots plus an id → handle map.
//!
//! The registry is independent of tree shape. It resolves handles and ids in
//! O(1) and remembers which leaf node holds each element.

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::types::{Element, ElementHandle, NodeId};

#[derive(Clone, Debug)]
pub(crate) struct Entry<E> {
    pub(crate) element: E,
    pub(crate) leaf: NodeId,
    /// Insertion sequence; breaks z-index ties.
    pub(crate) seq: u64,
}

pub(crate) struct Registry<E: Element> {
    entries: Vec<Option<Entry<E>>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    by_id: HashMap<E::Id, ElementHandle>,
    next_seq: u64,
}

impl<E: Element> Debug for Registry<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("slots_total", &self.entries.len())
            .field("alive", &self.by_id.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<E: Element> Registry<E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            by_id: HashMap::new(),
            next_seq: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn clear(&mut self) {
        // Keep generations so handles from before the clear stay stale.
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            if entry.take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.by_id.clear();
    }

    /// Store `element`, letting `place` create its leaf for the chosen slot.
    ///
    /// The caller has already removed any live entry with the same id.
    pub(crate) fn insert(
        &mut self,
        element: E,
        place: impl FnOnce(usize) -> NodeId,
    ) -> ElementHandle {
        debug_assert!(
            !self.by_id.contains_key(element.id()),
            "duplicate id must be removed before insert"
        );
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.generations[idx] = self.generations[idx].saturating_add(1);
                idx
            }
            None => {
                self.entries.push(None);
                self.generations.push(1);
                self.entries.len() - 1
            }
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementHandle uses 32-bit indices by design."
        )]
        let handle = ElementHandle::new(idx as u32, self.generations[idx]);
        let leaf = place(idx);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_id.insert(element.id().clone(), handle);
        self.entries[idx] = Some(Entry { element, leaf, seq });
        handle
    }

    /// Remove the entry for `handle`, returning it if the handle was live.
    pub(crate) fn remove(&mut self, handle: ElementHandle) -> Option<Entry<E>> {
        self.get(handle)?;
        let entry = self.entries[handle.idx()].take()?;
        self.by_id.remove(entry.element.id());
        self.free_list.push(handle.idx());
        Some(entry)
    }

    pub(crate) fn get(&self, handle: ElementHandle) -> Option<&Entry<E>> {
        if *self.generations.get(handle.idx())? != handle.generation() {
            return None;
        }
        self.entries[handle.idx()].as_ref()
    }

    /// Entry stored at `slot`; panics if the slot is vacant.
    pub(crate) fn at_slot(&self, slot: usize) -> &Entry<E> {
        self.entries[slot].as_ref().expect("leaf refers to a vacant slot")
    }

    pub(crate) fn handle_of<Q>(&self, id: &Q) -> Option<ElementHandle>
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.by_id.get(id).copied()
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> impl Iterator<Item = (ElementHandle, &Entry<E>)> + '_ {
        self.entries.iter().enumerate().filter_map(|(idx, e)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementHandle uses 32-bit indices by design."
            )]
            let handle = ElementHandle::new(idx as u32, self.generations[idx]);
            e.as_ref().map(|e| (handle, e))
        })
    }
}
