//! Persistent capture slot storage.
//!
//! Each thread carries the history of `Save` instructions it has passed
//! through as a singly linked list of writes, newest first. Forking a thread
//! at a `Split` shares the whole history and recording a new offset only
//! allocates a single node, so the cost of a save is independent of the
//! number of slots in the program.

use std::rc::Rc;

#[derive(Debug)]
struct SaveNode {
    slot_id: usize,
    pos: usize,
    prev: Option<Rc<SaveNode>>,
}

/// The capture slots recorded by a single thread.
#[derive(Clone, Default)]
pub struct Captures {
    head: Option<Rc<SaveNode>>,
}

impl Captures {
    /// Returns a new set of captures with `slot_id` recording `pos`, leaving
    /// `self` unmodified.
    #[must_use]
    pub fn save(&self, slot_id: usize, pos: usize) -> Self {
        Self {
            head: Some(Rc::new(SaveNode {
                slot_id,
                pos,
                prev: self.head.clone(),
            })),
        }
    }

    /// Returns the most recent offset recorded for a slot.
    pub fn get(&self, slot_id: usize) -> Option<usize> {
        self.writes()
            .find(|&(slot, _)| slot == slot_id)
            .map(|(_, pos)| pos)
    }

    /// Flattens the write history into a slot array of `num_slots` length.
    pub fn resolve(&self, num_slots: usize) -> Vec<Option<usize>> {
        let mut slots = vec![None; num_slots];
        let mut unresolved = num_slots;

        for (slot_id, pos) in self.writes() {
            if unresolved == 0 {
                break;
            }

            if let Some(slot) = slots.get_mut(slot_id) {
                if slot.is_none() {
                    *slot = Some(pos);
                    unresolved -= 1;
                }
            }
        }

        slots
    }

    /// Iterates over all recorded `(slot_id, pos)` writes, newest first.
    fn writes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let mut next = self.head.as_deref();

        std::iter::from_fn(move || {
            let node = next?;
            next = node.prev.as_deref();
            Some((node.slot_id, node.pos))
        })
    }
}

impl Drop for Captures {
    fn drop(&mut self) {
        // unlink uniquely owned nodes one at a time so long histories don't
        // recurse through the default drop.
        let mut next = self.head.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut node) => next = node.prev.take(),
                Err(_) => break,
            }
        }
    }
}

impl std::fmt::Debug for Captures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.writes()).finish()
    }
}
