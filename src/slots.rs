//! Slot table: admission control for object creation
//!
//! The table bounds how many objects a pool ever creates. Creators race on a
//! single counter with compare-and-swap; a winner owns the right to build one
//! object and then marks any free slot as occupied. Slots are never cleared.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::handoff::IdleQueue;

pub(crate) struct SlotTable {
    created: AtomicUsize,
    slots: Box<[AtomicBool]>,
}

impl SlotTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            created: AtomicUsize::new(0),
            slots: (0..capacity).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Objects created so far, counting claims still in progress.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::Acquire)
    }

    /// Try to reserve the right to create one more object.
    ///
    /// Returns `None` once the counter has reached capacity. The returned
    /// claim rolls itself back when dropped without being committed.
    pub fn try_claim<'a, T>(&'a self, idle: &'a IdleQueue<T>) -> Option<SlotClaim<'a, T>> {
        let capacity = self.capacity();
        let mut current = self.created.load(Ordering::Acquire);
        loop {
            if current >= capacity {
                return None;
            }
            match self.created.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return Some(SlotClaim {
                        table: self,
                        idle,
                        committed: false,
                    });
                }
                Err(actual) => current = actual,
            }
        }
    }

    fn occupy_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        })
    }

    #[cfg(test)]
    fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.load(Ordering::Acquire)).count()
    }
}

/// Exclusive right to create one object.
///
/// Dropping an uncommitted claim (factory failure, or the renting future
/// being dropped mid-creation) gives the capacity back and pushes a poison
/// marker so one blocked waiter re-checks whether it can create instead.
pub(crate) struct SlotClaim<'a, T> {
    table: &'a SlotTable,
    idle: &'a IdleQueue<T>,
    committed: bool,
}

impl<T> SlotClaim<'_, T> {
    /// Publish the freshly created object into a free slot and return its index.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already occupied. A successful claim always
    /// leaves at least one free slot, so this indicates a corrupted table.
    pub fn commit(mut self) -> usize {
        self.committed = true;
        match self.table.occupy_free_slot() {
            Some(slot) => slot,
            None => {
                tracing::error!(
                    capacity = self.table.capacity(),
                    created = self.table.created(),
                    "slot claim succeeded but no free slot was left"
                );
                panic!("object pool slot table corrupted: no free slot for a successful claim");
            }
        }
    }
}

impl<T> Drop for SlotClaim<'_, T> {
    fn drop(&mut self) {
        if !self.committed {
            self.table.created.fetch_sub(1, Ordering::AcqRel);
            self.idle.push_poison();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::HandOff;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_claims_stop_at_capacity() {
        let table = SlotTable::new(2);
        let idle = IdleQueue::<u32>::new();

        let first = table.try_claim(&idle).unwrap();
        let second = table.try_claim(&idle).unwrap();
        assert!(table.try_claim(&idle).is_none());
        assert_eq!(table.created(), 2);

        let a = first.commit();
        let b = second.commit();
        assert_ne!(a, b);
        assert_eq!(table.occupied(), 2);
    }

    #[test]
    fn test_dropped_claim_rolls_back_and_poisons() {
        let table = SlotTable::new(1);
        let idle = IdleQueue::<u32>::new();

        let claim = table.try_claim(&idle).unwrap();
        assert_eq!(table.created(), 1);
        drop(claim);

        assert_eq!(table.created(), 0);
        assert_eq!(table.occupied(), 0);
        assert!(matches!(idle.try_pop(), Some(HandOff::Poison)));
        assert_eq!(idle.idle_count(), 0);

        // capacity is usable again
        assert!(table.try_claim(&idle).is_some());
    }

    #[test]
    fn test_slots_fill_from_the_front() {
        let table = SlotTable::new(3);
        let idle = IdleQueue::<u32>::new();

        let failed = table.try_claim(&idle).unwrap();
        let ok = table.try_claim(&idle).unwrap();
        drop(failed);
        assert_eq!(ok.commit(), 0);
        assert_eq!(table.try_claim(&idle).unwrap().commit(), 1);
    }

    #[test]
    fn test_concurrent_claims_never_exceed_capacity() {
        let table = Arc::new(SlotTable::new(8));
        let idle = Arc::new(IdleQueue::<u32>::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let table = Arc::clone(&table);
                let idle = Arc::clone(&idle);
                thread::spawn(move || {
                    let mut won = Vec::new();
                    for _ in 0..4 {
                        if let Some(claim) = table.try_claim(&*idle) {
                            won.push(claim.commit());
                        }
                    }
                    won
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for slot in handle.join().unwrap() {
                assert!(seen.insert(slot), "slot {} published twice", slot);
            }
        }

        assert_eq!(seen.len(), 8);
        assert_eq!(table.created(), 8);
        assert_eq!(table.occupied(), 8);
    }
}
