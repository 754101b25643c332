//! Fixed-capacity task table

use tt_core::{Task, TaskDescriptor, TtError, TtResult};

/// Table of registered periodic tasks
///
/// Slots are claimed first-fit in ascending index order and are never
/// released or compacted; only [`clear`](Self::clear) empties the table.
/// Tasks are always released in slot order.
pub struct TaskTable<'a, const N: usize> {
    /// Array of optional task descriptors indexed by slot id
    slots: [Option<TaskDescriptor<'a>>; N],
}

impl<'a, const N: usize> TaskTable<'a, N> {
    /// Create a new empty table
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; N],
        }
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check whether every slot is taken
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Empty every slot
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }

    /// Register a periodic task in the first free slot
    ///
    /// Returns the slot id. Fails with [`TtError::InvalidPeriod`] for a zero
    /// period and with [`TtError::TableFull`] if no slot is free; the table
    /// is left untouched on failure.
    pub fn add(
        &mut self,
        handle: &'a mut dyn Task,
        initial_delay: u32,
        period: u32,
    ) -> TtResult<usize> {
        if period == 0 {
            return Err(TtError::InvalidPeriod);
        }

        let (id, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.is_none())
            .ok_or(TtError::TableFull)?;

        *slot = Some(TaskDescriptor::new(handle, initial_delay, period));
        Ok(id)
    }

    /// Get the descriptor stored in a slot
    pub fn slot(&self, id: usize) -> Option<&TaskDescriptor<'a>> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    /// Iterate over occupied slots as `(slot id, descriptor)`
    pub fn iter(&self) -> impl Iterator<Item = (usize, &TaskDescriptor<'a>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|desc| (id, desc)))
    }

    /// Advance every task by one tick, in slot order
    ///
    /// Due tasks run to completion one after another. Returns the number of
    /// tasks that ran.
    pub fn release_due(&mut self) -> u32 {
        let mut released = 0;
        for desc in self.slots.iter_mut().flatten() {
            if desc.release() {
                released += 1;
            }
        }
        released
    }
}

impl<const N: usize> Default for TaskTable<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fit_ascending() {
        let mut a = || {};
        let mut b = || {};
        let mut c = || {};
        let mut table: TaskTable<'_, 3> = TaskTable::new();
        assert_eq!(table.add(&mut a, 0, 1), Ok(0));
        assert_eq!(table.add(&mut b, 0, 1), Ok(1));
        assert_eq!(table.add(&mut c, 0, 1), Ok(2));
        assert!(table.is_full());
    }

    #[test]
    fn zero_period_leaves_table_untouched() {
        let mut a = || {};
        let mut b = || {};
        let mut table: TaskTable<'_, 2> = TaskTable::new();
        assert_eq!(table.add(&mut a, 0, 0), Err(TtError::InvalidPeriod));
        assert_eq!(table.occupied(), 0);
        assert_eq!(table.add(&mut b, 0, 1), Ok(0));
    }

    #[test]
    fn full_table_rejects() {
        let mut a = || {};
        let mut b = || {};
        let mut table: TaskTable<'_, 1> = TaskTable::new();
        table.add(&mut a, 4, 7).unwrap();
        assert_eq!(table.add(&mut b, 0, 1), Err(TtError::TableFull));
        let desc = table.slot(0).unwrap();
        assert_eq!(desc.delay().ticks(), 5);
        assert_eq!(desc.period().ticks(), 7);
    }

    #[test]
    fn zero_capacity_table_is_always_full() {
        let mut a = || {};
        let mut table: TaskTable<'_, 0> = TaskTable::new();
        assert!(table.is_full());
        assert_eq!(table.add(&mut a, 0, 1), Err(TtError::TableFull));
    }

    #[test]
    fn clear_frees_every_slot() {
        let mut a = || {};
        let mut b = || {};
        let mut table: TaskTable<'_, 2> = TaskTable::new();
        table.add(&mut a, 0, 1).unwrap();
        table.clear();
        assert_eq!(table.occupied(), 0);
        assert_eq!(table.add(&mut b, 0, 1), Ok(0));
    }
}
