//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Status registry implementation
//!
//! One `RwLock` guards the whole slot array, so every mutation is applied
//! atomically with respect to [`StatusRegistry::snapshot`]. A reader can
//! never observe a half-applied command (a bumped reference count with a
//! stale name, a half-inserted map entry). The lock is held only for the
//! duration of a single operation; no I/O happens under it.

use crate::error::{RegistryError, RegistryResult};
use crate::slot::{HostSlot, HostSnapshot, ProcessEntry};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Fixed number of host slots tracked by the feed
pub const MAX_HOSTS: usize = 16;

/// Shared host/process status registry
///
/// Created once at listener startup with all slots in the default state
/// (down, placeholder name, no processes). The dispatcher mutates it on the
/// network side; the renderer reads it via [`snapshot`](Self::snapshot) at
/// its own cadence. Both sides hold it through an `Arc`.
///
/// All operations reject an out-of-range host index with
/// [`RegistryError::OutOfRange`] and leave the state untouched.
#[derive(Debug)]
pub struct StatusRegistry {
    slots: RwLock<Vec<HostSlot>>,
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusRegistry {
    /// Create a registry with the standard [`MAX_HOSTS`] capacity
    pub fn new() -> Self {
        Self::with_capacity(MAX_HOSTS)
    }

    /// Create a registry with a custom slot capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: RwLock::new((0..capacity).map(HostSlot::new).collect()),
        }
    }

    /// Number of host slots
    pub fn capacity(&self) -> usize {
        self.read_slots().len()
    }

    /// Mark a host up, optionally overwriting its display name
    ///
    /// The name, when present, is taken verbatim (it may contain embedded
    /// spaces). The process map is left as-is.
    pub fn set_host_up(&self, index: usize, name: Option<&str>) -> RegistryResult<()> {
        let mut slots = self.write_slots();
        let slot = Self::slot_mut(&mut slots, index)?;
        slot.up = true;
        if let Some(name) = name {
            slot.name = name.to_string();
        }
        Ok(())
    }

    /// Mark a host down
    ///
    /// Does not clear the process map; suppressing the processes of a down
    /// host is the renderer's concern.
    pub fn set_host_down(&self, index: usize) -> RegistryResult<()> {
        let mut slots = self.write_slots();
        Self::slot_mut(&mut slots, index)?.up = false;
        Ok(())
    }

    /// Overwrite a host's display name
    ///
    /// An empty name is legal and simply blanks the label.
    pub fn set_host_name(&self, index: usize, name: &str) -> RegistryResult<()> {
        let mut slots = self.write_slots();
        Self::slot_mut(&mut slots, index)?.name = name.to_string();
        Ok(())
    }

    /// Record one more running copy of a process
    ///
    /// Increments the reference count for `(index, proc_num)` and stores
    /// `name` as the current base name; the most recent add wins even when a
    /// prior add used a different name for the same number.
    pub fn add_process(&self, index: usize, proc_num: u32, name: &str) -> RegistryResult<()> {
        let mut slots = self.write_slots();
        let slot = Self::slot_mut(&mut slots, index)?;
        slot.processes
            .entry(proc_num)
            .and_modify(|entry| {
                entry.ref_count += 1;
                entry.base_name = name.to_string();
            })
            .or_insert_with(|| ProcessEntry::new(name));
        Ok(())
    }

    /// Record one running copy of a process going away
    ///
    /// Decrements the reference count for `(index, proc_num)`; the entry is
    /// deleted once the count reaches zero. Removing an absent entry is a
    /// no-op, so the count never goes negative.
    pub fn remove_process(&self, index: usize, proc_num: u32) -> RegistryResult<()> {
        let mut slots = self.write_slots();
        let slot = Self::slot_mut(&mut slots, index)?;
        if let Some(entry) = slot.processes.get_mut(&proc_num) {
            if entry.ref_count > 1 {
                entry.ref_count -= 1;
            } else {
                slot.processes.remove(&proc_num);
            }
        }
        Ok(())
    }

    /// Reset every slot to its default state
    ///
    /// Used by the listener's reset-on-connect policy when a new feed
    /// connection begins.
    pub fn reset(&self) {
        let mut slots = self.write_slots();
        let capacity = slots.len();
        *slots = (0..capacity).map(HostSlot::new).collect();
    }

    /// Take an immutable, self-consistent copy of all slots
    ///
    /// Safe to call from any thread while mutations proceed on the writer
    /// side; the returned vector is indexed by host slot.
    pub fn snapshot(&self) -> Vec<HostSnapshot> {
        self.read_slots().iter().map(HostSlot::to_snapshot).collect()
    }

    fn slot_mut<'a>(
        slots: &'a mut RwLockWriteGuard<'_, Vec<HostSlot>>,
        index: usize,
    ) -> RegistryResult<&'a mut HostSlot> {
        let capacity = slots.len();
        slots.get_mut(index).ok_or(RegistryError::OutOfRange { index, capacity })
    }

    // Lock poisoning only happens if a writer panicked mid-operation; the
    // slot data itself is always left whole, so recover the guard.
    fn read_slots(&self) -> RwLockReadGuard<'_, Vec<HostSlot>> {
        self.slots.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_slots(&self) -> RwLockWriteGuard<'_, Vec<HostSlot>> {
        self.slots.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_defaults() {
        let registry = StatusRegistry::new();
        assert_eq!(registry.capacity(), MAX_HOSTS);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), MAX_HOSTS);
        for (i, host) in snapshot.iter().enumerate() {
            assert!(!host.up);
            assert_eq!(host.name, format!("Host #{i}"));
            assert!(host.processes.is_empty());
        }
    }

    #[test]
    fn test_up_then_down_leaves_processes_intact() {
        let registry = StatusRegistry::new();
        registry.add_process(1, 4, "Sort").unwrap();
        registry.set_host_up(1, None).unwrap();
        registry.set_host_down(1).unwrap();

        let snapshot = registry.snapshot();
        assert!(!snapshot[1].up);
        assert_eq!(snapshot[1].processes.len(), 1);
        assert_eq!(snapshot[1].processes[0].label, "Sort");
    }

    #[test]
    fn test_host_up_with_name() {
        let registry = StatusRegistry::new();
        registry.set_host_up(2, Some("lab-server-2")).unwrap();

        let snapshot = registry.snapshot();
        assert!(snapshot[2].up);
        assert_eq!(snapshot[2].name, "lab-server-2");

        // A bare hostUp must not clobber the name
        registry.set_host_up(2, None).unwrap();
        assert_eq!(registry.snapshot()[2].name, "lab-server-2");
    }

    #[test]
    fn test_set_host_name_allows_empty_and_spaces() {
        let registry = StatusRegistry::new();
        registry.set_host_name(0, "rack 3 blade 7").unwrap();
        assert_eq!(registry.snapshot()[0].name, "rack 3 blade 7");

        registry.set_host_name(0, "").unwrap();
        assert_eq!(registry.snapshot()[0].name, "");
    }

    #[test]
    fn test_duplicate_adds_and_label_suffix() {
        let registry = StatusRegistry::new();
        registry.add_process(0, 3, "Sort").unwrap();
        registry.add_process(0, 3, "Sort").unwrap();
        assert_eq!(registry.snapshot()[0].processes[0].label, "Sort 2");

        registry.remove_process(0, 3).unwrap();
        assert_eq!(registry.snapshot()[0].processes[0].label, "Sort");
    }

    #[test]
    fn test_most_recent_add_wins_base_name() {
        let registry = StatusRegistry::new();
        registry.add_process(0, 4, "Sort").unwrap();
        registry.add_process(0, 4, "Sort_v2").unwrap();
        assert_eq!(registry.snapshot()[0].processes[0].label, "Sort_v2 2");
    }

    #[test]
    fn test_remove_clamps_at_zero() {
        let registry = StatusRegistry::new();
        registry.add_process(0, 3, "Sort").unwrap();
        registry.remove_process(0, 3).unwrap();
        assert!(registry.snapshot()[0].processes.is_empty());

        // Extra remove is a no-op, never a negative count
        registry.remove_process(0, 3).unwrap();
        assert!(registry.snapshot()[0].processes.is_empty());

        registry.add_process(0, 3, "Sort").unwrap();
        assert_eq!(registry.snapshot()[0].processes[0].label, "Sort");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let registry = StatusRegistry::new();
        let err = registry.set_host_up(MAX_HOSTS, None).unwrap_err();
        assert_eq!(
            err,
            RegistryError::OutOfRange {
                index: MAX_HOSTS,
                capacity: MAX_HOSTS,
            }
        );
        assert!(registry.set_host_down(usize::MAX).is_err());
        assert!(registry.add_process(MAX_HOSTS, 0, "Shim").is_err());
        assert!(registry.remove_process(MAX_HOSTS, 0).is_err());
        assert!(registry.set_host_name(MAX_HOSTS, "x").is_err());

        // No state change from any rejected operation
        assert_eq!(registry.snapshot(), StatusRegistry::new().snapshot());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let registry = StatusRegistry::new();
        registry.set_host_up(5, Some("worker-5")).unwrap();
        registry.add_process(5, 1, "Voter").unwrap();

        registry.reset();

        let snapshot = registry.snapshot();
        assert!(!snapshot[5].up);
        assert_eq!(snapshot[5].name, "Host #5");
        assert!(snapshot[5].processes.is_empty());
    }

    #[test]
    fn test_concurrent_snapshots_never_torn() {
        let registry = Arc::new(StatusRegistry::new());

        let writer = {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    registry.add_process(3, 7, "Join").unwrap();
                    registry.add_process(3, 7, "Join").unwrap();
                    registry.remove_process(3, 7).unwrap();
                    registry.remove_process(3, 7).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snapshot = registry.snapshot();
                        for process in &snapshot[3].processes {
                            // The label always matches a whole entry: the base
                            // name with either no suffix or the live count.
                            assert!(
                                process.label == "Join" || process.label == "Join 2",
                                "torn label: {}",
                                process.label
                            );
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        assert!(registry.snapshot()[3].processes.is_empty());
    }
}
