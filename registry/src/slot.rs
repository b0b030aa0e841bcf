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

//! Host slot and process entry types
//!
//! A [`HostSlot`] is the live, mutable record for one host index. The
//! snapshot types ([`HostSnapshot`], [`ProcessRecord`]) are the immutable
//! copies handed to the renderer; they carry the derived display label
//! rather than the raw reference count.

use std::collections::HashMap;
use std::fmt;

/// Per-host record of one running process number
///
/// Tracks how many outstanding "add" events exist for the process number.
/// The entry only exists while `ref_count > 0`; removal at a count of one
/// deletes the entry outright, so the count can never go negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    /// Name supplied by the most recent add for this process number
    pub base_name: String,
    /// Outstanding adds not yet matched by removes
    pub ref_count: u32,
}

impl ProcessEntry {
    /// Create an entry for a first add
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            ref_count: 1,
        }
    }

    /// Derived display label
    ///
    /// The bare base name while a single copy is running, suffixed with the
    /// current count once duplicates appear (`"Sort"`, then `"Sort 2"`).
    pub fn label(&self) -> String {
        if self.ref_count > 1 {
            format!("{} {}", self.base_name, self.ref_count)
        } else {
            self.base_name.clone()
        }
    }
}

/// Live state of one host slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSlot {
    /// Liveness flag
    pub up: bool,
    /// Human-readable label
    pub name: String,
    /// Running processes keyed by process number
    pub processes: HashMap<u32, ProcessEntry>,
}

impl HostSlot {
    /// Create a slot in its default state for the given index
    ///
    /// Hosts start down, with the placeholder name `"Host #<index>"` and an
    /// empty process map.
    pub fn new(index: usize) -> Self {
        Self {
            up: false,
            name: format!("Host #{index}"),
            processes: HashMap::new(),
        }
    }

    /// Copy this slot into its immutable snapshot form
    pub fn to_snapshot(&self) -> HostSnapshot {
        let mut processes: Vec<ProcessRecord> = self
            .processes
            .iter()
            .map(|(&number, entry)| ProcessRecord {
                number,
                label: entry.label(),
            })
            .collect();
        processes.sort_by_key(|record| record.number);
        HostSnapshot {
            up: self.up,
            name: self.name.clone(),
            processes,
        }
    }
}

/// One process as seen by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    /// Process number (row position in the rendered panel)
    pub number: u32,
    /// Display label, duplicate count already applied
    pub label: String,
}

/// Immutable copy of one host slot at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSnapshot {
    /// Liveness flag
    pub up: bool,
    /// Human-readable label
    pub name: String,
    /// Running processes, ordered by process number
    pub processes: Vec<ProcessRecord>,
}

impl fmt::Display for HostSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} process(es)",
            self.name,
            if self.up { "up" } else { "down" },
            self.processes.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_label_no_suffix_for_single_copy() {
        let entry = ProcessEntry::new("Sort");
        assert_eq!(entry.label(), "Sort");
    }

    #[test]
    fn test_entry_label_suffix_for_duplicates() {
        let mut entry = ProcessEntry::new("Sort");
        entry.ref_count = 2;
        assert_eq!(entry.label(), "Sort 2");
        entry.ref_count = 1;
        assert_eq!(entry.label(), "Sort");
    }

    #[test]
    fn test_slot_defaults() {
        let slot = HostSlot::new(7);
        assert!(!slot.up);
        assert_eq!(slot.name, "Host #7");
        assert!(slot.processes.is_empty());
    }

    #[test]
    fn test_snapshot_ordered_by_process_number() {
        let mut slot = HostSlot::new(0);
        slot.processes.insert(5, ProcessEntry::new("Join"));
        slot.processes.insert(3, ProcessEntry::new("Shim"));
        slot.processes.insert(4, ProcessEntry::new("Sort"));

        let snapshot = slot.to_snapshot();
        let numbers: Vec<u32> = snapshot.processes.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![3, 4, 5]);
    }
}
