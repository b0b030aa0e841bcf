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

//! # Hostboard Status Registry
//!
//! The registry is the core data store of the hostboard feed: a fixed-capacity
//! array of host slots, each tracking liveness, a display name, and a set of
//! reference-counted process entries. The network side mutates it one command
//! at a time; the renderer reads it through [`StatusRegistry::snapshot`],
//! which always observes a complete, self-consistent state.
//!
//! # Example
//!
//! ```
//! use hostboard_registry::StatusRegistry;
//!
//! let registry = StatusRegistry::new();
//! registry.set_host_up(2, Some("lab-server-2")).unwrap();
//! registry.add_process(2, 3, "Sort").unwrap();
//!
//! let snapshot = registry.snapshot();
//! assert!(snapshot[2].up);
//! assert_eq!(snapshot[2].name, "lab-server-2");
//! ```

mod error;
mod registry;
mod slot;

pub use error::{RegistryError, RegistryResult};
pub use registry::{MAX_HOSTS, StatusRegistry};
pub use slot::{HostSlot, HostSnapshot, ProcessEntry, ProcessRecord};
