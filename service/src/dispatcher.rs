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

//! Command dispatcher
//!
//! The dispatcher is the single choke point between the wire and the
//! registry: every parsed command passes through it, and the host index
//! bound is enforced here before any mutation. A command is applied whole
//! or not at all. Dispatch is synchronous and side-effect-only; the feed is
//! fire-and-forget and nothing is ever written back to the sender.

use hostboard_protocol::FeedCommand;
use hostboard_registry::{RegistryError, StatusRegistry};
use std::sync::Arc;
use tracing::debug;

/// Applies parsed feed commands to the status registry
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    registry: Arc<StatusRegistry>,
}

impl CommandDispatcher {
    /// Create a dispatcher over the given registry
    pub fn new(registry: Arc<StatusRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher mutates
    pub fn registry(&self) -> &Arc<StatusRegistry> {
        &self.registry
    }

    /// Apply one command to the registry
    ///
    /// Returns `true` when the command was applied, `false` when it was
    /// rejected for an out-of-range host index. Rejection is silent toward
    /// the sender; it is logged at debug and counted by the caller.
    pub fn dispatch(&self, command: &FeedCommand) -> bool {
        let result = match command {
            FeedCommand::HostUp { host, name } => {
                self.registry.set_host_up(*host, name.as_deref())
            }
            FeedCommand::HostDown { host } => self.registry.set_host_down(*host),
            FeedCommand::HostName { host, name } => self.registry.set_host_name(*host, name),
            FeedCommand::ProcAdd { host, proc_num, name } => {
                self.registry.add_process(*host, *proc_num, name)
            }
            FeedCommand::ProcDel { host, proc_num, .. } => {
                self.registry.remove_process(*host, *proc_num)
            }
        };

        match result {
            Ok(()) => true,
            Err(RegistryError::OutOfRange { index, capacity }) => {
                debug!(index, capacity, %command, "dropping command for out-of-range host");
                false
            }
        }
    }
}
