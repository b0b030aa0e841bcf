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

//! Feed server configuration
//!
//! There is no configuration file and no environment variables; everything
//! the listener needs is carried in [`ServerConfig`], normally just the
//! bind address.
//!
//! # Example
//!
//! ```
//! use hostboard_service::ServerConfig;
//!
//! let config = ServerConfig::new("127.0.0.1:54321".parse().unwrap())
//!     .with_reset_on_connect(false);
//! ```

use hostboard_protocol::DEFAULT_MAX_LINE_LENGTH;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default TCP port the feed listens on
pub const DEFAULT_PORT: u16 = 54321;

/// Feed server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the TCP listener to
    pub bind_address: SocketAddr,

    /// Maximum accepted line length in bytes; longer lines are discarded
    pub max_line_length: usize,

    /// Reset the registry to defaults when a new feed connection begins
    ///
    /// On by default, so a restarted feed starts from a clean board. Turn
    /// off to let state persist across connections instead.
    pub reset_on_connect: bool,

    /// Backoff after a failed accept, to avoid a tight error loop
    pub accept_retry_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            reset_on_connect: true,
            accept_retry_delay: Duration::from_millis(100),
        }
    }
}

impl ServerConfig {
    /// Create a configuration with the given bind address
    pub fn new(bind_address: SocketAddr) -> Self {
        Self {
            bind_address,
            ..Default::default()
        }
    }

    /// Set the maximum line length
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Enable or disable the reset-on-connect policy
    pub fn with_reset_on_connect(mut self, enabled: bool) -> Self {
        self.reset_on_connect = enabled;
        self
    }

    /// Set the backoff applied after a failed accept
    pub fn with_accept_retry_delay(mut self, delay: Duration) -> Self {
        self.accept_retry_delay = delay;
        self
    }
}
