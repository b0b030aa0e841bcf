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

//! Error types for the hostboard feed service

use hostboard_protocol::CodecError;
use hostboard_registry::RegistryError;
use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Feed service error types
#[derive(Debug, Error)]
pub enum FeedError {
    /// I/O error from the underlying TCP stream or listener
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error from the codec layer
    #[error("Protocol error: {0}")]
    Protocol(#[from] CodecError),

    /// Registry error surfaced outside the dispatcher
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Server is not running
    #[error("Server not running")]
    ServerNotRunning,

    /// Generic error with a message
    #[error("{0}")]
    Other(String),
}

impl FeedError {
    /// Check if the error is a connection-level fault
    ///
    /// Connection faults tear down the current connection but never the
    /// server; the listener logs them and returns to accepting.
    pub fn is_connection_fault(&self) -> bool {
        matches!(self, FeedError::Io(_) | FeedError::Protocol(_))
    }
}
