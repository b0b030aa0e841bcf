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

//! Hostboard Feed Service
//!
//! This crate wires the protocol codec and the status registry into a
//! running TCP listener:
//!
//! - One feed connection at a time; commands applied strictly in order
//! - Malformed input and out-of-range hosts dropped silently, never fatal
//! - Consistent registry snapshots for a renderer on another thread
//! - Explicit `start()`/`shutdown()` lifecycle, testable without a display
//!
//! # Architecture
//!
//! ```text
//! FeedServer (accept loop)
//!     ↓ framed lines
//! FeedCodec → FeedCommand
//!     ↓
//! CommandDispatcher
//!     ↓
//! StatusRegistry ← snapshot() ← Renderer (external)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use hostboard_service::{FeedServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = FeedServer::new(ServerConfig::default()).await?;
//!     server.start().await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod dispatcher;
mod error;
mod metrics;
mod server;

pub use config::{DEFAULT_PORT, ServerConfig};
pub use dispatcher::CommandDispatcher;
pub use error::{FeedError, Result};
pub use metrics::{FeedMetrics, MetricsSnapshot};
pub use server::{FeedServer, ServerSnapshot};
