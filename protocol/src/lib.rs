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

//! # Hostboard Feed Protocol Codec
//!
//! This crate implements the hostboard status feed wire protocol: UTF-8
//! text, one command per line, whitespace-delimited tokens, case-insensitive
//! command keyword. The protocol is unidirectional; the server never writes
//! anything back to the feed client.
//!
//! ## Grammar
//!
//! | command    | parameters                                  |
//! |------------|---------------------------------------------|
//! | `hostDown` | `<host>`                                    |
//! | `hostUp`   | `<host> [name...]` (rest of line, optional) |
//! | `hostname` | `<host> <name...>` (rest of line, may be empty) |
//! | `procAdd`  | `<host> <proc> <name>` (single token)       |
//! | `procDel`  | `<host> <proc> <name>` (single token)       |
//!
//! Parsing is best effort by design: an unrecognized keyword, a missing or
//! non-numeric integer token, or a missing required name token drops the
//! whole line silently. A line either becomes a fully formed
//! [`FeedCommand`] or nothing; there is no partial application and no error
//! is surfaced to the sender.
//!
//! ## Core Components
//!
//! ### [`FeedCommand`]
//!
//! The typed form of one protocol line, produced by [`FeedCommand::parse`].
//!
//! ### [`FeedCodec`]
//!
//! A [`Decoder`](tokio_util::codec::Decoder) that splits newline-delimited
//! frames off the stream (tolerating `\r\n`), skips malformed lines inside
//! `decode`, and bounds buffering with a maximum line length, so a framed
//! stream only ever yields valid commands.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use hostboard_protocol::{FeedCodec, FeedCommand};
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! # fn example() -> Result<(), hostboard_protocol::CodecError> {
//! let mut codec = FeedCodec::new();
//! let mut input = BytesMut::from(&b"hostUp 2 lab-server-2\nbogus line\n"[..]);
//!
//! while let Some(command) = codec.decode(&mut input)? {
//!     match command {
//!         FeedCommand::HostUp { host, name } => {
//!             println!("host {host} up, name {name:?}");
//!         }
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod codec;
mod command;
mod result;

pub use codec::{DEFAULT_MAX_LINE_LENGTH, FeedCodec};
pub use command::FeedCommand;
pub use result::{CodecError, CodecResult};
