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

use super::{CodecError, FeedCommand};
use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::{debug, warn};

/// Default cap on a single feed line, in bytes
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8192;

/// A codec for the hostboard status feed line protocol.
///
/// `FeedCodec` splits newline-delimited frames off the inbound byte stream
/// and parses each one into a [`FeedCommand`]. Lines that fail to parse are
/// skipped inside `decode`, so a `Framed` stream built on this codec only
/// ever yields valid commands; the feed has no error channel back to the
/// sender and malformed input is dropped on the floor by design.
///
/// A maximum line length bounds the decode buffer. A client that streams
/// bytes without ever sending a newline has the excess discarded until the
/// next line break, exactly as any other malformed line would be.
pub struct FeedCodec {
    max_line_length: usize,
    discarding: bool,
}

impl FeedCodec {
    /// Creates a new `FeedCodec` with the default maximum line length.
    ///
    /// # Example
    /// ```
    /// use hostboard_protocol::FeedCodec;
    ///
    /// let codec = FeedCodec::new();
    /// ```
    pub fn new() -> FeedCodec {
        FeedCodec::default()
    }

    /// Creates a new `FeedCodec` with a custom maximum line length.
    pub fn with_max_line_length(max_line_length: usize) -> FeedCodec {
        FeedCodec {
            max_line_length,
            discarding: false,
        }
    }

    /// The configured maximum line length in bytes
    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Parse one complete frame, newline already stripped
    fn parse_frame(&self, frame: &[u8]) -> Option<FeedCommand> {
        let Ok(text) = std::str::from_utf8(frame) else {
            debug!("dropping non-UTF-8 feed line ({} bytes)", frame.len());
            return None;
        };
        let command = FeedCommand::parse(text);
        if command.is_none() && !text.trim().is_empty() {
            debug!(line = text, "dropping malformed feed line");
        }
        command
    }
}

impl Default for FeedCodec {
    fn default() -> Self {
        FeedCodec {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            discarding: false,
        }
    }
}

impl Decoder for FeedCodec {
    type Item = FeedCommand;
    type Error = CodecError;

    /// Decodes buffered bytes into the next valid `FeedCommand`.
    ///
    /// Scans for a newline, splits the frame off the buffer, and parses it.
    /// Malformed or overlong lines are consumed and skipped in place, so the
    /// loop continues until it produces a valid command or runs out of
    /// complete lines.
    ///
    /// # Returns
    /// - `Ok(Some(FeedCommand))`: the next well-formed command on the stream.
    /// - `Ok(None)`: no complete line buffered yet.
    /// - `Err(CodecError)`: transport-level failure only.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<FeedCommand>, CodecError> {
        loop {
            let newline = src.iter().position(|&byte| byte == b'\n');

            if self.discarding {
                match newline {
                    Some(pos) => {
                        // Tail of an overlong line; resume at the next frame.
                        src.advance(pos + 1);
                        self.discarding = false;
                        continue;
                    }
                    None => {
                        src.clear();
                        return Ok(None);
                    }
                }
            }

            match newline {
                Some(pos) => {
                    let frame = src.split_to(pos + 1);
                    if pos > self.max_line_length {
                        warn!(
                            length = pos,
                            limit = self.max_line_length,
                            "dropping overlong feed line"
                        );
                        continue;
                    }
                    if let Some(command) = self.parse_frame(&frame[..pos]) {
                        return Ok(Some(command));
                    }
                }
                None => {
                    if src.len() > self.max_line_length {
                        warn!(
                            buffered = src.len(),
                            limit = self.max_line_length,
                            "feed line exceeds maximum length, discarding until newline"
                        );
                        src.clear();
                        self.discarding = true;
                    }
                    return Ok(None);
                }
            }
        }
    }

    /// Handles end-of-stream: a final line without a trailing newline is
    /// still parsed rather than reported as a framing error.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<FeedCommand>, CodecError> {
        if let Some(command) = self.decode(src)? {
            return Ok(Some(command));
        }
        if src.is_empty() || self.discarding {
            src.clear();
            self.discarding = false;
            return Ok(None);
        }
        let frame = src.split_to(src.len());
        Ok(self.parse_frame(&frame))
    }
}
