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

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Represents possible errors that can occur in the codec handling process.
///
/// Malformed lines are not errors; they are dropped inside the decoder by
/// design. The only failures the codec surfaces are transport-level ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An I/O error occurred while reading from the underlying stream.
    ///
    /// Contains the error kind and a description of what operation failed.
    IOError {
        /// The kind of I/O error that occurred
        kind: std::io::ErrorKind,
        /// Description of the operation that failed
        operation: String,
    },
}

impl std::error::Error for CodecError {}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::IOError { kind, operation } => {
                write!(f, "I/O error during {}: {:?}", operation, kind)
            }
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IOError {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = CodecError::from(io);
        assert!(matches!(
            err,
            CodecError::IOError {
                kind: std::io::ErrorKind::ConnectionReset,
                ..
            }
        ));
    }
}
