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

//! Error types for the status registry

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Status registry error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A host index outside the fixed slot range was rejected.
    ///
    /// Out-of-range indices are never allocated; the operation that carried
    /// one produces no state change.
    #[error("host index {index} out of range (capacity {capacity})")]
    OutOfRange {
        /// The rejected host index
        index: usize,
        /// The registry's fixed slot capacity
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::OutOfRange {
            index: 16,
            capacity: 16,
        };
        assert_eq!(err.to_string(), "host index 16 out of range (capacity 16)");
    }
}
