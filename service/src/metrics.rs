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

//! Lock-free metrics for the feed server

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lock-free feed server metrics
///
/// All metrics are stored as atomics and can be accessed concurrently
/// without locks. Use the `snapshot()` method to get a consistent view
/// of all metrics at a point in time.
#[derive(Debug)]
pub struct FeedMetrics {
    // Connection counts
    total_connections: AtomicU64,
    active_connections: AtomicU64,

    // Command throughput
    commands_applied: AtomicU64,
    commands_rejected: AtomicU64,

    // Errors
    connection_errors: AtomicU64,

    // Timing (stored as nanoseconds)
    total_connection_duration_ns: AtomicU64,

    // Server start time
    started_at: Instant,
}

impl Default for FeedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedMetrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_connections: AtomicU64::new(0),
            active_connections: AtomicU64::new(0),
            commands_applied: AtomicU64::new(0),
            commands_rejected: AtomicU64::new(0),
            connection_errors: AtomicU64::new(0),
            total_connection_duration_ns: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Record a new feed connection being opened
    pub fn connection_opened(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a feed connection being closed
    pub fn connection_closed(&self, duration: Duration) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
        self.total_connection_duration_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Get the current number of active connections
    ///
    /// The feed serves one client at a time, so this is 0 or 1.
    pub fn active_connections(&self) -> u64 {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Get the total number of connections since server start
    pub fn total_connections(&self) -> u64 {
        self.total_connections.load(Ordering::Relaxed)
    }

    /// Record a command applied to the registry
    pub fn command_applied(&self) {
        self.commands_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a command rejected by the dispatcher
    pub fn command_rejected(&self) {
        self.commands_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection error
    pub fn connection_error(&self) {
        self.connection_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a consistent snapshot of all metrics
    ///
    /// This creates a point-in-time view of all metrics. Note that the
    /// snapshot may not be perfectly consistent if metrics are being
    /// updated concurrently, but it will be close enough for monitoring
    /// purposes.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            commands_rejected: self.commands_rejected.load(Ordering::Relaxed),
            connection_errors: self.connection_errors.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
            avg_connection_duration: self.average_connection_duration(),
        }
    }

    fn average_connection_duration(&self) -> Duration {
        let total = self.total_connections.load(Ordering::Relaxed);
        if total == 0 {
            return Duration::ZERO;
        }
        let total_ns = self.total_connection_duration_ns.load(Ordering::Relaxed);
        Duration::from_nanos(total_ns / total)
    }
}

/// A snapshot of feed server metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Total connections since server start
    pub total_connections: u64,
    /// Current active connections (0 or 1)
    pub active_connections: u64,
    /// Total commands applied to the registry
    pub commands_applied: u64,
    /// Total commands rejected by the dispatcher
    pub commands_rejected: u64,
    /// Total connection errors
    pub connection_errors: u64,
    /// Server uptime
    pub uptime: Duration,
    /// Average connection duration
    pub avg_connection_duration: Duration,
}

impl MetricsSnapshot {
    /// Calculate commands applied per second
    pub fn commands_per_sec(&self) -> f64 {
        if self.uptime.is_zero() {
            return 0.0;
        }
        self.commands_applied as f64 / self.uptime.as_secs_f64()
    }

    /// Total commands seen, applied and rejected
    pub fn total_commands(&self) -> u64 {
        self.commands_applied + self.commands_rejected
    }
}
