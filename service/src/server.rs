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

//! Feed server implementation
//!
//! The FeedServer is the main entry point for the listener. It manages the
//! TCP listener, accepts one feed connection at a time, and pumps decoded
//! commands through the dispatcher into the registry.
//!
//! The serve loop is intentionally serial: accept, serve the client to
//! end-of-stream or I/O fault, return to accepting. While a connection is
//! being served no second client is accepted, and there is no read timeout,
//! so a slow or silent client blocks new connections indefinitely. That is
//! the protocol's documented liveness limitation, not a fault to recover
//! from. Per-connection I/O faults are logged and never fatal; only a
//! failed bind at startup aborts.

use crate::{CommandDispatcher, FeedError, FeedMetrics, Result, ServerConfig};
use futures::StreamExt;
use hostboard_protocol::FeedCodec;
use hostboard_registry::StatusRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedRead;

/// Hostboard feed server
///
/// Binds on construction, accepts connections after [`start`](Self::start),
/// and runs until [`shutdown`](Self::shutdown). The lifecycle is explicit
/// and independent of any presentation object; a renderer only ever touches
/// the registry handle returned by [`registry`](Self::registry).
///
/// # Example
///
/// ```no_run
/// use hostboard_service::{FeedServer, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = FeedServer::new(ServerConfig::default()).await?;
///     server.start().await?;
///
///     // Renderer side: poll a consistent snapshot at its own cadence
///     let registry = server.registry();
///     let _snapshot = registry.snapshot();
///
///     server.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct FeedServer {
    /// Server configuration
    config: ServerConfig,
    /// Shared host/process status registry
    registry: Arc<StatusRegistry>,
    /// Server metrics
    metrics: Arc<FeedMetrics>,
    /// TCP listener (wrapped in Arc<Mutex> for sharing with accept loop)
    listener: Arc<tokio::sync::Mutex<TcpListener>>,
    /// Actual bind address
    bind_address: SocketAddr,
    /// Server start time
    started_at: Instant,
    /// Running flag
    running: Arc<AtomicBool>,
    /// Shutdown notification
    shutdown_notify: Arc<Notify>,
    /// Accept loop task handle
    accept_handle: Arc<tokio::sync::Mutex<Option<JoinHandle<()>>>>,
}

impl FeedServer {
    /// Create a new server with the given configuration
    ///
    /// This binds to the configured address but does not start accepting
    /// connections; call `start()` for that. A bind failure is the one
    /// fatal startup error and is returned to the caller.
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_address).await?;
        let actual_addr = listener.local_addr()?;

        let registry = Arc::new(StatusRegistry::new());
        let metrics = Arc::new(FeedMetrics::new());

        tracing::info!("Feed server bound to {}", actual_addr);

        Ok(Self {
            config,
            registry,
            metrics,
            listener: Arc::new(tokio::sync::Mutex::new(listener)),
            bind_address: actual_addr,
            started_at: Instant::now(),
            running: Arc::new(AtomicBool::new(false)),
            shutdown_notify: Arc::new(Notify::new()),
            accept_handle: Arc::new(tokio::sync::Mutex::new(None)),
        })
    }

    /// Start the server
    ///
    /// This spawns the accept loop task. The server keeps accepting and
    /// serving connections, one at a time, until `shutdown()` is called.
    pub async fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(FeedError::Other("Server already running".to_string()));
        }

        tracing::info!("Starting feed server on {}", self.bind_address);

        let handle = self.spawn_accept_loop().await;
        *self.accept_handle.lock().await = Some(handle);

        Ok(())
    }

    /// Spawn the accept loop task
    async fn spawn_accept_loop(&self) -> JoinHandle<()> {
        let listener = self.listener.clone();
        let registry = self.registry.clone();
        let metrics = self.metrics.clone();
        let config = self.config.clone();
        let running = self.running.clone();
        let shutdown_notify = self.shutdown_notify.clone();

        tokio::spawn(async move {
            let dispatcher = CommandDispatcher::new(registry.clone());

            loop {
                if !running.load(Ordering::SeqCst) {
                    break;
                }

                tracing::info!("Waiting for feed connection");
                let accept_result = tokio::select! {
                    result = async {
                        listener.lock().await.accept().await
                    } => result,
                    _ = shutdown_notify.notified() => break,
                };

                match accept_result {
                    Ok((socket, peer_addr)) => {
                        tracing::info!("Feed connection established from {}", peer_addr);
                        metrics.connection_opened();

                        if config.reset_on_connect {
                            registry.reset();
                            tracing::debug!("registry reset for new feed connection");
                        }

                        let connected_at = Instant::now();
                        let interrupted = tokio::select! {
                            result = Self::serve_connection(
                                socket,
                                &dispatcher,
                                &metrics,
                                config.max_line_length,
                            ) => {
                                match result {
                                    Ok(()) => {
                                        tracing::info!("Feed connection from {} closed", peer_addr);
                                    }
                                    Err(e) => {
                                        // Connection faults are never fatal;
                                        // fall through to the next accept.
                                        tracing::warn!(
                                            "Feed connection from {} failed: {}",
                                            peer_addr,
                                            e
                                        );
                                        metrics.connection_error();
                                    }
                                }
                                false
                            }
                            _ = shutdown_notify.notified() => true,
                        };
                        metrics.connection_closed(connected_at.elapsed());
                        if interrupted {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to accept connection: {}", e);
                        metrics.connection_error();

                        // Back off on errors to avoid a tight loop
                        tokio::time::sleep(config.accept_retry_delay).await;
                    }
                }
            }

            tracing::info!("Accept loop terminated");
        })
    }

    /// Serve one feed connection to end-of-stream
    ///
    /// Commands are applied strictly in arrival order, one line at a time.
    /// Reads block without timeout; the codec drops malformed lines before
    /// they reach the dispatcher.
    async fn serve_connection(
        socket: TcpStream,
        dispatcher: &CommandDispatcher,
        metrics: &FeedMetrics,
        max_line_length: usize,
    ) -> Result<()> {
        let codec = FeedCodec::with_max_line_length(max_line_length);
        let mut frames = FramedRead::new(socket, codec);

        while let Some(frame) = frames.next().await {
            let command = frame?;
            if dispatcher.dispatch(&command) {
                metrics.command_applied();
            } else {
                metrics.command_rejected();
            }
        }

        Ok(())
    }

    /// Shutdown the server gracefully
    ///
    /// This stops the accept loop, dropping any connection being served.
    pub async fn shutdown(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(FeedError::ServerNotRunning);
        }

        tracing::info!("Shutting down feed server");

        self.shutdown_notify.notify_waiters();

        if let Some(handle) = self.accept_handle.lock().await.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }

        tracing::info!("Feed server shutdown complete");

        Ok(())
    }

    /// Check if the server is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the server's bind address
    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Get the shared status registry
    ///
    /// This is the renderer-facing handle; call
    /// [`StatusRegistry::snapshot`] on it at whatever cadence the
    /// presentation layer refreshes.
    pub fn registry(&self) -> Arc<StatusRegistry> {
        self.registry.clone()
    }

    /// Get the server metrics
    pub fn metrics(&self) -> Arc<FeedMetrics> {
        self.metrics.clone()
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get a snapshot of the server state
    pub fn snapshot(&self) -> ServerSnapshot {
        ServerSnapshot {
            serving_connection: self.metrics.active_connections() > 0,
            total_connections: self.metrics.total_connections(),
            bind_address: self.bind_address,
            uptime: self.started_at.elapsed(),
            started_at: self.started_at,
        }
    }
}

impl std::fmt::Debug for FeedServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedServer")
            .field("bind_address", &self.bind_address())
            .field("running", &self.is_running())
            .field("total_connections", &self.metrics.total_connections())
            .field("uptime", &self.started_at.elapsed())
            .finish()
    }
}

// Implement Drop to ensure cleanup
impl Drop for FeedServer {
    fn drop(&mut self) {
        if self.running.load(Ordering::SeqCst) {
            tracing::warn!("FeedServer dropped while still running");
            self.running.store(false, Ordering::SeqCst);
            self.shutdown_notify.notify_waiters();
        }
    }
}

/// Server state snapshot for non-blocking debug information
#[derive(Debug, Clone)]
pub struct ServerSnapshot {
    /// Whether a feed connection is currently being served
    pub serving_connection: bool,
    /// Total connections since server start
    pub total_connections: u64,
    /// Server bind address
    pub bind_address: SocketAddr,
    /// Server uptime
    pub uptime: Duration,
    /// Server start time
    pub started_at: Instant,
}

impl std::fmt::Display for ServerSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FeedServer {{ serving: {}, total: {}, addr: {}, uptime: {:?} }}",
            self.serving_connection, self.total_connections, self.bind_address, self.uptime
        )
    }
}
