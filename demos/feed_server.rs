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

//! Hostboard Feed Server Example
//!
//! This example runs the feed listener standalone, with a console loop
//! standing in for the renderer:
//! - Listens on port 54321 (optionally bound to a given local address)
//! - Applies feed commands to the shared status registry
//! - Prints a registry snapshot every few seconds, the way a renderer
//!   would read it
//!
//! ## Usage
//!
//! Run the server:
//! ```bash
//! cargo run --example feed_server [bind-address]
//! ```
//!
//! Drive it with a feed client:
//! ```bash
//! printf 'hostUp 2 lab-server-2\nprocAdd 2 4 Sort\n' | nc localhost 54321
//! ```

use hostboard_service::{DEFAULT_PORT, FeedServer, ServerConfig};
use std::net::SocketAddr;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    // Optional bind address argument; resolution failure is fatal
    let bind_address = match std::env::args().nth(1) {
        Some(host) => resolve_bind_address(&host).await?,
        None => SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
    };

    println!("Starting Hostboard feed server on {bind_address}");
    println!("Feed with: printf 'hostUp 0 head-node\\n' | nc localhost {DEFAULT_PORT}");
    println!("Press Ctrl+C to stop the server\n");

    let config = ServerConfig::new(bind_address);
    let server = FeedServer::new(config).await?;
    server.start().await?;

    // Stand-in renderer: poll a consistent snapshot at a fixed cadence
    let registry = server.registry();
    let render_task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            for host in registry.snapshot().iter().filter(|host| host.up) {
                println!("{host}");
                for process in &host.processes {
                    println!("  [{}] {}", process.number, process.label);
                }
            }
        }
    });

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await?;
    println!("\nShutting down server...");

    render_task.abort();
    server.shutdown().await?;
    println!("Server stopped");

    Ok(())
}

/// Resolve the bind-address argument to a socket address on the feed port
async fn resolve_bind_address(host: &str) -> Result<SocketAddr, std::io::Error> {
    let mut addrs = tokio::net::lookup_host((host, DEFAULT_PORT)).await?;
    addrs.next().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::AddrNotAvailable,
            format!("no address found for {host}"),
        )
    })
}
