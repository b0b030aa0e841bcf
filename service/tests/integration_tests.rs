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

//! Integration tests for the hostboard-service crate
//!
//! Each test runs a real server on an ephemeral port and drives it the way
//! a feed client would, over TCP, then asserts on registry snapshots the
//! way a renderer would.

use hostboard_registry::MAX_HOSTS;
use hostboard_service::{FeedServer, ServerConfig};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

fn test_config() -> ServerConfig {
    ServerConfig::new("127.0.0.1:0".parse().unwrap())
}

async fn started_server(config: ServerConfig) -> FeedServer {
    let server = FeedServer::new(config).await.unwrap();
    server.start().await.unwrap();
    server
}

/// Send a burst of lines on one connection and close it
async fn feed_lines(server: &FeedServer, lines: &str) {
    let mut client = TcpStream::connect(server.bind_address()).await.unwrap();
    client.write_all(lines.as_bytes()).await.unwrap();
    client.shutdown().await.unwrap();
    drop(client);
    // Let the serve loop drain the stream and return to accepting
    tokio::time::sleep(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_host_up_down_leaves_processes() {
    let server = started_server(test_config()).await;

    feed_lines(
        &server,
        "procAdd 6 4 Sort\nhostUp 6 worker-6\nhostDown 6\n",
    )
    .await;

    let snapshot = server.registry().snapshot();
    assert!(!snapshot[6].up);
    assert_eq!(snapshot[6].name, "worker-6");
    assert_eq!(snapshot[6].processes.len(), 1);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_process_labels() {
    let server = started_server(test_config()).await;

    feed_lines(
        &server,
        "procAdd 1 3 Sort\nprocAdd 1 3 Sort\nprocDel 1 3 Sort\n",
    )
    .await;

    // Two adds and one delete leave a single unsuffixed copy
    let snapshot = server.registry().snapshot();
    assert_eq!(snapshot[1].processes.len(), 1);
    assert_eq!(snapshot[1].processes[0].label, "Sort");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_remove_clamps_and_entry_absent() {
    let server = started_server(test_config()).await;

    feed_lines(
        &server,
        "procAdd 0 3 Sort\nprocDel 0 3 Sort\nprocDel 0 3 Sort\n",
    )
    .await;

    assert!(server.registry().snapshot()[0].processes.is_empty());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_lines_produce_no_change() {
    let server = started_server(test_config()).await;

    feed_lines(
        &server,
        &format!("hostUp {MAX_HOSTS}\nhostUp abc\nreboot 3\nprocAdd 999 1 Shim\n"),
    )
    .await;

    let snapshot = server.registry().snapshot();
    assert!(snapshot.iter().all(|host| !host.up && host.processes.is_empty()));

    let metrics = server.metrics().snapshot();
    // Well-formed but out-of-range commands are counted as rejected; the
    // rest never made it past the codec
    assert_eq!(metrics.commands_applied, 0);
    assert_eq!(metrics.commands_rejected, 2);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reconnect_resets_registry_by_default() {
    let server = started_server(test_config()).await;

    feed_lines(&server, "hostUp 2 lab-server-2\nprocAdd 2 1 Voter\n").await;
    assert!(server.registry().snapshot()[2].up);

    // Second connection: the board starts clean, then repopulates
    feed_lines(&server, "hostUp 3\n").await;

    let snapshot = server.registry().snapshot();
    assert!(!snapshot[2].up);
    assert_eq!(snapshot[2].name, "Host #2");
    assert!(snapshot[2].processes.is_empty());
    assert!(snapshot[3].up);

    assert_eq!(server.metrics().total_connections(), 2);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reconnect_persists_registry_when_policy_disabled() {
    let server = started_server(test_config().with_reset_on_connect(false)).await;

    feed_lines(&server, "hostUp 2 lab-server-2\n").await;
    feed_lines(&server, "hostUp 3\n").await;

    let snapshot = server.registry().snapshot();
    assert!(snapshot[2].up);
    assert_eq!(snapshot[2].name, "lab-server-2");
    assert!(snapshot[3].up);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_snapshots_consistent_under_command_burst() {
    let server = started_server(test_config()).await;
    let registry = server.registry();

    let reader = tokio::task::spawn_blocking(move || {
        for _ in 0..2000 {
            let snapshot = registry.snapshot();
            for process in &snapshot[5].processes {
                assert!(
                    process.label == "Join" || process.label == "Join 2",
                    "torn label: {}",
                    process.label
                );
            }
        }
    });

    let mut lines = String::new();
    for _ in 0..1000 {
        lines.push_str("procAdd 5 7 Join\nprocAdd 5 7 Join\nprocDel 5 7 Join\nprocDel 5 7 Join\n");
    }
    feed_lines(&server, &lines).await;

    reader.await.unwrap();

    let metrics = server.metrics().snapshot();
    assert_eq!(metrics.commands_applied, 4000);
    assert!(server.registry().snapshot()[5].processes.is_empty());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_listener_survives_abrupt_disconnect() {
    let server = started_server(test_config()).await;

    // Client that vanishes mid-stream, no clean shutdown
    {
        let mut client = TcpStream::connect(server.bind_address()).await.unwrap();
        client.write_all(b"hostUp 1\nprocAdd 1 ").await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Listener must be back in accepting state and serve the next client
    feed_lines(&server, "hostUp 4 next-client\n").await;

    let snapshot = server.registry().snapshot();
    assert!(snapshot[4].up);
    assert_eq!(snapshot[4].name, "next-client");

    server.shutdown().await.unwrap();
}
