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

//! Integration tests for the hostboard-protocol crate
//!
//! These drive the codec the way the listener does: through a framed
//! asynchronous stream, with writes arriving in arbitrary chunks.

use futures::StreamExt;
use hostboard_protocol::{FeedCodec, FeedCommand};
use tokio::io::AsyncWriteExt;
use tokio_util::codec::FramedRead;
use tracing_test::traced_test;

#[tokio::test]
async fn test_framed_stream_yields_commands_in_order() {
    let (mut writer, reader) = tokio::io::duplex(1024);
    let mut frames = FramedRead::new(reader, FeedCodec::new());

    writer
        .write_all(b"hostUp 0 head-node\nprocAdd 0 4 Sort\nprocAdd 0 4 Sort\nprocDel 0 4 Sort\n")
        .await
        .unwrap();
    drop(writer);

    let commands: Vec<FeedCommand> = frames
        .by_ref()
        .map(|result| result.unwrap())
        .collect()
        .await;

    assert_eq!(
        commands,
        vec![
            FeedCommand::HostUp {
                host: 0,
                name: Some("head-node".to_string()),
            },
            FeedCommand::ProcAdd {
                host: 0,
                proc_num: 4,
                name: "Sort".to_string(),
            },
            FeedCommand::ProcAdd {
                host: 0,
                proc_num: 4,
                name: "Sort".to_string(),
            },
            FeedCommand::ProcDel {
                host: 0,
                proc_num: 4,
                name: "Sort".to_string(),
            },
        ]
    );
}

#[traced_test]
#[tokio::test]
async fn test_framed_stream_survives_garbage_and_split_writes() {
    let (mut writer, reader) = tokio::io::duplex(1024);
    let mut frames = FramedRead::new(reader, FeedCodec::new());

    // A line split across two writes, with junk in between lines
    writer.write_all(b"total nonsense\nhostU").await.unwrap();
    writer.write_all(b"p 3\nhostDown xyz\n").await.unwrap();
    drop(writer);

    let commands: Vec<FeedCommand> = frames
        .by_ref()
        .map(|result| result.unwrap())
        .collect()
        .await;

    assert_eq!(commands, vec![FeedCommand::HostUp { host: 3, name: None }]);
}

#[tokio::test]
async fn test_framed_stream_parses_trailing_line_at_eof() {
    let (mut writer, reader) = tokio::io::duplex(1024);
    let mut frames = FramedRead::new(reader, FeedCodec::new());

    writer.write_all(b"hostUp 1\nhostDown 1").await.unwrap();
    drop(writer);

    let commands: Vec<FeedCommand> = frames
        .by_ref()
        .map(|result| result.unwrap())
        .collect()
        .await;

    assert_eq!(
        commands,
        vec![
            FeedCommand::HostUp { host: 1, name: None },
            FeedCommand::HostDown { host: 1 },
        ]
    );
}
