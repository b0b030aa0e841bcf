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

use std::fmt;

///
/// `FeedCommand` is the typed form of one status feed line. Tokens are read
/// left to right: the case-insensitive command keyword, the host index, and
/// whatever parameters the command calls for. Name parameters come in two
/// flavors: `procAdd`/`procDel` take a single whitespace-delimited token,
/// while `hostUp`/`hostname` capture the rest of the line verbatim,
/// embedded spaces included.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedCommand {
    /// Mark a host up, optionally carrying a new display name
    HostUp {
        /// Host slot index
        host: usize,
        /// Rest-of-line display name, when present
        name: Option<String>,
    },
    /// Mark a host down
    HostDown {
        /// Host slot index
        host: usize,
    },
    /// Set a host's display name without touching liveness
    HostName {
        /// Host slot index
        host: usize,
        /// Rest-of-line display name; may be empty
        name: String,
    },
    /// Record one more running copy of a process
    ProcAdd {
        /// Host slot index
        host: usize,
        /// Process number
        proc_num: u32,
        /// Process name token
        name: String,
    },
    /// Record one running copy of a process going away
    ///
    /// The name token is required by the grammar but is not checked against
    /// the stored name.
    ProcDel {
        /// Host slot index
        host: usize,
        /// Process number
        proc_num: u32,
        /// Process name token (accepted, unchecked)
        name: String,
    },
}

impl FeedCommand {
    /// Parse one line of feed text (no trailing newline required)
    ///
    /// Returns `None` for anything that is not a complete, well-formed
    /// command: unknown keyword, missing or non-numeric integer token,
    /// missing required name token. The caller is expected to drop such
    /// lines silently and keep listening.
    pub fn parse(line: &str) -> Option<FeedCommand> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let (keyword, rest) = next_token(line)?;
        let keyword = keyword.to_ascii_lowercase();
        let (host, rest) = next_int::<usize>(rest)?;

        match keyword.as_str() {
            "hostup" => Some(FeedCommand::HostUp {
                host,
                name: rest_of_line(rest).map(str::to_string),
            }),
            "hostdown" => Some(FeedCommand::HostDown { host }),
            "hostname" => Some(FeedCommand::HostName {
                host,
                name: rest_of_line(rest).unwrap_or_default().to_string(),
            }),
            "procadd" | "procdel" => {
                let (proc_num, rest) = next_int::<u32>(rest)?;
                let (name, _) = next_token(rest)?;
                if keyword == "procadd" {
                    Some(FeedCommand::ProcAdd {
                        host,
                        proc_num,
                        name: name.to_string(),
                    })
                } else {
                    Some(FeedCommand::ProcDel {
                        host,
                        proc_num,
                        name: name.to_string(),
                    })
                }
            }
            _ => None,
        }
    }

    /// The host slot index this command targets
    pub fn host(&self) -> usize {
        match self {
            FeedCommand::HostUp { host, .. }
            | FeedCommand::HostDown { host }
            | FeedCommand::HostName { host, .. }
            | FeedCommand::ProcAdd { host, .. }
            | FeedCommand::ProcDel { host, .. } => *host,
        }
    }
}

impl fmt::Display for FeedCommand {
    /// Render the command back into its wire form
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedCommand::HostUp { host, name: Some(name) } => {
                write!(f, "hostUp {host} {name}")
            }
            FeedCommand::HostUp { host, name: None } => write!(f, "hostUp {host}"),
            FeedCommand::HostDown { host } => write!(f, "hostDown {host}"),
            FeedCommand::HostName { host, name } => write!(f, "hostname {host} {name}"),
            FeedCommand::ProcAdd { host, proc_num, name } => {
                write!(f, "procAdd {host} {proc_num} {name}")
            }
            FeedCommand::ProcDel { host, proc_num, name } => {
                write!(f, "procDel {host} {proc_num} {name}")
            }
        }
    }
}

/// Split the next whitespace-delimited token off the input
fn next_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.find(char::is_whitespace) {
        Some(pos) => Some((&input[..pos], &input[pos..])),
        None => Some((input, "")),
    }
}

/// Parse the next token as an integer
fn next_int<T: std::str::FromStr>(input: &str) -> Option<(T, &str)> {
    let (token, rest) = next_token(input)?;
    token.parse().ok().map(|value| (value, rest))
}

/// Consume the remainder of the line, embedded spaces and all
///
/// Leading whitespace after the previous token is stripped; returns `None`
/// when nothing but whitespace remains.
fn rest_of_line(input: &str) -> Option<&str> {
    let rest = input.trim_start();
    (!rest.is_empty()).then_some(rest)
}
