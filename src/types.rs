use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One decoded unit of the progress stream: a partial record of job state.
///
/// Every field is optional. The producer sends its whole job dictionary on
/// each cycle, but early frames lack the fields that later stages introduce,
/// and nothing downstream may assume presence. Absent numerics read as 0,
/// absent strings as empty, absent collections leave the corresponding view
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    pub stage: Option<String>,
    pub progress: Option<u64>,
    pub total: Option<u64>,
    pub bytes_scanned: Option<u64>,
    pub bytes_total: Option<u64>,
    pub duplicate_bytes: Option<u64>,
    /// Throughput in MB/s.
    pub speed: Option<f64>,
    /// Seconds remaining.
    pub eta: Option<u64>,
    pub dup_groups: Option<u64>,
    pub largest_group: Option<u64>,
    pub cpu: Option<f64>,
    pub mem: Option<f64>,
    /// Free disk space in GB.
    pub free: Option<f64>,
    /// 0-100 ratio for the file currently being hashed.
    pub file_pct: Option<f64>,
    pub current_file: Option<String>,
    /// Identifier resolving to `/thumb/{id}`.
    pub thumbnail: Option<String>,
    /// Full ordered list of names scanned so far; grows by appending.
    pub scanned_names: Option<Vec<String>>,
    /// Full replacement of the pending collection, not a delta.
    pub remaining: Option<Vec<RemainingEntry>>,
    /// Group key (content fingerprint) to member list. The member shape is
    /// producer-defined; only the count is consumed here.
    pub duplicates: Option<BTreeMap<String, Vec<serde_json::Value>>>,
    /// Present only when the pause state is meaningful.
    pub paused: Option<bool>,
    pub done: Option<bool>,
    pub stop: Option<bool>,
}

impl Snapshot {
    /// True when this snapshot carries the end of the job, by completion or
    /// by a user stop.
    pub fn is_terminal(&self) -> bool {
        self.done.unwrap_or(false) || self.stop.unwrap_or(false)
    }
}

/// An entry of the "remaining" collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

/// Outbound job commands, mapped to `POST /control/{job}/{command}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Pause,
    Resume,
    Stop,
}

impl ControlCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlCommand::Pause => "pause",
            ControlCommand::Resume => "resume",
            ControlCommand::Stop => "stop",
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort orders for the remaining view: ascending by name, or descending by
/// size for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Size,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "size" => Ok(SortKey::Size),
            other => Err(format!("unknown sort key '{}' (expected name or size)", other)),
        }
    }
}
