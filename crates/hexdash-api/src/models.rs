// HexStrike dashboard response types
//
// Models for `GET /api/dashboard/live`. The server omits zero-valued
// aggregates, sends `null` for unset fields, and emits counters as either
// integers or floats, so every field deserializes leniently. A malformed
// process entry is dropped on its own; it never costs the whole snapshot.
// Nothing here outlives a single poll.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use tracing::warn;

// ── Snapshot ─────────────────────────────────────────────────────────

/// One polled view of the server's aggregate state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub system_load: SystemLoad,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_processes: u64,
    /// Pre-rendered block from the server, printed verbatim.
    #[serde(default)]
    pub visual_dashboard: Option<String>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub processes: Vec<ProcessRecord>,
}

impl DashboardSnapshot {
    /// The server's visual block, if it sent a non-empty one.
    pub fn visual(&self) -> Option<&str> {
        self.visual_dashboard.as_deref().filter(|v| !v.is_empty())
    }
}

/// Host load metrics reported alongside the process list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemLoad {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpu_percent: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory_percent: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub active_connections: u64,
}

// ── Process ──────────────────────────────────────────────────────────

/// One tracked job as reported by the server.
///
/// Only `pid` is stable across polls; ordering and membership are not.
/// A record without a pid is still listed; it just cannot be targeted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ProcessStatus,
    /// Elapsed time as a numeric string with an `s` suffix, e.g. `"72.5s"`.
    #[serde(default = "default_runtime", deserialize_with = "runtime_or_default")]
    pub runtime: String,
    /// Pre-formatted by the server, e.g. `"50%"`.
    #[serde(default = "default_progress", deserialize_with = "progress_or_default")]
    pub progress_percent: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub bytes_processed: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub command: String,
}

fn default_runtime() -> String {
    "0s".into()
}

fn default_progress() -> String {
    "0%".into()
}

impl ProcessRecord {
    /// Parse `runtime` into seconds. `None` if the server sent something
    /// other than a non-negative number with an optional `s` suffix.
    pub fn runtime_secs(&self) -> Option<f64> {
        let raw = self.runtime.trim();
        let raw = raw.strip_suffix('s').unwrap_or(raw);
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
    }
}

// ── Lenient field decoding ───────────────────────────────────────────

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn runtime_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_runtime))
}

fn progress_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_progress))
}

/// Any JSON number (or `null`) as a non-negative count. Fractions are
/// truncated, negatives clamp to zero, and huge values saturate.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<Number>::deserialize(deserializer)?.map_or(0, |n| count_from(&n)))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn count_from(n: &Number) -> u64 {
    if let Some(count) = n.as_u64() {
        return count;
    }
    match n.as_f64() {
        // `as` saturates float-to-int and maps NaN to zero.
        Some(value) if value > 0.0 => value as u64,
        _ => 0,
    }
}

/// Decode each process entry on its own, skipping the ones that fail.
fn lenient_records<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<ProcessRecord>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|entry| {
            serde_json::from_value(entry)
                .inspect_err(|e| warn!(error = %e, "skipping malformed process entry"))
                .ok()
        })
        .collect())
}

// ── Status ───────────────────────────────────────────────────────────

/// Process status tag. Open-ended: unknown tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessStatus {
    Running,
    Failed,
    Other(String),
}

impl Default for ProcessStatus {
    fn default() -> Self {
        Self::Other("unknown".into())
    }
}

impl ProcessStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::Failed => "failed",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for ProcessStatus {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "running" => Self::Running,
            "failed" => Self::Failed,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for ProcessStatus {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<ProcessStatus> for String {
    fn from(status: ProcessStatus) -> Self {
        match status {
            ProcessStatus::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
