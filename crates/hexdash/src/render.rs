//! Dashboard frame rendering.
//!
//! Turns one (possibly absent) snapshot into the full text of a frame:
//! header, server visual block, system metrics, process table, footer.
//! Rendering is pure; the caller decides where the text goes.

use std::time::Duration;

use chrono::{DateTime, Local};
use tabled::settings::Style as TableStyle;
use tabled::{Table, Tabled};

use hexdash_api::{DashboardSnapshot, ProcessRecord};

use crate::format::{fmt_bytes, fmt_grouped, fmt_runtime, truncate_command};
use crate::style::{Palette, Tone, status_tone};

const BANNER_WIDTH: usize = 78;
const TITLE: &str = "HexStrike AI Live Dashboard";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const NO_PROCESSES: &str = "No active processes found.";
pub const FETCH_FAILED: &str = "Failed to retrieve dashboard data";
/// PID cell for a record the server sent without one.
pub const NO_PID: &str = "N/A";
pub const KEY_HINT: &str = "Press Ctrl+C to quit. Use --terminate/--pause/--resume <pid> to control a process.";

#[derive(Tabled)]
struct ProcessRow {
    #[tabled(rename = "PID")]
    pid: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Runtime")]
    runtime: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Data")]
    data: String,
    #[tabled(rename = "Command")]
    command: String,
}

/// Renders dashboard frames for one server and refresh cadence.
#[derive(Debug, Clone)]
pub struct Renderer {
    palette: Palette,
    api_base: String,
    refresh: Duration,
}

impl Renderer {
    pub fn new(palette: Palette, api_base: impl Into<String>, refresh: Duration) -> Self {
        Self {
            palette,
            api_base: api_base.into(),
            refresh,
        }
    }

    /// Render a complete frame. `None` renders the fetch-failure view.
    pub fn render(&self, snapshot: Option<&DashboardSnapshot>, now: DateTime<Local>) -> String {
        let mut lines = Vec::new();
        self.header(&mut lines);

        match snapshot {
            Some(snapshot) => {
                if let Some(visual) = snapshot.visual() {
                    lines.push(visual.to_owned());
                    lines.push(String::new());
                }
                self.metrics(&mut lines, snapshot);
                self.processes(&mut lines, &snapshot.processes);
            }
            None => self.unavailable(&mut lines),
        }

        self.footer(&mut lines, now);

        let mut frame = lines.join("\n");
        frame.push('\n');
        frame
    }

    fn header(&self, lines: &mut Vec<String>) {
        let p = self.palette;
        let bar = "═".repeat(BANNER_WIDTH);
        let title = format!("{TITLE:^BANNER_WIDTH$}");
        lines.push(p.paint(Tone::Frame, format!("╔{bar}╗")));
        lines.push(format!(
            "{}{}{}",
            p.paint(Tone::Frame, "║"),
            p.paint(Tone::Title, title),
            p.paint(Tone::Frame, "║"),
        ));
        lines.push(p.paint(Tone::Frame, format!("╚{bar}╝")));
        lines.push(String::new());
    }

    fn metrics(&self, lines: &mut Vec<String>, snapshot: &DashboardSnapshot) {
        let p = self.palette;
        let load = &snapshot.system_load;

        lines.push(p.paint(Tone::Warning, "System Metrics:"));
        lines.push(format!(
            "   {} {}%",
            p.paint(Tone::Label, "CPU Usage:"),
            load.cpu_percent
        ));
        lines.push(format!(
            "   {} {}%",
            p.paint(Tone::Label, "Memory Usage:"),
            load.memory_percent
        ));
        lines.push(format!(
            "   {} {}",
            p.paint(Tone::Label, "Active Connections:"),
            fmt_grouped(load.active_connections)
        ));
        lines.push(format!(
            "   {} {}",
            p.paint(Tone::Label, "Total Processes:"),
            snapshot.total_processes
        ));
        lines.push(String::new());
    }

    fn processes(&self, lines: &mut Vec<String>, processes: &[ProcessRecord]) {
        let p = self.palette;

        if processes.is_empty() {
            lines.push(p.paint(Tone::Warning, NO_PROCESSES));
            return;
        }

        lines.push(p.paint(Tone::Heading, "Active Security Processes:"));
        let rows: Vec<ProcessRow> = processes.iter().map(|proc| self.row(proc)).collect();
        lines.push(Table::new(rows).with(TableStyle::rounded()).to_string());
        lines.push(String::new());
    }

    fn row(&self, proc: &ProcessRecord) -> ProcessRow {
        let p = self.palette;
        // An unparsable runtime is shown as the server sent it.
        let runtime = proc
            .runtime_secs()
            .map_or_else(|| proc.runtime.clone(), fmt_runtime);

        ProcessRow {
            pid: p.paint(
                Tone::Emphasis,
                proc.pid.map_or_else(|| NO_PID.to_owned(), |pid| pid.to_string()),
            ),
            status: p.paint(status_tone(&proc.status), &proc.status),
            runtime,
            progress: proc.progress_percent.clone(),
            data: fmt_bytes(proc.bytes_processed),
            command: truncate_command(&proc.command),
        }
    }

    fn unavailable(&self, lines: &mut Vec<String>) {
        let p = self.palette;
        lines.push(p.paint(Tone::Failure, FETCH_FAILED));
        lines.push("Please check if the HexStrike AI server is running and accessible.".into());
        lines.push(format!("Server URL: {}", self.api_base));
        lines.push(String::new());
    }

    fn footer(&self, lines: &mut Vec<String>, now: DateTime<Local>) {
        let p = self.palette;
        lines.push(p.paint(
            Tone::Info,
            format!("Last updated: {}", now.format(TIMESTAMP_FORMAT)),
        ));
        lines.push(p.paint(Tone::Warning, KEY_HINT));
        lines.push(p.paint(
            Tone::Warning,
            format!("Refreshing every {}s", self.refresh.as_secs()),
        ));
    }
}
