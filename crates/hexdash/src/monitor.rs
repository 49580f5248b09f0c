//! Polling modes: one-shot snapshot and the interactive refresh loop.
//!
//! Both modes fail fast when the initial health check fails. After that,
//! every poll is a single attempt; a failed fetch renders the failure view
//! and the loop carries on at the next tick.

use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use chrono::Local;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use tokio::time::sleep;
use tracing::{debug, info};

use hexdash_api::{ApiClient, DashboardSnapshot};
use hexdash_config::DashboardConfig;

use crate::error::CliError;
use crate::render::Renderer;
use crate::style::{Palette, Tone};

/// Delay between the "connected" message and the first frame.
pub const STARTUP_PAUSE: Duration = Duration::from_secs(2);

/// Drives the dashboard against one server, writing frames to `out`.
pub struct Monitor<'a, W> {
    client: &'a ApiClient,
    renderer: Renderer,
    palette: Palette,
    api_base: String,
    refresh: Duration,
    startup_pause: Duration,
    clear_screen: bool,
    out: W,
}

impl<'a, W: Write> Monitor<'a, W> {
    pub fn new(client: &'a ApiClient, config: &DashboardConfig, palette: Palette, out: W) -> Self {
        let api_base = config.api_base_display().to_owned();
        Self {
            client,
            renderer: Renderer::new(palette, api_base.clone(), config.refresh_interval),
            palette,
            api_base,
            refresh: config.refresh_interval,
            startup_pause: STARTUP_PAUSE,
            clear_screen: true,
            out,
        }
    }

    #[cfg(test)]
    pub fn with_startup_pause(mut self, pause: Duration) -> Self {
        self.startup_pause = pause;
        self
    }

    /// Clear the terminal before each frame (on by default).
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    /// Consume the monitor, returning the writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    // ── Modes ────────────────────────────────────────────────────────

    /// Health check, one fetch, one frame.
    pub async fn run_once(&mut self) -> Result<(), CliError> {
        self.say(Tone::Success, "HexStrike AI Dashboard Snapshot")?;
        writeln!(self.out)?;

        self.ensure_reachable().await?;

        let snapshot = self.client.fetch_snapshot().await;
        self.draw(snapshot.as_ref())?;
        Ok(())
    }

    /// Health check, then poll and redraw until `shutdown` resolves.
    pub async fn run_interactive(
        &mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), CliError> {
        self.say(Tone::Success, "Starting HexStrike AI Live Dashboard...")?;
        let checking = format!("Checking server connection at {}...", self.api_base);
        self.say(Tone::Info, checking)?;

        self.ensure_reachable().await?;

        self.say(Tone::Success, "Connected to HexStrike server")?;
        self.say(Tone::Warning, "Starting live dashboard monitoring...")?;

        tokio::pin!(shutdown);

        let interrupted = tokio::select! {
            () = &mut shutdown => true,
            () = sleep(self.startup_pause) => false,
        };
        if !interrupted {
            let frames = self.poll_until(shutdown).await?;
            debug!(frames, "refresh loop stopped");
        }

        writeln!(self.out)?;
        self.say(Tone::Success, "Dashboard monitoring stopped")?;
        Ok(())
    }

    // ── Loop ─────────────────────────────────────────────────────────

    /// Fetch, draw, sleep, repeat. Returns the number of frames drawn once
    /// `shutdown` resolves; shutdown is honored mid-fetch and mid-sleep.
    pub async fn poll_until(&mut self, shutdown: impl Future<Output = ()>) -> io::Result<u64> {
        tokio::pin!(shutdown);
        let mut frames = 0_u64;

        loop {
            let snapshot = tokio::select! {
                () = &mut shutdown => return Ok(frames),
                snapshot = self.client.fetch_snapshot() => snapshot,
            };

            self.draw(snapshot.as_ref())?;
            frames += 1;

            tokio::select! {
                () = &mut shutdown => return Ok(frames),
                () = sleep(self.refresh) => {}
            }
        }
    }

    // ── Output ───────────────────────────────────────────────────────

    async fn ensure_reachable(&mut self) -> Result<(), CliError> {
        if self.client.check_health().await {
            info!(url = %self.api_base, "server reachable");
            Ok(())
        } else {
            Err(CliError::Unreachable {
                url: self.api_base.clone(),
            })
        }
    }

    /// Write one full frame, clearing the screen first when enabled.
    pub fn draw(&mut self, snapshot: Option<&DashboardSnapshot>) -> io::Result<()> {
        if self.clear_screen {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        let frame = self.renderer.render(snapshot, Local::now());
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }

    fn say(&mut self, tone: Tone, line: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{}", self.palette.paint(tone, line))
    }
}
