//! One-shot process control: terminate, pause, resume, status.
//!
//! Each control runs to completion and reports a single fixed-format
//! line. The outcome is never turned into an error: the process exits 0
//! whether or not the server accepted the request.

use std::io::{self, Write};

use hexdash_api::{ApiClient, ControlAction};

use crate::cli::Cli;
use crate::style::{Palette, Tone};

/// A control command requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Process { action: ControlAction, pid: u32 },
    Status { pid: u32 },
}

/// Pick the control command to run, if any.
///
/// When several control flags are given, the first match in the order
/// terminate, pause, resume, status wins and the rest are ignored.
pub fn requested(cli: &Cli) -> Option<Control> {
    let process = |action, pid| Control::Process { action, pid };

    cli.terminate
        .map(|pid| process(ControlAction::Terminate, pid))
        .or_else(|| cli.pause.map(|pid| process(ControlAction::Pause, pid)))
        .or_else(|| cli.resume.map(|pid| process(ControlAction::Resume, pid)))
        .or_else(|| cli.status.map(|pid| Control::Status { pid }))
}

/// Run a control command against the server and report the outcome to `out`.
pub async fn handle(
    client: &ApiClient,
    control: Control,
    palette: Palette,
    out: &mut impl Write,
) -> io::Result<()> {
    match control {
        Control::Process { action, pid } => {
            tracing::debug!(pid, %action, "dispatching control command");
            if client.control_quietly(action, pid).await {
                let line = format!("Process {pid} {} successfully", action.past_tense());
                writeln!(out, "{}", palette.paint(Tone::Success, line))
            } else {
                let line = format!("Failed to {action} process {pid}");
                writeln!(out, "{}", palette.paint(Tone::Failure, line))
            }
        }
        Control::Status { pid } => {
            tracing::debug!(pid, "querying process status");
            match client.fetch_process_status(pid).await {
                Some(status) => {
                    let heading = format!("Process {pid} Status:");
                    writeln!(out, "{}", palette.paint(Tone::Success, heading))?;
                    serde_json::to_writer_pretty(&mut *out, &status).map_err(io::Error::from)?;
                    writeln!(out)
                }
                None => {
                    let line = format!("Failed to get status for process {pid}");
                    writeln!(out, "{}", palette.paint(Tone::Failure, line))
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use hexdash_api::TransportConfig;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hexdash").chain(args.iter().copied())).unwrap()
    }

    async fn setup() -> (MockServer, ApiClient) {
        let server = MockServer::start().await;
        let base_url = Url::parse(&server.uri()).unwrap();
        let client = ApiClient::new(base_url, &TransportConfig::default()).unwrap();
        (server, client)
    }

    async fn run(client: &ApiClient, control: Control) -> String {
        let mut out = Vec::new();
        handle(client, control, Palette::new(false), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn no_control_flags() {
        assert_eq!(requested(&parse(&[])), None);
        assert_eq!(requested(&parse(&["--once", "--refresh", "2"])), None);
    }

    #[test]
    fn single_control_flags() {
        assert_eq!(
            requested(&parse(&["--pause", "9"])),
            Some(Control::Process {
                action: ControlAction::Pause,
                pid: 9
            })
        );
        assert_eq!(
            requested(&parse(&["--status", "3"])),
            Some(Control::Status { pid: 3 })
        );
        assert_eq!(
            requested(&parse(&["--terminate", "0"])),
            Some(Control::Process {
                action: ControlAction::Terminate,
                pid: 0
            })
        );
    }

    #[test]
    fn first_match_wins_in_fixed_order() {
        let cli = parse(&["--status", "4", "--resume", "3", "--pause", "2", "--terminate", "1"]);
        assert_eq!(
            requested(&cli),
            Some(Control::Process {
                action: ControlAction::Terminate,
                pid: 1
            })
        );

        let cli = parse(&["--status", "4", "--resume", "3", "--pause", "2"]);
        assert_eq!(
            requested(&cli),
            Some(Control::Process {
                action: ControlAction::Pause,
                pid: 2
            })
        );

        let cli = parse(&["--status", "4", "--resume", "3"]);
        assert_eq!(
            requested(&cli),
            Some(Control::Process {
                action: ControlAction::Resume,
                pid: 3
            })
        );
    }

    #[tokio::test]
    async fn terminate_success_and_failure_messages() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/processes/terminate/42"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/processes/terminate/43"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let ok = Control::Process {
            action: ControlAction::Terminate,
            pid: 42,
        };
        assert_eq!(run(&client, ok).await, "Process 42 terminated successfully\n");

        let missing = Control::Process {
            action: ControlAction::Terminate,
            pid: 43,
        };
        assert_eq!(run(&client, missing).await, "Failed to terminate process 43\n");
    }

    #[tokio::test]
    async fn pause_and_resume_messages() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/processes/pause/5"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let pause = Control::Process {
            action: ControlAction::Pause,
            pid: 5,
        };
        assert_eq!(run(&client, pause).await, "Process 5 paused successfully\n");

        let resume = Control::Process {
            action: ControlAction::Resume,
            pid: 5,
        };
        assert_eq!(run(&client, resume).await, "Failed to resume process 5\n");
    }

    #[tokio::test]
    async fn status_pretty_prints_payload() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/processes/status/8"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "pid": 8, "status": "paused" })),
            )
            .mount(&server)
            .await;

        let out = run(&client, Control::Status { pid: 8 }).await;
        let (heading, body) = out.split_once('\n').unwrap();
        assert_eq!(heading, "Process 8 Status:");

        let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(parsed, json!({ "pid": 8, "status": "paused" }));
        assert!(body.contains("\n  \""), "expected indented JSON:\n{body}");
    }

    #[tokio::test]
    async fn status_failure_message() {
        let (_server, client) = setup().await;
        let out = run(&client, Control::Status { pid: 77 }).await;
        assert_eq!(out, "Failed to get status for process 77\n");
    }
}
