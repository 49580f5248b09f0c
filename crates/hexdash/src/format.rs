//! Human-readable byte, duration, and count formatting helpers.

/// Commands longer than this are cut for display.
pub const COMMAND_MAX_CHARS: usize = 45;

/// Appended to a truncated command.
pub const ELLIPSIS: &str = "...";

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format bytes with binary prefixes and one decimal (e.g., "2.0KB", "1.5GB").
///
/// The unit is the largest power of 1024 not exceeding `bytes`, capped at TB.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", BYTE_UNITS[unit])
}

/// Format elapsed seconds as "45.0s", "1.2m", or "2.5h".
pub fn fmt_runtime(secs: f64) -> String {
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        format!("{:.1}m", secs / 60.0)
    } else {
        format!("{:.1}h", secs / 3600.0)
    }
}

/// Cut a command line to [`COMMAND_MAX_CHARS`] characters plus [`ELLIPSIS`].
pub fn truncate_command(command: &str) -> String {
    match command.char_indices().nth(COMMAND_MAX_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &command[..cut]),
        None => command.to_owned(),
    }
}

/// Group digits in threes with commas (e.g., "1,234,567").
pub fn fmt_grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
