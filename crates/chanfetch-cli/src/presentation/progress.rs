//! CLI progress rendering for channel downloads.
//!
//! Pure sync, presentation-only module. Progress lines from the tool drive a
//! bar (or a single rewritten line when stdout is not a terminal); every
//! other output line is printed above it.

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use chanfetch_core::ProgressEvent;
use chanfetch_download::match_progress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const MAX_LABEL: usize = 40;

/// Progress display that automatically selects terminal or plain output.
pub struct DownloadProgressPrinter {
    inner: ProgressRender,
}

enum ProgressRender {
    Fancy(FancyProgress),
    Plain(PlainProgress),
}

impl DownloadProgressPrinter {
    /// Create a new printer, auto-detecting terminal capability.
    pub fn new() -> Self {
        if io::stdout().is_terminal() {
            Self {
                inner: ProgressRender::Fancy(FancyProgress::new()),
            }
        } else {
            Self {
                inner: ProgressRender::Plain(PlainProgress::new()),
            }
        }
    }

    /// Render one job event. `Done` is left to the caller.
    pub fn handle(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Progress {
                percent,
                speed,
                eta,
                filename,
            } => self.update(filename, *percent, speed, eta),
            // Redraw lines are shown by the bar itself
            ProgressEvent::Log { message } if match_progress(message).is_some() => {}
            ProgressEvent::Log { message } => self.line(message),
            ProgressEvent::Done { .. } => {}
        }
    }

    /// Print a status line (pause, resume, ...) above the progress display.
    pub fn notice(&mut self, message: &str) {
        self.line(message);
    }

    fn update(&mut self, label: &str, percent: f64, speed: &str, eta: &str) {
        match &mut self.inner {
            ProgressRender::Fancy(inner) => inner.update(label, percent, speed, eta),
            ProgressRender::Plain(inner) => inner.update(label, percent, speed, eta),
        }
    }

    fn line(&mut self, message: &str) {
        match &mut self.inner {
            ProgressRender::Fancy(inner) => inner.line(message),
            ProgressRender::Plain(inner) => inner.line(message),
        }
    }

    /// Finish and clear the progress display.
    pub fn finish(&mut self) {
        match &mut self.inner {
            ProgressRender::Fancy(inner) => inner.finish(),
            ProgressRender::Plain(inner) => inner.finish(),
        }
    }
}

impl Default for DownloadProgressPrinter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Fancy Terminal Progress (indicatif)
// ============================================================================

struct FancyProgress {
    bar: ProgressBar,
    saw_progress: bool,
    last_label: Option<String>,
}

impl FancyProgress {
    fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(1000), ProgressDrawTarget::stdout());
        bar.set_style(Self::spinner_style());
        bar.set_message("Fetching channel listing".to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self {
            bar,
            saw_progress: false,
            last_label: None,
        }
    }

    fn update(&mut self, label: &str, percent: f64, speed: &str, eta: &str) {
        if !self.saw_progress {
            self.bar.set_style(Self::bar_style());
            self.saw_progress = true;
        }

        if self.last_label.as_deref() != Some(label) {
            self.bar.set_prefix(format_label(label));
            self.last_label = Some(label.to_string());
        }

        self.bar.set_position(per_mille(percent));
        self.bar
            .set_message(format!("{percent:5.1}% @ {speed} ETA {eta}"));
    }

    fn line(&self, message: &str) {
        self.bar.println(message);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("⬇ {msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("⬇ {prefix:40} {bar:28.cyan/blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

// ============================================================================
// Plain Progress (non-terminal)
// ============================================================================

struct PlainProgress {
    last_emit: Option<Instant>,
    last_line_len: usize,
    printed: bool,
}

impl PlainProgress {
    const fn new() -> Self {
        Self {
            last_emit: None,
            last_line_len: 0,
            printed: false,
        }
    }

    fn update(&mut self, label: &str, percent: f64, speed: &str, eta: &str) {
        const MIN_INTERVAL: Duration = Duration::from_millis(250);
        let now = Instant::now();

        let throttled = self
            .last_emit
            .is_some_and(|last| now.duration_since(last) < MIN_INTERVAL);
        if percent < 100.0 && throttled {
            return;
        }
        self.last_emit = Some(now);

        let line = plain_line(label, percent, speed, eta);
        let pad = self.last_line_len.saturating_sub(line.len());
        print!("\r{line}{}", " ".repeat(pad));
        io::stdout().flush().ok();

        self.last_line_len = line.len();
        self.printed = true;
    }

    fn line(&mut self, message: &str) {
        self.finish();
        println!("{message}");
    }

    fn finish(&mut self) {
        if self.printed {
            println!();
            self.printed = false;
            self.last_line_len = 0;
        }
    }
}

// ============================================================================
// Formatting Helpers
// ============================================================================

fn plain_line(label: &str, percent: f64, speed: &str, eta: &str) -> String {
    let mut line = String::from("⬇ Downloading");
    if !label.is_empty() {
        line.push_str(" [");
        line.push_str(&format_label(label));
        line.push(']');
    }
    line.push_str(&format!(": {percent:5.1}% @ {speed} ETA {eta}"));
    line
}

/// Percent (0-100) as a position on a 0-1000 bar.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn per_mille(percent: f64) -> u64 {
    (percent.clamp(0.0, 100.0) * 10.0).round() as u64
}

fn format_label(raw: &str) -> String {
    let char_count = raw.chars().count();
    if char_count <= MAX_LABEL {
        return raw.to_string();
    }
    // Truncate to MAX_LABEL - 1 chars and add ellipsis
    let mut buf: String = raw.chars().take(MAX_LABEL - 1).collect();
    buf.push('…');
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_mille() {
        assert_eq!(per_mille(0.0), 0);
        assert_eq!(per_mille(45.25), 453);
        assert_eq!(per_mille(100.0), 1000);
        assert_eq!(per_mille(150.0), 1000);
    }

    #[test]
    fn test_format_label_truncates() {
        assert_eq!(format_label("short.mp4"), "short.mp4");
        let long = "x".repeat(60);
        let label = format_label(&long);
        assert_eq!(label.chars().count(), MAX_LABEL);
        assert!(label.ends_with('…'));
    }

    #[test]
    fn test_plain_line() {
        assert_eq!(
            plain_line("1-Title.mp4", 45.2, "1.20MiB/s", "00:05"),
            "⬇ Downloading [1-Title.mp4]:  45.2% @ 1.20MiB/s ETA 00:05"
        );
        assert_eq!(
            plain_line("", 3.0, "Unknown", "Unknown"),
            "⬇ Downloading:   3.0% @ Unknown ETA Unknown"
        );
    }
}
