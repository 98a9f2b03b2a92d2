//! Incremental parser turning raw tool output into [`ProgressEvent`]s.
//!
//! Output arrives in arbitrary chunks from two pipes. The parser buffers the
//! unterminated tail of each feed so a line split across chunks (including a
//! multi-byte character split mid-sequence) is decoded whole.

mod matchers;

pub use matchers::{ProgressMatch, basename, match_destination, match_progress};

use chanfetch_core::ProgressEvent;
use chanfetch_runtime::OutputStream;

/// Longest unterminated fragment kept before it is emitted as a line.
const MAX_PENDING_LINE: usize = 64 * 1024;

/// Byte buffer that yields complete lines.
///
/// Lines end at `\n` or at a bare `\r` (progress redraws). A `\r` that ends
/// the buffer stays pending until the next byte shows whether it starts a
/// `\r\n` pair. A fragment that outgrows [`MAX_PENDING_LINE`] without a
/// terminator is emitted as a line of its own.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;

        for (i, &byte) in self.pending.iter().enumerate() {
            let ends_line = match byte {
                b'\n' => true,
                b'\r' => match self.pending.get(i + 1) {
                    Some(b'\n') => false,
                    Some(_) => true,
                    None => break,
                },
                _ => false,
            };
            if ends_line {
                lines.push(self.pending[start..i].to_vec());
                start = i + 1;
            }
        }

        self.pending.drain(..start);
        if self.pending.len() > MAX_PENDING_LINE {
            lines.push(self.take_rest());
        }
        lines
    }

    fn take_rest(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pending)
    }
}

/// Stateful line parser for one job.
///
/// Each pipe has its own line buffer so fragments from stdout and stderr
/// never merge, while the most recent destination path is shared so
/// progress events can name the file they refer to.
#[derive(Debug, Default)]
pub struct StreamParser {
    stdout: LineBuffer,
    stderr: LineBuffer,
    current_file: String,
}

impl StreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a stdout chunk and return the events for every line it
    /// completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ProgressEvent> {
        self.feed_from(OutputStream::Stdout, chunk)
    }

    /// Consume a chunk read from `stream`.
    pub fn feed_from(&mut self, stream: OutputStream, chunk: &[u8]) -> Vec<ProgressEvent> {
        let lines = match stream {
            OutputStream::Stdout => self.stdout.push(chunk),
            OutputStream::Stderr => self.stderr.push(chunk),
        };

        let mut events = Vec::new();
        for line in &lines {
            self.handle_line(line, &mut events);
        }
        events
    }

    /// Flush the unterminated fragments of both pipes, stdout first.
    pub fn finish(&mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        let stdout_tail = self.stdout.take_rest();
        self.handle_line(&stdout_tail, &mut events);
        let stderr_tail = self.stderr.take_rest();
        self.handle_line(&stderr_tail, &mut events);
        events
    }

    /// Path from the most recent `Destination:` line, or empty.
    pub fn current_file(&self) -> &str {
        &self.current_file
    }

    fn handle_line(&mut self, raw: &[u8], events: &mut Vec<ProgressEvent>) {
        let decoded = String::from_utf8_lossy(raw);
        let line = decoded.replace('\r', "");
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        events.push(ProgressEvent::log(line));

        if let Some(path) = match_destination(line) {
            self.current_file = path.to_string();
        }

        if let Some(progress) = match_progress(line) {
            events.push(ProgressEvent::Progress {
                percent: progress.percent,
                speed: progress.speed.to_string(),
                eta: progress.eta.to_string(),
                filename: basename(&self.current_file).to_string(),
            });
        }
    }
}
