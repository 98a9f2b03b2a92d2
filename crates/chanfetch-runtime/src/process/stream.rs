//! Async pipe readers (byte chunks, not lines).
//!
//! The download tool redraws progress with bare carriage returns and may emit
//! non-UTF8 bytes, so pipes are forwarded as raw chunks. Line splitting and
//! decoding happen in the parser, which buffers partial lines across chunks.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::types::{OutputChunk, OutputStream};

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Forward every chunk read from `stream` to `tx` until EOF.
///
/// The task ends on EOF, on a read error, or when the receiver is dropped.
pub fn spawn_chunk_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    source: OutputStream,
    tx: mpsc::Sender<OutputChunk>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stream = stream;
        let mut buf = vec![0u8; READ_BUFFER_SIZE];

        loop {
            match stream.read(&mut buf).await {
                Ok(0) => break, // EOF
                Ok(n) => {
                    let chunk = OutputChunk {
                        stream: source,
                        bytes: buf[..n].to_vec(),
                    };
                    if tx.send(chunk).await.is_err() {
                        debug!(stream = source.as_str(), "chunk receiver dropped");
                        break;
                    }
                }
                Err(e) => {
                    debug!(stream = source.as_str(), error = %e, "pipe reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(stream = source.as_str(), "pipe reader task exiting");
    })
}
