// File: crates/chart-canvas/src/stream.rs
// Summary: Async byte stream fed by a blocking encoder through a bounded channel.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::error::RenderError;

pub(crate) const CHUNK_SIZE: usize = 16 * 1024;
const CHANNEL_DEPTH: usize = 8;

type Chunk = Result<Vec<u8>, RenderError>;

/// Encoded chunks in order. A failure mid-encode arrives as a final `Err` item.
#[derive(Debug)]
pub struct ByteStream {
    rx: mpsc::Receiver<Chunk>,
}

impl ByteStream {
    /// Drain the stream into one buffer, stopping at the first error.
    pub async fn collect_bytes(mut self) -> Result<Vec<u8>, RenderError> {
        let mut out = Vec::new();
        while let Some(chunk) = self.rx.recv().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }
}

impl Stream for ByteStream {
    type Item = Chunk;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

pub(crate) fn channel() -> (ChunkWriter, ByteStream) {
    let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
    (ChunkWriter { tx, buf: Vec::with_capacity(CHUNK_SIZE) }, ByteStream { rx })
}

/// Blocking `io::Write` end of a [`ByteStream`]. Only use from a blocking thread.
pub(crate) struct ChunkWriter {
    tx: mpsc::Sender<Chunk>,
    buf: Vec<u8>,
}

impl ChunkWriter {
    fn send_buffered(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let chunk = std::mem::replace(&mut self.buf, Vec::with_capacity(CHUNK_SIZE));
        self.tx
            .blocking_send(Ok(chunk))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "byte stream dropped"))
    }

    /// Send whatever is still buffered.
    pub(crate) fn finish(mut self) -> io::Result<()> {
        self.send_buffered()
    }

    /// Deliver `err` as the last item. Buffered bytes go out first so nothing is silently lost.
    pub(crate) fn fail(mut self, err: RenderError) {
        if self.send_buffered().is_ok() {
            let _ = self.tx.blocking_send(Err(err));
        }
    }
}

impl io::Write for ChunkWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let take = (CHUNK_SIZE - self.buf.len()).min(data.len());
        self.buf.extend_from_slice(&data[..take]);
        if self.buf.len() == CHUNK_SIZE {
            self.send_buffered()?;
        }
        Ok(take)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_buffered()
    }
}
