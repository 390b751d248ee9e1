//! Protocol session: preamble in, directives out.
//!
//! A [`ProtocolSession`] drives one request/response cycle with the server:
//! 1. Read the preamble line by line until a blank line or end-of-stream
//! 2. Buffer `SET VARIABLE` directives in call order
//! 3. Flush them once: audit log first, then the output stream
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use agi_session::{ProtocolSession, MemorySink};
//!
//! # tokio_test_block_on(async {
//! let input: &[u8] = b"agi_channel: SIP/100-1\nagi_uniqueid: 555\n\n";
//! let sink = Arc::new(MemorySink::new());
//! let mut session = ProtocolSession::new(input, Vec::new(), sink.clone());
//!
//! let preamble = session.ingest_preamble().await.unwrap();
//! session.set_variable("GREETING", "hello");
//! session.flush(preamble.channel_id(), preamble.unique_id()).await.unwrap();
//!
//! let (_, output) = session.into_parts();
//! assert_eq!(output, b"SET VARIABLE GREETING \"hello\"\n");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;
use crate::protocol::{encode_batch, Preamble, VariableDirective};
use crate::sink::LogSink;

/// Prefix identifying the call in every audit entry: `[channel] [uniqueid]`.
pub fn call_tag(channel_id: &str, unique_id: &str) -> String {
    format!("[{}] [{}]", channel_id, unique_id)
}

/// One preamble/directive cycle over a line-oriented stream pair.
pub struct ProtocolSession<R, W> {
    /// Buffered reader over the server's input.
    reader: R,
    /// Destination for directives.
    writer: W,
    /// Audit log.
    sink: Arc<dyn LogSink>,
    /// Set once the preamble has been read.
    preamble: Option<Preamble>,
    /// Directives waiting for the next flush, in insertion order.
    pending: Vec<VariableDirective>,
}

impl<R, W> ProtocolSession<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a session reading from `reader` and writing to `writer`.
    pub fn new(reader: R, writer: W, sink: Arc<dyn LogSink>) -> Self {
        Self {
            reader,
            writer,
            sink,
            preamble: None,
            pending: Vec::new(),
        }
    }

    /// Read the preamble.
    ///
    /// Stops at the first line that is blank after trimming, or at
    /// end-of-stream. Malformed lines are kept and never fail the read.
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD; only
    /// genuine read errors are returned.
    ///
    /// Blocks until the terminator arrives if the stream stays open.
    pub async fn ingest_preamble(&mut self) -> Result<Preamble> {
        let mut preamble = Preamble::new();

        while let Some(line) = self.next_line().await? {
            if !preamble.push_line(&line) {
                break;
            }
        }

        self.sink.info(&format!(
            "{} AGI data: {}",
            call_tag(preamble.channel_id(), preamble.unique_id()),
            preamble.raw_lines_json()?
        ));

        self.preamble = Some(preamble.clone());
        Ok(preamble)
    }

    /// Read one line without its `\n` or `\r\n`. `None` at end-of-stream.
    async fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Buffer a `SET VARIABLE` directive. No validation is applied.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pending.push(VariableDirective::new(name, value));
    }

    /// Send every buffered directive and clear the buffer.
    ///
    /// The audit entry is logged before anything is written. With an empty
    /// buffer this does nothing at all. The buffer is cleared even when the
    /// write fails, so the same batch is never sent twice.
    pub async fn flush(&mut self, channel_id: &str, unique_id: &str) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let batch = std::mem::take(&mut self.pending);
        let listing = batch
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        self.sink.info(&format!(
            "{} Variables sent to Asterisk:\n{}",
            call_tag(channel_id, unique_id),
            listing
        ));

        let buf = encode_batch(&batch);
        self.writer.write_all(&buf).await?;
        self.writer.flush().await?;

        tracing::debug!(directives = batch.len(), bytes = buf.len(), "flushed directives");
        Ok(())
    }

    /// Directives waiting for the next flush.
    #[inline]
    pub fn pending(&self) -> &[VariableDirective] {
        &self.pending
    }

    /// The preamble, once [`ingest_preamble`](Self::ingest_preamble) has run.
    #[inline]
    pub fn preamble(&self) -> Option<&Preamble> {
        self.preamble.as_ref()
    }

    /// The injected log sink.
    #[inline]
    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// Release the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
