//! Line-delimited JSON-RPC over stdin/stdout.
//!
//! Stdout carries protocol traffic only; logging must go to stderr.

use std::io;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::{
    stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt,
    BufReader, Stdin, Stdout,
};
use tokio::select;
use tokio::signal;

use crate::error::RpcError;
use crate::server::{error_response, MapsServer};

/// Longest request line accepted before it is answered as a parse error.
pub const MAX_LINE_BYTES: usize = 4 * 1024 * 1024;

/// One line read from the client.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Message(Value),
    /// The line was not valid UTF-8 JSON or was too long; carries the reason.
    Malformed(String),
}

/// Newline-framed JSON transport over any async reader/writer pair.
pub struct StdioTransport<R = BufReader<Stdin>, W = Stdout> {
    reader: R,
    writer: W,
    max_line_bytes: usize,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self::with_io(BufReader::new(stdin()), stdout())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn with_io(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }

    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    /// Read the next non-blank line. Returns `Ok(None)` on EOF.
    ///
    /// Only I/O failures are errors. Lines that are too long, not UTF-8 or
    /// not JSON come back as [`Incoming::Malformed`].
    pub async fn read_message(&mut self) -> Result<Option<Incoming>> {
        loop {
            let mut raw = Vec::new();
            let limit = u64::try_from(self.max_line_bytes).unwrap_or(u64::MAX);
            let bytes = (&mut self.reader)
                .take(limit.saturating_add(1))
                .read_until(b'\n', &mut raw)
                .await
                .context("failed to read line")?;
            if bytes == 0 {
                return Ok(None);
            }
            if raw.len() > self.max_line_bytes && raw.last() != Some(&b'\n') {
                self.skip_rest_of_line()
                    .await
                    .context("failed to read line")?;
                return Ok(Some(Incoming::Malformed(format!(
                    "message exceeds {} bytes",
                    self.max_line_bytes
                ))));
            }
            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(err) => return Ok(Some(Incoming::Malformed(err.to_string()))),
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            return Ok(Some(match serde_json::from_str(line) {
                Ok(value) => Incoming::Message(value),
                Err(err) => Incoming::Malformed(err.to_string()),
            }));
        }
    }

    // Drop buffered input up to and including the next newline.
    async fn skip_rest_of_line(&mut self) -> io::Result<()> {
        loop {
            let (used, done) = {
                let available = self.reader.fill_buf().await?;
                if available.is_empty() {
                    return Ok(());
                }
                match available.iter().position(|b| *b == b'\n') {
                    Some(pos) => (pos + 1, true),
                    None => (available.len(), false),
                }
            };
            self.reader.consume(used);
            if done {
                return Ok(());
            }
        }
    }

    // Keep BrokenPipe visible as an io::Error so the loop can treat it as a disconnect.
    fn check_io<T>(res: io::Result<T>) -> Result<T> {
        match res {
            Ok(v) => Ok(v),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "Client disconnected").into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn write_message(&mut self, msg: &Value) -> Result<()> {
        let s = serde_json::to_string(msg)?;

        Self::check_io(self.writer.write_all(s.as_bytes()).await)?;
        Self::check_io(self.writer.write_all(b"\n").await)?;
        Self::check_io(self.writer.flush().await)?;

        Ok(())
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .map(|ioe| ioe.kind() == io::ErrorKind::BrokenPipe)
        .unwrap_or(false)
}

/// Serve requests until EOF, Ctrl-C or client disconnect.
///
/// Requests are handled one at a time, in order.
pub async fn run_server_loop<R, W>(
    transport: &mut StdioTransport<R, W>,
    server: &MapsServer,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!("MCP server initialized, waiting for requests...");

    loop {
        let incoming = select! {
            _ = signal::ctrl_c() => {
                tracing::info!("Received shutdown signal, exiting gracefully");
                break;
            }
            msg = transport.read_message() => msg,
        };

        let response = match incoming {
            Ok(Some(Incoming::Message(message))) => server.handle_message(message).await,
            Ok(Some(Incoming::Malformed(reason))) => {
                tracing::warn!(%reason, "discarding malformed message");
                Some(error_response(Value::Null, RpcError::parse_error(reason)))
            }
            Ok(None) => {
                tracing::info!("Client disconnected (EOF)");
                break;
            }
            Err(e) => {
                tracing::error!("Transport error: {}", e);
                return Err(e);
            }
        };

        if let Some(response) = response {
            if let Err(e) = transport.write_message(&response).await {
                if is_broken_pipe(&e) {
                    tracing::info!("Client disconnected (broken pipe)");
                    break;
                }
                return Err(e);
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
