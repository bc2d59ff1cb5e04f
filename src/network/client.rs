//! Query Client
//!
//! Performs one request/response exchange per call over a fresh TCP
//! connection. The connection lives only for the duration of the call.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use crossbeam::channel;
use crossbeam::select;

use super::Context;
use crate::config::ClientConfig;
use crate::error::{QueryError, Result};
use crate::protocol::{check_query_size, read_response, write_request};

/// Client for a single world endpoint
///
/// Holds no connection between calls, so one instance can be shared across
/// threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct QueryClient {
    config: ClientConfig,
}

impl QueryClient {
    /// Create a client for `host` with default timeouts
    ///
    /// No I/O and no validation happen here; a bad address surfaces on the
    /// first query.
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::builder().host(host).build())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `query` and, if `fetch_response` is set, wait for the reply
    ///
    /// Returns `Ok(None)` for fire-and-forget calls and `Ok(Some(payload))`
    /// otherwise. The socket is closed before returning in every case.
    ///
    /// 1. Dial, honoring `ctx` cancellation and deadline
    /// 2. Write the framed request
    /// 3. Optionally read and decode one response frame
    pub fn query(
        &self,
        ctx: &Context,
        query: &[u8],
        fetch_response: bool,
    ) -> Result<Option<Bytes>> {
        // Oversized queries fail before any I/O
        check_query_size(query)?;

        tracing::trace!("Connecting to {}", self.config.host);
        let stream = self.dial(ctx)?;

        tracing::trace!("Sending {} byte query to {}", query.len(), self.config.host);
        let mut io = DeadlineIo::new(&stream, phase_deadline(ctx, self.config.write_timeout()));
        let sent = write_request(&mut io, query)?;
        tracing::debug!("Sent {} byte frame to {}", sent, self.config.host);

        if !fetch_response {
            return Ok(None);
        }

        tracing::trace!("Awaiting response from {}", self.config.host);
        let mut io = DeadlineIo::new(&stream, phase_deadline(ctx, self.config.read_timeout()));
        let payload = read_response(&mut io)?;
        tracing::debug!(
            "Received {} byte payload from {}",
            payload.len(),
            self.config.host
        );

        Ok(Some(payload))
    }

    /// Open a connection, racing the dial against cancel and deadline
    fn dial(&self, ctx: &Context) -> Result<TcpStream> {
        let addr = self.config.host.clone();

        if ctx.is_cancelled() {
            return Err(QueryError::Cancelled { addr });
        }

        let budget = ctx.bound(self.config.connect_timeout());
        if budget == Some(Duration::ZERO) {
            return Err(QueryError::DeadlineExceeded { addr });
        }

        // The dial thread owns the socket until it is handed over; if the
        // call has already given up, the stream is dropped on send failure.
        let (tx, rx) = channel::bounded(1);
        let target = addr.clone();
        thread::Builder::new()
            .name("topic-dial".to_string())
            .spawn(move || {
                let _ = tx.send(connect(&target, budget));
            })
            .map_err(|source| QueryError::Connect {
                addr: addr.clone(),
                source,
            })?;

        let done = ctx.done();
        let expiry = budget.map(channel::after).unwrap_or_else(channel::never);

        let stream = select! {
            recv(rx) -> res => match res {
                Ok(Ok(stream)) => stream,
                Ok(Err(source)) => return Err(QueryError::Connect { addr, source }),
                Err(_) => {
                    return Err(QueryError::Connect {
                        addr,
                        source: io::Error::other("dial thread exited without a result"),
                    })
                }
            },
            recv(done) -> _ => return Err(QueryError::Cancelled { addr }),
            recv(expiry) -> _ => return Err(QueryError::DeadlineExceeded { addr }),
        };

        if self.config.nodelay {
            stream.set_nodelay(true)?;
        }
        tracing::debug!("Connected to {}", addr);

        Ok(stream)
    }
}

/// Resolve `addr` and try each candidate in turn
fn connect(addr: &str, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let mut last_err = None;

    for candidate in addr.to_socket_addrs()? {
        let attempt = match timeout {
            Some(t) => TcpStream::connect_timeout(&candidate, t),
            None => TcpStream::connect(candidate),
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "address resolved to no socket addresses",
        )
    }))
}

/// Absolute deadline for one I/O phase
///
/// A bound too large to represent as an `Instant` means no deadline.
fn phase_deadline(ctx: &Context, local: Option<Duration>) -> Option<Instant> {
    ctx.bound(local).and_then(|d| Instant::now().checked_add(d))
}

/// Socket view that re-arms the OS timeout to the remaining time before
/// every read and write, so a phase is bounded end to end rather than
/// per syscall.
struct DeadlineIo<'a> {
    stream: &'a TcpStream,
    deadline: Option<Instant>,
}

impl<'a> DeadlineIo<'a> {
    fn new(stream: &'a TcpStream, deadline: Option<Instant>) -> Self {
        Self { stream, deadline }
    }

    fn remaining(&self) -> io::Result<Option<Duration>> {
        match self.deadline {
            None => Ok(None),
            Some(deadline) => {
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "deadline exceeded"));
                }
                Ok(Some(left))
            }
        }
    }
}

impl Read for DeadlineIo<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.set_read_timeout(self.remaining()?)?;
        let mut stream = self.stream;
        stream.read(buf)
    }
}

impl Write for DeadlineIo<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.set_write_timeout(self.remaining()?)?;
        let mut stream = self.stream;
        stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut stream = self.stream;
        stream.flush()
    }
}
