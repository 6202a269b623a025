use bytes::BytesMut;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::error::ServeError;
use crate::http::parser::parse_http_request;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::server::Server;

const BUFFER_SIZE: usize = 64 * 1024;

/// Upper bound on one inbound message.
const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// One accepted client connection.
///
/// Everything that has arrived on the socket when it becomes readable is one
/// inbound message. Messages are handled strictly in arrival order, one at a
/// time.
pub struct Connection<S> {
    stream: S,
    peer: String,
    server: Arc<Server>,
    buffer: BytesMut,
    requests: u32,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, AfterWrite),
    Closed,
}

/// What happens to the socket once a response is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterWrite {
    /// Wait for the next request
    KeepAlive,
    /// Shut down the write side, then close
    Close,
    /// Drop the socket without a shutdown (error path)
    Abort,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: impl Into<String>, server: Arc<Server>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            server,
            buffer: BytesMut::with_capacity(BUFFER_SIZE),
            requests: 0,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => self.read_request().await?,

                ConnectionState::Processing(req) => {
                    tracing::debug!(
                        peer = %self.peer,
                        method = %req.method,
                        path = %req.path,
                        requests = self.requests,
                        "Processing request"
                    );

                    match self.server.respond(req) {
                        Ok(response) => {
                            let after = if response.keep_alive() {
                                AfterWrite::KeepAlive
                            } else {
                                AfterWrite::Close
                            };
                            ConnectionState::Writing(ResponseWriter::new(&response), after)
                        }
                        Err(e) => self.fail(e),
                    }
                }

                ConnectionState::Writing(mut writer, after) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    match after {
                        AfterWrite::KeepAlive => ConnectionState::Reading,
                        AfterWrite::Close => {
                            self.stream.shutdown().await?;
                            ConnectionState::Closed
                        }
                        AfterWrite::Abort => ConnectionState::Closed,
                    }
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    /// Waits for the next inbound message and turns it into the next state.
    ///
    /// The idle timer is re-armed on every call.
    async fn read_request(&mut self) -> anyhow::Result<ConnectionState> {
        self.buffer.clear();

        let idle_timeout = self.server.idle_timeout();
        let n = match timeout(idle_timeout, self.stream.read_buf(&mut self.buffer)).await {
            Ok(read) => read?,
            Err(_) => return Ok(self.fail(ServeError::IdleTimeout(idle_timeout))),
        };

        if n == 0 {
            // Client closed connection
            return Ok(ConnectionState::Closed);
        }

        self.drain_available().await?;

        self.requests += 1;
        if self.requests > self.server.max_requests() {
            return Ok(self.fail(ServeError::RequestLimitExceeded {
                limit: self.server.max_requests(),
                retry_after: idle_timeout.as_secs(),
            }));
        }

        match parse_http_request(&self.buffer) {
            Ok(req) => Ok(ConnectionState::Processing(req)),
            Err(e) => Ok(self.fail(e.into())),
        }
    }

    /// Appends whatever is already buffered on the stream without waiting
    /// for more.
    ///
    /// A zero timeout polls the read once: ready data is taken, a pending
    /// read ends the message.
    async fn drain_available(&mut self) -> anyhow::Result<()> {
        while self.buffer.len() < MAX_MESSAGE_SIZE {
            self.buffer.reserve(BUFFER_SIZE);

            match timeout(Duration::ZERO, self.stream.read_buf(&mut self.buffer)).await {
                Ok(Ok(0)) | Err(_) => break,
                Ok(Ok(_)) => continue,
                Ok(Err(e)) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Routes an error to the error path: a plain-text response, then an
    /// abrupt close.
    fn fail(&self, error: ServeError) -> ConnectionState {
        tracing::warn!(
            peer = %self.peer,
            status = error.status().as_u16(),
            error = %error,
            "Closing connection"
        );

        let trace = error.trace().unwrap_or(self.peer.as_str());
        let response = Response::error(error.status(), trace, error.retry());

        ConnectionState::Writing(ResponseWriter::new(&response), AfterWrite::Abort)
    }
}
