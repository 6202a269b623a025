use std::time::SystemTime;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Value of the `Server` header.
pub const SERVER_NAME: &str = "Turbo HTTP";

/// Value of the `X-Powered-By` header.
pub const POWERED_BY: &str = concat!("turbo/", env!("CARGO_PKG_VERSION"));

/// Renders a response in wire format.
///
/// The status line is followed by the fixed `Server`, `X-Powered-By` and
/// `Date` headers, then every entry of `resp.headers`. `Content-Length` is
/// added when the headers don't carry one.
pub fn serialize_response(resp: &Response, now: SystemTime) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Server identification
    push_header(&mut buf, "Server", SERVER_NAME);
    push_header(&mut buf, "X-Powered-By", POWERED_BY);
    push_header(&mut buf, "Date", &httpdate::fmt_http_date(now));

    // Headers
    for (k, v) in &resp.headers {
        push_header(&mut buf, k, v);
    }

    if !resp.headers.contains_key("Content-Length") {
        push_header(&mut buf, "Content-Length", &resp.body.len().to_string());
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    // Body
    buf.extend_from_slice(&resp.body);

    buf
}

fn push_header(buf: &mut Vec<u8>, name: &str, value: &str) {
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(b": ");
    buf.extend_from_slice(value.as_bytes());
    buf.extend_from_slice(b"\r\n");
}

/// A serialized response being written to a client.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response, SystemTime::now()),
            written: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Writes the whole response and flushes the stream.
    ///
    /// Resumes from where a previous call stopped.
    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
