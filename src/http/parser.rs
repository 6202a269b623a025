use crate::http::request::{Method, Request};
use std::collections::HashMap;
use thiserror::Error;

/// A structural violation in an inbound message.
///
/// Every variant carries the request path when one could be extracted, for
/// use as the trace of the resulting 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no blank line between headers and body")]
    MissingSeparator { path: Option<String> },

    #[error("request line has {tokens} tokens, expected 3")]
    InvalidRequestLine { tokens: usize, path: Option<String> },

    #[error("path does not start with '/': {path}")]
    InvalidPath { path: String },
}

impl ParseError {
    pub fn path(&self) -> Option<&str> {
        match self {
            ParseError::MissingSeparator { path } => path.as_deref(),
            ParseError::InvalidRequestLine { path, .. } => path.as_deref(),
            ParseError::InvalidPath { path } => Some(path),
        }
    }
}

const SEPARATOR: &[u8] = b"\r\n\r\n";

/// Parses one complete inbound message.
///
/// The whole buffer is consumed: everything after the first blank line is the
/// body. Header lines are split on the first `": "`; a line without one is
/// stored under its full text with an empty value. Duplicate names keep the
/// last value.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    let Some(headers_end) = find_headers_end(buf) else {
        let head = String::from_utf8_lossy(buf);
        let path = head
            .split("\r\n")
            .next()
            .and_then(|line| line.split(' ').nth(1))
            .map(str::to_string);
        return Err(ParseError::MissingSeparator { path });
    };

    let header_block = String::from_utf8_lossy(&buf[..headers_end]);
    let body = buf[headers_end + SEPARATOR.len()..].to_vec();

    let mut lines = header_block.split("\r\n");

    // Request line
    let request_line = lines.next().unwrap_or_default();
    let parts: Vec<&str> = request_line.split(' ').collect();

    let &[method, path, version] = parts.as_slice() else {
        return Err(ParseError::InvalidRequestLine {
            tokens: parts.len(),
            path: parts.get(1).map(|p| p.to_string()),
        });
    };

    if !path.starts_with('/') {
        return Err(ParseError::InvalidPath {
            path: path.to_string(),
        });
    }

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        let (key, value) = line.split_once(": ").unwrap_or((line, ""));
        headers.insert(key.to_string(), value.to_string());
    }

    Ok(Request {
        method: Method::parse(method),
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body,
    })
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(SEPARATOR.len()).position(|w| w == SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_http_request(req).unwrap();

        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
        assert!(parsed.body.is_empty());
    }

    #[test]
    fn separator_is_found_at_start_of_buffer() {
        assert_eq!(find_headers_end(b"\r\n\r\nrest"), Some(0));
        assert_eq!(find_headers_end(b"\r\n\r"), None);
    }
}
