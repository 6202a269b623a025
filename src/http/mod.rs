//! HTTP protocol implementation.
//!
//! A deliberately small subset of HTTP/1.1: every socket read is treated as
//! one complete request, and responses are framed by the writer.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine (idle timeout, request cap)
//! - **`parser`**: Turns one inbound message into a [`request::Request`]
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation, status codes and reason phrases
//! - **`writer`**: Serializes and writes responses in wire format
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for data (idle timeout → 408)
//!        └──────┬──────┘
//!               │ Data received (over limit → 429, malformed → 400)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Plugin chain + end-of-chain handler
//!        └──────┬───────────┘
//!               │ Response ready (non-200 → error body)
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close / error → Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use turbo::http::connection::Connection;
//! use turbo::server::Server;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = Arc::new(Server::builder().build());
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, addr) = listener.accept().await?;
//!         let server = server.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, addr.ip().to_string(), server);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
