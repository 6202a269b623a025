//! Turbo - minimal HTTP/1.1 server
//!
//! Request parsing, a configurable plugin chain and response framing on top of
//! raw TCP sockets.

pub mod config;
pub mod error;
pub mod http;
pub mod plugin;
pub mod server;
