//! Server settings and the request pipeline.
//!
//! A [`Server`] is built once, wrapped in an `Arc` and shared by every
//! connection task. Nothing in it changes after construction.

pub mod listener;

use crate::config::Config;
use crate::error::ServeError;
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::plugin::{self, Plugin, PluginChain, RequestHandler, StaticFiles};
use anyhow::Result;
use std::time::Duration;

/// Body of a response no plugin filled in.
const DEFAULT_BODY: &str = "No Data";

pub struct Server {
    idle_timeout: Duration,
    max_requests: u32,
    chain: PluginChain,
    on_request: RequestHandler,
}

pub struct ServerBuilder {
    idle_timeout: Duration,
    max_requests: u32,
    chain: PluginChain,
    on_request: RequestHandler,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(5),
            max_requests: 32,
            chain: PluginChain::new(vec![Plugin::Static(StaticFiles::default())]),
            on_request: plugin::identity(),
        }
    }
}

impl ServerBuilder {
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn max_requests(mut self, max: u32) -> Self {
        self.max_requests = max;
        self
    }

    pub fn chain(mut self, chain: PluginChain) -> Self {
        self.chain = chain;
        self
    }

    /// Sets the handler run after the plugin chain.
    pub fn on_request<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Request, Response) -> Response + Send + Sync + 'static,
    {
        self.on_request = std::sync::Arc::new(handler);
        self
    }

    pub fn build(self) -> Server {
        Server {
            idle_timeout: self.idle_timeout,
            max_requests: self.max_requests,
            chain: self.chain,
            on_request: self.on_request,
        }
    }
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Builds a server from configuration, with the identity end-of-chain
    /// handler.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let chain = PluginChain::from_config(&cfg.plugins)?;

        Ok(Self::builder()
            .idle_timeout(cfg.idle_timeout())
            .max_requests(cfg.server.max_requests)
            .chain(chain)
            .build())
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn chain(&self) -> &PluginChain {
        &self.chain
    }

    /// The response every request starts from.
    ///
    /// `Connection` mirrors the request (default `close`); a keep-alive
    /// request also gets a `Keep-Alive` header with the connection limits.
    pub fn seed_response(&self, request: &Request) -> Response {
        let mut builder = ResponseBuilder::new(StatusCode::OK)
            .header("Connection", request.connection())
            .body(DEFAULT_BODY)
            .trace(request.path.clone());

        if request.keep_alive() {
            builder = builder.header(
                "Keep-Alive",
                format!(
                    "timeout={}, max={}",
                    self.idle_timeout.as_secs(),
                    self.max_requests
                ),
            );
        }

        builder.build()
    }

    /// Runs the plugin chain and the end-of-chain handler for one request.
    ///
    /// Only a final status of 200 is returned as a response; anything else
    /// becomes [`ServeError::PluginReportedFailure`] and the partial response
    /// is dropped. A missing or empty trace falls back to the request path.
    pub fn respond(&self, mut request: Request) -> Result<Response, ServeError> {
        let response = self.seed_response(&request);
        let response = self.chain.run(&mut request, response);
        let response = (self.on_request)(&mut request, response);

        if response.status.is_ok() {
            return Ok(response);
        }

        let status = match response.status.as_u16() {
            0 => StatusCode::INTERNAL_SERVER_ERROR,
            _ => response.status,
        };

        Err(ServeError::PluginReportedFailure {
            status,
            trace: response
                .trace
                .filter(|t| !t.is_empty())
                .unwrap_or(request.path),
            retry: response.retry,
        })
    }
}
