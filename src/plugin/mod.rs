//! Request-processing plugins.
//!
//! A plugin turns a `(request, response)` pair into the next response. The
//! set of plugins is closed: names from the configuration are resolved
//! against [`REGISTRY`] once, when the chain is built, and unknown names are
//! skipped.
//!
//! The chain never short-circuits. A plugin that runs after a failure (say a
//! 404 from `static`) still sees the response and decides for itself whether
//! to touch it.

pub mod headers;
pub mod static_files;

pub use headers::SetHeaders;
pub use static_files::StaticFiles;

use crate::http::request::Request;
use crate::http::response::Response;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::sync::Arc;

/// Names accepted in the `plugins` configuration section.
pub const REGISTRY: &[&str] = &[static_files::NAME, headers::NAME];

/// A configured plugin together with its decoded options.
#[derive(Debug, Clone)]
pub enum Plugin {
    Static(StaticFiles),
    Headers(SetHeaders),
}

impl Plugin {
    /// Looks `name` up in the registry and decodes its options.
    ///
    /// Returns `Ok(None)` for names the registry doesn't know.
    pub fn resolve(name: &str, options: &Value) -> Result<Option<Plugin>> {
        let plugin = match name {
            static_files::NAME => Plugin::Static(StaticFiles::new(decode(name, options)?)),
            headers::NAME => Plugin::Headers(decode(name, options)?),
            _ => return Ok(None),
        };
        Ok(Some(plugin))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Plugin::Static(_) => static_files::NAME,
            Plugin::Headers(_) => headers::NAME,
        }
    }

    pub fn apply(&self, request: &mut Request, response: Response) -> Response {
        match self {
            Plugin::Static(plugin) => plugin.apply(request, response),
            Plugin::Headers(plugin) => plugin.apply(request, response),
        }
    }
}

// `static:` with no value means default options
fn decode<T>(name: &str, options: &Value) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if options.is_null() {
        return Ok(T::default());
    }
    serde_yaml::from_value(options.clone())
        .with_context(|| format!("invalid options for plugin `{}`", name))
}

/// Ordered list of plugins applied to every request.
#[derive(Debug, Clone, Default)]
pub struct PluginChain {
    plugins: Vec<Plugin>,
}

impl PluginChain {
    pub fn new(plugins: Vec<Plugin>) -> Self {
        Self { plugins }
    }

    /// Builds the chain from a `plugins` mapping, keeping its key order.
    pub fn from_config(config: &Mapping) -> Result<Self> {
        let mut plugins = Vec::with_capacity(config.len());

        for (key, options) in config {
            let Some(name) = key.as_str() else {
                tracing::warn!(key = ?key, "Ignoring plugin with non-string name");
                continue;
            };

            match Plugin::resolve(name, options)? {
                Some(plugin) => plugins.push(plugin),
                None => tracing::warn!(plugin = name, "Unknown plugin, skipping"),
            }
        }

        Ok(Self { plugins })
    }

    /// Runs every plugin in order, threading the response through.
    pub fn run(&self, request: &mut Request, response: Response) -> Response {
        self.plugins
            .iter()
            .fold(response, |response, plugin| plugin.apply(request, response))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(Plugin::name).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// End-of-chain handler, run after the last plugin.
pub type RequestHandler = Arc<dyn Fn(&mut Request, Response) -> Response + Send + Sync>;

/// Handler that returns the response untouched.
pub fn identity() -> RequestHandler {
    Arc::new(|_request, response| response)
}
