//! Adds fixed headers to every response.
//!
//! ```yaml
//! plugins:
//!   headers:
//!     Cache-Control: no-cache
//! ```
//!
//! Headers are applied in the order they are configured.

use crate::http::request::Request;
use crate::http::response::Response;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

pub const NAME: &str = "headers";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Mapping")]
pub struct SetHeaders {
    headers: Vec<(String, String)>,
}

impl TryFrom<Mapping> for SetHeaders {
    type Error = String;

    fn try_from(mapping: Mapping) -> Result<Self, Self::Error> {
        let mut headers = Vec::with_capacity(mapping.len());

        for (name, value) in mapping {
            let name = scalar(&name).ok_or("header names must be strings")?;
            let value = scalar(&value)
                .ok_or_else(|| format!("header `{}` must have a scalar value", name))?;
            headers.push((name, value));
        }

        Ok(Self { headers })
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl SetHeaders {
    pub fn new<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Configured headers, in order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Existing headers with the same name are overwritten.
    pub fn apply(&self, _request: &mut Request, mut response: Response) -> Response {
        for (name, value) in &self.headers {
            response.set_header(name.clone(), value.clone());
        }
        response
    }
}
