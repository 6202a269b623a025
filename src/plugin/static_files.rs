//! Static file serving.
//!
//! Maps the request path onto a directory on disk and reads the file on every
//! call. Directory-like paths are completed with the index document, and that
//! rewrite is stored back into `request.path`.

use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use serde::Deserialize;
use std::path::PathBuf;

pub const NAME: &str = "static";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticOptions {
    /// Directory files are served from.
    pub root: PathBuf,
    /// Document served for directory paths.
    pub index: String,
}

impl Default for StaticOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: "index.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticFiles {
    options: StaticOptions,
}

impl StaticFiles {
    pub fn new(options: StaticOptions) -> Self {
        Self { options }
    }

    pub fn root(root: impl Into<PathBuf>) -> Self {
        Self::new(StaticOptions {
            root: root.into(),
            ..StaticOptions::default()
        })
    }

    pub fn options(&self) -> &StaticOptions {
        &self.options
    }

    pub fn apply(&self, request: &mut Request, mut response: Response) -> Response {
        request.path = self.resolve_path(&request.path);

        let local_path = self.options.root.join(request.path.trim_start_matches('/'));

        if !local_path.is_file() {
            response.status = StatusCode::NOT_FOUND;
            response.trace = Some(request.path.clone());
            return response;
        }

        match std::fs::read(&local_path) {
            Ok(data) => {
                response.set_header("Content-Type", mime::for_path(&local_path));
                response.body = data;
            }
            Err(e) => {
                tracing::warn!(
                    path = %local_path.display(),
                    error = %e,
                    "Failed to read static file"
                );
                response.status = StatusCode::INTERNAL_SERVER_ERROR;
                response.trace = Some(request.path.clone());
            }
        }

        response
    }

    /// Normalizes a request path into the path of a file under the root.
    ///
    /// `.` and `..` segments are dropped so the result can't leave the root.
    /// A trailing slash, or a last segment without an extension, gets the
    /// index document appended.
    pub fn resolve_path(&self, path: &str) -> String {
        let mut segments: Vec<&str> = path
            .split('/')
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .collect();

        let is_directory = path.ends_with('/')
            || segments.last().is_none_or(|last| !last.contains('.'));

        if is_directory {
            segments.push(&self.options.index);
        }

        format!("/{}", segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_index_documents() {
        let plugin = StaticFiles::default();

        assert_eq!(plugin.resolve_path("/"), "/index.html");
        assert_eq!(plugin.resolve_path("/docs"), "/docs/index.html");
        assert_eq!(plugin.resolve_path("/docs/"), "/docs/index.html");
        assert_eq!(plugin.resolve_path("/style.css"), "/style.css");
    }

    #[test]
    fn strips_parent_segments() {
        let plugin = StaticFiles::default();

        assert_eq!(plugin.resolve_path("/../secret.txt"), "/secret.txt");
        assert_eq!(plugin.resolve_path("/a/./../b.txt"), "/a/b.txt");
    }
}
