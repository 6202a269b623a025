//! MIME type detection based on file extensions.

use std::path::Path;

/// Content type used for any extension missing from the table.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Maps a file extension (without the dot) to a content type.
///
/// Matching ignores ASCII case. Unknown extensions yield [`OCTET_STREAM`].
pub fn content_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "js" | "mjs" => "text/javascript",
        "css" => "text/css",
        "csv" => "text/csv",

        // Application
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "bz" => "application/x-bzip",
        "bz2" => "application/x-bzip2",
        "gz" => "application/gzip",
        "zip" => "application/zip",
        "rar" => "application/vnd.rar",

        // Image
        "ico" => "image/vnd.microsoft.icon",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",

        // Font
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",

        // Audio
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",

        _ => OCTET_STREAM,
    }
}

/// Content type for a path, judged by its extension.
pub fn for_path(path: impl AsRef<Path>) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(content_type)
        .unwrap_or(OCTET_STREAM)
}
