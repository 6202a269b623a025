use std::collections::HashMap;
use turbo::http::request::{Method, Request, RequestBuilder};

fn request_with(headers: &[(&str, &str)]) -> Request {
    Request {
        method: Method::GET,
        path: "/".to_string(),
        version: "HTTP/1.1".to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        body: vec![],
    }
}

#[test]
fn test_request_header_retrieval() {
    let req = request_with(&[("Host", "example.com"), ("Content-Type", "application/json")]);

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_header_lookup_is_case_sensitive() {
    let req = request_with(&[("Host", "example.com")]);

    assert_eq!(req.header("host"), None);
}

#[test]
fn test_request_connection_defaults_to_close() {
    let req = request_with(&[]);

    assert_eq!(req.connection(), "close");
    assert!(!req.keep_alive());
}

#[test]
fn test_request_keep_alive_explicit_header() {
    let req = request_with(&[("Connection", "keep-alive")]);

    assert_eq!(req.connection(), "keep-alive");
    assert!(req.keep_alive());
}

#[test]
fn test_request_keep_alive_close() {
    let req = request_with(&[("Connection", "close")]);

    assert!(!req.keep_alive());
}

#[test]
fn test_request_keep_alive_case_insensitive_value() {
    let req = request_with(&[("Connection", "Keep-Alive")]);

    assert!(req.keep_alive());
}

#[test]
fn test_request_method_from_string() {
    assert_eq!(Method::from_str("GET"), Some(Method::GET));
    assert_eq!(Method::from_str("POST"), Some(Method::POST));
    assert_eq!(Method::from_str("INVALID"), None);
    assert_eq!(Method::from_str("get"), None); // Case-sensitive
}

#[test]
fn test_request_method_parse_keeps_extensions() {
    assert_eq!(Method::parse("PUT"), Method::PUT);
    assert_eq!(Method::parse("get"), Method::Extension("get".to_string()));
    assert_eq!(Method::parse("PROPFIND").to_string(), "PROPFIND");
}

#[test]
fn test_request_builder() {
    let req = RequestBuilder::new()
        .method(Method::POST)
        .path("/api")
        .header("Connection", "keep-alive")
        .body("payload")
        .build()
        .unwrap();

    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path, "/api");
    assert_eq!(req.version, "HTTP/1.1");
    assert_eq!(req.body, b"payload".to_vec());
    assert!(req.keep_alive());
}

#[test]
fn test_request_builder_requires_method_and_path() {
    assert!(RequestBuilder::new().path("/").build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());
}

#[test]
fn test_request_with_body() {
    let body_content = b"test body content".to_vec();
    let req = Request {
        method: Method::POST,
        path: "/api".to_string(),
        version: "HTTP/1.1".to_string(),
        headers: HashMap::new(),
        body: body_content.clone(),
    };

    assert_eq!(req.body, body_content);
}
