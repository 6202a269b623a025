use std::fs;
use turbo::http::request::{Method, Request, RequestBuilder};
use turbo::http::response::{Response, StatusCode};
use turbo::plugin::{Plugin, PluginChain, REGISTRY, SetHeaders, StaticFiles};

fn get(path: &str) -> Request {
    RequestBuilder::new()
        .method(Method::GET)
        .path(path)
        .build()
        .unwrap()
}

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "hi").unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs").join("index.html"), "docs").unwrap();
    fs::write(dir.path().join("style.css"), "body{}").unwrap();
    fs::write(dir.path().join("data.bin"), [0u8, 1, 2]).unwrap();
    dir
}

fn chain(yaml: &str) -> PluginChain {
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(yaml).unwrap();
    PluginChain::from_config(&mapping).unwrap()
}

#[test]
fn test_registry_names() {
    assert_eq!(REGISTRY, &["static", "headers"]);
}

#[test]
fn test_static_serves_index_for_root() {
    let dir = site();
    let plugin = StaticFiles::root(dir.path());
    let mut request = get("/");

    let response = plugin.apply(&mut request, Response::ok("No Data"));

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"hi".to_vec());
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    // The rewrite is visible to whoever runs next
    assert_eq!(request.path, "/index.html");
}

#[test]
fn test_static_serves_directory_index_without_trailing_slash() {
    let dir = site();
    let plugin = StaticFiles::root(dir.path());
    let mut request = get("/docs");

    let response = plugin.apply(&mut request, Response::ok(""));

    assert_eq!(response.body, b"docs".to_vec());
    assert_eq!(request.path, "/docs/index.html");
}

#[test]
fn test_static_content_types() {
    let dir = site();
    let plugin = StaticFiles::root(dir.path());

    let css = plugin.apply(&mut get("/style.css"), Response::ok(""));
    assert_eq!(css.header("Content-Type"), Some("text/css"));

    let bin = plugin.apply(&mut get("/data.bin"), Response::ok(""));
    assert_eq!(bin.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(bin.body, vec![0, 1, 2]);
}

#[test]
fn test_static_missing_file_is_404() {
    let dir = site();
    let plugin = StaticFiles::root(dir.path());
    let mut request = get("/missing.txt");

    let response = plugin.apply(&mut request, Response::ok("No Data"));

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.trace.as_deref(), Some("/missing.txt"));
}

#[test]
fn test_static_cannot_escape_root() {
    let outer = tempfile::tempdir().unwrap();
    fs::write(outer.path().join("secret.txt"), "secret").unwrap();
    let root = outer.path().join("public");
    fs::create_dir(&root).unwrap();

    let plugin = StaticFiles::root(&root);
    let response = plugin.apply(&mut get("/../secret.txt"), Response::ok(""));

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[test]
fn test_set_headers_overwrites() {
    let plugin = SetHeaders::new([("Cache-Control", "no-cache"), ("X-Frame-Options", "DENY")]);
    let mut response = Response::ok("");
    response.set_header("Cache-Control", "max-age=60");

    let response = plugin.apply(&mut get("/"), response);

    assert_eq!(response.header("Cache-Control"), Some("no-cache"));
    assert_eq!(response.header("X-Frame-Options"), Some("DENY"));
}

#[test]
fn test_chain_from_config_keeps_order() {
    let chain = chain("headers:\n  X-A: a\nstatic:\n  root: /srv\n");

    assert_eq!(chain.names(), vec!["headers", "static"]);
}

#[test]
fn test_chain_skips_unknown_plugins() {
    let chain = chain("gzip: {}\nstatic:\nauth:\n  user: admin\n");

    assert_eq!(chain.len(), 1);
    assert_eq!(chain.names(), vec!["static"]);
}

#[test]
fn test_chain_rejects_bad_options() {
    let mapping: serde_yaml::Mapping = serde_yaml::from_str("static:\n  root: [1, 2]\n").unwrap();

    assert!(PluginChain::from_config(&mapping).is_err());
}

#[test]
fn test_resolve_unknown_name_is_none() {
    let plugin = Plugin::resolve("nope", &serde_yaml::Value::Null).unwrap();

    assert!(plugin.is_none());
}

#[test]
fn test_empty_chain_is_identity() {
    let chain = PluginChain::default();
    let response = chain.run(&mut get("/"), Response::ok("untouched"));

    assert!(chain.is_empty());
    assert_eq!(response.body, b"untouched".to_vec());
}

#[test]
fn test_chain_order_is_observable() {
    let dir = site();
    let set_type = Plugin::Headers(SetHeaders::new([("Content-Type", "text/x-custom")]));
    let serve = Plugin::Static(StaticFiles::root(dir.path()));

    let headers_first = PluginChain::new(vec![set_type.clone(), serve.clone()]);
    let static_first = PluginChain::new(vec![serve, set_type]);

    let a = headers_first.run(&mut get("/"), Response::ok(""));
    let b = static_first.run(&mut get("/"), Response::ok(""));

    assert_eq!(a.header("Content-Type"), Some("text/html"));
    assert_eq!(b.header("Content-Type"), Some("text/x-custom"));
}

#[test]
fn test_chain_continues_after_failure() {
    let dir = site();
    let chain = PluginChain::new(vec![
        Plugin::Static(StaticFiles::root(dir.path())),
        Plugin::Headers(SetHeaders::new([("X-After", "yes")])),
    ]);

    let response = chain.run(&mut get("/missing.txt"), Response::ok(""));

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.header("X-After"), Some("yes"));
}

#[test]
fn test_set_headers_keeps_configured_order() {
    let mapping: serde_yaml::Mapping =
        serde_yaml::from_str("headers:\n  X-Zeta: z\n  X-Alpha: a\n  Max-Age: 60\n").unwrap();
    let options = mapping.get("headers").unwrap();

    let Some(Plugin::Headers(plugin)) = Plugin::resolve("headers", options).unwrap() else {
        panic!("headers plugin not resolved");
    };

    let names: Vec<&str> = plugin.headers().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, vec!["X-Zeta", "X-Alpha", "Max-Age"]);
    assert_eq!(plugin.headers()[2].1, "60");
}

#[test]
fn test_set_headers_rejects_nested_values() {
    let mapping: serde_yaml::Mapping =
        serde_yaml::from_str("headers:\n  X-List: [1, 2]\n").unwrap();

    assert!(PluginChain::from_config(&mapping).is_err());
}
