use std::io::Write;

use http::Method;
use routeflow::router::Router;
use routeflow::runtime_config::RouterConfig;
use routeflow::server::{BufferedResponse, RequestHead};
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = config_file("pattern_cache = false\nslow_route_threshold_us = 250\n");
    let config = RouterConfig::load(file.path()).unwrap();
    assert!(!config.pattern_cache);
    assert_eq!(config.slow_route_threshold_us, 250);

    let router = Router::with_config(config);
    assert!(!router.cache().is_enabled());
    let mut res = BufferedResponse::new();
    router
        .route(&RequestHead::new(Method::GET, "/a/1"), &mut res, |r| {
            r.pat("/a/{x}").func(|_, _| {})
        })
        .unwrap();
    assert!(router.cache().is_empty());
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("router.toml");
    let err = RouterConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("router.toml"));
}

#[test]
fn test_load_invalid_file() {
    let file = config_file("slow_route_threshold_us = \"fast\"\n");
    let err = RouterConfig::load(file.path()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Invalid router configuration"));
    assert!(message.contains("slow_route_threshold_us"));
}

#[test]
fn test_default_router_config() {
    let router = Router::new();
    assert_eq!(router.config(), &RouterConfig::default());
    assert!(router.cache().is_enabled());
}
