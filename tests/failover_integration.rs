//! End-to-end failover: the home page follows primary resource reachability.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

mod common;

async fn home_page(client: reqwest::Client, addr: SocketAddr) -> String {
    client
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}

async fn status(client: reqwest::Client, addr: SocketAddr) -> Value {
    client
        .get(format!("http://{}/status", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

/// Wait until `/status` carries a report for at least `round`.
async fn wait_for_round(client: &reqwest::Client, addr: SocketAddr, round: u64) -> bool {
    common::eventually(Duration::from_secs(3), || {
        let client = client.clone();
        async move { status(client, addr).await["last_round"]["round"].as_u64().unwrap_or(0) >= round }
    })
    .await
}

#[tokio::test]
async fn test_home_page_switches_to_fallback_and_back() {
    let image_healthy = Arc::new(AtomicBool::new(true));
    let flag = image_healthy.clone();
    let image_addr = common::start_programmable_backend(move || {
        let flag = flag.clone();
        async move {
            if flag.load(Ordering::SeqCst) {
                (200, "png".into())
            } else {
                (500, "dead".into())
            }
        }
    })
    .await;
    let style_addr = common::start_mock_backend("body {}").await;

    let image_url = format!("http://{}/banner.png", image_addr);
    let style_url = format!("http://{}/site.css", style_addr);
    let (addr, failover, shutdown) = common::start_app(common::test_config(image_url, style_url)).await;
    let client = common::client();
    // Rendered URLs are HTML-escaped; match on the host part.
    let image_host = image_addr.to_string();
    let style_host = style_addr.to_string();

    // First round runs at startup.
    assert!(wait_for_round(&client, addr, 1).await);
    let page = home_page(client.clone(), addr).await;
    assert!(page.contains(&image_host), "primary image missing: {}", page);
    assert!(page.contains(&style_host));
    assert!(!failover.get());

    image_healthy.store(false, Ordering::SeqCst);
    let switched = common::eventually(Duration::from_secs(3), || {
        let client = client.clone();
        async move { home_page(client, addr).await.contains("fallback.png") }
    })
    .await;
    assert!(switched, "home page should switch to fallback");

    let page = home_page(client.clone(), addr).await;
    assert!(page.contains("fallback.css"));
    assert!(!page.contains(&style_host), "failover replaces the whole pair");
    assert!(failover.get());

    image_healthy.store(true, Ordering::SeqCst);
    let recovered = common::eventually(Duration::from_secs(3), || {
        let client = client.clone();
        let image_host = image_host.clone();
        async move { home_page(client, addr).await.contains(&image_host) }
    })
    .await;
    assert!(recovered, "home page should return to primary");
    assert!(!failover.get());

    shutdown.trigger();
}

#[tokio::test]
async fn test_status_reports_last_round() {
    let image_addr = common::start_mock_backend("png").await;
    let style_addr = common::closed_addr().await;

    let config = common::test_config(
        format!("http://{}/banner.png", image_addr),
        format!("http://{}/site.css", style_addr),
    );
    let (addr, _failover, shutdown) = common::start_app(config).await;
    let client = common::client();

    assert!(wait_for_round(&client, addr, 1).await, "a round should complete");
    let body = status(client.clone(), addr).await;

    assert_eq!(body["mode"], "fallback");
    assert_eq!(body["serving"]["image_url"], "/static/fallback.png");
    assert_eq!(body["last_round"]["mode"], "fallback");

    let results = body["last_round"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["resource"]["kind"], "image");
    assert_eq!(results[0]["reachable"], true);
    assert!(results[0]["failure"].is_null());
    assert_eq!(results[1]["resource"]["kind"], "style");
    assert_eq!(results[1]["reachable"], false);
    assert_eq!(results[1]["failure"]["kind"], "network");

    shutdown.trigger();
}

#[tokio::test]
async fn test_disabled_monitor_keeps_primary() {
    let closed = common::closed_addr().await;
    let mut config = common::test_config(
        format!("http://{}/banner.png", closed),
        format!("http://{}/site.css", closed),
    );
    config.monitor.enabled = false;
    let (addr, failover, shutdown) = common::start_app(config).await;
    let client = common::client();

    tokio::time::sleep(Duration::from_millis(400)).await;

    let page = home_page(client.clone(), addr).await;
    assert!(page.contains(&closed.to_string()));
    assert!(!page.contains("fallback.png"));
    assert!(!failover.get());

    let body = status(client, addr).await;
    assert_eq!(body["mode"], "primary");
    assert!(body["last_round"].is_null());

    shutdown.trigger();
}
