//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use site_router::config::{LocaleConfig, RouteDefinition, SiteConfig};
use site_router::{HttpServer, Shutdown, SiteState};

/// Multi-locale site with an English and a French catalog.
pub fn multi_locale_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.site.host = "https://www.example.com".into();
    config.locales = LocaleConfig {
        multi_locale: true,
        default_locale: "en-gb".into(),
        cookie_name: Some("site_locale".into()),
        services_prefix: "api".into(),
        available: vec!["en-gb".into(), "fr-fr".into()],
        ..LocaleConfig::default()
    };
    config.routes = vec![
        RouteDefinition::new("/").with_meta("page", "home"),
        RouteDefinition::new("/about").with_meta("page", "about"),
        RouteDefinition::new("/contact").with_meta("page", "contact"),
        RouteDefinition::new("/missions/{mission}").with_meta("page", "mission"),
        RouteDefinition::new("/choose-locale")
            .with_locale(false)
            .with_meta("page", "chooser"),
    ];
    config
}

/// Single-locale site with two flat routes.
pub fn single_locale_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.routes = vec![
        RouteDefinition::new("/about"),
        RouteDefinition::new("/contact"),
    ];
    config
}

pub fn build(config: SiteConfig) -> SiteState {
    SiteState::build(config).expect("sample config should compile")
}

/// Start a server on an ephemeral port.
///
/// Returns its address, the shutdown coordinator and the sender used to
/// push reloaded site state.
pub async fn spawn_site(
    config: SiteConfig,
) -> (SocketAddr, Shutdown, mpsc::UnboundedSender<std::sync::Arc<SiteState>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(build(config));
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, update_rx, server_shutdown).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown, update_tx)
}
