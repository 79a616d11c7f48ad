//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the single site handler
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Bind server to listener
//! - Resolve every request through the routing engine
//! - Hand route matches to the page renderer and service calls to the registry
//! - Swap in reloaded site state without interrupting requests
//!
//! Middleware settings (timeout, body limit, headers) are read once at
//! startup; a reload only replaces routes, locales and site settings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::SiteConfig;
use crate::http::page::{JsonPageRenderer, PageRenderer, PageView};
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::http::response;
use crate::locale::LocaleSignals;
use crate::observability::metrics;
use crate::routing::Decision;
use crate::services::{ServiceContext, ServiceRegistry};
use crate::state::SiteState;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Current site snapshot. Each request loads it once.
    pub site: Arc<ArcSwap<SiteState>>,
    pub services: Arc<ServiceRegistry>,
    pub renderer: Arc<dyn PageRenderer>,
}

/// HTTP server for the site.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server with the built-in services and the JSON page renderer.
    pub fn new(site: SiteState) -> Self {
        Self::with_parts(site, ServiceRegistry::with_builtin(), Arc::new(JsonPageRenderer))
    }

    /// Create a server with custom services and renderer.
    pub fn with_parts(
        site: SiteState,
        services: ServiceRegistry,
        renderer: Arc<dyn PageRenderer>,
    ) -> Self {
        let router = Self::build_router(&site.config);
        let state = AppState {
            site: Arc::new(ArcSwap::from_pointee(site)),
            services: Arc::new(services),
            renderer,
        };
        Self {
            router: router.with_state(state.clone()),
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &SiteConfig) -> Router<AppState> {
        let mut router = Router::new()
            .route("/{*path}", any(site_handler))
            .route("/", any(site_handler))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4));

        if config.security.enable_headers {
            router = router.layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ));
        }
        router
    }

    /// The fully layered router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Site state arriving on `updates` replaces the current snapshot.
    /// The server drains and returns once `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut updates: mpsc::UnboundedReceiver<Arc<SiteState>>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let site = Arc::clone(&self.state.site);
        let reloader = tokio::spawn(async move {
            while let Some(next) = updates.recv().await {
                tracing::info!(
                    routes = next.router.table().len(),
                    locales = next.router.catalog().len(),
                    "Site configuration reloaded"
                );
                site.store(next);
                metrics::record_reload(true);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the request and act on the decision.
async fn site_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let start = Instant::now();
    let site = state.site.load_full();
    let request_id = request_id(&headers);
    let path = uri.path();

    let locales = &site.config.locales;
    let cookie_name = locales.cookie_name.as_deref();
    let cookie = cookie_name
        .and_then(|name| jar.get(name))
        .map(|c| c.value().to_string());
    let signals = LocaleSignals {
        cookie: cookie.as_deref(),
        accept_language: headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok()),
    };

    let decision = match site.router.resolve(path, &signals) {
        Ok(decision) => decision,
        Err(e) => {
            tracing::warn!(request_id = %request_id, path = %path, code = e.code(), error = %e, "Rejected service request");
            metrics::record_decision("malformed_service", start);
            return response::malformed_service(&e);
        }
    };
    metrics::record_decision(decision.kind(), start);

    match decision {
        Decision::RouteMatch(matched) => {
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                route = %matched.route.source_path(),
                locale = ?matched.locale,
                "Route matched"
            );
            let page = PageView::new(&matched, &site);
            let jar = remember_locale(jar, cookie_name, matched.locale.as_deref());
            (jar, state.renderer.render(&page)).into_response()
        }
        Decision::Redirect {
            destination,
            locale,
            source,
        } => {
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                locale = %locale,
                source = source.as_str(),
                destination = %destination,
                "Redirecting to preferred locale"
            );
            response::redirect(&destination)
        }
        Decision::ServicesForward(call) => {
            let catalog = site.router.catalog();
            let ctx = ServiceContext {
                locale: query
                    .get("locale")
                    .map(String::as_str)
                    .filter(|code| catalog.contains(code)),
                catalog,
                locales,
                site: &site.config.site,
            };
            tracing::debug!(
                request_id = %request_id,
                service = %call.service,
                method = %call.method,
                "Dispatching service call"
            );
            match state.services.dispatch(&call, &ctx) {
                Ok(result) => response::service_result(result),
                Err(e) => {
                    tracing::warn!(request_id = %request_id, service = %call.service, code = e.code(), error = %e, "Service call failed");
                    response::service_error(&e)
                }
            }
        }
        Decision::NotFound { locale } => {
            tracing::info!(request_id = %request_id, path = %path, locale = ?locale, "No route matched");
            let page = PageView::not_found(path, locale.as_deref(), &site);
            let jar = remember_locale(jar, cookie_name, locale.as_deref());
            (jar, state.renderer.render_not_found(&page)).into_response()
        }
    }
}

/// Persist a locale confirmed by the request path.
fn remember_locale(jar: CookieJar, cookie_name: Option<&str>, locale: Option<&str>) -> CookieJar {
    match (cookie_name, locale) {
        (Some(name), Some(code)) => {
            jar.add(Cookie::build((name.to_string(), code.to_string())).path("/"))
        }
        _ => jar,
    }
}
