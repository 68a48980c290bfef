//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all edge handler
//! - Wire up middleware (request ID, tracing)
//! - Route every request and execute the decision
//! - Hand unsigned `/test` requests back through Fanout (`self_{host}`)
//! - Apply backend registry updates from config reloads

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{BackendConfig, EdgeConfig, LocalConfig};
use crate::forward::Forwarder;
use crate::handlers::{self, grip};
use crate::http::request::{request_id, MakeRequestUuidV4, RoutingParts};
use crate::observability::metrics;
use crate::routing::{BackendName, HandlerId, RequestRouter, RoutingDecision};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RequestRouter>,
    pub forwarder: Arc<Forwarder>,
    pub local: Arc<LocalConfig>,
    pub default_scheme: Arc<str>,
}

/// HTTP server for the edge service.
pub struct HttpServer {
    router: Router,
    config: EdgeConfig,
    forwarder: Arc<Forwarder>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EdgeConfig) -> Self {
        let forwarder = Arc::new(Forwarder::new(&config.backends, &config.timeouts));

        let state = AppState {
            router: Arc::new(RequestRouter::new(config.routing.fanout_domain_suffix.clone())),
            forwarder: forwarder.clone(),
            local: Arc::new(config.local.clone()),
            default_scheme: Arc::from(config.routing.default_scheme.as_str()),
        };

        let router = Self::build_router(state);
        Self {
            router,
            config,
            forwarder,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Every request lands in the fallback, so request targets that no path
    /// pattern would match (`OPTIONS *`) are routed too.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(edge_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    ///
    /// Backend tables received on `backend_updates` replace the registry.
    pub async fn run(
        self,
        listener: TcpListener,
        mut backend_updates: mpsc::UnboundedReceiver<Vec<BackendConfig>>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.forwarder.registry().len(),
            fanout_domain = %self.config.routing.fanout_domain_suffix,
            "HTTP server starting"
        );

        let forwarder = self.forwarder.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = backend_updates.recv() => match update {
                        Some(backends) => forwarder.reload(&backends),
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }
}

/// Routes the request, then runs a local handler or forwards it.
async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let parts = RoutingParts::from_request(&request, &state.default_scheme);
    let request_id = request_id(&request).to_string();

    let decision = state.router.route(&parts.as_target());
    metrics::record_decision(&decision);

    match decision {
        RoutingDecision::Local {
            handler: HandlerId::Test,
        } if !grip::is_from_fanout(request.headers()) => {
            let backend = BackendName::self_handoff(&parts.host);
            tracing::debug!(request_id = %request_id, backend = %backend, "Unsigned test request, looping through Fanout");
            forward_to_backend(&state, &backend, request, &parts.scheme, &request_id).await
        }
        RoutingDecision::Local { handler } => {
            tracing::debug!(request_id = %request_id, handler = %handler, "Handling locally");
            handlers::handle(handler, request, &state.local).await
        }
        RoutingDecision::Forward { backend } => {
            forward_to_backend(&state, &backend, request, &parts.scheme, &request_id).await
        }
    }
}

async fn forward_to_backend(
    state: &AppState,
    backend: &BackendName,
    request: Request<Body>,
    scheme: &str,
    request_id: &str,
) -> Response {
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    match state
        .forwarder
        .forward(backend, request, client_addr, scheme)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                backend = %backend,
                error = %e,
                "Forward failed"
            );
            e.into_response()
        }
    }
}
