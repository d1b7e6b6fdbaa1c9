//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers under the configured API prefix
//! - Wire up middleware (request ID, tracing, timeout, limits, rate limit, headers)
//! - Own the breaker registry and hand it to the todo service
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::resilience::{BreakerRegistry, RequestExecutor, TransportError};
use crate::security::{self, rate_limit_middleware, RateLimiter};
use crate::todo::TodoService;
use crate::upstream::HttpExecutor;

/// Application state injected into handlers.
pub struct AppState<E> {
    pub todos: Arc<TodoService<E>>,
    pub breakers: Arc<BreakerRegistry<E>>,
}

impl<E> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            todos: self.todos.clone(),
            breakers: self.breakers.clone(),
        }
    }
}

impl<E: RequestExecutor> AppState<E> {
    /// Build the registry from config and bind the todo service to its breaker.
    pub fn new(config: &GatewayConfig, executor: Arc<E>) -> Self {
        let breakers = Arc::new(BreakerRegistry::from_config(&config.circuit_breaker, executor));
        let todos = Arc::new(TodoService::new(&breakers, &config.todo_service.base_url));
        Self { todos, breakers }
    }
}

/// HTTP server for the todo gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server that reaches upstreams over HTTP.
    pub fn new(config: GatewayConfig) -> Result<Self, TransportError> {
        let executor = Arc::new(HttpExecutor::new(&config.timeouts)?);
        Ok(Self::with_executor(config, executor))
    }

    /// Create a server with a custom upstream executor.
    pub fn with_executor<E: RequestExecutor>(config: GatewayConfig, executor: Arc<E>) -> Self {
        let state = AppState::new(&config, executor);
        let router = build_router(&config, state);
        Self { router, config }
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api = %self.config.api_base_path(),
            todo_service = %self.config.todo_service.base_url,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router<E: RequestExecutor>(config: &GatewayConfig, state: AppState<E>) -> Router {
    let base = config.api_base_path();

    let mut api = Router::new()
        .route(
            &format!("{base}/todo"),
            get(handlers::get_todos::<E>).post(handlers::create_todo::<E>),
        )
        .route(
            &format!("{base}/todo/{{id}}"),
            put(handlers::update_todo::<E>).delete(handlers::delete_todo::<E>),
        )
        .route(&format!("{base}/breakers"), get(handlers::list_breakers::<E>))
        .with_state(state);

    if config.rate_limit.enabled {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        api = api.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
    }

    let router = Router::new()
        .route("/", get(handlers::health))
        .merge(api)
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.call_secs)));

    // Request id is assigned first so the trace span and the response both carry it.
    security::headers::apply(router, &config.security).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}
