//! Demo server: a small route table dispatched in front of a fallback router.
//!
//! ```text
//! /health               → 200 {"status":"ok"}
//! /admin, /admin/:page  → require `authorization`, then tag and pass through
//! /legacy/*rest         → 308 to /rest
//! anything else         → fallback handler
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use trail_router::config::{load_config, TrailConfig};
use trail_router::http::middleware::trail_middleware;
use trail_router::http::response::pass_through;
use trail_router::observability::{logging, metrics};
use trail_router::{create_dispatcher, Continuation, ContinuationHandler, Dispatcher, Next};

#[derive(Parser, Debug)]
#[command(name = "trail-router", version, about = "Path-scoped middleware demo server")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => TrailConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("trail-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        case_sensitive = config.matching.case_sensitive,
        strict = config.matching.strict,
        cache_patterns = config.matching.cache_patterns,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
        tracing::info!(address = %addr, "Metrics endpoint enabled");
    }

    let dispatcher = demo_dispatcher()
        .with_options(config.matching.pattern_options(), config.matching.cache_patterns);

    let app = Router::new()
        .route("/{*path}", any(fallback))
        .route("/", any(fallback))
        .layer(from_fn_with_state(dispatcher, trail_middleware::<Continuation>))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

const LEGACY_PREFIX: &str = "/legacy";

fn demo_dispatcher() -> Dispatcher<Continuation> {
    create_dispatcher(|trail, _| {
        trail.register(
            "/health",
            ContinuationHandler::new(|_req, _next| async {
                Some(Json(json!({ "status": "ok" })).into_response())
            }),
        );

        trail.register(
            ["/admin", "/admin/:page"],
            vec![
                ContinuationHandler::new(|req, next: Next| async move {
                    if req.header("authorization").is_none() {
                        return Some((StatusCode::UNAUTHORIZED, "Unauthorized").into_response());
                    }
                    next.advance();
                    None
                }),
                ContinuationHandler::new(|req, _next| async move {
                    let mut res = pass_through();
                    if let Ok(id) = HeaderValue::from_str(req.id()) {
                        res.headers_mut().insert("x-admin-request", id);
                    }
                    Some(res)
                }),
            ],
        );

        trail.register(
            "/legacy/*rest",
            ContinuationHandler::new(|req, _next| async move {
                let target = req.path().get(LEGACY_PREFIX.len()..).unwrap_or("/");
                let mut res = Response::new(Body::empty());
                *res.status_mut() = StatusCode::PERMANENT_REDIRECT;
                if let Ok(location) = HeaderValue::from_str(target) {
                    res.headers_mut().insert(header::LOCATION, location);
                }
                Some(res)
            }),
        );
    })
}

async fn fallback(request: Request<Body>) -> impl IntoResponse {
    format!("{} {}\n", request.method(), request.uri().path())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
