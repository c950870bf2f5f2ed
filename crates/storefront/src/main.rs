//! Tringl Storefront - cart and checkout server.
//!
//! Serves the JSON storefront API (default port 3000). Carts and checkout
//! state are held in memory per browser session; order placement is
//! simulated with a configurable delay and success rate.

#![cfg_attr(not(test), forbid(unsafe_code))]

use sentry::integrations::tracing::EventFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tringl_storefront::config::StorefrontConfig;
use tringl_storefront::state::AppState;

/// Install the tracing subscriber and, when a DSN is configured, Sentry.
///
/// Order failures are logged at `warn` and land in Sentry as breadcrumbs;
/// only `error` events (session store or internal failures) become issues.
/// The returned guard flushes Sentry on drop.
fn init_telemetry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                environment: config.sentry_environment.clone().map(Into::into),
                ..Default::default()
            },
        ))
    });

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tringl_storefront=info,tower_http=debug".into());
    let sentry_layer = sentry::integrations::tracing::layer().event_filter(|metadata| {
        match *metadata.level() {
            tracing::Level::ERROR => EventFilter::Event,
            tracing::Level::WARN | tracing::Level::INFO => EventFilter::Breadcrumb,
            _ => EventFilter::Ignore,
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .init();

    if guard.is_some() {
        tracing::info!(environment = ?config.sentry_environment, "Sentry enabled");
    }
    guard
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");
    let _sentry_guard = init_telemetry(&config);

    let state = AppState::new(config.clone()).expect("Failed to load product catalog");
    tracing::info!(
        products = state.catalog().len(),
        delay_ms = u64::try_from(state.orders().processing_delay().as_millis()).unwrap_or(u64::MAX),
        success_rate = config.orders.success_rate,
        "Catalog loaded"
    );

    let app = tringl_storefront::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .expect("Failed to bind storefront address");
    tracing::info!(addr = %config.socket_addr(), "Storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
///
/// In-flight order tasks are not awaited; their sessions are dropped with
/// the process.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received, draining connections");
}
