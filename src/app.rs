use std::net::SocketAddr;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::{self, protect, ActiveCheck},
    config::AppConfig,
    forms,
    state::AppState,
    users::{self, domain::Role},
};

pub fn build_app(state: AppState) -> Router {
    let employee = protect(
        Router::new()
            .route("/forms", get(forms::handlers::list_forms).post(forms::handlers::create_form))
            .route("/forms/:id", get(forms::handlers::get_form)),
        &state,
        &[Role::Employee],
        ActiveCheck::Required,
    );

    let hr = protect(
        Router::new()
            .route("/hr/users", get(users::handlers::list_users))
            .route("/hr/forms", get(forms::handlers::list_forms))
            .route("/hr/forms/:id", get(forms::handlers::get_form))
            .route("/hr/forms/:id/status", patch(forms::handlers::update_form_status)),
        &state,
        &[Role::Hr],
        ActiveCheck::Required,
    );

    // the admin account is always active, so no store round-trip here
    let admin = protect(
        Router::new()
            .route("/admin/users", get(users::handlers::list_users))
            .route("/admin/users/:id/status", patch(users::handlers::update_user_status)),
        &state,
        &[Role::Admin],
        ActiveCheck::Skipped,
    );

    Router::new()
        .merge(auth::router())
        .merge(employee)
        .merge(hr)
        .merge(admin)
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
