//! HTTP surface of the Q&A service.
//!
//! Every route except `/health` expects `Authorization: Bearer <token>`
//! signed with `JWT_ACCESS_SECRET`. Failures are rendered by
//! [`quora_errors::AppError`] as `{ "message", "fields"? }`.

use axum::routing::{get, patch, post, put};
use axum::Router;
use quora_app::{AppContext, Config};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub mod extract;
pub mod routes;

pub type ServeError = Box<dyn std::error::Error + Send + Sync>;

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/questions",
            post(routes::create_question).get(routes::list_questions),
        )
        .route(
            "/questions/{id}",
            put(routes::update_question).delete(routes::delete_question),
        )
        .route("/questions/{id}/answers", get(routes::list_answers))
        .route("/answers", post(routes::answer_question))
        .route(
            "/answers/{answer_id}/vote",
            patch(routes::cast_vote).delete(routes::withdraw_vote),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(ctx)
}

pub async fn start_server(config: Config) -> Result<(), ServeError> {
    info!("Initializing state...");
    let ctx = AppContext::from_config(&config).await?;

    let app = router(ctx);

    info!("Binding to {}", config.listen_addr);
    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!("Server running on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
