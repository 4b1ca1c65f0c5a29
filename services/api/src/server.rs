use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use talent_review::config::AppConfig;
use talent_review::error::AppError;
use talent_review::reviews::{InMemoryAuditLog, InMemoryReviewStore, ReviewService};
use talent_review::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{seed_review_data, AppState};
use crate::routes::with_review_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryReviewStore::new());
    let audit = Arc::new(InMemoryAuditLog::new());
    let review_service = Arc::new(ReviewService::new(store, audit));
    if config.seed_demo_org {
        seed_review_data(&review_service)?;
    }

    let app = with_review_routes(review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "talent review service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
