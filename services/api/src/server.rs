use crate::cli::ServeArgs;
use crate::infra::{build_front_desk, AppState};
use crate::routes::with_catalog_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use nouvelle_maison::config::AppConfig;
use nouvelle_maison::error::AppError;
use nouvelle_maison::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let desk = build_front_desk(&config.delays)?;
    let notaries = desk.catalog().notaries();
    let notary_listings: usize = notaries.iter().map(|notary| notary.properties.len()).sum();
    let notary_count = notaries.len();
    let app = with_catalog_routes(desk)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        notaries = notary_count,
        notary_listings,
        login_delay = ?config.delays.login,
        search_delay = ?config.delays.search,
        payment_delay = ?config.delays.payment,
        confirmation_delay = ?config.delays.confirmation,
        "front desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
