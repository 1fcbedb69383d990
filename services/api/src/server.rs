use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lead_capture::config::AppConfig;
use lead_capture::email_client::ResendClient;
use lead_capture::error::AppError;
use lead_capture::leads::{LeadService, LeadSettings, LeadTemplates};
use lead_capture::telemetry;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let email_client = Arc::new(ResendClient::from_config(&config.email)?);
    let lead_service = Arc::new(LeadService::new(
        email_client,
        LeadTemplates::new()?,
        LeadSettings::from_config(&config.email, &config.leads),
    ));

    let app = with_lead_routes(lead_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, email_api = %config.email.api_base_url, "lead capture service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
