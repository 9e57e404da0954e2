use crate::cli::ServeArgs;
use crate::infra::{load_reference_data, AppState, InMemoryWardrobeRepository};
use crate::routes::{with_wardrobe_routes, WardrobeApi};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use wardrobe::config::AppConfig;
use wardrobe::customization::OutfitCustomizer;
use wardrobe::error::AppError;
use wardrobe::recommendation::{RecommendationService, StaticWeatherProvider};
use wardrobe::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let tables = load_reference_data(config.reference.data_dir.as_deref())?;
    info!(
        subtypes = tables.temperature.len(),
        source = config
            .reference
            .data_dir
            .as_deref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "bundled".to_string()),
        "reference tables loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryWardrobeRepository::default());
    let weather = Arc::new(StaticWeatherProvider::new(config.weather.default_reading));
    let customizer = Arc::new(OutfitCustomizer::new(Arc::new(tables)));
    let api = Arc::new(WardrobeApi {
        repository: repository.clone(),
        service: RecommendationService::new(repository, weather, customizer),
    });

    let app = with_wardrobe_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "wardrobe recommendation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
