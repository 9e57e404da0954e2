use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use wardrobe::customization::{GarmentScore, Outfit};
use wardrobe::domain::{
    normalize_subtype, Category, Color, Garment, GarmentId, OwnerId, ANY_FORMALITY,
};
use wardrobe::error::AppError;
use wardrobe::recommendation::{
    RecommendationError, RecommendationService, RepositoryError, WardrobeRepository,
    WeatherCondition, WeatherError, WeatherProvider, WeatherReading,
};

/// Shared handler state: direct store access for item CRUD plus the
/// recommendation service reading from the same store.
pub(crate) struct WardrobeApi<R, W> {
    pub(crate) repository: Arc<R>,
    pub(crate) service: RecommendationService<R, W>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GarmentPayload {
    #[serde(default)]
    pub(crate) id: Option<String>,
    pub(crate) name: String,
    pub(crate) category: Category,
    pub(crate) subtype: String,
    pub(crate) color: Color,
    #[serde(default)]
    pub(crate) formality: Option<String>,
}

impl GarmentPayload {
    fn into_garment(self, id: GarmentId) -> Garment {
        Garment {
            id,
            name: self.name.trim().to_string(),
            category: self.category,
            subtype: normalize_subtype(&self.subtype),
            color: self.color,
            formality: self
                .formality
                .map(|value| value.trim().to_ascii_lowercase())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| ANY_FORMALITY.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationRequest {
    pub(crate) formality: String,
    #[serde(default)]
    pub(crate) city: Option<String>,
    #[serde(default)]
    pub(crate) temperature_f: Option<f64>,
    #[serde(default)]
    pub(crate) condition: Option<WeatherCondition>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SelectionView {
    pub(crate) category: Category,
    pub(crate) garment: Garment,
    pub(crate) score: GarmentScore,
    pub(crate) total_score: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecommendationResponse {
    pub(crate) owner: OwnerId,
    pub(crate) formality: String,
    pub(crate) weather: WeatherReading,
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) selections: Vec<SelectionView>,
}

impl RecommendationResponse {
    fn new(owner: OwnerId, formality: String, weather: WeatherReading, outfit: Outfit) -> Self {
        let selections = outfit
            .selections
            .into_iter()
            .map(|selection| SelectionView {
                category: selection.garment.category,
                total_score: selection.score.total(),
                score: selection.score,
                garment: selection.garment,
            })
            .collect();

        Self {
            owner,
            formality,
            weather,
            generated_at: Utc::now(),
            selections,
        }
    }
}

pub(crate) fn wardrobe_router<R, W>(api: Arc<WardrobeApi<R, W>>) -> Router
where
    R: WardrobeRepository + 'static,
    W: WeatherProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/wardrobes/:owner/items",
            post(create_item_handler::<R, W>).get(list_items_handler::<R, W>),
        )
        .route(
            "/api/v1/wardrobes/:owner/items/:item_id",
            get(get_item_handler::<R, W>)
                .put(update_item_handler::<R, W>)
                .delete(delete_item_handler::<R, W>),
        )
        .route(
            "/api/v1/wardrobes/:owner/recommendation",
            post(recommendation_handler::<R, W>),
        )
        .with_state(api)
}

pub(crate) fn with_wardrobe_routes<R, W>(api: Arc<WardrobeApi<R, W>>) -> Router
where
    R: WardrobeRepository + 'static,
    W: WeatherProvider + 'static,
{
    wardrobe_router(api)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, Json(payload)).into_response()
}

fn repository_error_response(error: RepositoryError) -> Response {
    match error {
        RepositoryError::Conflict => error_response(StatusCode::CONFLICT, "item already exists"),
        RepositoryError::NotFound => error_response(StatusCode::NOT_FOUND, "item not found"),
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

/// Reject garments the reference tables cannot score before they reach the store.
fn validate_garment<R, W>(api: &WardrobeApi<R, W>, garment: &Garment) -> Result<(), Response>
where
    R: WardrobeRepository + 'static,
    W: WeatherProvider + 'static,
{
    if garment.subtype.is_empty() {
        return Err(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "subtype must not be empty",
        ));
    }
    if !api
        .service
        .customizer()
        .tables()
        .temperature
        .contains(&garment.subtype)
    {
        return Err(error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("no temperature range for subtype '{}'", garment.subtype),
        ));
    }
    Ok(())
}

pub(crate) async fn create_item_handler<R, W>(
    State(api): State<Arc<WardrobeApi<R, W>>>,
    Path(owner): Path<String>,
    Json(payload): Json<GarmentPayload>,
) -> Response
where
    R: WardrobeRepository + 'static,
    W: WeatherProvider + 'static,
{
    let owner = OwnerId(owner);
    let id = payload
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .map(GarmentId)
        .unwrap_or_else(GarmentId::generate);
    let garment = payload.into_garment(id);
    if let Err(response) = validate_garment(&api, &garment) {
        return response;
    }

    match api.repository.insert(&owner, garment) {
        Ok(garment) => {
            info!(%owner, garment = %garment.id, "wardrobe item added");
            (StatusCode::CREATED, Json(garment)).into_response()
        }
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn list_items_handler<R, W>(
    State(api): State<Arc<WardrobeApi<R, W>>>,
    Path(owner): Path<String>,
) -> Response
where
    R: WardrobeRepository + 'static,
    W: WeatherProvider + 'static,
{
    match api.repository.list_for_owner(&OwnerId(owner)) {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn get_item_handler<R, W>(
    State(api): State<Arc<WardrobeApi<R, W>>>,
    Path((owner, item_id)): Path<(String, String)>,
) -> Response
where
    R: WardrobeRepository + 'static,
    W: WeatherProvider + 'static,
{
    match api.repository.fetch(&OwnerId(owner), &GarmentId(item_id)) {
        Ok(Some(garment)) => (StatusCode::OK, Json(garment)).into_response(),
        Ok(None) => repository_error_response(RepositoryError::NotFound),
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn update_item_handler<R, W>(
    State(api): State<Arc<WardrobeApi<R, W>>>,
    Path((owner, item_id)): Path<(String, String)>,
    Json(payload): Json<GarmentPayload>,
) -> Response
where
    R: WardrobeRepository + 'static,
    W: WeatherProvider + 'static,
{
    let garment = payload.into_garment(GarmentId(item_id));
    if let Err(response) = validate_garment(&api, &garment) {
        return response;
    }

    match api.repository.update(&OwnerId(owner), garment) {
        Ok(garment) => (StatusCode::OK, Json(garment)).into_response(),
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn delete_item_handler<R, W>(
    State(api): State<Arc<WardrobeApi<R, W>>>,
    Path((owner, item_id)): Path<(String, String)>,
) -> Response
where
    R: WardrobeRepository + 'static,
    W: WeatherProvider + 'static,
{
    match api.repository.remove(&OwnerId(owner), &GarmentId(item_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => repository_error_response(error),
    }
}

/// Fields given in the request win over the weather provider. When a city is
/// given, the provider still fills whichever of temperature or condition the
/// request left out.
pub(crate) async fn recommendation_handler<R, W>(
    State(api): State<Arc<WardrobeApi<R, W>>>,
    Path(owner): Path<String>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, AppError>
where
    R: WardrobeRepository + 'static,
    W: WeatherProvider + 'static,
{
    let owner = OwnerId(owner);
    let RecommendationRequest {
        formality,
        city,
        temperature_f,
        condition,
    } = request;
    let city = city.filter(|city| !city.trim().is_empty());

    let (reading, outfit) = match (city, temperature_f) {
        (Some(city), None) if condition.is_none() => {
            api.service.recommend_for_city(&owner, &formality, &city)?
        }
        (Some(city), _) => {
            let observed = api.service.current_weather(&city)?;
            let reading = WeatherReading {
                temperature_f: temperature_f.unwrap_or(observed.temperature_f),
                condition: condition.or(observed.condition),
            };
            (reading, api.service.recommend(&owner, &formality, reading)?)
        }
        (None, Some(temperature_f)) => {
            let reading = WeatherReading {
                temperature_f,
                condition,
            };
            (reading, api.service.recommend(&owner, &formality, reading)?)
        }
        (None, None) => {
            return Err(RecommendationError::Weather(WeatherError::MissingCity).into());
        }
    };

    Ok(Json(RecommendationResponse::new(
        owner, formality, reading, outfit,
    )))
}
