use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::{
    display::EstimateView,
    form::FormInputs,
    service::{EstimateError, Estimator},
    variant::Variant,
};

/// Estimators loaded at startup, one per configured variant.
#[derive(Clone, Default)]
pub struct AppState {
    pub hourly: Option<Arc<Estimator>>,
    pub timestamped: Option<Arc<Estimator>>,
}

impl AppState {
    pub fn insert(&mut self, estimator: Estimator) {
        let slot = match estimator.variant() {
            Variant::Hourly => &mut self.hourly,
            Variant::Timestamped => &mut self.timestamped,
        };
        *slot = Some(Arc::new(estimator));
    }

    pub fn get(&self, variant: Variant) -> Option<&Arc<Estimator>> {
        match variant {
            Variant::Hourly => self.hourly.as_ref(),
            Variant::Timestamped => self.timestamped.as_ref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<EstimateError> for ApiError {
    fn from(e: EstimateError) -> Self {
        let status = match e {
            EstimateError::Form(_) | EstimateError::Build(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EstimateError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: format!("invalid form: {}", rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/estimate/:variant", post(estimate))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Bind `bind_addr` and serve until the process exits.
pub async fn serve(bind_addr: &str, state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid server.bind_addr '{bind_addr}'"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "estimate form endpoint listening");
    axum::serve(listener, router(state).into_make_service())
        .await
        .context("estimate server error")
}

pub async fn estimate(
    State(state): State<AppState>,
    Path(variant): Path<Variant>,
    body: Result<Json<FormInputs>, JsonRejection>,
) -> Result<Json<EstimateView>, ApiError> {
    let Json(form) = body?;
    let estimator = state.get(variant).ok_or_else(|| ApiError {
        status: StatusCode::NOT_FOUND,
        message: format!("no model configured for the {variant} variant"),
    })?;

    let view = estimator.estimate_form(&form)?;
    Ok(Json(view))
}

async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    let loaded: Vec<&str> = Variant::ALL
        .into_iter()
        .filter(|v| state.get(*v).is_some())
        .map(Variant::as_str)
        .collect();
    Json(serde_json::json!({ "status": "ok", "models": loaded }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapter::{
            tests::{ConstantModel, FailingModel},
            EstimateAdapter,
        },
        clock::FixedClock,
        config::PricingConfig,
        model::Regressor,
    };
    use axum::{body::Body, http::Request};
    use time::macros::datetime;
    use tower::ServiceExt;

    fn state_with(model: Arc<dyn Regressor>, variant: Variant) -> AppState {
        let mut state = AppState::default();
        state.insert(Estimator::new(
            EstimateAdapter::new(model, variant, PricingConfig::default()),
            Arc::new(FixedClock(datetime!(2024-06-15 09:30:00 UTC))),
        ));
        state
    }

    #[tokio::test]
    async fn estimate_returns_view_for_configured_variant() {
        let state = state_with(Arc::new(ConstantModel(42.5)), Variant::Timestamped);

        let Json(view) = estimate(
            State(state),
            Path(Variant::Timestamped),
            Ok(Json(FormInputs::default())),
        )
        .await
        .unwrap();

        assert_eq!(view.hourly_kwh, 42.5);
        assert_eq!(view.hourly_kwh_display, "42.50 kWh");
    }

    #[tokio::test]
    async fn unconfigured_variant_is_not_found() {
        let state = state_with(Arc::new(ConstantModel(1.0)), Variant::Timestamped);

        let err = estimate(State(state), Path(Variant::Hourly), Ok(Json(FormInputs::default())))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_form_is_unprocessable() {
        let state = state_with(Arc::new(ConstantModel(1.0)), Variant::Hourly);
        let mut form = FormInputs::default();
        form.building.year_built = 1850;

        let err = estimate(State(state), Path(Variant::Hourly), Ok(Json(form)))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.message.contains("year_built"));
    }

    #[tokio::test]
    async fn inference_failure_is_reported_as_server_error() {
        let state = state_with(Arc::new(FailingModel), Variant::Hourly);

        let err = estimate(State(state), Path(Variant::Hourly), Ok(Json(FormInputs::default())))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "prediction failed: input contains NaN");
    }

    #[tokio::test]
    async fn healthz_lists_loaded_models() {
        let state = state_with(Arc::new(ConstantModel(1.0)), Variant::Hourly);
        let Json(body) = healthz(State(state)).await;
        assert_eq!(body["models"], serde_json::json!(["hourly"]));
    }

    #[tokio::test]
    async fn undecodable_body_is_a_json_error() {
        let app = router(state_with(Arc::new(ConstantModel(1.0)), Variant::Hourly));
        let req = Request::builder()
            .uri("/estimate/hourly")
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"building":{"site_id":300}}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("invalid form: "));
        assert!(message.contains("site_id"));
    }

    #[tokio::test]
    async fn missing_content_type_is_a_json_error() {
        let app = router(state_with(Arc::new(ConstantModel(1.0)), Variant::Hourly));
        let req = Request::builder()
            .uri("/estimate/hourly")
            .method("POST")
            .body(Body::from("{}"))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }
}
