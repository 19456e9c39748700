use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use crate::api::{
    ApiCancelRequest, ApiCancelResponse, ApiEligibilityRequest, ApiEligibilityResponse,
    ApiModeResponse, ApiPriceRequest, ApiPriceResponse, ApiPurchaseRequest, ApiPurchaseResponse,
    ApiScoreRequest, ApiScoreResponse, ApiViolationRequest,
};
use pulse_boost::engine::BoostEngine;
use pulse_boost::{current_timestamp, hour_of_day};

#[derive(Clone)]
struct AppState {
    engine: Arc<BoostEngine>,
}

pub async fn serve(engine: Arc<BoostEngine>, host: String, port: u16) -> Result<(), String> {
    let poller = engine.spawn_poller();
    let state = AppState { engine };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/score", post(score_handler))
        .route("/api/price", post(price_handler))
        .route("/api/eligibility", post(eligibility_handler))
        .route("/api/purchase", post(purchase_handler))
        .route("/api/cancel", post(cancel_handler))
        .route("/api/compliance", get(compliance_handler))
        .route("/api/compliance/violation", post(violation_handler))
        .route("/api/compliance/restore", post(restore_handler))
        .route("/api/compliance/stream", get(stream_handler))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    tracing::info!(%addr, "boost engine listening");
    let result = axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| format!("failed to bind server: {}", err))?,
        app,
    )
    .await
    .map_err(|err| format!("server error: {}", err));

    poller.abort();
    result
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn score_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiScoreRequest>,
) -> Result<Json<ApiScoreResponse>, (StatusCode, String)> {
    let report = state
        .engine
        .calculate_boost_score(&request.listing_id, current_timestamp())
        .await
        .map_err(|err| (StatusCode::NOT_FOUND, err))?;
    Ok(Json(ApiScoreResponse { report }))
}

async fn price_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiPriceRequest>,
) -> Result<Json<ApiPriceResponse>, (StatusCode, String)> {
    let now = current_timestamp();
    let context = request
        .into_context(
            state.engine.config().pricing.base_price,
            hour_of_day(now),
        )
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let quote = state.engine.price_quote(&context);
    Ok(Json(ApiPriceResponse { quote }))
}

async fn eligibility_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiEligibilityRequest>,
) -> Result<Json<ApiEligibilityResponse>, (StatusCode, String)> {
    let eligibility = state
        .engine
        .check_eligibility(&request.listing_id, current_timestamp())
        .await
        .map_err(|err| (StatusCode::NOT_FOUND, err))?;
    Ok(Json(ApiEligibilityResponse { eligibility }))
}

async fn purchase_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiPurchaseRequest>,
) -> Result<Json<ApiPurchaseResponse>, (StatusCode, String)> {
    let purchaser = request
        .purchaser_id
        .unwrap_or_else(|| request.listing_id.clone());
    let outcome = state
        .engine
        .purchase_boost(
            &request.listing_id,
            &request.package_id,
            &purchaser,
            current_timestamp(),
        )
        .await
        .map_err(|err| (StatusCode::BAD_GATEWAY, err))?;
    Ok(Json(ApiPurchaseResponse::from_outcome(outcome)))
}

async fn cancel_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiCancelRequest>,
) -> Json<ApiCancelResponse> {
    match state
        .engine
        .cancel_boost(&request.listing_id, current_timestamp())
        .await
    {
        Ok(purchase) => Json(ApiCancelResponse {
            success: true,
            purchase: Some(purchase),
            error: None,
        }),
        Err(err) => Json(ApiCancelResponse {
            success: false,
            purchase: None,
            error: Some(err),
        }),
    }
}

async fn compliance_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.compliance_status().await)
}

async fn violation_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiViolationRequest>,
) -> Json<ApiModeResponse> {
    let detail = request
        .detail
        .unwrap_or_else(|| "reported violation".to_string());
    let mode = state
        .engine
        .record_violation_cycle(
            request.checked,
            request.violations,
            &detail,
            current_timestamp(),
        )
        .await;
    Json(ApiModeResponse { mode })
}

async fn restore_handler(State(state): State<AppState>) -> Json<ApiModeResponse> {
    let mode = state.engine.restore_health(current_timestamp()).await;
    Json(ApiModeResponse { mode })
}

async fn stream_handler(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let receiver = state.engine.subscribe_notifications().await;
    let stream = BroadcastStream::new(receiver).filter_map(|notification| match notification {
        Ok(notification) => {
            let data = serde_json::to_string(&notification).unwrap_or_default();
            Some(Ok(Event::default().data(data)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(8)))
}
