use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono_tz::Tz;
use position_gateway::{Gateway, GatewayError, Provider};
use position_view::{QueryParams, RenderedTable, normalize_all};
use realtime::{HttpError, bad_gateway};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

/// Shared handler state.
#[derive(Debug)]
pub struct AppState<P> {
    pub gateway: Gateway<P>,
    pub zone: Tz,
}

/// Build the service router. Every origin may call it.
pub fn router<P>(state: AppState<P>) -> Router
where
    P: Provider + 'static,
{
    Router::new()
        .route("/positions", get(positions::<P>))
        .route("/positions/view", get(view::<P>))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

async fn positions<P: Provider>(
    State(state): State<Arc<AppState<P>>>,
) -> Result<Json<Value>, GatewayError> {
    state.gateway.positions().await.map(Json)
}

async fn view<P: Provider>(
    State(state): State<Arc<AppState<P>>>, Query(params): Query<QueryParams>,
) -> Result<Json<RenderedTable>, HttpError> {
    let query = position_view::Query::try_from(params)?;

    let raw = state.gateway.positions().await.map_err(|e| bad_gateway!("{}", e))?;
    let records = normalize_all(raw).context("normalizing upstream positions")?;

    let table = query.apply(&records);
    Ok(Json(table.render(state.zone)))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
