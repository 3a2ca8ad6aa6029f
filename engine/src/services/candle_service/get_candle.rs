// Handler for GET /candle
use axum::{
    extract::{Query, State},
    Json,
};
use shared::models::Candle;

use super::helpers::{parse_query_field, query_param};
use super::CandleEngine;
use crate::error::EngineError;

pub async fn handle_get_candle(
    State(engine): State<CandleEngine>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Candle>, EngineError> {
    let code = query_param(&params, "code").to_string();
    // Field order decides which one is reported when several are bad
    let year = parse_query_field(&params, "year")?;
    let month = parse_query_field(&params, "month")?;
    let day = parse_query_field(&params, "day")?;
    let hour = parse_query_field(&params, "hour")?;

    tracing::info!(code = %code, year, month, day, hour, "Received candle request");

    let aggregator = engine.aggregator();
    let candle = tokio::task::spawn_blocking(move || {
        aggregator.compute_candle(&code, year, month, day, hour)
    })
    .await
    .map_err(|e| EngineError::ProcessingError(format!("Candle task failed: {}", e)))??;

    Ok(Json(candle))
}
