// Handler for PUT /flag
use axum::extract::State;
use shared::models::FlagRequest;

use super::helpers::BoundBody;
use super::CandleEngine;

const SEPARATOR: &str = "-------------------------------";

pub async fn handle_submit_flag(
    State(engine): State<CandleEngine>,
    BoundBody(request): BoundBody<FlagRequest>,
) -> String {
    tracing::info!("{}", SEPARATOR);
    tracing::info!(flag = %request.flag, "Flag submitted");
    tracing::info!("{}", SEPARATOR);

    engine.flag_reply().to_string()
}
