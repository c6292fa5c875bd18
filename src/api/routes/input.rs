use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    api::types::InputState,
    error::Error,
    models::{PostalCode, TemperatureSummary},
};

pub fn create_router(state: InputState) -> Router {
    Router::new()
        .route("/weather", post(post_weather))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct PostWeatherPayload {
    pub cep: String,
}

#[instrument(name = "input.post_weather", skip_all)]
async fn post_weather(
    State(state): State<InputState>,
    payload: Result<Json<PostWeatherPayload>, JsonRejection>,
) -> Result<Json<TemperatureSummary>, Error> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::info!(%rejection, "Unreadable weather payload");
        Error::InvalidCode
    })?;
    let code = PostalCode::parse(payload.cep)?;

    let summary = state.temperatures.get_temperature(code.as_str()).await?;

    Ok(Json(summary))
}
