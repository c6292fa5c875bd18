use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    api::types::InternalState,
    error::Error,
    models::{PostalCode, TemperatureSummary},
};

pub fn create_router(state: InternalState) -> Router {
    Router::new()
        .route("/weather/:zip_code", get(get_weather))
        .with_state(state)
}

#[instrument(name = "internal.get_weather", skip(state))]
async fn get_weather(
    State(state): State<InternalState>,
    Path(zip_code): Path<String>,
) -> Result<Json<TemperatureSummary>, Error> {
    let code = PostalCode::parse(zip_code)?;

    // The weather lookup needs the locality, so these stay sequential.
    let address = state.addresses.get_address(&code).await?;
    let weather = state.weather.get_weather(&address.locality).await?;

    Ok(Json(TemperatureSummary::from_lookup(&address, &weather)))
}
