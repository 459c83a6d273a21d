//! Tracking HTTP handler.
//!
//! ```text
//! GET /api/track?request_id=4821
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{FailureResponse, TrackResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Query string for tracking lookups.
#[derive(Debug, Deserialize, IntoParams)]
pub struct TrackParams {
    /// Four-digit tracking code.
    pub request_id: Option<String>,
}

/// Return the full record behind a tracking code.
#[utoipa::path(
    get,
    path = "/api/track",
    params(TrackParams),
    responses(
        (status = 200, description = "Stored request", body = TrackResponse),
        (status = 400, description = "Malformed or unknown code", body = FailureResponse)
    ),
    tags = ["callback requests"],
    operation_id = "trackCallbackRequest"
)]
#[get("/track")]
pub async fn track_callback_request(
    state: web::Data<HttpState>,
    params: web::Query<TrackParams>,
) -> ApiResult<web::Json<TrackResponse>> {
    let request_id = params
        .into_inner()
        .request_id
        .ok_or_else(|| missing_field_error("request_id", None))?;
    let record = state.query.track(&request_id).await?;
    Ok(web::Json(TrackResponse::from(record)))
}
