//! Dealer listing HTTP handler.
//!
//! ```text
//! GET /api/dealers/customer_info?dealer_name=Acme
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{DealerCustomersResponse, FailureResponse};
use crate::inbound::http::state::HttpState;

/// Query string for dealer listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DealerParams {
    /// Exact dealer name; surrounding whitespace is significant.
    pub dealer_name: Option<String>,
}

/// List the customers assigned to a dealer, oldest first.
#[utoipa::path(
    get,
    path = "/api/dealers/customer_info",
    params(DealerParams),
    responses(
        (status = 200, description = "Customers for the dealer", body = DealerCustomersResponse),
        (status = 400, description = "Blank dealer name or no records", body = FailureResponse)
    ),
    tags = ["dealers"],
    operation_id = "listDealerCustomers"
)]
#[get("/dealers/customer_info")]
pub async fn list_dealer_customers(
    state: web::Data<HttpState>,
    params: web::Query<DealerParams>,
) -> ApiResult<web::Json<DealerCustomersResponse>> {
    // An absent name is reported the same way as a blank one.
    let dealer_name = params.into_inner().dealer_name.unwrap_or_default();
    let customers = state.query.list_by_dealer(&dealer_name).await?;
    Ok(web::Json(DealerCustomersResponse::from(customers)))
}
