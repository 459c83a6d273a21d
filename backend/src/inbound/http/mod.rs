//! HTTP inbound adapter exposing the callback request endpoints.

pub mod callback_requests;
pub mod dealers;
pub mod envelope;
pub mod error;
pub mod health;
pub mod state;
pub mod tracking;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// `/api` scope with every callback endpoint and envelope-producing
/// extractor error handlers.
///
/// Callers must register [`state::HttpState`] as app data.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(callback_requests::create_callback_requests)
        .service(callback_requests::update_callback_request)
        .service(tracking::track_callback_request)
        .service(dealers::list_dealer_customers)
}
