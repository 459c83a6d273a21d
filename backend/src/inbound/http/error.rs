//! HTTP adapter mapping for domain errors.
//!
//! Every domain failure renders as `400 Bad Request` with a `Failed`
//! envelope; clients branch on `code`, not on the status. Extractor failures
//! are converted into the same envelope by the handlers registered here.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use tracing::warn;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

use super::envelope::FailureResponse;
use super::validation::malformed_body_error;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";
const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

/// Strip message and details from server-side failures, keeping code and trace id.
fn redact_server_errors(error: &Error) -> Error {
    let redacted = match error.code() {
        ErrorCode::InternalError => Error::internal(REDACTED_MESSAGE),
        ErrorCode::ServiceUnavailable => Error::service_unavailable(UNAVAILABLE_MESSAGE),
        _ => return error.clone(),
    };
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(FailureResponse::from(&redact_server_errors(self)))
    }
}

/// `JsonConfig` error handler rendering body failures as `Failed` envelopes.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = req.path(), error = %err, "rejected request body");
    malformed_body_error(err).into()
}

/// `QueryConfig` error handler rendering query string failures as envelopes.
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = req.path(), error = %err, "rejected query string");
    malformed_body_error(err).into()
}

/// `PathConfig` error handler rendering path failures as envelopes.
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = req.path(), error = %err, "rejected path parameters");
    malformed_body_error(err).into()
}
