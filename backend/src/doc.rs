//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the callback endpoints, the health probes, and every
//! envelope schema. Swagger UI serves it in debug builds, and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::OpenApi;

use crate::domain::ErrorCode;
use crate::inbound::http::callback_requests::{CallbackRequestPayload, CareAgentUpdatePayload};
use crate::inbound::http::envelope::{
    CreatedResponse, DealerCustomerBody, DealerCustomersResponse, EnvelopeStatus,
    FailureResponse, InteractionBody, TrackResponse, UpdatedResponse,
};
use crate::inbound::http::health::{ProbeBody, StoreKind};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Callback desk API",
        description = "Create, annotate, and track customer callback requests."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::callback_requests::create_callback_requests,
        crate::inbound::http::callback_requests::update_callback_request,
        crate::inbound::http::tracking::track_callback_request,
        crate::inbound::http::dealers::list_dealer_customers,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CallbackRequestPayload,
        CareAgentUpdatePayload,
        CreatedResponse,
        UpdatedResponse,
        TrackResponse,
        InteractionBody,
        DealerCustomersResponse,
        DealerCustomerBody,
        FailureResponse,
        EnvelopeStatus,
        ErrorCode,
        ProbeBody,
        StoreKind,
    )),
    tags(
        (name = "callback requests", description = "Customer callback lifecycle"),
        (name = "dealers", description = "Dealer-facing listings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
