//! Health endpoints: liveness and readiness probes for orchestration.
//!
//! Readiness also reports which interaction store backs the process so a
//! deployment that silently fell back to memory is visible.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Interaction store selected at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Diesel adapter over PostgreSQL.
    Postgres,
    /// Process-local store; records are lost on restart.
    Memory,
}

/// Probe body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeBody {
    /// Whether the probe passed.
    pub ok: bool,
    /// Active interaction store.
    pub store: StoreKind,
}

/// Shared readiness and liveness flags.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    store: StoreKind,
}

impl HealthState {
    /// Not ready, alive, backed by `store`.
    pub fn new(store: StoreKind) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            store,
        }
    }

    /// Start passing readiness probes.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness probes while draining.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Whether start-up has finished.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Whether liveness probes should pass.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Store selected at start-up.
    pub fn store(&self) -> StoreKind {
        self.store
    }

    fn probe_response(&self, ok: bool) -> HttpResponse {
        let mut response = if ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(ProbeBody {
                ok,
                store: self.store,
            })
    }
}

/// Readiness probe: 200 once start-up finished, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = ProbeBody),
        (status = 503, description = "Server is not ready", body = ProbeBody)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.probe_response(state.is_ready())
}

/// Liveness probe: 200 while alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive", body = ProbeBody),
        (status = 503, description = "Server is shutting down", body = ProbeBody)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.probe_response(state.is_alive())
}
