//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` so they depend only on the driving
//! ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CallbackRequestCommand, CallbackRequestQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub command: Arc<dyn CallbackRequestCommand>,
    pub query: Arc<dyn CallbackRequestQuery>,
}

impl HttpState {
    /// Bundle separate command and query implementations.
    pub fn new(
        command: Arc<dyn CallbackRequestCommand>,
        query: Arc<dyn CallbackRequestQuery>,
    ) -> Self {
        Self { command, query }
    }

    /// Use one service for both driving ports.
    pub fn for_service<S>(service: Arc<S>) -> Self
    where
        S: CallbackRequestCommand + CallbackRequestQuery + 'static,
    {
        Self {
            command: service.clone(),
            query: service,
        }
    }
}
