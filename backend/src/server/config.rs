//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::web;
use callback_desk::inbound::http::state::HttpState;

/// Everything the server needs besides the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: web::Data<HttpState>,
}

impl ServerConfig {
    /// Serve `http_state` on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            http_state: web::Data::new(http_state),
        }
    }
}
