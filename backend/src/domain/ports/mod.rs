//! Domain ports for the hexagonal boundary.
//!
//! Driving ports ([`CallbackRequestCommand`], [`CallbackRequestQuery`]) are
//! what inbound adapters call. The driven port ([`InteractionRepository`]) is
//! what the lifecycle service needs from storage.

mod macros;
pub(crate) use macros::define_port_error;

mod callback_request_command;
mod callback_request_query;
mod interaction_repository;

#[cfg(test)]
pub use callback_request_command::MockCallbackRequestCommand;
pub use callback_request_command::{CallbackRequestCommand, CreatedCallbackRequests};
#[cfg(test)]
pub use callback_request_query::MockCallbackRequestQuery;
pub use callback_request_query::CallbackRequestQuery;
#[cfg(test)]
pub use interaction_repository::MockInteractionRepository;
pub use interaction_repository::{InteractionRepository, InteractionRepositoryError};
