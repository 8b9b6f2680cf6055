//! Handlers run by the chain for every inbound message: commands first, then the relay.

mod command_handler;
mod relay_handler;

pub use command_handler::CommandHandler;
pub use relay_handler::RelayHandler;
