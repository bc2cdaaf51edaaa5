//! Event handlers
//!
//! Turns dispatch events into command runs and approval wakeups.

mod command;
mod commands;
mod error;
mod router;

pub use command::Command;
pub use commands::CommandHandler;
pub use error::{HandlerError, HandlerResult};
pub use router::{EventRouter, Routed};
