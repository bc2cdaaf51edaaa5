//! Gateway connection
//!
//! Keeps the bot's WebSocket session alive and hands dispatch events to the router.

mod client;
mod error;

pub use client::{DispatchEvent, GatewayClient};
pub use error::GatewayError;
