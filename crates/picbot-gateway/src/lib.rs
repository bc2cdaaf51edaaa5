//! # picbot-gateway
//!
//! The bot process: a WebSocket client for the chat platform's gateway, a
//! REST client implementing the chat port, and the command and reaction
//! event handlers.

pub mod bot;
pub mod connection;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod rest;

pub use bot::run;
