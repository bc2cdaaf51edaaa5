//! Chat platform REST client

mod client;
mod error;
mod models;

pub use client::RestClient;
pub use error::RestError;
