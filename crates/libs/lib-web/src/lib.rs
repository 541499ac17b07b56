//! # Web Library
//!
//! HTTP surface of the chat backend: router and server bootstrap,
//! middleware, REST handlers for chats and messages, the enrichment
//! service, and the presence relay.

pub mod handlers;
pub mod middleware;
pub mod relay;
pub mod server;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use server::{start_server, AppState, ServerConfig};
