//! # Services
//!
//! Cross-cutting application services used by the HTTP handlers.

pub mod resolve;

pub use resolve::Resolver;
