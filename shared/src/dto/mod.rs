//! # Data Transfer Objects (DTOs)
//!
//! All data structures used for communication between chat clients and the
//! backend, both over REST and over the relay socket.

pub mod chat;
pub mod events;
pub mod messaging;
pub mod views;

pub use chat::*;
pub use events::*;
pub use messaging::*;
pub use views::*;
