//! Wire objects shared by the eventgate server and its clients.

pub mod event;
pub mod health;

pub use event::{DecodeError, Event};
pub use health::HealthResponse;
