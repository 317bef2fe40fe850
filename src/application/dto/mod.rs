//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so infrastructure (HTTP/WebSocket)
//! can serialize without leaking store shapes to clients.

pub mod attack;
pub mod encounter;

pub use attack::*;
pub use encounter::*;
