//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite and in-memory stores
//! - HTTP: REST API routes
//! - WebSocket: Change-notification pushes to watching clients
//! - Sync: The in-process change broadcaster
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod persistence;
pub mod state;
pub mod sync;
pub mod websocket;
