//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite and file-backed slot stores
//! - Remote store: HTTP client for the shared collection
//! - Broadcast: In-process change notifications
//! - HTTP: REST API routes
//! - Config: Application configuration
//! - State: Shared application state
//! - Seed: Mock data generation

pub mod broadcast;
pub mod config;
pub mod http;
pub mod persistence;
pub mod remote_event_store;
pub mod seed;
pub mod state;
