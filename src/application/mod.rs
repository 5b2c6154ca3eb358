//! Application layer - Use cases over the domain
//!
//! This layer contains:
//! - Ports: interfaces to event stores, slot stores and notification channels
//! - DTOs: the JSON wire format of emotion reports
//! - Services: marker rendering, export/import, and multi-viewer sync

pub mod dto;
pub mod ports;
pub mod services;
