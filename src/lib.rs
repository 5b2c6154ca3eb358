//! Emodus Engine - Emotion map clustering and multi-viewer synchronization
//!
//! The engine:
//! - Partitions geo-tagged emotion reports into clusters for a given zoom
//! - Keeps every open viewing context's working copy in sync
//! - Serves the shared collection over a small REST surface

pub mod application;
pub mod domain;
pub mod infrastructure;
