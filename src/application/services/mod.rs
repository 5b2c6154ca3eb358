//! Application services - Use case implementations
//!
//! Marker rendering turns a snapshot into drawable markers, the transfer
//! service encodes and decodes whole collections, and the sync coordinator
//! keeps each viewing context's working copy up to date.

pub mod marker_service;
pub mod sync_coordinator;
pub mod transfer_service;

pub use marker_service::{Marker, MarkerService, MarkerSet};
pub use sync_coordinator::{
    Snapshot, SyncBackend, SyncCoordinator, SyncError, SyncHandle, SyncMessage, SyncMode,
    SyncOutcome, SyncState, ViewingContext,
};
pub use transfer_service::{
    decode_collection, dtos_to_events, encode_collection, export_json, import_json, TransferError,
};
