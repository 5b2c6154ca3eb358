//! Domain entities - Observations and the clusters derived from them

mod cluster;
mod emotion_event;

pub use cluster::{Cluster, PartitionResult};
pub use emotion_event::EmotionEvent;
