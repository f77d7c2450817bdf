//! Alerting System
//!
//! Defines the alert channel selector, the dispatch seam the monitoring loop
//! fires once per alert-episode entry, and per-session episode bookkeeping.
//! Actual sound/voice playback is an external collaborator behind
//! [`AlertController`].

mod controller;
mod episode;

pub use controller::{AlertController, AlertType, LogAlerter};
pub use episode::{EpisodeLog, EpisodeRecord};
