//! Per-session alert episode bookkeeping

use std::time::Instant;
use tracing::info;

/// A single alert episode entry.
#[derive(Debug, Clone)]
pub struct EpisodeRecord {
    /// When the episode began
    pub entered_at: Instant,
    /// Frame sequence number of the transition frame
    pub frame_sequence: u32,
}

/// Records alert-episode entries for the current monitoring session.
///
/// One record per episode entry, never per frame; cleared when a new
/// session starts.
#[derive(Debug, Default)]
pub struct EpisodeLog {
    episodes: Vec<EpisodeRecord>,
}

impl EpisodeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an episode entry.
    pub fn record_entry(&mut self, entered_at: Instant, frame_sequence: u32) {
        self.episodes.push(EpisodeRecord {
            entered_at,
            frame_sequence,
        });
        info!(
            "Alert episode {} entered at frame {}",
            self.episodes.len(),
            frame_sequence
        );
    }

    /// Number of episodes recorded this session.
    pub fn count(&self) -> usize {
        self.episodes.len()
    }

    /// Most recent episode, if any.
    pub fn last(&self) -> Option<&EpisodeRecord> {
        self.episodes.last()
    }

    /// All recorded episodes, oldest first.
    pub fn episodes(&self) -> &[EpisodeRecord] {
        &self.episodes
    }

    /// Clear the log at session start.
    pub fn clear(&mut self) {
        self.episodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_accumulate_and_clear() {
        let mut log = EpisodeLog::new();
        assert_eq!(log.count(), 0);

        let now = Instant::now();
        log.record_entry(now, 20);
        log.record_entry(now, 90);
        assert_eq!(log.count(), 2);
        assert_eq!(log.last().unwrap().frame_sequence, 90);

        log.clear();
        assert_eq!(log.count(), 0);
        assert!(log.last().is_none());
    }
}
